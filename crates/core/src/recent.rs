//! Most-recently-used list of picked colors and the store it persists to.
//!
//! The in-memory list is authoritative. Persistence is best effort: a store
//! that fails to read yields an empty list, and a failed write leaves the
//! in-memory list as it is. Both are logged and otherwise ignored.

use std::collections::HashMap;

use tracing::warn;

use crate::color::Rgb;
use crate::error::PickerError;

/// String key-value storage (browser `localStorage`, a JSON file, ...).
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, PickerError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PickerError>;
}

/// In-memory store, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PickerError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PickerError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Recently picked colors, most recent first.
///
/// Entries compare case-insensitively; re-adding a color moves it to the
/// front and keeps the spelling of the newest add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentColors {
    colors: Vec<String>,
    capacity: usize,
}

impl RecentColors {
    pub fn new(capacity: usize) -> Self {
        Self {
            colors: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Puts `hex` at the front, dropping any case-insensitive duplicate and
    /// anything past the capacity.
    pub fn add(&mut self, hex: &str) {
        self.colors.retain(|c| !c.eq_ignore_ascii_case(hex));
        self.colors.insert(0, hex.to_string());
        self.colors.truncate(self.capacity);
    }

    /// The colors, most recent first.
    pub fn list(&self) -> &[String] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reads a list saved by [`RecentColors::save`].
    ///
    /// A missing key, a failing store, or a corrupt payload all give an
    /// empty list. Stored entries that are not hex colors are skipped and
    /// duplicates collapse onto their first occurrence.
    pub fn load(store: &dyn KeyValueStore, key: &str, capacity: usize) -> Self {
        let mut recent = Self::new(capacity);
        let raw = match store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return recent,
            Err(e) => {
                warn!(error = %e, key, "could not read recent colors");
                return recent;
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(colors) => {
                for color in colors.iter().rev() {
                    if Rgb::from_hex(color).is_ok() {
                        recent.add(color);
                    }
                }
            }
            Err(e) => warn!(error = %e, key, "discarding corrupt recent colors"),
        }
        recent
    }

    /// Writes the list as a JSON array. Returns whether the write went through.
    pub fn save(&self, store: &mut dyn KeyValueStore, key: &str) -> bool {
        let result = serde_json::to_string(&self.colors)
            .map_err(PickerError::from)
            .and_then(|payload| store.set(key, &payload));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, key, "could not persist recent colors");
                false
            }
        }
    }
}

impl RecentColors {
    /// Adds `hex`, then saves the list. The add stands even when the save
    /// fails; the return value says whether it was persisted.
    pub fn record(&mut self, hex: &str, store: &mut dyn KeyValueStore, key: &str) -> bool {
        self.add(hex);
        self.save(store, key)
    }
}

impl Default for RecentColors {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_RECENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store whose reads and writes always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, PickerError> {
            Err(PickerError::Storage("unavailable".into()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), PickerError> {
            Err(PickerError::Storage("quota exceeded".into()))
        }
    }

    #[test]
    fn add_prepends_new_colors() {
        let mut recent = RecentColors::new(14);
        recent.add("#111111");
        recent.add("#222222");
        assert_eq!(recent.list(), ["#222222", "#111111"]);
    }

    #[test]
    fn add_dedups_case_insensitively_keeping_latest_literal() {
        let mut recent = RecentColors::new(14);
        recent.add("#FF0000");
        recent.add("#ff0000");
        assert_eq!(recent.len(), 1);
        assert_eq!(recent.list()[0], "#ff0000");
    }

    #[test]
    fn add_moves_existing_entry_to_front() {
        let mut recent = RecentColors::new(14);
        for c in ["#000001", "#000002", "#000003"] {
            recent.add(c);
        }
        recent.add("#000001");
        assert_eq!(recent.list(), ["#000001", "#000003", "#000002"]);
    }

    #[test]
    fn add_truncates_to_capacity() {
        let mut recent = RecentColors::default();
        for i in 0..20 {
            recent.add(&format!("#0000{i:02x}"));
        }
        assert_eq!(recent.len(), 14);
        assert_eq!(recent.list()[0], "#000013");
        assert_eq!(recent.list()[13], "#000006");
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut recent = RecentColors::new(0);
        recent.add("#abcdef");
        assert!(recent.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemoryStore::new();
        let mut recent = RecentColors::new(14);
        recent.add("#c0ffee");
        recent.add("#BADA55");
        assert!(recent.save(&mut store, "recentColors"));

        let loaded = RecentColors::load(&store, "recentColors", 14);
        assert_eq!(loaded, recent);
    }

    #[test]
    fn load_missing_key_is_empty() {
        let loaded = RecentColors::load(&MemoryStore::new(), "recentColors", 14);
        assert!(loaded.is_empty());
        assert_eq!(loaded.capacity(), 14);
    }

    #[test]
    fn load_truncates_to_new_capacity() {
        let mut store = MemoryStore::new();
        store
            .set("k", r##"["#000001","#000002","#000003"]"##)
            .unwrap();
        let loaded = RecentColors::load(&store, "k", 2);
        assert_eq!(loaded.list(), ["#000001", "#000002"]);
    }

    #[test]
    fn load_collapses_duplicates_and_skips_non_hex_entries() {
        let mut store = MemoryStore::new();
        store
            .set("k", r##"["#FF0000","#ff0000","bogus","#00ff00",42]"##)
            .unwrap();
        // A non-string element makes the whole payload corrupt.
        assert!(RecentColors::load(&store, "k", 14).is_empty());

        store
            .set("k", r##"["#FF0000","#ff0000","bogus","#00ff00"]"##)
            .unwrap();
        let loaded = RecentColors::load(&store, "k", 14);
        assert_eq!(loaded.list(), ["#FF0000", "#00ff00"]);
    }

    #[test]
    fn load_corrupt_payload_is_empty() {
        let mut store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        assert!(RecentColors::load(&store, "k", 14).is_empty());
    }

    #[test]
    fn failing_store_is_a_no_op() {
        let loaded = RecentColors::load(&BrokenStore, "k", 14);
        assert!(loaded.is_empty());

        let mut recent = RecentColors::new(14);
        recent.add("#123456");
        assert!(!recent.save(&mut BrokenStore, "k"));
        assert_eq!(recent.list(), ["#123456"]);
    }

    #[test]
    fn recorded_colors_survive_a_failing_store() {
        let mut store = BrokenStore;
        let mut recent = RecentColors::load(&store, "k", 14);
        assert!(!recent.record("#112233", &mut store, "k"));
        assert!(!recent.record("#445566", &mut store, "k"));
        assert!(!recent.record("#112233", &mut store, "k"));
        assert_eq!(recent.list(), ["#112233", "#445566"]);
    }

    #[test]
    fn record_persists_when_the_store_works() {
        let mut store = MemoryStore::new();
        let mut recent = RecentColors::new(14);
        assert!(recent.record("#abcdef", &mut store, "k"));
        assert_eq!(RecentColors::load(&store, "k", 14), recent);
    }
}
