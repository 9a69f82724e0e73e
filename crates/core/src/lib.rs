#![deny(unsafe_code)]
//! Core of the swatch color picker.
//!
//! Pure color conversions (`Rgb`, `Hsv`, `Hsl`, hex), panel placement
//! relative to an anchor, the pointer-to-value mapping for the saturation
//! surface and hue track, and the `Picker` state that keeps every
//! representation in sync. Browser and filesystem concerns sit behind the
//! `KeyValueStore` and `CaptureService` traits.

pub mod color;
pub mod config;
pub mod drag;
pub mod error;
pub mod eyedropper;
pub mod format;
pub mod geometry;
pub mod params;
pub mod picker;
pub mod recent;

pub use color::{Hsl, Hsv, Rgb};
pub use config::PickerConfig;
pub use drag::{Control, ControlRects, DragState, DragTarget};
pub use error::PickerError;
pub use eyedropper::{CaptureService, Eyedropper, Frame};
pub use format::{ColorFormat, FormatField};
pub use geometry::{calculate_position, PanelPosition, Placement, Rect};
pub use picker::{HostEvent, HostUpdate, Picker, PickerUpdate, PickerView};
pub use recent::{KeyValueStore, MemoryStore, RecentColors};
