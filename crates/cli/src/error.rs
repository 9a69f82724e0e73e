//! Why a `swatch` command failed, and the exit status it reports.
//!
//! Statuses, so scripts can tell a bad color from a bad file:
//! - 0:  the command succeeded
//! - 2:  clap rejected the command line
//! - 10: the color or geometry was unusable (bad hex, flat control, undecodable image)
//! - 11: the store or image file could not be read or written
//! - 12: an argument or settings value was out of range (unknown field, point off the image)
//! - 13: JSON could not be produced or the store file is not a JSON object

use std::fmt;

use swatch_core::PickerError;

#[derive(Debug)]
pub enum CliError {
    /// The picker refused the color, rect or image.
    Color(PickerError),
    /// A store or image path failed at the filesystem.
    Io(String),
    /// A value the picker cannot act on, such as an unknown field name.
    Input(String),
    /// JSON in or out went wrong.
    Serialization(String),
}

impl CliError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Color(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Color(e) => write!(f, "unusable color input: {e}"),
            CliError::Io(msg) => write!(f, "file access failed: {msg}"),
            CliError::Input(msg) => write!(f, "bad argument: {msg}"),
            CliError::Serialization(msg) => write!(f, "json: {msg}"),
        }
    }
}

impl From<PickerError> for CliError {
    fn from(e: PickerError) -> Self {
        match e {
            PickerError::Storage(msg) => CliError::Io(msg),
            PickerError::Serialization(msg) => CliError::Serialization(msg),
            other => CliError::Color(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<image::ImageError> for CliError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => CliError::Io(io.to_string()),
            other => CliError::Color(PickerError::Capture(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_error_exit_code_is_10() {
        let err = CliError::Color(PickerError::InvalidHex("#12".into()));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn io_error_exit_code_is_11() {
        let err = CliError::Io("write failed".into());
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        let err = CliError::Input("bad rect".into());
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        let err = CliError::Serialization("json fail".into());
        assert_eq!(err.exit_code(), 13);
    }

    #[test]
    fn from_picker_storage_error_routes_to_cli_io() {
        let cli_err = CliError::from(PickerError::Storage("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
    }

    #[test]
    fn from_picker_hex_error_routes_to_cli_color() {
        let cli_err = CliError::from(PickerError::InvalidHex("zzz".into()));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("zzz"));
    }

    #[test]
    fn messages_name_what_went_wrong() {
        let err = CliError::Input("unknown field: alpha".into());
        assert_eq!(err.to_string(), "bad argument: unknown field: alpha");
        let err = CliError::Io("swatch-recent.json: denied".into());
        assert_eq!(err.to_string(), "file access failed: swatch-recent.json: denied");
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
