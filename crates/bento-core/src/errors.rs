//! Error types for the layout engine.

use thiserror::Error;

use crate::types::{CellId, Orientation};

/// Errors in layout configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid {axis} alignment '{value}', expected one of: {}", .allowed.join(", "))]
    InvalidAlignment {
        axis: Orientation,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Invalid {axis} justification '{value}', expected one of: {}", .allowed.join(", "))]
    InvalidJustify {
        axis: Orientation,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Origin alignment on the {axis} axis requires a cell spanning a single line")]
    OriginOnSpanningCell { axis: Orientation },

    #[error("Options '{first}' and '{second}' are mutually exclusive")]
    ConflictingOptions {
        first: &'static str,
        second: &'static str,
    },

    #[error("Unknown layout option '{name}'")]
    UnknownOption { name: String },

    #[error("Invalid value '{value}' for option '{option}'")]
    InvalidValue { option: String, value: String },

    #[error("Option '{option}' is not supported by {target}")]
    UnsupportedOption {
        option: &'static str,
        target: &'static str,
    },
}

/// Errors from container operations.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Content is already managed by cell {0}")]
    DuplicateContent(CellId),

    #[error("Unknown cell {0}")]
    UnknownCell(CellId),
}

/// Report a configuration-domain problem.
///
/// Fails a debug assertion in development builds. Release builds log the
/// problem and carry on with the offending value passed through unchanged.
pub fn report_config_error(err: &ConfigError) {
    tracing::warn!("layout configuration: {}", err);
    debug_assert!(false, "layout configuration: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::ConflictingOptions {
            first: "stretch",
            second: "xStretch",
        };
        assert_eq!(
            err.to_string(),
            "Options 'stretch' and 'xStretch' are mutually exclusive"
        );

        let err = ConfigError::InvalidAlignment {
            axis: Orientation::Vertical,
            value: "left".to_string(),
            allowed: &["top", "center"],
        };
        assert_eq!(
            err.to_string(),
            "Invalid vertical alignment 'left', expected one of: top, center"
        );
    }

    #[test]
    fn test_layout_error_from_config() {
        let err: LayoutError = ConfigError::UnknownOption {
            name: "padding".to_string(),
        }
        .into();
        assert!(matches!(err, LayoutError::Config(_)));
        assert_eq!(LayoutError::UnknownCell(CellId(3)).to_string(), "Unknown cell #3");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "mutually exclusive")]
    fn test_report_asserts_in_debug() {
        report_config_error(&ConfigError::ConflictingOptions {
            first: "grow",
            second: "xGrow",
        });
    }
}
