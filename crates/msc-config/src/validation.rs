//! Validation utilities and regex patterns

use msc_common::{Month, RepositoryId};
use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #6f42c1)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Validate a `#rrggbb` colour string
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_REGEX.is_match(color) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_hex_color");
        err.message = Some(format!("'{color}' is not a #rrggbb colour").into());
        Err(err)
    }
}

/// Validate an `owner/name` repository identifier
pub fn validate_repository(repository: &str) -> Result<(), ValidationError> {
    repository
        .parse::<RepositoryId>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_repository_format"))
}

/// Validate a `YYYY-MM` month
pub fn validate_month(month: &str) -> Result<(), ValidationError> {
    month
        .parse::<Month>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_month_format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(HEX_COLOR_REGEX.is_match("#6f42c1"));
        assert!(HEX_COLOR_REGEX.is_match("#ABC123"));

        assert!(!HEX_COLOR_REGEX.is_match("FFFFFF")); // Missing #
        assert!(!HEX_COLOR_REGEX.is_match("#FFF")); // Too short
        assert!(!HEX_COLOR_REGEX.is_match("#FFFFFFF")); // Too long
        assert!(!HEX_COLOR_REGEX.is_match("#GGGGGG"));
        assert!(!HEX_COLOR_REGEX.is_match(""));
    }

    #[test]
    fn test_validate_hex_color() {
        assert!(validate_hex_color("#28a745").is_ok());

        let err = validate_hex_color("yellow").unwrap_err();
        assert_eq!(err.code, "invalid_hex_color");
        assert!(err.message.is_some());
    }

    #[test]
    fn test_validate_repository() {
        assert!(validate_repository("matrix-org/matrix-doc").is_ok());
        assert!(validate_repository("matrix-org/matrix-spec-proposals").is_ok());

        assert!(validate_repository("").is_err());
        assert!(validate_repository("matrix-doc").is_err());
        assert!(validate_repository("/matrix-doc").is_err());
        assert!(validate_repository("matrix-org/").is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month("2018-05").is_ok());
        assert!(validate_month("2018-13").is_err());
        assert!(validate_month("2018").is_err());
        assert!(validate_month("May 2018").is_err());
    }
}
