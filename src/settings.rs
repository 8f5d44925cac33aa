use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_IN_PROGRESS: u32 = 1;
pub const MAX_IN_PROGRESS: u32 = 50;

/// Used when the backend has no settings endpoint and the config says nothing.
pub const DEFAULT_MAX_IN_PROGRESS: u32 = 5;

/// Board settings owned by the backend (`GET/PATCH /settings`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub max_in_progress: u32,
}

impl Settings {
    pub fn new(max_in_progress: i64) -> Result<Self, ValidationError> {
        validate_max_in_progress(max_in_progress).map(|max_in_progress| Self { max_in_progress })
    }
}

pub fn validate_max_in_progress(value: i64) -> Result<u32, ValidationError> {
    if value < i64::from(MIN_IN_PROGRESS) || value > i64::from(MAX_IN_PROGRESS) {
        return Err(ValidationError::LimitOutOfRange {
            min: i64::from(MIN_IN_PROGRESS),
            max: i64::from(MAX_IN_PROGRESS),
            value,
        });
    }
    // range checked above
    Ok(value as u32)
}

/// Parses the settings form field.
pub fn parse_max_in_progress(raw: &str) -> Result<Settings, ValidationError> {
    let raw = raw.trim();
    let value: i64 = raw
        .parse()
        .map_err(|_| ValidationError::InvalidLimit(raw.to_owned()))?;
    Settings::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(5)]
    #[case(50)]
    fn limits_in_range_are_accepted(#[case] value: i64) {
        assert_eq!(
            Settings::new(value).map(|s| s.max_in_progress),
            Ok(value as u32)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(51)]
    #[case(-3)]
    fn limits_out_of_range_are_rejected(#[case] value: i64) {
        assert_eq!(
            Settings::new(value),
            Err(ValidationError::LimitOutOfRange {
                min: 1,
                max: 50,
                value
            })
        );
    }

    #[rstest]
    #[case("abc")]
    #[case("2.5")]
    #[case("")]
    fn non_integer_input_is_rejected(#[case] raw: &str) {
        assert!(matches!(
            parse_max_in_progress(raw),
            Err(ValidationError::InvalidLimit(_))
        ));
    }

    #[test]
    fn settings_use_backend_field_name() {
        let settings: Settings =
            serde_json::from_str(r#"{"max_in_progress": 7}"#).expect("settings decode");
        assert_eq!(settings.max_in_progress, 7);
    }
}
