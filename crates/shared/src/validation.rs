//! Common field validation helpers used by `validator` derives.

use chrono::NaiveDate;
use validator::ValidationError;

/// True when the value is empty after trimming.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Same as [`is_blank`] for optional values; `None` counts as blank.
pub fn is_blank_opt(value: Option<&str>) -> bool {
    value.map(is_blank).unwrap_or(true)
}

/// Rejects values that are empty or whitespace only.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a monetary amount is finite and non-negative.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount_range");
        err.message = Some("Amount must be a non-negative number".into());
        Err(err)
    }
}

/// Validates that a warranty window is not inverted.
pub fn validate_date_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            let mut err = ValidationError::new("date_window");
            err.message = Some("Warranty end cannot be before warranty start".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Parses a date cell in `YYYY-MM-DD`, `DD-MM-YYYY` or `DD/MM/YYYY` form.
pub fn parse_flexible_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(!is_blank(" x "));
        assert!(is_blank_opt(None));
        assert!(is_blank_opt(Some("\t")));
        assert!(!is_blank_opt(Some("AST-1")));
    }

    #[test]
    fn test_validate_not_blank_message() {
        let err = validate_not_blank("  ").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Value cannot be blank");
        assert!(validate_not_blank("Dell").is_ok());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.0).is_ok());
        assert!(validate_amount(1250.50).is_ok());
        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_date_window() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1);
        let dec = NaiveDate::from_ymd_opt(2024, 12, 31);
        assert!(validate_date_window(jan, dec).is_ok());
        assert!(validate_date_window(dec, jan).is_err());
        assert!(validate_date_window(None, jan).is_ok());
    }

    #[test]
    fn test_parse_flexible_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 9);
        assert_eq!(parse_flexible_date("2025-03-09"), expected);
        assert_eq!(parse_flexible_date("09-03-2025"), expected);
        assert_eq!(parse_flexible_date("09/03/2025"), expected);
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("soon"), None);
    }
}
