//! Numeric input validation.

use std::num::IntErrorKind;

use crate::error::AppError;

/// Parses player input into bounded integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputValidator;

impl InputValidator {
    /// Parse a trimmed decimal integer.
    ///
    /// # Returns
    /// * `Err(AppError::OutOfRange)` if the number does not fit in an `i32`
    /// * `Err(AppError::InvalidNumber)` for anything else that is not a number
    pub fn parse_int(&self, input: &str) -> Result<i32, AppError> {
        input.trim().parse::<i32>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => AppError::OutOfRange,
            _ => AppError::InvalidNumber,
        })
    }

    /// Parse an integer within `min..=max`.
    pub fn parse_int_in_range(&self, input: &str, min: i32, max: i32) -> Result<i32, AppError> {
        let value = self.parse_int(input)?;
        check_range(value, min, max)
    }

    /// Like [`parse_int_in_range`](Self::parse_int_in_range), but blank input
    /// yields `default`, which must itself be within range.
    pub fn parse_optional_int_in_range(
        &self,
        input: &str,
        default: i32,
        min: i32,
        max: i32,
    ) -> Result<i32, AppError> {
        if input.trim().is_empty() {
            return check_range(default, min, max);
        }
        self.parse_int_in_range(input, min, max)
    }
}

fn check_range(value: i32, min: i32, max: i32) -> Result<i32, AppError> {
    if value < min {
        return Err(AppError::BelowMinimum { min: min.into() });
    }
    if value > max {
        return Err(AppError::AboveMaximum { max: max.into() });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        let validator = InputValidator;
        assert_eq!(validator.parse_int(" 42 "), Ok(42));
        assert_eq!(validator.parse_int("-7"), Ok(-7));
        assert_eq!(validator.parse_int("4x"), Err(AppError::InvalidNumber));
        assert_eq!(validator.parse_int(""), Err(AppError::InvalidNumber));
        assert_eq!(validator.parse_int("2147483648"), Err(AppError::OutOfRange));
        assert_eq!(validator.parse_int("-99999999999"), Err(AppError::OutOfRange));
    }

    #[test]
    fn test_parse_int_in_range() {
        let validator = InputValidator;
        assert_eq!(validator.parse_int_in_range("5", 1, 10), Ok(5));
        assert_eq!(
            validator.parse_int_in_range("0", 1, 10),
            Err(AppError::BelowMinimum { min: 1 })
        );
        assert_eq!(
            validator.parse_int_in_range("11", 1, 10),
            Err(AppError::AboveMaximum { max: 10 })
        );
    }

    #[test]
    fn test_parse_optional_int_in_range() {
        let validator = InputValidator;
        assert_eq!(validator.parse_optional_int_in_range("  ", 7, 1, 10), Ok(7));
        assert_eq!(validator.parse_optional_int_in_range("3", 7, 1, 10), Ok(3));
        assert_eq!(
            validator.parse_optional_int_in_range("", 70, 1, 10),
            Err(AppError::AboveMaximum { max: 10 })
        );
    }
}
