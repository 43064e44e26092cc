//! Text field validators.

use std::borrow::Cow;

use validator::ValidationError;

/// Rejects values that are empty once surrounding whitespace is trimmed.
///
/// Stored names and titles are trimmed, so a whitespace-only value would
/// otherwise pass `length(min = 1)` and be saved empty.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("ada").is_ok());
        assert!(not_blank("  ada ").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t\n ").is_err());
    }
}
