use non_empty_string::NonEmptyString;

/// Input was missing or malformed.
///
/// This is always the caller's fault and is recovered from by correcting the
/// input.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    /// Creates a validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The human-readable description of what was wrong.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Accepts `value` if it contains something other than whitespace.
///
/// The value is stored as given; only the emptiness check trims.
pub(crate) fn required(field: &str, value: String) -> Result<NonEmptyString, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(format!("{field} is required")));
    }
    NonEmptyString::new(value).map_err(|_| ValidationError::new(format!("{field} is required")))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(""; "empty")]
    #[test_case("   "; "spaces")]
    #[test_case("\t\n"; "other whitespace")]
    fn blank_values_are_rejected(value: &str) {
        let error = required("name", value.to_string()).unwrap_err();
        assert_eq!(error.message(), "name is required");
    }

    #[test]
    fn value_is_kept_verbatim() {
        let value = required("alias", " Batman ".to_string()).unwrap();
        assert_eq!(value.as_str(), " Batman ");
    }
}
