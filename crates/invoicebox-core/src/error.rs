//! Error types for Invoicebox payload models.

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, CustomerError>;

/// Validation errors raised while building or finalizing a `Customer`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomerError {
    /// The customer type is not one of the supported variants.
    #[error("invalid customer type: {0:?}")]
    InvalidType(String),

    /// A mandatory field was given an empty value.
    #[error("{field} is required")]
    Required {
        /// The payload name of the field.
        field: &'static str,
    },

    /// A field value exceeds its length limit.
    #[error("{field} must not be longer than {max} characters")]
    TooLong {
        /// The payload name of the field.
        field: &'static str,
        /// Maximum number of characters.
        max: usize,
    },

    /// The email address is not syntactically valid.
    #[error("email has an invalid format: {0:?}")]
    InvalidEmail(String),

    /// Required fields are still unset at finalization time.
    #[error("fields {} must be filled", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl CustomerError {
    /// Field names reported by a `MissingFields` error, empty otherwise.
    #[must_use]
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields(fields) => fields,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_is_comma_joined() {
        let err = CustomerError::MissingFields(vec!["vatNumber", "registrationAddress"]);
        assert_eq!(
            err.to_string(),
            "fields vatNumber, registrationAddress must be filled"
        );
        assert_eq!(err.missing_fields(), ["vatNumber", "registrationAddress"]);
    }

    #[test]
    fn too_long_message() {
        let err = CustomerError::TooLong {
            field: "name",
            max: 500,
        };
        assert_eq!(err.to_string(), "name must not be longer than 500 characters");
        assert!(err.missing_fields().is_empty());
    }
}
