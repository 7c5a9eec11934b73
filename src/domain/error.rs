use thiserror::Error;

/// Core domain errors
///
/// A missing volume is not an error: lookups return the empty sentinel
/// record and deletes of absent keys succeed.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Decoding error: {message}")]
    Decoding { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether retrying the same call could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable_error() {
        let error = DomainError::store_unavailable("connection refused");
        assert_eq!(error.to_string(), "Store unavailable: connection refused");
        assert!(error.is_transient());
    }

    #[test]
    fn test_decoding_error() {
        let error = DomainError::decoding("expected value at line 1 column 1");
        assert_eq!(
            error.to_string(),
            "Decoding error: expected value at line 1 column 1"
        );
        assert!(!error.is_transient());
    }

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("invalid address");
        assert_eq!(error.to_string(), "Configuration error: invalid address");
    }
}
