//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Quorum size must be at least 1")]
    InvalidQuorum,

    #[error("Approve and deny symbols must differ")]
    AmbiguousSymbols,

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

impl DomainError {
    /// Check if this error represents a malformed payload
    pub fn is_malformed(&self) -> bool {
        matches!(self, DomainError::Malformed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::InvalidQuorum.to_string(),
            "Quorum size must be at least 1"
        );
        assert_eq!(
            DomainError::Malformed("no row".to_string()).to_string(),
            "Malformed payload: no row"
        );
    }

    #[test]
    fn test_is_malformed() {
        assert!(DomainError::Malformed("x".to_string()).is_malformed());
        assert!(!DomainError::InvalidQuorum.is_malformed());
    }
}
