//! Error types for Reasoner
//!
//! Centralized error handling using thiserror. Tool failures are not errors
//! here; the dispatcher turns them into error results.

use thiserror::Error;

/// All error types that can occur while processing a query
#[derive(Debug, Error)]
pub enum ReasonerError {
    /// The language model call failed; the whole query fails with it
    #[error("LLM call failed: {0}")]
    ExternalCall(String),

    /// A matcher pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias for Reasoner operations
pub type Result<T> = std::result::Result<T, ReasonerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_call_error() {
        let err = ReasonerError::ExternalCall("rate limited".to_string());
        assert_eq!(err.to_string(), "LLM call failed: rate limited");
    }

    #[test]
    fn test_pattern_error_conversion() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: ReasonerError = regex_err.into();
        assert!(matches!(err, ReasonerError::Pattern(_)));
        assert!(err.to_string().starts_with("Pattern error:"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(ReasonerError::ExternalCall("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
