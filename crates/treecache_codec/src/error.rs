//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding a patch payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Payload text is not well-formed in the codec's format.
    #[error("invalid {format} payload: {message}")]
    InvalidSyntax {
        /// Name of the codec that rejected the text.
        format: &'static str,
        /// Description of the syntax error.
        message: String,
    },

    /// Payload parsed, but not into the shape the target slot requires.
    #[error("expected {expected}, found {found}")]
    ShapeMismatch {
        /// The shape the target requires.
        expected: &'static str,
        /// The shape that was found.
        found: String,
    },

    /// Binary leaf payload is not valid base64.
    #[error("invalid base64 payload: {message}")]
    InvalidBase64 {
        /// Description of the base64 error.
        message: String,
    },

    /// Document could not be converted into the target type.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },
}

impl CodecError {
    /// Create an invalid syntax error.
    pub fn invalid_syntax(format: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            format,
            message: message.into(),
        }
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected,
            found: found.into(),
        }
    }

    /// Create an invalid base64 error.
    pub fn invalid_base64(message: impl Into<String>) -> Self {
        Self::InvalidBase64 {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::decoding_failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CodecError::invalid_syntax("json", "trailing comma");
        assert_eq!(err.to_string(), "invalid json payload: trailing comma");

        let err = CodecError::shape_mismatch("object", "array");
        assert_eq!(err.to_string(), "expected object, found array");
    }

    #[test]
    fn serde_errors_become_decoding_failures() {
        let err = serde_json::from_str::<u8>("300").unwrap_err();
        let err: CodecError = err.into();
        assert!(matches!(err, CodecError::DecodingFailed { .. }));
    }
}
