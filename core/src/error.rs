//! Error types for the Fixer client.
//!
//! # Design
//! Anything that prevents a response body from arriving collapses into
//! `Connection`, whatever the transport reported. A body that arrived but
//! cannot be used lands in `Response`, carrying the API's numeric code when
//! the API itself reported the failure. `InvalidDate` is only produced while
//! configuring a request, never by `get` / `get_result`.

/// Message used whenever the body decodes as JSON but lacks a required field.
pub const MALFORMED_BODY: &str = "Response body is malformed.";

/// Errors returned by `Exchange`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExchangeError {
    /// The transport failed to produce a response body.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The body was received but is unusable.
    #[error("{message}")]
    Response { message: String, code: Option<i64> },

    /// A historical date expression could not be understood.
    #[error("unrecognised date expression: {0:?}")]
    InvalidDate(String),
}

impl ExchangeError {
    pub(crate) fn malformed() -> Self {
        ExchangeError::Response {
            message: MALFORMED_BODY.to_string(),
            code: None,
        }
    }

    /// The API-reported error code, if this error came from a
    /// `"success": false` payload.
    pub fn code(&self) -> Option<i64> {
        match self {
            ExchangeError::Response { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ExchangeError::Connection(_))
    }

    pub fn is_response(&self) -> bool {
        matches!(self, ExchangeError::Response { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_error_displays_bare_message() {
        let err = ExchangeError::Response {
            message: "Some error message".to_string(),
            code: Some(999),
        };
        assert_eq!(err.to_string(), "Some error message");
        assert_eq!(err.code(), Some(999));
    }

    #[test]
    fn connection_error_has_no_code() {
        let err = ExchangeError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "connection failed: refused");
        assert_eq!(err.code(), None);
        assert!(err.is_connection());
        assert!(!err.is_response());
    }

    #[test]
    fn malformed_uses_fixed_message() {
        let err = ExchangeError::malformed();
        assert_eq!(err.to_string(), MALFORMED_BODY);
        assert!(err.is_response());
    }
}
