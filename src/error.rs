//! Error types for the event boundary
//!
//! Store mutations never fail; these errors only describe frames and
//! arguments that could not be turned into a mutation.

use thiserror::Error;

/// Errors raised while decoding or validating an inbound event
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("event '{event}' expects {expected} argument(s), got {got}")]
    Arity {
        event: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("event '{event}': argument {index} ({name}) must be {expected}")]
    InvalidArgument {
        event: &'static str,
        index: usize,
        name: &'static str,
        expected: &'static str,
    },

    #[error("session id '{0}' is reserved for the all-sessions selector")]
    ReservedSessionId(String),

    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    #[error("malformed frame: {0}")]
    InvalidFrame(String),
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Result type for the server binary
pub type ServerResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GraphError::Arity {
            event: "add_node",
            expected: 3,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "event 'add_node' expects 3 argument(s), got 1"
        );

        let err = GraphError::ReservedSessionId("all_sessions".to_string());
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GraphError = json_err.into();
        assert!(matches!(err, GraphError::MalformedFrame(_)));
    }
}
