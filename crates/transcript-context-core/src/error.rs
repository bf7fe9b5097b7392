use thiserror::Error;

/// Errors raised by the core retrieval operations.
///
/// These indicate a misconfigured caller rather than bad user input, so
/// applications should validate their settings before calling in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
