//! Error types for issuekit-core.

use thiserror::Error;

/// Result type alias for issuekit-core operations.
pub type Result<T> = std::result::Result<T, ComposeError>;

/// Errors that can occur while building or composing a request body.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// An empty field identifier was passed to a setter or operation builder.
    #[error("missing field identifier")]
    MissingFieldIdentifier,

    /// An operation builder call supplied no operand/verb pairs.
    #[error("no operation values supplied for field '{0}'")]
    MissingOperationValues(String),

    /// Field edits were requested for a transition without a base payload.
    #[error("missing issue payload: field edits require base issue fields")]
    MissingIssuePayload,

    /// A transition request was built with an empty transition identifier.
    #[error("missing transition identifier")]
    MissingTransitionIdentifier,

    /// A bulk composition was requested with zero items.
    #[error("no items to compose")]
    NoItemsToCompose,

    /// A field value could not be encoded into JSON.
    #[error("cannot encode field '{field}': {reason}")]
    FieldEncoding { field: String, reason: String },

    /// The base payload did not serialize into a JSON object.
    #[error("base payload must serialize to a JSON object, got {0}")]
    InvalidBasePayload(&'static str),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
