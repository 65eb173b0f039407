//! issuekit-core: request body composition for an issue tracker REST API.
//!
//! This crate provides:
//! - `CustomFields`: typed registry of custom field values and their encodings
//! - `UpdateOperations`: per-field `add`/`remove`/`set` directives
//! - `compose` / `compose_transition`: merge a base payload with both builders
//! - `compose_many`: bulk-create envelopes
//! - `RichIssue` / `PlainIssue`: base payloads for the two content dialects

pub mod bulk;
pub mod error;
pub mod field;
pub mod merge;
pub mod operation;
pub mod payload;

pub use bulk::{BulkEnvelope, BulkItem, compose_many};
pub use error::{ComposeError, Result};
pub use field::{CustomFields, EncodeError, FieldValue};
pub use merge::{MergedRequest, compose, compose_transition};
pub use operation::{OperationEntry, UpdateOperations};
pub use payload::{
    BasePayload, Dialect, Document, DocumentNode, IssueFields, IssueRef, IssueScheme, NamedRef,
    PlainIssue, PlainIssueFields, ProjectRef, RichIssue, RichIssueFields, UserRef,
};
