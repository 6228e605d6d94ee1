//! Error types for the zone sync core
//!
//! One crate-level error enum covers the whole surface. Two families
//! matter to callers:
//!
//! - `MalformedValue`: a provider returned content that does not marshal
//!   into the structured shape its record type demands. Fatal for that
//!   one record, siblings are unaffected.
//! - `CreateFailed` / `UpdateFailed` / `DeleteFailed`: a provider call
//!   reported failure. Fatal for the remainder of the current apply of
//!   that logical record; already-issued operations are not rolled back.

use thiserror::Error;

use crate::record::{FlatRecord, RecordType};

/// Result type alias for zone sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the zone sync system
#[derive(Error, Debug)]
pub enum Error {
    /// Provider content did not tokenize/parse into the fields its record
    /// type requires (CAA, MX, SRV), or carried unbalanced quoting
    #[error("malformed {rtype} content {content:?}: {reason}")]
    MalformedValue {
        /// Declared record type of the offending content
        rtype: RecordType,
        /// The content string as the provider returned it
        content: String,
        /// What went wrong while marshalling
        reason: String,
    },

    /// Provider reported failure for a create call
    #[error("provider refused to create {record}")]
    CreateFailed {
        /// The flat record that was being created
        record: FlatRecord,
    },

    /// Provider reported failure for an update call
    #[error("provider refused to update {record} (identifier {identifier})")]
    UpdateFailed {
        /// The flat record carrying the new value
        record: FlatRecord,
        /// Identifier of the provider-side record being replaced
        identifier: String,
    },

    /// Provider reported failure for a delete call
    #[error("provider refused to delete {record} (identifier {identifier:?})")]
    DeleteFailed {
        /// The flat record that was being removed
        record: FlatRecord,
        /// Identifier used, when one was known
        identifier: Option<String>,
    },

    /// A record violated its shape rules (wrong value variant, no values,
    /// multiple values on a single-valued type, zero TTL, duplicate key)
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Settings validation failure
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider-level failure propagated unmodified
    #[error("provider error: {0}")]
    Provider(String),

    /// JSON serialization/deserialization errors (provider wire payloads)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed-value error
    pub fn malformed(
        rtype: RecordType,
        content: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedValue {
            rtype,
            content: content.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-record error
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

/// Helper for provider implementations written against anyhow
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Provider(err.to_string())
    }
}
