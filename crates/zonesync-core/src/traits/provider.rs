//! Provider client trait
//!
//! Defines the interface the pipelines need from a remote DNS provider:
//! authenticated listing plus create/update/delete of flat records.
//!
//! Mutating calls return a success flag. `Ok(false)` is the provider's
//! own "this did not happen" answer and is translated into the typed
//! error taxonomy by the apply pipeline; `Err` is a provider-level
//! failure (network, auth, rate limit) and propagates unmodified.
//!
//! # Thread safety
//!
//! Implementations must be `Send + Sync`. The pipelines invoke them
//! strictly sequentially, one call at a time, in the operation order the
//! reconciliation engine decided; a create and its paired delete must
//! never be reordered.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::FlatRecord;

/// One record as listed by the provider
///
/// The type stays a plain string here: providers routinely list types
/// this core does not implement, and those groups are skipped rather
/// than failed during population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedRecord {
    /// Provider-assigned opaque identifier, when the provider reports one
    pub id: Option<String>,
    /// The fully encoded value
    pub content: String,
    /// Record type as the provider spells it
    #[serde(rename = "type")]
    pub rtype: String,
    /// Record name as the provider spells it (relative or absolute)
    pub name: String,
    pub ttl: u32,
}

/// Trait for remote DNS provider implementations
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Authenticate against the provider
    ///
    /// Called once at the start of each populate or apply pass.
    async fn authenticate(&self) -> Result<()>;

    /// List records in the zone, optionally filtered
    ///
    /// The population pipeline always passes `(None, None, None)` and
    /// filters on its own side.
    async fn list_records(
        &self,
        rtype: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
    ) -> Result<Vec<ListedRecord>>;

    /// Create a flat record; `Ok(false)` means the provider refused
    ///
    /// The record carries its own TTL; providers that cannot set a TTL
    /// per call may ignore it.
    async fn create_record(&self, record: &FlatRecord) -> Result<bool>;

    /// Replace the record behind `identifier` with the given value
    async fn update_record(&self, identifier: &str, record: &FlatRecord) -> Result<bool>;

    /// Delete a flat record
    ///
    /// `identifier` is passed when known; some providers can delete by
    /// content+type+name alone, so `None` is forwarded rather than
    /// treated as an error here.
    async fn delete_record(&self, identifier: Option<&str>, record: &FlatRecord) -> Result<bool>;

    /// Provider name for logging and error messages
    fn provider_name(&self) -> &'static str;
}
