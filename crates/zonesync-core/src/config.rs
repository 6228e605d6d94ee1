//! Sync settings
//!
//! The small configuration surface the core consumes: which zone is
//! being operated on, the TTL fallback for callers that build records
//! without an explicit one, and an optional record-type allow-list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::RecordType;

/// Default TTL for callers constructing records without an explicit one
pub const DEFAULT_TTL: u32 = 3600;

/// Settings for one sync session against one zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// The zone being operated on, absolute and dot-terminated
    pub domain: String,

    /// TTL fallback, seconds
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// Optional record-type allow-list, case-insensitive
    ///
    /// The effective supported set is the intersection of this list with
    /// the implemented types; absent means all implemented types.
    #[serde(default)]
    pub supports: Option<Vec<String>>,
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

impl SyncSettings {
    /// Settings for `domain` with defaults for everything else
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            default_ttl: DEFAULT_TTL,
            supports: None,
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.domain.len() < 2 || !self.domain.ends_with('.') {
            return Err(Error::config(format!(
                "domain {:?} must be a non-empty, dot-terminated FQDN",
                self.domain
            )));
        }
        if self.default_ttl == 0 {
            return Err(Error::config("default TTL must be positive"));
        }
        if let Some(supports) = &self.supports {
            if supports.is_empty() {
                return Err(Error::config(
                    "supports list is empty; omit it to allow all implemented types",
                ));
            }
        }
        Ok(())
    }

    /// The effective supported-type set
    ///
    /// Entries naming unimplemented types drop out of the intersection
    /// silently, mirroring how a provider capability list behaves.
    pub fn supported_types(&self) -> BTreeSet<RecordType> {
        match &self.supports {
            None => RecordType::ALL.into_iter().collect(),
            Some(list) => list
                .iter()
                .filter_map(|name| RecordType::parse(name))
                .collect(),
        }
    }
}
