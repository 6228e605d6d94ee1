//! # zonesync-core
//!
//! Reconciliation and marshalling engine for converging a desired DNS
//! zone state against the state a flat-record provider reports.
//!
//! ## Architecture Overview
//!
//! - **codec**: bidirectional marshalling between typed record values
//!   and flat, single-string provider content
//! - **memory**: session-scoped identifier memory mapping
//!   (record, value) to the provider's opaque identifier
//! - **engine**: the pure diff that turns (old state, new state) into a
//!   minimal ordered sequence of create/update/delete operations
//! - **sync**: the populate and apply pipelines driving a
//!   [`ProviderClient`] implementation
//! - **record**: canonical records, the flat provider shape, and a lean
//!   zone model
//!
//! The core performs no network I/O; a provider implementation supplies
//! it behind the [`ProviderClient`] trait.

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod record;
pub mod sync;
pub mod traits;

// Re-export core types for convenience
pub use config::SyncSettings;
pub use engine::{reconcile, Operation};
pub use error::{Error, Result};
pub use memory::RememberedIds;
pub use record::{FlatRecord, Record, RecordData, RecordKey, RecordType, Zone};
pub use sync::{Change, Plan, ZoneSyncer};
pub use traits::{ListedRecord, ProviderClient};
