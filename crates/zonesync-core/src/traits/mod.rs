//! External collaborator interfaces
//!
//! The core performs no network I/O of its own; everything it needs from
//! the outside world is behind [`ProviderClient`].

pub mod provider;

pub use provider::{ListedRecord, ProviderClient};
