//! Reconciliation engine
//!
//! Given the old and new canonical state of one logical record, computes
//! the ordered provider operation sequence that converges the provider
//! to the new state. Pure computation over its inputs and an identifier
//! memory snapshot; independently testable without any provider.
//!
//! ## Algorithm
//!
//! 1. Encode both sides into flat record sets (absent side encodes to
//!    the empty set).
//! 2. Set difference by full flat-record equality gives additions and
//!    deletions; a TTL-only change therefore shows up on both sides.
//! 3. Both sides iterate in lexicographic-on-content order, so pairing
//!    is reproducible across runs.
//! 4. Pair additions with deletions positionally. A pair becomes one
//!    in-place update when the old value's identifier is known and all
//!    identifiers for the record are unique; otherwise create first,
//!    then delete, so the value never has a window of nonexistence.
//! 5. Leftover additions become bare creates; leftover deletions become
//!    bare deletes with whatever identifier is remembered.

use crate::codec;
use crate::error::Result;
use crate::memory::RememberedIds;
use crate::record::{FlatRecord, Record};

/// One provider operation, in the order it must be issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create a new flat record
    Create { record: FlatRecord },
    /// Replace the record behind `identifier` with a new value
    Update {
        identifier: String,
        record: FlatRecord,
    },
    /// Remove a flat record, by identifier when one is known
    Delete {
        identifier: Option<String>,
        record: FlatRecord,
    },
}

/// Compute the operation sequence converging one logical record
///
/// `old` is the provider's current state (`None`: record did not exist),
/// `new` the desired state (`None`: record removed). Identifiers are
/// resolved against the old record's identity key; with no populate in
/// the current session every lookup misses and changed values fall back
/// to create+delete.
pub fn reconcile(
    old: Option<&Record>,
    new: Option<&Record>,
    zone_name: &str,
    ids: &RememberedIds,
) -> Result<Vec<Operation>> {
    let old_flat = match old {
        Some(record) => codec::encode(record, zone_name)?,
        None => Default::default(),
    };
    let new_flat = match new {
        Some(record) => codec::encode(record, zone_name)?,
        None => Default::default(),
    };

    // BTreeSet difference iterates in ascending (content-first) order.
    let additions: Vec<&FlatRecord> = new_flat.difference(&old_flat).collect();
    let deletions: Vec<&FlatRecord> = old_flat.difference(&new_flat).collect();

    let old_key = old.map(Record::key);
    let unique = old_key
        .as_ref()
        .map(|key| ids.has_unique_ids(key))
        .unwrap_or(false);
    let lookup = |content: &str| {
        old_key
            .as_ref()
            .and_then(|key| ids.get(key, content))
    };

    let paired = additions.len().min(deletions.len());
    let mut ops = Vec::new();

    for (new_rec, old_rec) in additions.iter().zip(deletions.iter()) {
        match lookup(&old_rec.content) {
            Some(identifier) if unique => ops.push(Operation::Update {
                identifier,
                record: (*new_rec).clone(),
            }),
            identifier => {
                ops.push(Operation::Create {
                    record: (*new_rec).clone(),
                });
                ops.push(Operation::Delete {
                    identifier,
                    record: (*old_rec).clone(),
                });
            }
        }
    }

    for new_rec in additions.iter().skip(paired) {
        ops.push(Operation::Create {
            record: (*new_rec).clone(),
        });
    }
    for old_rec in deletions.iter().skip(paired) {
        ops.push(Operation::Delete {
            identifier: lookup(&old_rec.content),
            record: (*old_rec).clone(),
        });
    }

    Ok(ops)
}
