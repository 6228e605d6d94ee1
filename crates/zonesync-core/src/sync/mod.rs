//! Population and apply pipelines
//!
//! [`ZoneSyncer`] orchestrates the two passes of a sync session against
//! one provider:
//!
//! - **populate**: list the provider's flat records, harmonize hostname
//!   content, group by (name, type), decode supported groups into
//!   canonical records for the zone, and remember every
//!   (record, content, identifier) triple for later.
//! - **apply**: for each planned change, run the reconciliation engine
//!   and issue the resulting operations in order, translating provider
//!   refusals into typed errors.
//!
//! Both passes are sequential by design; the identifier store is the
//! only piece shared between them and is owned by the caller.

use tracing::{debug, info, warn};

use crate::codec;
use crate::config::SyncSettings;
use crate::engine::{reconcile, Operation};
use crate::error::{Error, Result};
use crate::memory::RememberedIds;
use crate::record::{Record, RecordType, Zone};
use crate::traits::{ListedRecord, ProviderClient};

use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// One planned change for a logical record
///
/// `existing` is the record as the provider currently has it (`None`:
/// being created), `desired` the target state (`None`: being removed).
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub existing: Option<Record>,
    pub desired: Option<Record>,
}

/// A planner-supplied batch of changes against one zone
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Absolute, dot-terminated zone name
    pub zone: String,
    pub changes: Vec<Change>,
}

/// Orchestrator for one provider within one sync session
pub struct ZoneSyncer {
    client: Box<dyn ProviderClient>,
    settings: SyncSettings,
    supported: BTreeSet<RecordType>,
}

impl ZoneSyncer {
    /// Create a syncer from a provider client and validated settings
    pub fn new(client: Box<dyn ProviderClient>, settings: SyncSettings) -> Result<Self> {
        settings.validate()?;
        let supported = settings.supported_types();
        Ok(Self {
            client,
            settings,
            supported,
        })
    }

    /// Whether this session handles the given record type
    pub fn supports(&self, rtype: RecordType) -> bool {
        self.supported.contains(&rtype)
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Populate `zone` from the provider's current state
    ///
    /// Every listed record of a supported type lands in the zone as part
    /// of a canonical record, and its identifier is remembered in `ids`.
    /// Unsupported types are skipped with a warning. Returns whether the
    /// zone appears to exist; an empty listing reports `false`, which
    /// cannot distinguish an empty zone from a missing one.
    pub async fn populate(
        &self,
        zone: &mut Zone,
        ids: &RememberedIds,
        lenient: bool,
    ) -> Result<bool> {
        let before = zone.len();
        self.client.authenticate().await?;

        let mut exists = false;
        let mut groups: BTreeMap<(String, String), Vec<ListedRecord>> = BTreeMap::new();
        for mut listed in self.client.list_records(None, None, None).await? {
            // Any content at all is the only signal we get that the zone
            // is really there.
            exists = true;
            debug!(
                "{} listed {} {} {:?}",
                self.client.provider_name(),
                listed.rtype,
                listed.name,
                listed.content
            );
            harmonize(&mut listed, zone.name())?;
            groups
                .entry((listed.name.clone(), listed.rtype.clone()))
                .or_default()
                .push(listed);
        }

        for ((name, rtype_name), group) in groups {
            let Some(rtype) = RecordType::parse(&rtype_name).filter(|t| self.supports(*t)) else {
                warn!(
                    "skipping unhandled record type {:?} for {} ({} values)",
                    rtype_name,
                    name,
                    group.len()
                );
                continue;
            };

            let (ttl, values) = codec::decode(rtype, &group)?;
            let record = Record::new(zone.relative_name(&name), rtype, ttl, values);
            let key = record.key();

            // Updates need the provider's identifier for the exact value
            // being replaced, so remember one per flat record.
            for listed in &group {
                if let Some(id) = &listed.id {
                    ids.remember(&key, &listed.content, id);
                }
            }

            debug!("populate: adding {} with {} values", key, record.values().len());
            zone.add_record(record, lenient)?;
        }

        info!(
            "populate {}: found {} records, exists={}",
            zone.name(),
            zone.len() - before,
            exists
        );
        Ok(exists)
    }

    /// Apply a plan of changes through the provider
    ///
    /// Operations for one record run in the order the engine decided;
    /// the first provider refusal or failure aborts the rest of the
    /// apply without rolling back what already succeeded.
    pub async fn apply(&self, plan: &Plan, ids: &RememberedIds) -> Result<()> {
        debug!("apply {}: {} changes", plan.zone, plan.changes.len());
        self.client.authenticate().await?;

        for change in &plan.changes {
            let ops = reconcile(change.existing.as_ref(), change.desired.as_ref(), &plan.zone, ids)?;
            for op in ops {
                self.execute(op).await?;
            }
        }
        Ok(())
    }

    async fn execute(&self, op: Operation) -> Result<()> {
        let provider = self.client.provider_name();
        match op {
            Operation::Create { record } => {
                info!("{} create {}", provider, record);
                if !self.client.create_record(&record).await? {
                    return Err(Error::CreateFailed { record });
                }
            }
            Operation::Update { identifier, record } => {
                info!("{} update [id:{}] {}", provider, identifier, record);
                if !self.client.update_record(&identifier, &record).await? {
                    return Err(Error::UpdateFailed { record, identifier });
                }
            }
            Operation::Delete { identifier, record } => {
                info!("{} delete [id:{:?}] {}", provider, identifier, record);
                if !self
                    .client
                    .delete_record(identifier.as_deref(), &record)
                    .await?
                {
                    return Err(Error::DeleteFailed { record, identifier });
                }
            }
        }
        Ok(())
    }
}

/// Canonicalize hostname content to an absolute name
///
/// Applies only to types whose content is itself a domain name. A
/// content already ending in a dot is left alone. Otherwise the last
/// shell token is the domain part: if it has an embedded dot the whole
/// content just gains a trailing dot, and a bare label is taken as
/// relative to the zone. This bridges providers that list relative or
/// non-canonical hostnames.
fn harmonize(listed: &mut ListedRecord, zone_name: &str) -> Result<()> {
    let Some(rtype) = RecordType::parse(&listed.rtype) else {
        return Ok(());
    };
    if !rtype.hostname_content() || listed.content.ends_with('.') {
        return Ok(());
    }

    let words = codec::split_words(&listed.content)
        .ok_or_else(|| Error::malformed(rtype, &listed.content, "unbalanced quoting"))?;
    let Some(domain_part) = words.last() else {
        return Ok(());
    };

    let from = listed.content.clone();
    listed.content.push('.');
    if !domain_part.contains('.') {
        listed.content.push_str(zone_name);
    }
    info!("harmonizing [{}] -> [{}]", from, listed.content);
    Ok(())
}
