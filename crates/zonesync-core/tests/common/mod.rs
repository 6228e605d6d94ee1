//! Test doubles and helpers shared by the pipeline contract tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zonesync_core::error::Result;
use zonesync_core::record::FlatRecord;
use zonesync_core::traits::{ListedRecord, ProviderClient};

/// One recorded provider invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Authenticate,
    List,
    Create(FlatRecord),
    Update(String, FlatRecord),
    Delete(Option<String>, FlatRecord),
}

/// Shared call log handle, kept by the test after the client moves into
/// the syncer
pub type CallLog = Arc<Mutex<Vec<ProviderCall>>>;

/// A provider client that serves a fixed listing and records every call
pub struct MockProviderClient {
    listing: Vec<ListedRecord>,
    calls: CallLog,
    refuse_create: bool,
    refuse_update: bool,
    refuse_delete: bool,
}

impl MockProviderClient {
    /// Create a mock serving `listing`; returns the shared call log too
    pub fn new(listing: Vec<ListedRecord>) -> (Self, CallLog) {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        let client = Self {
            listing,
            calls: Arc::clone(&calls),
            refuse_create: false,
            refuse_update: false,
            refuse_delete: false,
        };
        (client, calls)
    }

    /// Make create calls return the provider's falsy success flag
    pub fn refusing_creates(mut self) -> Self {
        self.refuse_create = true;
        self
    }

    /// Make update calls return the provider's falsy success flag
    pub fn refusing_updates(mut self) -> Self {
        self.refuse_update = true;
        self
    }

    /// Make delete calls return the provider's falsy success flag
    pub fn refusing_deletes(mut self) -> Self {
        self.refuse_delete = true;
        self
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ProviderClient for MockProviderClient {
    async fn authenticate(&self) -> Result<()> {
        self.record(ProviderCall::Authenticate);
        Ok(())
    }

    async fn list_records(
        &self,
        _rtype: Option<&str>,
        _name: Option<&str>,
        _content: Option<&str>,
    ) -> Result<Vec<ListedRecord>> {
        self.record(ProviderCall::List);
        Ok(self.listing.clone())
    }

    async fn create_record(&self, record: &FlatRecord) -> Result<bool> {
        self.record(ProviderCall::Create(record.clone()));
        Ok(!self.refuse_create)
    }

    async fn update_record(&self, identifier: &str, record: &FlatRecord) -> Result<bool> {
        self.record(ProviderCall::Update(identifier.to_string(), record.clone()));
        Ok(!self.refuse_update)
    }

    async fn delete_record(&self, identifier: Option<&str>, record: &FlatRecord) -> Result<bool> {
        self.record(ProviderCall::Delete(
            identifier.map(str::to_string),
            record.clone(),
        ));
        Ok(!self.refuse_delete)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Build a listed record the way a lexicon-style provider returns them
pub fn listed(id: &str, content: &str, rtype: &str, name: &str, ttl: u32) -> ListedRecord {
    ListedRecord {
        id: Some(id.to_string()),
        content: content.to_string(),
        rtype: rtype.to_string(),
        name: name.to_string(),
        ttl,
    }
}

/// The mutating calls from a log, authenticate/list noise dropped
pub fn mutations(calls: &CallLog) -> Vec<ProviderCall> {
    calls
        .lock()
        .unwrap()
        .iter()
        .filter(|call| !matches!(call, ProviderCall::Authenticate | ProviderCall::List))
        .cloned()
        .collect()
}
