//! Lean zone model: a named container of canonical records
//!
//! The zone owns one [`Record`] per [`RecordKey`] and performs the
//! relative/absolute name arithmetic the population pipeline needs.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{Record, RecordKey};

/// A DNS zone: an absolute dot-terminated name plus its records
#[derive(Debug, Clone)]
pub struct Zone {
    name: String,
    records: BTreeMap<RecordKey, Record>,
}

impl Zone {
    /// Create an empty zone; `name` must be absolute (dot-terminated)
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.len() < 2 || !name.ends_with('.') {
            return Err(Error::config(format!(
                "zone name {name:?} must be a non-empty, dot-terminated FQDN"
            )));
        }
        Ok(Self {
            name,
            records: BTreeMap::new(),
        })
    }

    /// Absolute zone name, trailing dot included
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a record to the zone
    ///
    /// Shape rules and the no-duplicate-key rule are enforced unless
    /// `lenient`; a lenient duplicate replaces the earlier record.
    pub fn add_record(&mut self, record: Record, lenient: bool) -> Result<()> {
        let key = record.key();
        if !lenient {
            record.validate()?;
            if self.records.contains_key(&key) {
                return Err(Error::invalid_record(format!(
                    "duplicate record {key} in zone {}",
                    self.name
                )));
            }
        } else if self.records.contains_key(&key) {
            debug!("lenient add replaces existing record {}", key);
        }
        self.records.insert(key, record);
        Ok(())
    }

    /// Look up a record by identity key
    pub fn record(&self, key: &RecordKey) -> Option<&Record> {
        self.records.get(key)
    }

    /// All records, ordered by key
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Strip a trailing zone-name suffix from a provider-listed name
    ///
    /// Accepts both the absolute dot-terminated form and the bare
    /// zone-name-without-dot form; names outside the zone pass through
    /// unchanged, and the apex reduces to the empty name.
    pub fn relative_name(&self, listed: &str) -> String {
        // Lexicon providers are expected to hand back relative names
        // already, but some return FQDNs; tolerate both.
        let mut name = listed;
        if name.ends_with(self.name.as_str()) {
            name = name.trim_end_matches('.');
        }
        let apex = &self.name[..self.name.len() - 1];
        if name.ends_with(apex) {
            name[..name.len().saturating_sub(self.name.len())].to_string()
        } else {
            name.to_string()
        }
    }

    /// Absolute, dot-terminated form of a zone-relative name
    pub fn fqdn(&self, relative: &str) -> String {
        if relative.is_empty() {
            self.name.clone()
        } else {
            format!("{relative}.{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecordData, RecordType};

    fn zone() -> Zone {
        Zone::new("example.com.").unwrap()
    }

    #[test]
    fn zone_name_must_be_absolute() {
        assert!(Zone::new("example.com").is_err());
        assert!(Zone::new("").is_err());
        assert!(Zone::new("example.com.").is_ok());
    }

    #[test]
    fn relative_name_strips_zone_suffix() {
        let zone = zone();
        assert_eq!(zone.relative_name("www.example.com."), "www");
        assert_eq!(zone.relative_name("www.example.com"), "www");
        assert_eq!(zone.relative_name("a.b.example.com."), "a.b");
    }

    #[test]
    fn relative_name_of_apex_is_empty() {
        let zone = zone();
        assert_eq!(zone.relative_name("example.com."), "");
        assert_eq!(zone.relative_name("example.com"), "");
    }

    #[test]
    fn relative_name_outside_zone_passes_through() {
        let zone = zone();
        assert_eq!(zone.relative_name("www.other.org."), "www.other.org.");
    }

    #[test]
    fn fqdn_round_trips_relative_name() {
        let zone = zone();
        assert_eq!(zone.fqdn("www"), "www.example.com.");
        assert_eq!(zone.fqdn(""), "example.com.");
        assert_eq!(zone.relative_name(&zone.fqdn("mail")), "mail");
    }

    #[test]
    fn duplicate_key_is_rejected_unless_lenient() {
        let mut zone = zone();
        let record = Record::new(
            "www",
            RecordType::A,
            300,
            vec![RecordData::Simple("1.2.3.4".into())],
        );
        zone.add_record(record.clone(), false).unwrap();
        assert!(zone.add_record(record.clone(), false).is_err());

        let replacement = Record::new(
            "www",
            RecordType::A,
            600,
            vec![RecordData::Simple("5.6.7.8".into())],
        );
        zone.add_record(replacement, true).unwrap();
        assert_eq!(zone.len(), 1);
        assert_eq!(zone.record(&record.key()).unwrap().ttl(), 600);
    }

    #[test]
    fn lenient_add_skips_shape_validation() {
        let mut zone = zone();
        let invalid = Record::new("www", RecordType::A, 0, vec![]);
        assert!(zone.add_record(invalid.clone(), false).is_err());
        zone.add_record(invalid, true).unwrap();
        assert_eq!(zone.len(), 1);
    }
}
