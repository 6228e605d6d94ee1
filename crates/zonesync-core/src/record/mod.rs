//! Canonical and provider-facing record representations
//!
//! Two shapes of the same data live here:
//!
//! - [`Record`]: the canonical, typed shape. One logical record per
//!   (zone-relative name, type), with a TTL and a set of structured
//!   values ([`RecordData`]).
//! - [`FlatRecord`]: the provider-facing shape. Every value is a single
//!   opaque content string; a multi-value canonical record decomposes
//!   into N flat records sharing name/type/ttl and differing only in
//!   content.
//!
//! [`RecordKey`] is the stable identity of a logical record (name +
//! type). It deliberately excludes values and TTL so provider-side
//! identifiers remembered under a key stay valid across repopulation for
//! as long as the record itself persists.

pub mod zone;

pub use zone::Zone;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The record types this core implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Alias,
    Caa,
    Cname,
    Mx,
    Ns,
    Srv,
    Txt,
}

impl RecordType {
    /// Every implemented record type
    pub const ALL: [RecordType; 9] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Alias,
        RecordType::Caa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Srv,
        RecordType::Txt,
    ];

    /// Canonical upper-case name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Alias => "ALIAS",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }

    /// Case-insensitive parse; `None` for types this core does not
    /// implement
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Some(RecordType::A),
            "AAAA" => Some(RecordType::Aaaa),
            "ALIAS" => Some(RecordType::Alias),
            "CAA" => Some(RecordType::Caa),
            "CNAME" => Some(RecordType::Cname),
            "MX" => Some(RecordType::Mx),
            "NS" => Some(RecordType::Ns),
            "SRV" => Some(RecordType::Srv),
            "TXT" => Some(RecordType::Txt),
            _ => None,
        }
    }

    /// Types whose content is itself a domain name and therefore subject
    /// to trailing-dot harmonization during populate
    pub fn hostname_content(&self) -> bool {
        matches!(self, RecordType::Cname | RecordType::Mx | RecordType::Ns)
    }

    /// Types that carry exactly one value per logical record
    pub fn single_valued(&self) -> bool {
        matches!(self, RecordType::Cname | RecordType::Alias)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed record value
///
/// Closed union, matched explicitly wherever per-type behavior differs;
/// an unimplemented type cannot reach this enum at all.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordData {
    /// Verbatim single-string value (A, AAAA, ALIAS, CNAME, NS, TXT)
    Simple(String),
    /// Certification Authority Authorization
    Caa { flags: u8, tag: String, value: String },
    /// Mail exchange
    Mx { priority: u16, exchange: String },
    /// Service locator
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
}

impl RecordData {
    /// Whether this value variant is the one `rtype` expects
    pub fn matches(&self, rtype: RecordType) -> bool {
        match self {
            RecordData::Simple(_) => !matches!(
                rtype,
                RecordType::Caa | RecordType::Mx | RecordType::Srv
            ),
            RecordData::Caa { .. } => rtype == RecordType::Caa,
            RecordData::Mx { .. } => rtype == RecordType::Mx,
            RecordData::Srv { .. } => rtype == RecordType::Srv,
        }
    }
}

/// Stable identity of a logical record: zone-relative name plus type
///
/// The apex record has an empty name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub name: String,
    pub rtype: RecordType,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() {
            "@"
        } else {
            self.name.as_str()
        };
        write!(f, "{}/{}", name, self.rtype)
    }
}

/// One canonical, typed DNS record
///
/// Construction is cheap and infallible; shape rules are checked by
/// [`Record::validate`], which [`Zone::add_record`] runs unless asked to
/// be lenient. Reconciliation never mutates a record in place: a changed
/// desired state is always a fresh `Record` compared against the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    name: String,
    rtype: RecordType,
    ttl: u32,
    values: Vec<RecordData>,
}

impl Record {
    /// Create a record from its parts
    ///
    /// `name` is zone-relative; empty means the zone apex.
    pub fn new(
        name: impl Into<String>,
        rtype: RecordType,
        ttl: u32,
        values: Vec<RecordData>,
    ) -> Self {
        Self {
            name: name.into(),
            rtype,
            ttl,
            values,
        }
    }

    /// Check the record's shape rules
    pub fn validate(&self) -> Result<()> {
        if self.ttl == 0 {
            return Err(Error::invalid_record(format!(
                "{}: TTL must be positive",
                self.key()
            )));
        }
        if self.values.is_empty() {
            return Err(Error::invalid_record(format!(
                "{}: record has no values",
                self.key()
            )));
        }
        if self.rtype.single_valued() && self.values.len() != 1 {
            return Err(Error::invalid_record(format!(
                "{}: {} records carry exactly one value, got {}",
                self.key(),
                self.rtype,
                self.values.len()
            )));
        }
        for value in &self.values {
            if !value.matches(self.rtype) {
                return Err(Error::invalid_record(format!(
                    "{}: value {:?} does not fit record type {}",
                    self.key(),
                    value,
                    self.rtype
                )));
            }
        }
        Ok(())
    }

    /// Zone-relative name (empty for the apex)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rtype(&self) -> RecordType {
        self.rtype
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn values(&self) -> &[RecordData] {
        &self.values
    }

    /// Stable identity key for identifier memory
    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            rtype: self.rtype,
        }
    }

    /// Fully-qualified, dot-terminated name within `zone_name`
    /// (`zone_name` itself must be dot-terminated)
    pub fn fqdn(&self, zone_name: &str) -> String {
        if self.name.is_empty() {
            zone_name.to_string()
        } else {
            format!("{}.{}", self.name, zone_name)
        }
    }
}

/// One provider-facing flat record: a single fully-encoded value
///
/// Equality spans all four attributes, so a TTL-only change shows up as
/// a different flat record during set difference. The `Ord` derive keys
/// on `content` first; iterating an ordered set of flat records yields
/// the deterministic lexicographic-on-content order reconciliation
/// pairing relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlatRecord {
    /// The fully encoded value
    pub content: String,
    pub ttl: u32,
    pub rtype: RecordType,
    /// Fully-qualified, dot-terminated name
    pub name: String,
}

impl fmt::Display for FlatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:?} (ttl {})",
            self.rtype, self.name, self.content, self.ttl
        )
    }
}
