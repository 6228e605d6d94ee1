//! Typed value codec
//!
//! Bidirectional marshalling between canonical [`RecordData`] values and
//! the flat, single-string content a lexicon-style provider understands.
//! Pure and stateless; no I/O happens here.
//!
//! Structured types (CAA, MX, SRV) are carried on the wire as
//! space-separated fields with shell-style quoting, so tokenization has
//! to respect quoted segments: `0 issue "ca.example.net; policy=ev"` is
//! three fields, not five. Encoding mirrors the same convention and
//! quotes any field that would otherwise split, which is what makes
//! decode(encode(v)) == v hold for values free of unescaped delimiters.
//!
//! Simple multi-value content (A, AAAA, NS, TXT) is taken verbatim apart
//! from escaping literal semicolons (`;` becomes `\;`), matching the
//! convention providers apply on their side of the fence.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::record::{FlatRecord, Record, RecordData, RecordType};
use crate::traits::ListedRecord;

/// Decode one (name, type) group of provider records into canonical
/// values
///
/// The group's TTL is taken from the first record; sibling records are
/// assumed to agree (mismatches are silently ignored, first wins).
/// Returns `MalformedValue` when a structured content string does not
/// tokenize into the field count its type requires.
pub fn decode(rtype: RecordType, group: &[ListedRecord]) -> Result<(u32, Vec<RecordData>)> {
    let first = group
        .first()
        .ok_or_else(|| Error::invalid_record(format!("empty {rtype} record group")))?;
    let ttl = first.ttl;

    let values = match rtype {
        // Single-valued: only the first listed record counts.
        RecordType::Cname | RecordType::Alias => {
            vec![RecordData::Simple(first.content.clone())]
        }
        RecordType::A | RecordType::Aaaa | RecordType::Ns | RecordType::Txt => group
            .iter()
            .map(|rec| RecordData::Simple(escape_semicolons(&rec.content)))
            .collect(),
        RecordType::Caa => group
            .iter()
            .map(|rec| decode_caa(&rec.content))
            .collect::<Result<_>>()?,
        RecordType::Mx => group
            .iter()
            .map(|rec| decode_mx(&rec.content))
            .collect::<Result<_>>()?,
        RecordType::Srv => group
            .iter()
            .map(|rec| decode_srv(&rec.content))
            .collect::<Result<_>>()?,
    };

    Ok((ttl, values))
}

/// Encode a canonical record into its flat provider representation
///
/// One flat record per value, all sharing the record's fqdn and TTL.
/// The ordered set keeps later set-difference and pairing deterministic.
pub fn encode(record: &Record, zone_name: &str) -> Result<BTreeSet<FlatRecord>> {
    let name = record.fqdn(zone_name);
    let mut flat = BTreeSet::new();
    for value in record.values() {
        if !value.matches(record.rtype()) {
            return Err(Error::invalid_record(format!(
                "{}: cannot encode {:?} as {}",
                record.key(),
                value,
                record.rtype()
            )));
        }
        flat.insert(FlatRecord {
            content: content_for(value),
            ttl: record.ttl(),
            rtype: record.rtype(),
            name: name.clone(),
        });
    }
    Ok(flat)
}

fn content_for(value: &RecordData) -> String {
    match value {
        RecordData::Simple(content) => content.clone(),
        RecordData::Caa { flags, tag, value } => {
            // The CAA value field is always quoted, per convention.
            format!("{} {} {}", flags, quote_word(tag), quote_always(value))
        }
        RecordData::Mx { priority, exchange } => {
            format!("{} {}", priority, quote_word(exchange))
        }
        RecordData::Srv {
            priority,
            weight,
            port,
            target,
        } => format!("{} {} {} {}", priority, weight, port, quote_word(target)),
    }
}

fn decode_caa(content: &str) -> Result<RecordData> {
    let rtype = RecordType::Caa;
    let words = tokenize(rtype, content)?;
    let [flags, tag, value]: [String; 3] = words.try_into().map_err(|words: Vec<String>| {
        Error::malformed(
            rtype,
            content,
            format!("expected 3 fields, found {}", words.len()),
        )
    })?;
    Ok(RecordData::Caa {
        flags: parse_field(rtype, content, &flags, "flags")?,
        tag,
        value,
    })
}

fn decode_mx(content: &str) -> Result<RecordData> {
    let rtype = RecordType::Mx;
    let words = tokenize(rtype, content)?;
    let [priority, exchange]: [String; 2] = words.try_into().map_err(|words: Vec<String>| {
        Error::malformed(
            rtype,
            content,
            format!("expected 2 fields, found {}", words.len()),
        )
    })?;
    Ok(RecordData::Mx {
        priority: parse_field(rtype, content, &priority, "priority")?,
        exchange,
    })
}

fn decode_srv(content: &str) -> Result<RecordData> {
    let rtype = RecordType::Srv;
    let words = tokenize(rtype, content)?;
    let [priority, weight, port, target]: [String; 4] =
        words.try_into().map_err(|words: Vec<String>| {
            Error::malformed(
                rtype,
                content,
                format!("expected 4 fields, found {}", words.len()),
            )
        })?;
    Ok(RecordData::Srv {
        priority: parse_field(rtype, content, &priority, "priority")?,
        weight: parse_field(rtype, content, &weight, "weight")?,
        port: parse_field(rtype, content, &port, "port")?,
        target,
    })
}

fn parse_field<T: std::str::FromStr>(
    rtype: RecordType,
    content: &str,
    field: &str,
    what: &str,
) -> Result<T> {
    field
        .parse()
        .map_err(|_| Error::malformed(rtype, content, format!("{what} field {field:?} is not numeric")))
}

fn tokenize(rtype: RecordType, content: &str) -> Result<Vec<String>> {
    split_words(content).ok_or_else(|| Error::malformed(rtype, content, "unbalanced quoting"))
}

/// Escape literal semicolons in simple multi-value content
pub(crate) fn escape_semicolons(content: &str) -> String {
    content.replace(';', "\\;")
}

/// Split content into words under shell-like quoting rules
///
/// Whitespace separates words; single quotes group verbatim; double
/// quotes group with `\"` and `\\` escapes; a bare backslash escapes the
/// next character. `None` means an unbalanced quote or trailing escape.
pub(crate) fn split_words(input: &str) -> Option<Vec<String>> {
    #[derive(PartialEq)]
    enum Mode {
        Plain,
        Single,
        Double,
    }

    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut mode = Mode::Plain;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match mode {
            Mode::Plain => match c {
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                '\'' => {
                    mode = Mode::Single;
                    in_word = true;
                }
                '"' => {
                    mode = Mode::Double;
                    in_word = true;
                }
                '\\' => {
                    current.push(chars.next()?);
                    in_word = true;
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
            Mode::Single => match c {
                '\'' => mode = Mode::Plain,
                c => current.push(c),
            },
            Mode::Double => match c {
                '"' => mode = Mode::Plain,
                '\\' => {
                    let next = chars.next()?;
                    if next != '"' && next != '\\' {
                        current.push('\\');
                    }
                    current.push(next);
                }
                c => current.push(c),
            },
        }
    }

    if mode != Mode::Plain {
        return None;
    }
    if in_word {
        words.push(current);
    }
    Some(words)
}

/// Quote a word only when leaving it bare would change how it splits
fn quote_word(word: &str) -> String {
    let needs_quoting = word.is_empty()
        || word
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));
    if needs_quoting {
        quote_always(word)
    } else {
        word.to_string()
    }
}

/// Double-quote a word unconditionally, escaping embedded quotes
fn quote_always(word: &str) -> String {
    let mut quoted = String::with_capacity(word.len() + 2);
    quoted.push('"');
    for c in word.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
