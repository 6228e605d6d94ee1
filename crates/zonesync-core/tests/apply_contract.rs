//! Apply pipeline contract
//!
//! End-to-end populate-then-apply scenarios against the mock provider:
//! update preference, create-before-delete ordering, identifier reuse,
//! and the typed failure taxonomy.

mod common;

use common::*;
use zonesync_core::{
    Change, Error, Plan, Record, RecordData, RecordType, RememberedIds, SyncSettings, Zone,
    ZoneSyncer,
};

const ZONE: &str = "example.com.";

fn syncer_with(client: MockProviderClient) -> ZoneSyncer {
    ZoneSyncer::new(Box::new(client), SyncSettings::new(ZONE)).unwrap()
}

fn simple(name: &str, rtype: RecordType, ttl: u32, values: &[&str]) -> Record {
    Record::new(
        name,
        rtype,
        ttl,
        values
            .iter()
            .map(|v| RecordData::Simple((*v).to_string()))
            .collect(),
    )
}

fn plan(existing: Option<Record>, desired: Option<Record>) -> Plan {
    Plan {
        zone: ZONE.to_string(),
        changes: vec![Change { existing, desired }],
    }
}

#[tokio::test]
async fn removing_one_txt_value_deletes_exactly_that_value() {
    let (client, calls) = MockProviderClient::new(vec![
        listed("id-1", "value-one", "TXT", "txt.example.com", 300),
        listed("id-2", "value-two", "TXT", "txt.example.com", 300),
    ]);
    let syncer = syncer_with(client);
    let mut zone = Zone::new(ZONE).unwrap();
    let ids = RememberedIds::new();

    syncer.populate(&mut zone, &ids, false).await.unwrap();
    let existing = zone
        .record(&simple("txt", RecordType::Txt, 300, &[]).key())
        .unwrap()
        .clone();
    assert_eq!(existing.values().len(), 2);
    assert!(ids.has_unique_ids(&existing.key()));

    let desired = simple("txt", RecordType::Txt, 300, &["value-one"]);
    syncer
        .apply(&plan(Some(existing), Some(desired)), &ids)
        .await
        .unwrap();

    // Exactly one delete, aimed at the removed value via its remembered
    // identifier; the retained value's identifier is never touched.
    let ops = mutations(&calls);
    assert_eq!(ops.len(), 1);
    match &ops[0] {
        ProviderCall::Delete(identifier, record) => {
            assert_eq!(identifier.as_deref(), Some("id-2"));
            assert_eq!(record.content, "value-two");
            assert_eq!(record.name, "txt.example.com.");
        }
        other => panic!("expected a delete, got {other:?}"),
    }
}

#[tokio::test]
async fn value_change_with_unique_identifier_becomes_one_update() {
    let (client, calls) = MockProviderClient::new(vec![listed(
        "id-1",
        "192.0.2.1",
        "A",
        "www.example.com",
        300,
    )]);
    let syncer = syncer_with(client);
    let mut zone = Zone::new(ZONE).unwrap();
    let ids = RememberedIds::new();

    syncer.populate(&mut zone, &ids, false).await.unwrap();
    let existing = zone
        .record(&simple("www", RecordType::A, 300, &[]).key())
        .unwrap()
        .clone();
    let desired = simple("www", RecordType::A, 300, &["192.0.2.9"]);

    syncer
        .apply(&plan(Some(existing), Some(desired)), &ids)
        .await
        .unwrap();

    let ops = mutations(&calls);
    assert_eq!(ops.len(), 1);
    match &ops[0] {
        ProviderCall::Update(identifier, record) => {
            assert_eq!(identifier, "id-1");
            assert_eq!(record.content, "192.0.2.9");
        }
        other => panic!("expected an update, got {other:?}"),
    }
}

#[tokio::test]
async fn shared_identifiers_force_create_before_delete() {
    // Some providers derive the identifier from the record name, so both
    // TXT values list the same id and in-place update is ambiguous.
    let (client, calls) = MockProviderClient::new(vec![
        listed("shared", "value-one", "TXT", "txt.example.com", 300),
        listed("shared", "value-two", "TXT", "txt.example.com", 300),
    ]);
    let syncer = syncer_with(client);
    let mut zone = Zone::new(ZONE).unwrap();
    let ids = RememberedIds::new();

    syncer.populate(&mut zone, &ids, false).await.unwrap();
    let existing = zone
        .record(&simple("txt", RecordType::Txt, 300, &[]).key())
        .unwrap()
        .clone();
    assert!(!ids.has_unique_ids(&existing.key()));

    let desired = simple("txt", RecordType::Txt, 300, &["value-one", "value-three"]);
    syncer
        .apply(&plan(Some(existing), Some(desired)), &ids)
        .await
        .unwrap();

    let ops = mutations(&calls);
    assert_eq!(ops.len(), 2);
    assert!(
        matches!(&ops[0], ProviderCall::Create(record) if record.content == "value-three"),
        "create must come first, got {:?}",
        ops[0]
    );
    assert!(
        matches!(&ops[1], ProviderCall::Delete(_, record) if record.content == "value-two"),
        "delete must follow, got {:?}",
        ops[1]
    );
}

#[tokio::test]
async fn apply_without_populate_degrades_to_create_plus_delete() {
    let (client, calls) = MockProviderClient::new(vec![]);
    let syncer = syncer_with(client);
    let ids = RememberedIds::new();

    let existing = simple("www", RecordType::A, 300, &["192.0.2.1"]);
    let desired = simple("www", RecordType::A, 300, &["192.0.2.9"]);
    syncer
        .apply(&plan(Some(existing), Some(desired)), &ids)
        .await
        .unwrap();

    let ops = mutations(&calls);
    assert_eq!(ops.len(), 2);
    assert!(matches!(&ops[0], ProviderCall::Create(_)));
    assert!(matches!(&ops[1], ProviderCall::Delete(None, _)));
}

#[tokio::test]
async fn brand_new_record_is_created_value_by_value() {
    let (client, calls) = MockProviderClient::new(vec![]);
    let syncer = syncer_with(client);
    let ids = RememberedIds::new();

    let desired = simple("www", RecordType::A, 300, &["192.0.2.1", "192.0.2.2"]);
    syncer.apply(&plan(None, Some(desired)), &ids).await.unwrap();

    let ops = mutations(&calls);
    assert_eq!(ops.len(), 2);
    for op in &ops {
        match op {
            ProviderCall::Create(record) => {
                assert_eq!(record.name, "www.example.com.");
                assert_eq!(record.ttl, 300);
            }
            other => panic!("expected creates only, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn provider_refusing_delete_surfaces_a_typed_error() {
    let (client, calls) = MockProviderClient::new(vec![]);
    let client = client.refusing_deletes();
    let syncer = syncer_with(client);
    let ids = RememberedIds::new();

    let existing = simple("www", RecordType::A, 300, &["192.0.2.1"]);
    let err = syncer
        .apply(&plan(Some(existing), None), &ids)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DeleteFailed { .. }), "got {err:?}");
    assert_eq!(mutations(&calls).len(), 1);
}

#[tokio::test]
async fn refused_delete_does_not_roll_back_the_paired_create() {
    let (client, calls) = MockProviderClient::new(vec![]);
    let client = client.refusing_deletes();
    let syncer = syncer_with(client);
    let ids = RememberedIds::new();

    let existing = simple("www", RecordType::A, 300, &["192.0.2.1"]);
    let desired = simple("www", RecordType::A, 300, &["192.0.2.9"]);
    let err = syncer
        .apply(&plan(Some(existing), Some(desired)), &ids)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DeleteFailed { .. }));

    // The create that preceded the refused delete already happened and
    // stays applied.
    let ops = mutations(&calls);
    assert_eq!(ops.len(), 2);
    assert!(matches!(&ops[0], ProviderCall::Create(_)));
    assert!(matches!(&ops[1], ProviderCall::Delete(_, _)));
}

#[tokio::test]
async fn provider_refusing_create_surfaces_a_typed_error() {
    let (client, _calls) = MockProviderClient::new(vec![]);
    let client = client.refusing_creates();
    let syncer = syncer_with(client);
    let ids = RememberedIds::new();

    let desired = simple("www", RecordType::A, 300, &["192.0.2.1"]);
    let err = syncer
        .apply(&plan(None, Some(desired)), &ids)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CreateFailed { .. }), "got {err:?}");
}

#[tokio::test]
async fn identical_plan_sides_touch_nothing() {
    let (client, calls) = MockProviderClient::new(vec![]);
    let syncer = syncer_with(client);
    let ids = RememberedIds::new();

    let record = simple("www", RecordType::A, 300, &["192.0.2.1"]);
    syncer
        .apply(&plan(Some(record.clone()), Some(record)), &ids)
        .await
        .unwrap();

    assert!(mutations(&calls).is_empty());
}

#[tokio::test]
async fn structured_records_round_trip_through_apply() {
    let (client, calls) = MockProviderClient::new(vec![listed(
        "id-1",
        "10 old-mail.example.com.",
        "MX",
        "example.com",
        300,
    )]);
    let syncer = syncer_with(client);
    let mut zone = Zone::new(ZONE).unwrap();
    let ids = RememberedIds::new();

    syncer.populate(&mut zone, &ids, false).await.unwrap();
    let existing = zone
        .record(
            &Record::new("", RecordType::Mx, 300, vec![]).key(),
        )
        .unwrap()
        .clone();

    let desired = Record::new(
        "",
        RecordType::Mx,
        300,
        vec![RecordData::Mx {
            priority: 20,
            exchange: "new-mail.example.com.".into(),
        }],
    );
    syncer
        .apply(&plan(Some(existing), Some(desired)), &ids)
        .await
        .unwrap();

    let ops = mutations(&calls);
    assert_eq!(ops.len(), 1);
    match &ops[0] {
        ProviderCall::Update(identifier, record) => {
            assert_eq!(identifier, "id-1");
            assert_eq!(record.content, "20 new-mail.example.com.");
            assert_eq!(record.name, "example.com.");
        }
        other => panic!("expected an update, got {other:?}"),
    }
}
