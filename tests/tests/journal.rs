//! Commits recorded through the in-memory journal.

use ontic_journal::{MemoryJournal, Mutation, WalEntry};
use ontic_tests::prelude::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn journaled() -> (Session, Arc<MemoryJournal>) {
    let journal = Arc::new(MemoryJournal::new());
    let session = Session::builder(SessionConfig::testing())
        .commit_hook(journal.clone())
        .build()
        .unwrap();
    (session, journal)
}

#[test]
fn test_commit_writes_begin_apply_commit() {
    // GIVEN
    let (session, journal) = journaled();

    // WHEN
    let mut txn = session.write();
    let person = txn.put_entity_type("person").unwrap();
    let name = txn.put_attribute_type("name", DataType::String).unwrap();
    txn.has(person, name).unwrap();
    let txn_id = txn.commit().unwrap();

    // THEN
    let records = journal.records();
    assert_eq!(records.len(), 6);
    assert!(matches!(records[0].entry, WalEntry::Begin { .. }));
    assert!(records[5].entry.is_commit());
    assert!(records.windows(2).all(|w| w[0].lsn < w[1].lsn));
    assert_eq!(
        journal.mutations_of(txn_id).last(),
        Some(&Mutation::Has {
            id: person,
            attribute: name
        })
    );
}

#[test]
fn test_failed_and_rolled_back_transactions_are_not_journaled() {
    let (session, journal) = journaled();

    let mut txn = session.write();
    txn.put_entity_type("person").unwrap();
    txn.rollback();

    let mut txn = session.write();
    let age = txn.put_attribute_type("age", DataType::Long).unwrap();
    assert!(txn.put_attribute(age, "old").is_err());
    txn.commit().unwrap();

    assert_eq!(journal.committed().len(), 1);
    let mutations = journal.mutations_of(journal.committed()[0]);
    assert_eq!(mutations.len(), 2);
    assert!(mutations.iter().all(Mutation::is_schema));
}

#[test]
fn test_journal_survives_json_lines() {
    let (session, journal) = journaled();
    let mut txn = session.write();
    let age = txn.put_attribute_type("age", DataType::Long).unwrap();
    txn.put_attribute(age, 7i64).unwrap();
    txn.commit().unwrap();

    let text = journal.to_json_lines().unwrap();
    let restored = MemoryJournal::from_json_lines(&text).unwrap();

    assert_eq!(restored.records(), journal.records());
}

#[test]
fn test_implicit_types_are_derived_not_journaled() {
    // GIVEN an ownership recorded and its attribute type renamed
    let (session, journal) = journaled();
    let mut txn = session.write();
    let person = txn.put_entity_type("person").unwrap();
    let name = txn.put_attribute_type("name", DataType::String).unwrap();
    txn.has(person, name).unwrap();
    let alice = txn.create_entity(person).unwrap();
    let value = txn.put_attribute(name, "Alice").unwrap();
    let ownership = txn.set_has(alice, value).unwrap();
    txn.set_label(name, "alias").unwrap();
    let txn_id = txn.commit().unwrap();

    // WHEN
    let mutations = journal.mutations_of(txn_id);

    // THEN only the requested operations are journaled
    assert!(!mutations
        .iter()
        .any(|m| matches!(m, Mutation::DefineType { label, .. } if label.is_implicit())));
    assert_eq!(
        mutations
            .iter()
            .filter(|m| matches!(m, Mutation::SetLabel { .. }))
            .count(),
        1
    );

    // THEN the committed state carries the implicit types they imply
    let read = session.read();
    let relation = read.type_id("@has-alias").unwrap();
    assert!(read.type_id("@has-alias:owner").is_ok());
    assert!(read.type_id("@has-name").is_err());
    assert_eq!(read.type_of(ownership).unwrap(), relation);
}
