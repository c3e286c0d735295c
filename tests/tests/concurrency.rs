//! Readers and the single writer across threads.

use ontic_tests::prelude::*;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_reader_keeps_its_snapshot_while_writer_commits() {
    // GIVEN
    let session = Session::new(SessionConfig::testing()).unwrap();
    {
        let mut txn = session.write();
        txn.put_entity_type("person").unwrap();
        txn.commit().unwrap();
    }
    let reader = session.read();

    // WHEN
    let mut txn = session.write();
    let person = txn.type_id("person").unwrap();
    txn.create_entity(person).unwrap();
    txn.commit().unwrap();

    // THEN
    assert_eq!(reader.instances(person).count(), 0);
    assert_eq!(session.read().instances(person).count(), 1);
}

#[test]
fn test_readers_run_alongside_the_writer() {
    let session = Arc::new(Session::new(SessionConfig::testing()).unwrap());
    let barrier = Arc::new(Barrier::new(5));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let session = Arc::clone(&session);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..100 {
                    let read = session.read();
                    // All or nothing of the writer's transaction.
                    let person = read.type_id("person").ok();
                    let animal = read.type_id("animal").ok();
                    assert_eq!(person.is_some(), animal.is_some());
                }
            })
        })
        .collect();

    barrier.wait();
    let mut txn = session.write();
    txn.put_entity_type("person").unwrap();
    txn.put_entity_type("animal").unwrap();
    txn.commit().unwrap();

    for reader in readers {
        reader.join().unwrap();
    }
    assert!(session.read().type_id("animal").is_ok());
}

#[test]
fn test_writers_are_serialised() {
    let session = Arc::new(Session::new(SessionConfig::testing()).unwrap());
    {
        let mut txn = session.write();
        let counter = txn.put_attribute_type("counter", DataType::Long).unwrap();
        txn.put_attribute(counter, 0i64).unwrap();
        txn.commit().unwrap();
    }

    let writers: Vec<_> = (1..=8i64)
        .map(|n| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                let mut txn = session.write();
                let counter = txn.type_id("counter").unwrap();
                let seen = txn.instances(counter).count() as i64;
                txn.put_attribute(counter, seen * 100 + n).unwrap();
                txn.commit().unwrap();
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let read = session.read();
    let counter = read.type_id("counter").unwrap();
    assert_eq!(read.instances(counter).count(), 9);
}
