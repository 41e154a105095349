mod common;

use common::{fields, MemoryStore, StoreOp};
use phonebook_core::{
    reminder_key, ContactDirectory, DirectoryError, PendingReminders, SharedContactDirectory,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn shared() -> Arc<SharedContactDirectory<MemoryStore, PendingReminders>> {
    Arc::new(SharedContactDirectory::new(ContactDirectory::new(
        MemoryStore::default(),
        PendingReminders::new(),
    )))
}

#[test]
fn concurrent_adds_are_all_committed_once() {
    let directory = shared();

    let handles = (0..8)
        .map(|worker| {
            let directory = Arc::clone(&directory);
            thread::spawn(move || {
                for n in 0..10 {
                    directory
                        .add(fields(&format!("w{worker}-{n}"), "555-0000", "--06-15"))
                        .unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let contacts = directory.list().unwrap();
    assert_eq!(contacts.len(), 80);
    let ids = contacts
        .iter()
        .map(|contact| contact.id)
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 80);
    let pending = directory
        .with_read(|inner| inner.notifier().len())
        .unwrap();
    assert_eq!(pending, 80);
    let stored = directory.with_read(|inner| inner.store().rows()).unwrap();
    assert_eq!(stored, contacts);
}

#[test]
fn readers_observe_whole_writes_only() {
    let directory = shared();
    let ana = directory
        .add(fields("Ana", "555-1111", "1990-07-04"))
        .unwrap()
        .into_value();

    thread::scope(|scope| {
        scope.spawn(|| {
            for day in 1..=28 {
                directory
                    .update(ana.id, fields("Ana", "555-1111", &format!("1990-08-{day:02}")))
                    .unwrap();
            }
        });
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let current = directory.get(ana.id).unwrap().expect("never missing");
                    assert_eq!(current.name, "Ana");
                    assert_eq!(directory.len().unwrap(), 1);
                }
            });
        }
    });

    let reminder = directory
        .with_read(|inner| inner.notifier().get(&reminder_key(&ana)))
        .unwrap()
        .expect("scheduled");
    assert_eq!((reminder.month(), reminder.day()), (8, 28));
}

#[test]
fn errors_pass_through_the_lock() {
    let directory = shared();
    directory
        .with_read(|inner| inner.store().fail(StoreOp::Insert))
        .unwrap();

    let err = directory
        .add(fields("Ana", "555-1111", "1990-07-04"))
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Persistence(_)));
    assert!(directory.is_empty().unwrap());
}

#[test]
fn writer_panic_poisons_lock_and_is_reported() {
    let directory = shared();
    directory
        .with_read(|inner| inner.store().panic_on(StoreOp::Insert))
        .unwrap();

    let writer = Arc::clone(&directory);
    let joined = thread::spawn(move || {
        let _ = writer.add(fields("Ana", "555-1111", "1990-07-04"));
    })
    .join();
    assert!(joined.is_err());

    assert!(matches!(directory.list(), Err(DirectoryError::LockPoisoned)));
    assert!(matches!(
        directory.add(fields("Bea", "555-2222", "--02-11")),
        Err(DirectoryError::LockPoisoned)
    ));
}

#[test]
fn panicking_reader_does_not_block_later_calls() {
    let directory = shared();

    let reader = Arc::clone(&directory);
    let joined = thread::spawn(move || {
        let _ = reader.with_read(|_| panic!("reader crashed"));
    })
    .join();
    assert!(joined.is_err());

    assert!(directory.list().unwrap().is_empty());
}
