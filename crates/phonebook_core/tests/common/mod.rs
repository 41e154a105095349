#![allow(dead_code)]

use phonebook_core::{
    Birthdate, Contact, ContactFields, ContactId, ContactStore, NotificationError, RepoError,
    RepoResult, ReminderKey, ReminderNotifier, ReminderRequest,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FetchAll,
    Insert,
    Update,
    Delete,
}

/// In-memory store whose operations can be switched to fail.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Contact>>,
    failing: Mutex<HashSet<StoreOp>>,
    panicking: Mutex<HashSet<StoreOp>>,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<Contact>) -> Self {
        Self {
            rows: Mutex::new(rows),
            failing: Mutex::default(),
            panicking: Mutex::default(),
        }
    }

    pub fn fail(&self, op: StoreOp) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn panic_on(&self, op: StoreOp) {
        self.panicking.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: StoreOp) {
        self.failing.lock().unwrap().remove(&op);
    }

    pub fn rows(&self) -> Vec<Contact> {
        self.rows.lock().unwrap().clone()
    }

    pub fn set_rows(&self, rows: Vec<Contact>) {
        *self.rows.lock().unwrap() = rows;
    }

    fn check(&self, op: StoreOp) -> RepoResult<()> {
        let panics = self.panicking.lock().unwrap().contains(&op);
        if panics {
            panic!("{op:?} crashed");
        }
        if self.failing.lock().unwrap().contains(&op) {
            return Err(RepoError::Backend(format!("{op:?} unavailable")));
        }
        Ok(())
    }
}

impl ContactStore for MemoryStore {
    fn fetch_all(&self) -> RepoResult<Vec<Contact>> {
        self.check(StoreOp::FetchAll)?;
        Ok(self.rows())
    }

    fn insert(&self, contact: &Contact) -> RepoResult<()> {
        self.check(StoreOp::Insert)?;
        self.rows.lock().unwrap().push(contact.clone());
        Ok(())
    }

    fn update(&self, id: ContactId, contact: &Contact) -> RepoResult<()> {
        self.check(StoreOp::Update)?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(RepoError::NotFound(id))?;
        *row = contact.clone();
        Ok(())
    }

    fn delete(&self, id: ContactId) -> RepoResult<()> {
        self.check(StoreOp::Delete)?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    Schedule { key: ReminderKey, month: u32, day: u32 },
    Cancel(ReminderKey),
}

/// Notifier that records every call and tracks what is still pending.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<NotifierCall>>,
    pending: Mutex<BTreeMap<ReminderKey, ReminderRequest>>,
    refuse_schedule: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn refuse_scheduling(&self, refuse: bool) {
        *self.refuse_schedule.lock().unwrap() = refuse;
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn pending(&self, key: &ReminderKey) -> Option<ReminderRequest> {
        self.pending.lock().unwrap().get(key).cloned()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

impl ReminderNotifier for RecordingNotifier {
    fn schedule(&self, request: &ReminderRequest) -> Result<(), NotificationError> {
        self.calls.lock().unwrap().push(NotifierCall::Schedule {
            key: request.key,
            month: request.month(),
            day: request.day(),
        });
        if *self.refuse_schedule.lock().unwrap() {
            return Err(NotificationError::Rejected {
                key: request.key,
                reason: "quota exceeded".to_string(),
            });
        }
        self.pending
            .lock()
            .unwrap()
            .insert(request.key, request.clone());
        Ok(())
    }

    fn cancel(&self, key: &ReminderKey) {
        self.calls.lock().unwrap().push(NotifierCall::Cancel(*key));
        self.pending.lock().unwrap().remove(key);
    }
}

pub fn fields(name: &str, phone: &str, birthdate: &str) -> ContactFields {
    ContactFields::new(name, phone, birthdate.parse::<Birthdate>().unwrap())
}
