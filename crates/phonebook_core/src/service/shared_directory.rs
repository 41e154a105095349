//! Reader/writer locked handle over one `ContactDirectory`.
//!
//! # Invariants
//! - Reads (`list`, `get`, `len`) may run concurrently with each other.
//! - Writes (`load`, `add`, `update`, `remove`) run alone.
//! - A poisoned lock surfaces as `DirectoryError::LockPoisoned`.

use crate::model::contact::{Contact, ContactFields, ContactId};
use crate::reminder::notifier::ReminderNotifier;
use crate::repo::contact_repo::ContactStore;
use crate::service::contact_directory::{
    ContactDirectory, DirectoryError, DirectoryOutcome, DirectoryResult,
};
use log::error;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-shareable contact directory.
///
/// Wrap in `Arc` to hand out to several callers. It is `Sync` when both
/// ports are `Send + Sync`.
pub struct SharedContactDirectory<S: ContactStore, N: ReminderNotifier> {
    inner: RwLock<ContactDirectory<S, N>>,
}

impl<S: ContactStore, N: ReminderNotifier> SharedContactDirectory<S, N> {
    pub fn new(directory: ContactDirectory<S, N>) -> Self {
        Self {
            inner: RwLock::new(directory),
        }
    }

    pub fn load(&self) -> DirectoryResult<DirectoryOutcome<usize>> {
        self.write()?.load()
    }

    pub fn add(&self, fields: ContactFields) -> DirectoryResult<DirectoryOutcome<Contact>> {
        self.write()?.add(fields)
    }

    pub fn update(
        &self,
        id: ContactId,
        fields: ContactFields,
    ) -> DirectoryResult<DirectoryOutcome<Contact>> {
        self.write()?.update(id, fields)
    }

    pub fn remove(&self, id: ContactId) -> DirectoryResult<DirectoryOutcome<Contact>> {
        self.write()?.remove(id)
    }

    /// Returns a snapshot of the contacts in insertion order.
    pub fn list(&self) -> DirectoryResult<Vec<Contact>> {
        Ok(self.read()?.list().to_vec())
    }

    pub fn get(&self, id: ContactId) -> DirectoryResult<Option<Contact>> {
        Ok(self.read()?.get(id).cloned())
    }

    pub fn len(&self) -> DirectoryResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> DirectoryResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Runs `f` with shared access, e.g. to inspect the notifier.
    pub fn with_read<T>(&self, f: impl FnOnce(&ContactDirectory<S, N>) -> T) -> DirectoryResult<T> {
        Ok(f(&*self.read()?))
    }

    /// Unwraps the directory.
    pub fn into_inner(self) -> DirectoryResult<ContactDirectory<S, N>> {
        self.inner
            .into_inner()
            .map_err(|_| DirectoryError::LockPoisoned)
    }

    fn read(&self) -> DirectoryResult<RwLockReadGuard<'_, ContactDirectory<S, N>>> {
        self.inner.read().map_err(|_| {
            error!("event=directory_lock module=directory status=error mode=read error=poisoned");
            DirectoryError::LockPoisoned
        })
    }

    fn write(&self) -> DirectoryResult<RwLockWriteGuard<'_, ContactDirectory<S, N>>> {
        self.inner.write().map_err(|_| {
            error!("event=directory_lock module=directory status=error mode=write error=poisoned");
            DirectoryError::LockPoisoned
        })
    }
}
