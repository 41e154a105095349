//! Contact directory use-case service.
//!
//! # Responsibility
//! - Own the authoritative in-memory contact list.
//! - Keep that list consistent with the persistence port.
//! - Keep scheduled birthday reminders consistent with contact data.
//!
//! # Invariants
//! - Every mutation hits the store first; memory and reminders change only
//!   after the store confirms it.
//! - A failed store call leaves memory and reminders exactly as they were.
//! - Reminder failures are reported, never rolled back into contact state.
//! - `list()` preserves insertion order.

use crate::model::contact::{Contact, ContactFields, ContactId, ContactValidationError};
use crate::reminder::derive::{reminder_key, reminder_request};
use crate::reminder::notifier::{NotificationError, ReminderNotifier};
use crate::repo::contact_repo::{ContactStore, RepoError};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Failure of one directory operation.
#[derive(Debug)]
pub enum DirectoryError {
    /// Input rejected before any port call.
    Validation(ContactValidationError),
    /// No contact with this id is known.
    NotFound(ContactId),
    /// The store failed; in-memory state is unchanged.
    Persistence(RepoError),
    /// Another caller panicked while holding the shared directory lock.
    LockPoisoned,
}

impl Display for DirectoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid contact: {err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::Persistence(err) => write!(f, "contact store failed: {err}"),
            Self::LockPoisoned => write!(f, "contact directory lock poisoned"),
        }
    }
}

impl Error for DirectoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NotFound(_) | Self::LockPoisoned => None,
        }
    }
}

impl From<ContactValidationError> for DirectoryError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for DirectoryError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Directory operation that asked for a reminder to be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOperation {
    Load,
    Add,
    Update,
}

impl ReminderOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Add => "add",
            Self::Update => "update",
        }
    }
}

impl Display for ReminderOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reminder that could not be scheduled for a committed contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderFailure {
    pub contact_id: ContactId,
    pub operation: ReminderOperation,
    pub error: NotificationError,
}

/// Successful result of a directory operation.
///
/// `reminder_failures` lists reminders the notification port refused. The
/// contact change itself is committed either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryOutcome<T> {
    pub value: T,
    pub reminder_failures: Vec<ReminderFailure>,
}

impl<T> DirectoryOutcome<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            reminder_failures: Vec::new(),
        }
    }

    /// Returns whether every derived reminder change went through.
    pub fn reminders_ok(&self) -> bool {
        self.reminder_failures.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// In-memory contact store with persistence and reminder side effects.
pub struct ContactDirectory<S: ContactStore, N: ReminderNotifier> {
    store: S,
    notifier: N,
    contacts: Vec<Contact>,
}

impl<S: ContactStore, N: ReminderNotifier> ContactDirectory<S, N> {
    /// Creates an empty directory over the given ports.
    ///
    /// Call `load()` to pull existing contacts from the store.
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            contacts: Vec::new(),
        }
    }

    /// Replaces in-memory contacts with the store's, then reschedules every
    /// reminder.
    ///
    /// Reminders of contacts that disappeared from the store are cancelled.
    /// Returns the number of loaded contacts.
    pub fn load(&mut self) -> DirectoryResult<DirectoryOutcome<usize>> {
        let loaded = self.store.fetch_all().map_err(|err| {
            error!(
                "event=directory_load module=directory status=error error={}",
                err
            );
            DirectoryError::Persistence(err)
        })?;

        let loaded_ids = loaded
            .iter()
            .map(|contact| contact.id)
            .collect::<HashSet<_>>();
        let previous = std::mem::replace(&mut self.contacts, loaded);
        for stale in previous
            .iter()
            .filter(|contact| !loaded_ids.contains(&contact.id))
        {
            self.notifier.cancel(&reminder_key(stale));
        }

        let mut outcome = DirectoryOutcome::new(self.contacts.len());
        for contact in &self.contacts {
            if let Some(failure) =
                schedule_reminder(&self.notifier, contact, ReminderOperation::Load)
            {
                outcome.reminder_failures.push(failure);
            }
        }

        info!(
            "event=directory_load module=directory status=ok count={} reminder_failures={}",
            outcome.value,
            outcome.reminder_failures.len()
        );
        Ok(outcome)
    }

    /// Creates a contact with a fresh id and schedules its reminder.
    ///
    /// # Errors
    /// - `Validation` for blank name or phone number.
    /// - `Persistence` when the store rejects the insert; nothing changes.
    pub fn add(&mut self, fields: ContactFields) -> DirectoryResult<DirectoryOutcome<Contact>> {
        let fields = fields.normalized()?;
        let contact = Contact::new(fields);

        if let Err(err) = self.store.insert(&contact) {
            error!(
                "event=contact_add module=directory status=error contact_id={} error={}",
                contact.id, err
            );
            return Err(err.into());
        }

        self.contacts.push(contact.clone());
        let mut outcome = DirectoryOutcome::new(contact);
        outcome.reminder_failures.extend(schedule_reminder(
            &self.notifier,
            &outcome.value,
            ReminderOperation::Add,
        ));

        info!(
            "event=contact_add module=directory status=ok contact_id={}",
            outcome.value.id
        );
        Ok(outcome)
    }

    /// Replaces every field of contact `id`, keeping its id and position.
    ///
    /// The old reminder is cancelled before the new one is scheduled.
    ///
    /// # Errors
    /// - `Validation` for blank name or phone number.
    /// - `NotFound` when `id` is unknown.
    /// - `Persistence` when the store rejects the update; nothing changes.
    pub fn update(
        &mut self,
        id: ContactId,
        fields: ContactFields,
    ) -> DirectoryResult<DirectoryOutcome<Contact>> {
        let fields = fields.normalized()?;
        let index = self.position(id).ok_or(DirectoryError::NotFound(id))?;
        let updated = Contact::with_id(id, fields);

        if let Err(err) = self.store.update(id, &updated) {
            error!(
                "event=contact_update module=directory status=error contact_id={} error={}",
                id, err
            );
            return Err(err.into());
        }

        let previous = std::mem::replace(&mut self.contacts[index], updated.clone());
        self.notifier.cancel(&reminder_key(&previous));
        let mut outcome = DirectoryOutcome::new(updated);
        outcome.reminder_failures.extend(schedule_reminder(
            &self.notifier,
            &outcome.value,
            ReminderOperation::Update,
        ));

        info!(
            "event=contact_update module=directory status=ok contact_id={}",
            id
        );
        Ok(outcome)
    }

    /// Deletes contact `id` and cancels its reminder.
    ///
    /// Returns the removed contact.
    ///
    /// # Errors
    /// - `NotFound` when `id` is unknown.
    /// - `Persistence` when the store rejects the delete; nothing changes.
    pub fn remove(&mut self, id: ContactId) -> DirectoryResult<DirectoryOutcome<Contact>> {
        let index = self.position(id).ok_or(DirectoryError::NotFound(id))?;

        if let Err(err) = self.store.delete(id) {
            error!(
                "event=contact_remove module=directory status=error contact_id={} error={}",
                id, err
            );
            return Err(err.into());
        }

        let removed = self.contacts.remove(index);
        self.notifier.cancel(&reminder_key(&removed));

        info!(
            "event=contact_remove module=directory status=ok contact_id={}",
            id
        );
        Ok(DirectoryOutcome::new(removed))
    }

    /// Returns contacts in insertion order.
    pub fn list(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn position(&self, id: ContactId) -> Option<usize> {
        self.contacts.iter().position(|contact| contact.id == id)
    }
}

fn schedule_reminder<N: ReminderNotifier>(
    notifier: &N,
    contact: &Contact,
    operation: ReminderOperation,
) -> Option<ReminderFailure> {
    let request = reminder_request(contact);
    match notifier.schedule(&request) {
        Ok(()) => None,
        Err(err) => {
            warn!(
                "event=reminder_schedule module=directory status=error operation={} contact_id={} key={} error={}",
                operation, contact.id, request.key, err
            );
            Some(ReminderFailure {
                contact_id: contact.id,
                operation,
                error: err,
            })
        }
    }
}
