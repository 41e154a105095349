//! Notification port and an in-process pending-reminder adapter.
//!
//! # Responsibility
//! - Define how the directory schedules and cancels reminders.
//! - Provide `PendingReminders`, a notification-center stand-in that keeps
//!   scheduled requests keyed by reminder key.
//!
//! # Invariants
//! - Scheduling an existing key replaces the previous request.
//! - Cancelling an unknown key is a no-op.

use crate::reminder::derive::{ReminderKey, ReminderRequest};
use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Scheduling failure reported by a notification port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The host refused notification permission.
    PermissionDenied,
    /// The host rejected this particular request.
    Rejected { key: ReminderKey, reason: String },
}

impl Display for NotificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "notification permission denied"),
            Self::Rejected { key, reason } => {
                write!(f, "reminder {key} rejected: {reason}")
            }
        }
    }
}

impl Error for NotificationError {}

/// Capability to schedule and cancel yearly calendar reminders.
///
/// Scheduling is best-effort: callers log failures instead of failing the
/// surrounding contact mutation.
pub trait ReminderNotifier {
    fn schedule(&self, request: &ReminderRequest) -> Result<(), NotificationError>;
    fn cancel(&self, key: &ReminderKey);
}

impl<N: ReminderNotifier + ?Sized> ReminderNotifier for &N {
    fn schedule(&self, request: &ReminderRequest) -> Result<(), NotificationError> {
        (**self).schedule(request)
    }

    fn cancel(&self, key: &ReminderKey) {
        (**self).cancel(key)
    }
}

/// In-process notifier that records pending reminders.
#[derive(Debug, Default)]
pub struct PendingReminders {
    pending: Mutex<BTreeMap<ReminderKey, ReminderRequest>>,
    scheduling_disabled: bool,
}

impl PendingReminders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a notifier that refuses every schedule call, as a host does
    /// when the user has not granted notification permission.
    pub fn with_scheduling_disabled() -> Self {
        Self {
            pending: Mutex::default(),
            scheduling_disabled: true,
        }
    }

    /// Returns pending requests ordered by key.
    pub fn pending(&self) -> Vec<ReminderRequest> {
        self.entries().values().cloned().collect()
    }

    pub fn get(&self, key: &ReminderKey) -> Option<ReminderRequest> {
        self.entries().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    // Writes are single map operations; a poisoned guard is still consistent.
    fn entries(&self) -> MutexGuard<'_, BTreeMap<ReminderKey, ReminderRequest>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReminderNotifier for PendingReminders {
    fn schedule(&self, request: &ReminderRequest) -> Result<(), NotificationError> {
        if self.scheduling_disabled {
            return Err(NotificationError::PermissionDenied);
        }
        debug!(
            "event=reminder_schedule module=reminder status=ok key={} month={} day={}",
            request.key,
            request.month(),
            request.day()
        );
        self.entries().insert(request.key, request.clone());
        Ok(())
    }

    fn cancel(&self, key: &ReminderKey) {
        let removed = self.entries().remove(key).is_some();
        debug!(
            "event=reminder_cancel module=reminder status=ok key={} removed={}",
            key, removed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationError, PendingReminders, ReminderNotifier};
    use crate::model::contact::{Birthdate, Contact, ContactFields};
    use crate::reminder::derive::{reminder_key, reminder_request};

    fn ana(birthdate: &str) -> Contact {
        Contact::new(ContactFields::new(
            "Ana",
            "555-1111",
            birthdate.parse::<Birthdate>().expect("valid birthdate"),
        ))
    }

    #[test]
    fn schedule_replaces_request_with_same_key() {
        let notifier = PendingReminders::new();
        let mut contact = ana("1990-07-04");
        notifier
            .schedule(&reminder_request(&contact))
            .expect("schedule");
        contact.birthdate = "1990-08-04".parse().expect("valid birthdate");
        notifier
            .schedule(&reminder_request(&contact))
            .expect("reschedule");

        assert_eq!(notifier.len(), 1);
        let pending = notifier.get(&reminder_key(&contact)).expect("pending");
        assert_eq!((pending.month(), pending.day()), (8, 4));
    }

    #[test]
    fn cancel_unknown_key_is_noop() {
        let notifier = PendingReminders::new();
        notifier.cancel(&reminder_key(&ana("--01-01")));
        assert!(notifier.is_empty());
    }

    #[test]
    fn disabled_notifier_refuses_scheduling() {
        let notifier = PendingReminders::with_scheduling_disabled();
        let err = notifier
            .schedule(&reminder_request(&ana("1990-07-04")))
            .expect_err("scheduling must be refused");
        assert_eq!(err, NotificationError::PermissionDenied);
        assert!(notifier.is_empty());
    }
}
