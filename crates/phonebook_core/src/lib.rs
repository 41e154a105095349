//! Core domain logic for the phonebook.
//! This crate is the single source of truth for contact and reminder
//! invariants; hosts only wire ports and render results.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod service;

pub use config::PhonebookConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Birthdate, Contact, ContactFields, ContactId, ContactValidationError};
pub use reminder::derive::{
    reminder_key, reminder_request, reminder_trigger, ReminderKey, ReminderRequest,
    ReminderSound, ReminderTrigger,
};
pub use reminder::notifier::{NotificationError, PendingReminders, ReminderNotifier};
pub use repo::contact_repo::{ContactStore, RepoError, RepoResult, SqliteContactStore};
pub use service::contact_directory::{
    ContactDirectory, DirectoryError, DirectoryOutcome, DirectoryResult, ReminderFailure,
    ReminderOperation,
};
pub use service::shared_directory::SharedContactDirectory;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
