//! Pure derivation of reminder identity, trigger and content.

use crate::model::contact::{Contact, ContactId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Title shown on every birthday reminder.
pub const REMINDER_TITLE: &str = "Birthday Reminder";

/// Identifier used to schedule and cancel one contact's reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderKey(ContactId);

impl ReminderKey {
    pub fn contact_id(&self) -> ContactId {
        self.0
    }
}

impl Display for ReminderKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "birthday:{}", self.0)
    }
}

/// Calendar trigger matching month and day of every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTrigger {
    pub month: u32,
    pub day: u32,
    pub repeats: bool,
}

/// Alert sound requested for a reminder. Birthday reminders always use the
/// platform default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderSound {
    Default,
}

/// Everything a notification port needs to schedule one reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRequest {
    pub key: ReminderKey,
    pub title: String,
    pub body: String,
    pub trigger: ReminderTrigger,
    pub sound: ReminderSound,
}

impl ReminderRequest {
    pub fn month(&self) -> u32 {
        self.trigger.month
    }

    pub fn day(&self) -> u32 {
        self.trigger.day
    }
}

/// Returns the reminder key for `contact`.
///
/// Keyed by id so that contacts sharing a phone number keep separate
/// reminders.
pub fn reminder_key(contact: &Contact) -> ReminderKey {
    ReminderKey(contact.id)
}

/// Returns the yearly trigger for `contact`'s birthday. The year is ignored.
pub fn reminder_trigger(contact: &Contact) -> ReminderTrigger {
    ReminderTrigger {
        month: contact.birthdate.month(),
        day: contact.birthdate.day(),
        repeats: true,
    }
}

/// Builds the full scheduling request for `contact`.
pub fn reminder_request(contact: &Contact) -> ReminderRequest {
    ReminderRequest {
        key: reminder_key(contact),
        title: REMINDER_TITLE.to_string(),
        body: format!("Today is {}'s birthday!", contact.name),
        trigger: reminder_trigger(contact),
        sound: ReminderSound::Default,
    }
}
