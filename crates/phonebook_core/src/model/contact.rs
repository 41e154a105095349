//! Contact domain model.
//!
//! # Responsibility
//! - Define the contact record and its user-editable field set.
//! - Parse, validate and format birthdates with an optional year.
//!
//! # Invariants
//! - `id` is stable and never reused for another contact.
//! - `name` and `phone_number` are non-empty after trimming.
//! - `birthdate` always names a real calendar day (Feb 29 allowed when the
//!   year is unknown).
//! - A known year lies in `0..=9999`, so the text form always re-parses.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of one contact.
pub type ContactId = Uuid;

/// Leap year used to validate yearless dates so that Feb 29 is accepted.
const YEARLESS_REFERENCE_YEAR: i32 = 2000;

/// Years with a four-digit text form.
const BIRTH_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Validation failures for contact fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyName,
    EmptyPhoneNumber,
    InvalidBirthdate {
        year: Option<i32>,
        month: u32,
        day: u32,
    },
    MalformedBirthdate(String),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name must not be empty"),
            Self::EmptyPhoneNumber => write!(f, "contact phone_number must not be empty"),
            Self::InvalidBirthdate {
                year: Some(year),
                month,
                day,
            } => write!(
                f,
                "birthdate {year:04}-{month:02}-{day:02} is not a calendar date in years 0000-9999"
            ),
            Self::InvalidBirthdate {
                year: None,
                month,
                day,
            } => write!(f, "birthdate --{month:02}-{day:02} is not a calendar date"),
            Self::MalformedBirthdate(value) => write!(
                f,
                "birthdate `{value}` must be formatted as YYYY-MM-DD or --MM-DD"
            ),
        }
    }
}

impl Error for ContactValidationError {}

/// Calendar birthday whose year may be unknown.
///
/// Text form is `YYYY-MM-DD`, or the ISO 8601 yearless form `--MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthdate {
    year: Option<i32>,
    month: u32,
    day: u32,
}

impl Birthdate {
    /// Builds a birthdate with a known year in `0..=9999`.
    pub fn ymd(year: i32, month: u32, day: u32) -> Result<Self, ContactValidationError> {
        if !BIRTH_YEARS.contains(&year) || NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(ContactValidationError::InvalidBirthdate {
                year: Some(year),
                month,
                day,
            });
        }
        Ok(Self {
            year: Some(year),
            month,
            day,
        })
    }

    /// Builds a birthdate whose year is unknown.
    pub fn month_day(month: u32, day: u32) -> Result<Self, ContactValidationError> {
        if NaiveDate::from_ymd_opt(YEARLESS_REFERENCE_YEAR, month, day).is_none() {
            return Err(ContactValidationError::InvalidBirthdate {
                year: None,
                month,
                day,
            });
        }
        Ok(Self {
            year: None,
            month,
            day,
        })
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Returns the full date when the year is known.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        self.year
            .and_then(|year| NaiveDate::from_ymd_opt(year, self.month, self.day))
    }
}

impl TryFrom<NaiveDate> for Birthdate {
    type Error = ContactValidationError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::ymd(value.year(), value.month(), value.day())
    }
}

impl Display for Birthdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.year {
            Some(year) => write!(f, "{year:04}-{:02}-{:02}", self.month, self.day),
            None => write!(f, "--{:02}-{:02}", self.month, self.day),
        }
    }
}

impl FromStr for Birthdate {
    type Err = ContactValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let malformed = || ContactValidationError::MalformedBirthdate(trimmed.to_string());

        if let Some(rest) = trimmed.strip_prefix("--") {
            let (month, day) = rest.split_once('-').ok_or_else(malformed)?;
            let month = parse_component(month, 2).ok_or_else(malformed)?;
            let day = parse_component(day, 2).ok_or_else(malformed)?;
            return Self::month_day(month, day);
        }

        let mut parts = trimmed.splitn(3, '-');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month = parse_component(month, 2).ok_or_else(malformed)?;
        let day = parse_component(day, 2).ok_or_else(malformed)?;
        Self::ymd(year, month, day)
    }
}

impl TryFrom<String> for Birthdate {
    type Error = ContactValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Birthdate> for String {
    fn from(value: Birthdate) -> Self {
        value.to_string()
    }
}

fn parse_component(value: &str, width: usize) -> Option<u32> {
    if value.len() != width || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// User-editable fields of a contact.
///
/// `add` creates a contact from these, `update` replaces all of them at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub phone_number: String,
    pub birthdate: Birthdate,
}

impl ContactFields {
    pub fn new(
        name: impl Into<String>,
        phone_number: impl Into<String>,
        birthdate: Birthdate,
    ) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
            birthdate,
        }
    }

    /// Returns a trimmed copy, or the first violated field rule.
    pub fn normalized(&self) -> Result<Self, ContactValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        let phone_number = self.phone_number.trim();
        if phone_number.is_empty() {
            return Err(ContactValidationError::EmptyPhoneNumber);
        }
        Ok(Self {
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            birthdate: self.birthdate,
        })
    }
}

/// One person known to the phonebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Assigned at creation; never changes.
    pub id: ContactId,
    pub name: String,
    /// Opaque text; not required to be unique.
    pub phone_number: String,
    pub birthdate: Birthdate,
}

impl Contact {
    /// Creates a contact with a freshly generated id.
    pub fn new(fields: ContactFields) -> Self {
        Self::with_id(Uuid::new_v4(), fields)
    }

    /// Creates a contact with a caller-provided id.
    ///
    /// Used by storage read paths where identity already exists.
    pub fn with_id(id: ContactId, fields: ContactFields) -> Self {
        Self {
            id,
            name: fields.name,
            phone_number: fields.phone_number,
            birthdate: fields.birthdate,
        }
    }

    /// Returns a copy of the editable fields.
    pub fn fields(&self) -> ContactFields {
        ContactFields {
            name: self.name.clone(),
            phone_number: self.phone_number.clone(),
            birthdate: self.birthdate,
        }
    }

    /// Validates the invariants every persisted contact must satisfy.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        if self.phone_number.trim().is_empty() {
            return Err(ContactValidationError::EmptyPhoneNumber);
        }
        Ok(())
    }
}
