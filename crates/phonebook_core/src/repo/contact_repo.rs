//! Contact store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the persistence port: fetch all, insert, update, delete.
//! - Keep insertion order stable across process restarts.
//!
//! # Invariants
//! - Write paths must call `Contact::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `update` keeps a contact's original position in `fetch_all` order.

use crate::db::migrations::current_user_version;
use crate::db::DbError;
use crate::model::contact::{Birthdate, Contact, ContactId, ContactValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CONTACT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    phone_number,
    birthdate
FROM contacts";

/// Schema version that introduced the `contacts` table.
const CONTACTS_SCHEMA_VERSION: u32 = 1;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure raised by a `ContactStore`.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    NotFound(ContactId),
    InvalidData(String),
    SchemaNotReady { db_version: u32, required: u32 },
    /// Failure reported by a non-SQLite store implementation.
    Backend(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found in store: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::SchemaNotReady {
                db_version,
                required,
            } => write!(
                f,
                "contact schema not ready: database is at version {db_version}, need {required}"
            ),
            Self::Backend(message) => write!(f, "contact store failure: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::SchemaNotReady { .. }
            | Self::Backend(_) => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable storage capability consumed by `ContactDirectory`.
pub trait ContactStore {
    /// Returns every stored contact in insertion order.
    fn fetch_all(&self) -> RepoResult<Vec<Contact>>;
    fn insert(&self, contact: &Contact) -> RepoResult<()>;
    /// Replaces the stored fields of `id` with those of `contact`.
    fn update(&self, id: ContactId, contact: &Contact) -> RepoResult<()>;
    fn delete(&self, id: ContactId) -> RepoResult<()>;
}

impl<S: ContactStore + ?Sized> ContactStore for &S {
    fn fetch_all(&self) -> RepoResult<Vec<Contact>> {
        (**self).fetch_all()
    }

    fn insert(&self, contact: &Contact) -> RepoResult<()> {
        (**self).insert(contact)
    }

    fn update(&self, id: ContactId, contact: &Contact) -> RepoResult<()> {
        (**self).update(id, contact)
    }

    fn delete(&self, id: ContactId) -> RepoResult<()> {
        (**self).delete(id)
    }
}

/// SQLite-backed contact store.
pub struct SqliteContactStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactStore<'conn> {
    /// Wraps a connection whose schema already contains the contacts table.
    ///
    /// Use `db::open_db` or `db::open_db_in_memory` to obtain one.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let db_version = current_user_version(conn)?;
        if db_version < CONTACTS_SCHEMA_VERSION {
            return Err(RepoError::SchemaNotReady {
                db_version,
                required: CONTACTS_SCHEMA_VERSION,
            });
        }
        Ok(Self { conn })
    }
}

impl ContactStore for SqliteContactStore<'_> {
    fn fetch_all(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }

    fn insert(&self, contact: &Contact) -> RepoResult<()> {
        contact.validate()?;

        self.conn.execute(
            "INSERT INTO contacts (
                uuid,
                name,
                phone_number,
                birthdate
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                contact.id.to_string(),
                contact.name.as_str(),
                contact.phone_number.as_str(),
                contact.birthdate.to_string(),
            ],
        )?;

        Ok(())
    }

    fn update(&self, id: ContactId, contact: &Contact) -> RepoResult<()> {
        contact.validate()?;

        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                name = ?1,
                phone_number = ?2,
                birthdate = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                contact.name.as_str(),
                contact.phone_number.as_str(),
                contact.birthdate.to_string(),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, id: ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in contacts.uuid"))
    })?;

    let birthdate_text: String = row.get("birthdate")?;
    let birthdate = birthdate_text.parse::<Birthdate>().map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid birthdate `{birthdate_text}` in contacts.birthdate: {err}"
        ))
    })?;

    let contact = Contact {
        id,
        name: row.get("name")?,
        phone_number: row.get("phone_number")?,
        birthdate,
    };
    contact.validate()?;
    Ok(contact)
}
