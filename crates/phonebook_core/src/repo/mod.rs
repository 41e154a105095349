//! Persistence port and its SQLite implementation.
//!
//! # Responsibility
//! - Define the storage contract `ContactDirectory` depends on.
//! - Keep SQL details out of the directory service.
//!
//! # Invariants
//! - Write paths call `Contact::validate()` before SQL mutations.
//! - Repository APIs report semantic `NotFound` besides transport errors.

pub mod contact_repo;
