//! Domain model for phonebook records.
//!
//! # Responsibility
//! - Define the canonical contact record used by core business logic.
//! - Own field validation so every write path shares one rule set.
//!
//! # Invariants
//! - Every contact is identified by a stable `ContactId`.
//! - Only month and day of a birthdate drive reminder recurrence.

pub mod contact;
