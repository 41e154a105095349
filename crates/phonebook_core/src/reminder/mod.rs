//! Birthday reminder derivation and the notification port.
//!
//! # Responsibility
//! - Derive one yearly reminder request per contact (pure functions).
//! - Define the scheduling capability the directory calls into.
//!
//! # Invariants
//! - A contact's reminder key is its stable id, never its phone number.
//! - Derived triggers always repeat yearly.

pub mod derive;
pub mod notifier;
