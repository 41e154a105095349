//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store and notifier calls into contact use-cases.
//! - Keep host layers decoupled from storage and notification details.

pub mod contact_directory;
pub mod shared_directory;
