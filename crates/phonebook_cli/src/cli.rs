//! Clap definitions for the `phonebook` command line.

use clap::{Args, Parser, Subcommand};
use phonebook_core::{Birthdate, ContactFields, ContactId};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "phonebook",
    version = env!("CARGO_PKG_VERSION"),
    about = "Manage contacts and their yearly birthday reminders."
)]
pub(crate) struct Cli {
    /// Contact database file (defaults to PHONEBOOK_DB_PATH or the temp dir).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,
    /// Absolute log directory (defaults to PHONEBOOK_LOG_DIR or the temp dir).
    #[clap(long, global = true)]
    pub log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error (defaults to PHONEBOOK_LOG_LEVEL).
    #[clap(long, global = true)]
    pub log_level: Option<String>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Add a contact and schedule its birthday reminder
    Add(FieldsArgs),
    /// List contacts in insertion order
    List {
        /// Print JSON instead of aligned text.
        #[clap(long)]
        json: bool,
    },
    /// Show one contact
    Show { id: ContactId },
    /// Replace every field of a contact
    Update {
        id: ContactId,
        #[clap(flatten)]
        fields: FieldsArgs,
    },
    /// Remove a contact and cancel its reminder
    Remove { id: ContactId },
    /// Print every pending birthday reminder
    Reminders,
}

#[derive(Args, Debug)]
pub(crate) struct FieldsArgs {
    #[clap(long)]
    pub name: String,
    #[clap(long)]
    pub phone: String,
    /// YYYY-MM-DD, or --MM-DD when the year is unknown.
    #[clap(long, allow_hyphen_values = true)]
    pub birthdate: Birthdate,
}

impl From<FieldsArgs> for ContactFields {
    fn from(value: FieldsArgs) -> Self {
        ContactFields::new(value.name, value.phone, value.birthdate)
    }
}
