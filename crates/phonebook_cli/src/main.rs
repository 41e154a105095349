//! `phonebook` host binary.
//!
//! # Responsibility
//! - Wire the SQLite contact store and in-process reminder notifier into a
//!   `ContactDirectory`.
//! - Render directory results for a terminal.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use log::warn;
use phonebook_core::db::open_db;
use phonebook_core::{
    init_logging, Contact, ContactDirectory, DirectoryOutcome, PendingReminders,
    PhonebookConfig, SqliteContactStore,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    let log_dir = config
        .log_dir
        .to_str()
        .context("log directory must be valid UTF-8")?;
    if let Err(err) = init_logging(&config.log_level, log_dir) {
        bail!("logging init failed: {err}");
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let store = SqliteContactStore::try_new(&conn)?;
    let mut directory = ContactDirectory::new(store, PendingReminders::new());
    report_reminders(&directory.load()?);

    match cli.command {
        Command::Add(fields) => {
            let outcome = directory.add(fields.into())?;
            report_reminders(&outcome);
            println!("added {}", outcome.value.id);
        }
        Command::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(directory.list())?);
            } else {
                for contact in directory.list() {
                    println!("{}", render_contact(contact));
                }
            }
        }
        Command::Show { id } => match directory.get(id) {
            Some(contact) => println!("{}", render_contact(contact)),
            None => bail!("contact not found: {id}"),
        },
        Command::Update { id, fields } => {
            let outcome = directory.update(id, fields.into())?;
            report_reminders(&outcome);
            println!("updated {id}");
        }
        Command::Remove { id } => {
            directory.remove(id)?;
            println!("removed {id}");
        }
        Command::Reminders => {
            for request in directory.notifier().pending() {
                println!(
                    "{}  every {:02}-{:02}  {}",
                    request.key,
                    request.month(),
                    request.day(),
                    request.body
                );
            }
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> PhonebookConfig {
    let mut config = PhonebookConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = log_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config
}

fn report_reminders<T>(outcome: &DirectoryOutcome<T>) {
    for failure in &outcome.reminder_failures {
        warn!(
            "event=cli_reminder module=cli status=error operation={} contact_id={} error={}",
            failure.operation, failure.contact_id, failure.error
        );
        eprintln!(
            "warning: reminder for {} not scheduled during {}: {}",
            failure.contact_id, failure.operation, failure.error
        );
    }
}

fn render_contact(contact: &Contact) -> String {
    format!(
        "{}  {:<24} {:<16} {}",
        contact.id, contact.name, contact.phone_number, contact.birthdate
    )
}
