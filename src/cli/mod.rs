pub mod clear;
pub mod demo;
pub mod export;
pub mod files;
pub mod init;
pub mod rules;
pub mod status;
pub mod transactions;
pub mod upload;
pub mod users;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::error::{BolsoError, Result};
use crate::pipeline::AppStore;
use crate::settings::{load_settings, store_dir, Settings};
use crate::store::Store;

#[derive(Parser)]
#[command(name = "bolso", about = "Bank-statement ELT pipeline: extract, categorize, export.")]
pub struct Cli {
    /// Act as this user for the invocation (see `bolso users list`)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Admin only: operate on another user's account
    #[arg(long, global = true)]
    pub impersonate: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Bolso: choose a data directory and seed the user registry.
    Init {
        /// Path for Bolso data (default: ~/Documents/bolso)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage the login registry.
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Upload a statement file: extract transactions and categorize them.
    Upload {
        /// Path to the statement (CSV parses locally, PDF goes to the extraction service)
        file: String,
        /// Extractor key: csv, remote (default: picked from the file type)
        #[arg(long)]
        format: Option<String>,
    },
    /// Manage uploaded statement files.
    Files {
        #[command(subcommand)]
        command: FilesCommands,
    },
    /// Inspect and edit transactions.
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommands,
    },
    /// Manage categorization rules (applied in list order, first match wins).
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
    /// Export the categorized view as CSV.
    Export {
        /// Output file path (default: extrato_exportado_YYYY-MM-DD.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Load the sample statements to explore Bolso.
    Demo,
    /// Show configuration and table statistics.
    Status,
    /// Remove every table stored for the acting user.
    Clear {
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Add a user to the registry.
    Add {
        /// Display name, also the storage partition key
        name: String,
        /// Role: free, paid, admin, guest
        #[arg(long)]
        role: String,
        #[arg(long)]
        email: String,
    },
    /// List registered users.
    List,
}

#[derive(Subcommand)]
pub enum FilesCommands {
    /// List uploaded files.
    List,
    /// Delete a file and every transaction extracted from it.
    Delete {
        /// File ID (shown in `bolso files list`)
        id: String,
        /// Confirm the cascade delete
        #[arg(long)]
        yes: bool,
    },
    /// Reconstruct the original document from storage.
    Download {
        id: String,
        /// Output path (default: the original file name)
        #[arg(long)]
        output: Option<String>,
    },
    /// Export one file's categorized transactions as CSV.
    Csv {
        id: String,
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TransactionsCommands {
    /// List the categorized view, most recent first.
    List {
        /// Month filter: YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Category filter (exact label)
        #[arg(long)]
        category: Option<String>,
    },
    /// Edit fields of one transaction.
    Edit {
        /// Transaction ID (shown in `bolso transactions list`)
        id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        /// debit or credit
        #[arg(long = "type")]
        kind: Option<String>,
    },
    /// Delete one transaction.
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Add a categorization rule (appended at the end of the list).
    Add {
        /// Keyword matched case-insensitively inside descriptions
        keyword: String,
        /// Category label to assign
        #[arg(long)]
        category: String,
    },
    /// List rules in evaluation order.
    List,
    /// Update an existing rule.
    Update {
        /// Rule ID (shown in `bolso rules list`)
        id: String,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a rule by ID.
    Delete { id: String },
}

/// Build the orchestrator and log the acting identity in, layering
/// impersonation on top when requested.
pub(crate) fn open_session(
    user: Option<&str>,
    impersonate: Option<&str>,
) -> Result<(Settings, AppStore)> {
    let settings = load_settings();
    let store = Store::open(&store_dir());
    let mut app = AppStore::new(store, &settings.titular_account);

    let name = user.ok_or_else(|| {
        BolsoError::Other("no user given; pass --user <name> (see `bolso users list`)".to_string())
    })?;
    let login_user = crate::users::find_user(name)?;
    app.login(login_user);

    if let Some(target) = impersonate {
        let target_user = crate::users::find_user(target)?;
        app.impersonate(target_user)?;
        if let (Some(current), Some(admin)) =
            (app.current_user(), app.session().impersonated_from())
        {
            println!(
                "{}",
                format!(
                    "Admin mode: operating on {}'s account (admin: {})",
                    current.name, admin.name
                )
                .yellow()
            );
        }
    }

    Ok((settings, app))
}
