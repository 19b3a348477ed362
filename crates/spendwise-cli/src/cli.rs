//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use spendwise_core::models::{Category, TransactionType};

/// Default database location: `<data dir>/spendwise/spendwise.db`, or the
/// working directory when no data dir is known
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("spendwise").join("spendwise.db"))
        .unwrap_or_else(|| PathBuf::from("spendwise.db"))
}

/// Spendwise - Track income and expenses, get spending insights
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value_os_t = default_db_path(), global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SPENDWISE_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Create a user account
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Login email (case-insensitive, must be unique)
        #[arg(long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(long)]
        password: String,
    },

    /// Show, set or clear a user's budget
    Budget {
        /// User email
        #[arg(short, long)]
        user: String,

        /// New budget amount
        amount: Option<f64>,

        /// Remove the budget
        #[arg(long, conflicts_with = "amount")]
        clear: bool,
    },

    /// Manage a user's transactions
    Transactions {
        /// User email
        #[arg(short, long)]
        user: String,

        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Show the dashboard summary for a user
    Dashboard {
        /// User email
        #[arg(short, long)]
        user: String,
    },

    /// Show spending insights for a user
    Insights {
        /// User email
        #[arg(short, long)]
        user: String,

        /// Print structured insights as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory with frontend files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Session lifetime in hours (overrides SPENDWISE_SESSION_TTL_HOURS)
        #[arg(long)]
        session_ttl_hours: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions, newest first
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Only income or only expense
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<TransactionType>,

        /// Only this category
        #[arg(short, long)]
        category: Option<Category>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Record a transaction
    Add {
        /// Short description
        #[arg(long)]
        title: String,

        /// Positive amount
        #[arg(long)]
        amount: f64,

        /// income or expense
        #[arg(long = "type", value_name = "TYPE", default_value = "expense")]
        kind: TransactionType,

        /// Category (defaults to Other)
        #[arg(short, long, default_value = "Other")]
        category: Category,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Change fields of a transaction
    Update {
        /// Transaction ID
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        amount: Option<f64>,

        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<TransactionType>,

        #[arg(short, long)]
        category: Option<Category>,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },
}
