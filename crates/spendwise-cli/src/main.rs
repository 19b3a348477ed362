//! Spendwise CLI - Self-hosted personal finance tracker
//!
//! Usage:
//!   spendwise init                                  Initialize database
//!   spendwise register --name N --email E --password P
//!   spendwise transactions --user E add --title T --amount A
//!   spendwise insights --user E                     Spending insights
//!   spendwise serve --port 3000                     Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use spendwise_core::db::TransactionFilter;
use spendwise_core::models::{NewTransaction, TransactionUpdate};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

/// Rows shown by `transactions` with no action
const DEFAULT_LIST_LIMIT: i64 = 20;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    tracing::debug!(db = %cli.db.display(), "Using database");

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Register {
            name,
            email,
            password,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_register(&db, &name, &email, &password)
        }
        Commands::Budget {
            user,
            amount,
            clear,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_budget(&db, &user, amount, clear)
        }
        Commands::Transactions { user, action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let owner = commands::find_user(&db, &user)?;
            match action {
                None => {
                    let filter = TransactionFilter::new().limit(Some(DEFAULT_LIST_LIMIT));
                    commands::cmd_transactions_list(&db, &owner, &filter)
                }
                Some(TransactionsAction::List {
                    limit,
                    kind,
                    category,
                    from,
                    to,
                    search,
                }) => {
                    if let (Some(from), Some(to)) = (from, to) {
                        if from > to {
                            anyhow::bail!("--from must not be after --to");
                        }
                    }
                    let filter = TransactionFilter::new()
                        .transaction_type(kind)
                        .category(category)
                        .date_range(from, to)
                        .search(search)
                        .limit(Some(limit));
                    commands::cmd_transactions_list(&db, &owner, &filter)
                }
                Some(TransactionsAction::Add {
                    title,
                    amount,
                    kind,
                    category,
                    date,
                }) => {
                    let tx = NewTransaction {
                        title,
                        amount,
                        category,
                        transaction_type: kind,
                        date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                    };
                    commands::cmd_transactions_add(&db, &owner, &tx)
                }
                Some(TransactionsAction::Update {
                    id,
                    title,
                    amount,
                    kind,
                    category,
                    date,
                }) => {
                    let update = TransactionUpdate {
                        title,
                        amount,
                        category,
                        transaction_type: kind,
                        date,
                    };
                    commands::cmd_transactions_update(&db, &owner, id, &update)
                }
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&db, &owner, id)
                }
            }
        }
        Commands::Dashboard { user } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_dashboard(&db, &user, chrono::Local::now().date_naive())
        }
        Commands::Insights { user, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_insights(&db, &user, json)
        }
        Commands::Serve {
            port,
            host,
            static_dir,
            session_ttl_hours,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
                session_ttl_hours,
            )
            .await
        }
    }
}
