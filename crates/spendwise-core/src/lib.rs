//! Spendwise Core Library
//!
//! Shared functionality for the Spendwise personal finance tracker:
//! - Domain models (users, transactions, categories)
//! - Insight engine that turns a user's transactions into ranked observations
//! - Dashboard aggregation (totals, recent activity, 7-day trend, budget usage)
//! - Record store with connection pooling, migrations and optional encryption
//! - Session-based authentication with hashed credentials

pub mod dashboard;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;

pub use dashboard::{BudgetUsage, CategoryTotal, DailySpending, DashboardSummary};
pub use db::{AuditEntry, Database, TransactionFilter};
pub use error::{Error, Result};
pub use insights::{
    generate_insights, generate_insights_opt, Insight, InsightEngine, InsightTag, Severity,
};
pub use models::{
    Category, NewTransaction, NewUser, Transaction, TransactionType, TransactionUpdate, User,
};
