//! Insight Engine - Rule-based Spending Observations
//!
//! Turns one user's transactions into a short, ordered list of observations
//! about how they spend. Each rule looks at a shared [`TransactionSummary`]
//! and contributes zero or more [`Insight`]s.
//!
//! ## Built-in Rules
//!
//! - **Balance** - Income vs expenses (alert, warning, or good job)
//! - **Category Ranking** - Top spending category, plus one tip for heavy
//!   Food or Shopping spend
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendwise_core::insights::{generate_insights, InsightEngine};
//!
//! let lines = generate_insights(&transactions);
//! let structured = InsightEngine::new().analyze(&transactions);
//! ```

pub mod balance;
pub mod category;
pub mod engine;
pub mod types;

pub use balance::BalanceRule;
pub use category::CategoryRule;
pub use engine::{
    generate_insights, generate_insights_opt, InsightEngine, InsightRule, TransactionSummary,
    NO_DATA_MESSAGE,
};
pub use types::{
    format_amount, from_paise, to_paise, Insight, InsightTag, RuleKind, Severity, CURRENCY_SYMBOL,
};
