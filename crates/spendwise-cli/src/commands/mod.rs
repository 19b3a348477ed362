//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database initialization and shared utilities (open_db, find_user)
//! - `users` - Registration and budgets
//! - `transactions` - Transaction commands (list, add, update, delete)
//! - `reports` - Dashboard and insights
//! - `serve` - Web server command

pub mod core;
pub mod reports;
pub mod serve;
pub mod transactions;
pub mod users;

// Re-export command functions for main.rs
pub use core::*;
pub use reports::*;
pub use serve::*;
pub use transactions::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
