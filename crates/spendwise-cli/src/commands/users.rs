//! User account commands

use anyhow::{Context, Result};
use spendwise_core::db::Database;
use spendwise_core::insights::format_amount;
use spendwise_core::models::NewUser;

use super::find_user;

pub fn cmd_register(db: &Database, name: &str, email: &str, password: &str) -> Result<()> {
    let user = db
        .create_user(&NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .context("Failed to create user")?;

    db.log_audit(&user.email, "register", Some("user"), Some(user.id), Some("cli"))?;

    println!("✅ Created user {} <{}> (id {})", user.name, user.email, user.id);
    Ok(())
}

/// Show the budget, or set/clear it when asked
pub fn cmd_budget(db: &Database, email: &str, amount: Option<f64>, clear: bool) -> Result<()> {
    let user = find_user(db, email)?;

    if !clear && amount.is_none() {
        match user.budget {
            Some(limit) => println!("💰 Budget for {}: {}", user.email, format_amount(limit)),
            None => println!("No budget set for {}.", user.email),
        }
        return Ok(());
    }

    let budget = if clear { None } else { amount };
    let updated = db
        .update_budget(user.id, budget)
        .context("Failed to update budget")?;

    let details = match budget {
        Some(limit) => format!("budget={}", limit),
        None => "budget cleared".to_string(),
    };
    db.log_audit(&updated.email, "update", Some("budget"), Some(updated.id), Some(&details))?;

    match updated.budget {
        Some(limit) => println!("✅ Budget set to {}", format_amount(limit)),
        None => println!("✅ Budget cleared"),
    }
    Ok(())
}
