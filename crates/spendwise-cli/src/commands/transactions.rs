//! Transaction command implementations

use anyhow::{Context, Result};
use spendwise_core::db::{Database, TransactionFilter};
use spendwise_core::insights::format_amount;
use spendwise_core::models::{NewTransaction, Transaction, TransactionUpdate, User};

use super::truncate;

/// Colored signed amount: red for expenses, green for income
fn amount_str(tx: &Transaction) -> String {
    if tx.is_expense() {
        format!("\x1b[31m-{}\x1b[0m", format_amount(tx.amount))
    } else {
        format!("\x1b[32m+{}\x1b[0m", format_amount(tx.amount))
    }
}

fn print_row(tx: &Transaction) {
    println!(
        "   [{}] {} │ {:>20} │ {:<13} │ {}",
        tx.id,
        tx.date,
        amount_str(tx),
        tx.category,
        truncate(&tx.title, 40)
    );
}

pub fn cmd_transactions_list(db: &Database, user: &User, filter: &TransactionFilter) -> Result<()> {
    let transactions = db.list_transactions(user.id, filter)?;

    if transactions.is_empty() {
        println!("No transactions found. Add one with:");
        println!(
            "  spendwise transactions --user {} add --title Lunch --amount 12.50 --category Food",
            user.email
        );
        return Ok(());
    }

    let total = db.count_transactions(user.id, filter)?;

    println!();
    println!("📝 Transactions ({} of {})", transactions.len(), total);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in &transactions {
        print_row(tx);
    }

    Ok(())
}

pub fn cmd_transactions_add(db: &Database, user: &User, tx: &NewTransaction) -> Result<()> {
    let created = db
        .insert_transaction(user.id, tx)
        .context("Failed to add transaction")?;

    db.log_audit(
        &user.email,
        "create",
        Some("transaction"),
        Some(created.id),
        Some("cli"),
    )?;

    println!("✅ Added transaction {}:", created.id);
    print_row(&created);
    Ok(())
}

pub fn cmd_transactions_update(
    db: &Database,
    user: &User,
    id: i64,
    update: &TransactionUpdate,
) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass at least one of --title, --amount, --type, --category, --date");
    }

    let updated = db
        .update_transaction(user.id, id, update)
        .context("Failed to update transaction")?
        .ok_or_else(|| anyhow::anyhow!("Transaction {} not found", id))?;

    db.log_audit(&user.email, "update", Some("transaction"), Some(id), Some("cli"))?;

    println!("✅ Updated transaction {}:", id);
    print_row(&updated);
    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, user: &User, id: i64) -> Result<()> {
    let tx = db
        .get_transaction(user.id, id)?
        .ok_or_else(|| anyhow::anyhow!("Transaction {} not found", id))?;

    db.delete_transaction(user.id, id)?;
    db.log_audit(&user.email, "delete", Some("transaction"), Some(id), Some("cli"))?;

    println!("✅ Deleted transaction {}:", id);
    print_row(&tx);
    Ok(())
}
