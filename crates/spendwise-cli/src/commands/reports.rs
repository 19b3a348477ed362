//! Dashboard and insight commands

use anyhow::Result;
use chrono::NaiveDate;
use spendwise_core::db::Database;
use spendwise_core::insights::{format_amount, InsightEngine};
use spendwise_core::DashboardSummary;

use super::{find_user, truncate};

/// Width of the 7-day bar chart
const BAR_WIDTH: usize = 30;

pub fn cmd_dashboard(db: &Database, email: &str, today: NaiveDate) -> Result<()> {
    let user = find_user(db, email)?;
    let transactions = db.all_transactions(user.id)?;
    let dash = DashboardSummary::from_transactions(&transactions, user.budget, today);

    println!();
    println!("📊 Spendwise Dashboard - {}", user.name);
    println!("   ─────────────────────────────");
    println!("   Income:   {:>14}", format_amount(dash.total_income));
    println!("   Expenses: {:>14}", format_amount(dash.total_expenses));
    println!("   Balance:  {:>14}", format_amount(dash.balance));

    if let Some(budget) = &dash.budget {
        println!();
        let icon = if budget.is_exceeded() { "🚨" } else { "💰" };
        println!(
            "   {} Budget: {} of {} used ({:.0}%)",
            icon,
            format_amount(budget.spent),
            format_amount(budget.limit),
            budget.percent_used
        );
        if budget.is_exceeded() {
            println!("      Over budget by {}", format_amount(-budget.remaining));
        }
    }

    if !dash.categories.is_empty() {
        println!();
        println!("   Spending by category:");
        for c in &dash.categories {
            println!("     {:<13} {:>14}", c.category, format_amount(c.amount));
        }
    }

    println!();
    println!("   Last 7 days:");
    let max = dash
        .last_7_days
        .iter()
        .map(|d| d.amount)
        .fold(0.0_f64, f64::max);
    for day in &dash.last_7_days {
        let filled = if max > 0.0 {
            ((day.amount / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        println!(
            "     {} {:<width$} {}",
            day.date.format("%a %d"),
            "█".repeat(filled),
            format_amount(day.amount),
            width = BAR_WIDTH
        );
    }

    if !dash.recent.is_empty() {
        println!();
        println!("   Recent activity:");
        for tx in &dash.recent {
            let sign = if tx.is_expense() { "-" } else { "+" };
            println!(
                "     {} {}{:<12} {}",
                tx.date,
                sign,
                format_amount(tx.amount),
                truncate(&tx.title, 30)
            );
        }
    }

    Ok(())
}

pub fn cmd_insights(db: &Database, email: &str, json: bool) -> Result<()> {
    let user = find_user(db, email)?;
    let transactions = db.all_transactions(user.id)?;
    let engine = InsightEngine::new();

    if json {
        let insights = engine.analyze(&transactions);
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!();
    println!("💡 Insights for {}", user.name);
    println!("   ─────────────────────────────");
    for line in engine.generate(&transactions) {
        println!("   {}", line);
    }

    Ok(())
}
