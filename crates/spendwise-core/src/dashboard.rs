//! Dashboard aggregation
//!
//! Everything the overview screen shows, computed from a user's full
//! transaction list in one call.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::insights::{from_paise, to_paise, TransactionSummary};
use crate::models::{Category, Transaction};

/// Number of transactions shown under "recent activity"
pub const RECENT_LIMIT: usize = 5;

/// Length of the daily spending trend, ending today
pub const TREND_DAYS: i64 = 7;

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
}

/// Expense total for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySpending {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Spending measured against the user's budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetUsage {
    pub limit: f64,
    pub spent: f64,
    /// Negative once the budget is exceeded
    pub remaining: f64,
    /// 0 when the limit is 0
    pub percent_used: f64,
}

impl BudgetUsage {
    pub fn new(limit: f64, spent: f64) -> Self {
        let percent_used = if limit > 0.0 {
            spent / limit * 100.0
        } else {
            0.0
        };
        Self {
            limit,
            spent,
            remaining: limit - spent,
            percent_used,
        }
    }

    pub fn is_exceeded(&self) -> bool {
        self.spent > self.limit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub recent: Vec<Transaction>,
    pub last_7_days: Vec<DailySpending>,
    pub categories: Vec<CategoryTotal>,
    pub budget: Option<BudgetUsage>,
}

impl DashboardSummary {
    pub fn from_transactions(
        transactions: &[Transaction],
        budget: Option<f64>,
        today: NaiveDate,
    ) -> Self {
        let summary = TransactionSummary::from_transactions(transactions);

        let mut recent: Vec<Transaction> = transactions.to_vec();
        recent.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        recent.truncate(RECENT_LIMIT);

        let last_7_days = (0..TREND_DAYS)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                let paise: i64 = transactions
                    .iter()
                    .filter(|tx| tx.is_expense() && tx.date == date)
                    .map(|tx| to_paise(tx.amount))
                    .sum();
                DailySpending {
                    date,
                    amount: from_paise(paise),
                }
            })
            .collect();

        let categories = summary
            .ranked_categories()
            .into_iter()
            .map(|(category, amount)| CategoryTotal { category, amount })
            .collect();

        Self {
            total_income: summary.total_income,
            total_expenses: summary.total_expenses,
            balance: from_paise(to_paise(summary.total_income) - to_paise(summary.total_expenses)),
            recent,
            last_7_days,
            categories,
            budget: budget.map(|limit| BudgetUsage::new(limit, summary.total_expenses)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::Utc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn tx(id: i64, t: TransactionType, amount: f64, category: Category, day: u32) -> Transaction {
        Transaction {
            id,
            owner_id: 1,
            title: format!("tx {}", id),
            amount,
            category,
            transaction_type: t,
            date: date(day),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(1, TransactionType::Income, 5000.0, Category::Salary, 1),
            tx(2, TransactionType::Expense, 120.0, Category::Food, 10),
            tx(3, TransactionType::Expense, 80.0, Category::Transport, 12),
            tx(4, TransactionType::Expense, 40.0, Category::Food, 12),
            tx(5, TransactionType::Expense, 1500.0, Category::Rent, 2),
            tx(6, TransactionType::Expense, 60.0, Category::Shopping, 14),
            tx(7, TransactionType::Expense, 25.0, Category::Health, 14),
        ]
    }

    #[test]
    fn test_cent_amounts_sum_exactly() {
        let txs = vec![
            tx(1, TransactionType::Income, 0.6, Category::Salary, 14),
            tx(2, TransactionType::Expense, 0.1, Category::Food, 14),
            tx(3, TransactionType::Expense, 0.2, Category::Food, 14),
            tx(4, TransactionType::Expense, 0.3, Category::Food, 14),
        ];
        let dash = DashboardSummary::from_transactions(&txs, None, date(14));
        assert_eq!(dash.total_expenses, 0.6);
        assert_eq!(dash.balance, 0.0);
        assert_eq!(dash.last_7_days[6].amount, 0.6);
    }

    #[test]
    fn test_totals_and_balance() {
        let dash = DashboardSummary::from_transactions(&sample(), None, date(14));
        assert_eq!(dash.total_income, 5000.0);
        assert_eq!(dash.total_expenses, 1825.0);
        assert_eq!(dash.balance, 3175.0);
        assert!(dash.budget.is_none());
    }

    #[test]
    fn test_recent_is_newest_first_and_capped() {
        let dash = DashboardSummary::from_transactions(&sample(), None, date(14));
        let ids: Vec<i64> = dash.recent.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![7, 6, 4, 3, 2]);
    }

    #[test]
    fn test_last_seven_days_window() {
        let dash = DashboardSummary::from_transactions(&sample(), None, date(14));
        assert_eq!(dash.last_7_days.len(), 7);
        assert_eq!(dash.last_7_days[0].date, date(8));
        assert_eq!(dash.last_7_days[6].date, date(14));

        let by_day: Vec<f64> = dash.last_7_days.iter().map(|d| d.amount).collect();
        // 8, 9, 10, 11, 12, 13, 14
        assert_eq!(by_day, vec![0.0, 0.0, 120.0, 0.0, 120.0, 0.0, 85.0]);
    }

    #[test]
    fn test_categories_ranked() {
        let dash = DashboardSummary::from_transactions(&sample(), None, date(14));
        let order: Vec<Category> = dash.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Rent,
                Category::Food,
                Category::Transport,
                Category::Shopping,
                Category::Health
            ]
        );
        assert_eq!(dash.categories[1].amount, 160.0);
    }

    #[test]
    fn test_budget_usage() {
        let dash = DashboardSummary::from_transactions(&sample(), Some(2000.0), date(14));
        let budget = dash.budget.unwrap();
        assert_eq!(budget.spent, 1825.0);
        assert_eq!(budget.remaining, 175.0);
        assert!((budget.percent_used - 91.25).abs() < 1e-9);
        assert!(!budget.is_exceeded());
    }

    #[test]
    fn test_zero_budget_is_exceeded_without_percentage() {
        let usage = BudgetUsage::new(0.0, 10.0);
        assert_eq!(usage.percent_used, 0.0);
        assert!(usage.is_exceeded());
    }

    #[test]
    fn test_empty_dashboard() {
        let dash = DashboardSummary::from_transactions(&[], Some(100.0), date(14));
        assert_eq!(dash.balance, 0.0);
        assert!(dash.recent.is_empty());
        assert!(dash.categories.is_empty());
        assert!(dash.last_7_days.iter().all(|d| d.amount == 0.0));
        assert_eq!(dash.budget.unwrap().remaining, 100.0);
    }
}
