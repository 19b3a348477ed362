//! Balance Insight
//!
//! Compares total expenses against total income and emits at most one of:
//! - **Alert** when expenses exceed income
//! - **Warning** when more than 80% of income has been spent
//! - **Good Job** with the surplus otherwise
//!
//! Nothing is emitted when there is no income and no spending.

use super::engine::{InsightRule, TransactionSummary};
use super::types::{format_amount, from_paise, to_paise, Insight, InsightTag, RuleKind};

/// Spending above `NUM / DEN` (80%) of income triggers a warning
pub const WARNING_RATIO_NUM: i64 = 4;
pub const WARNING_RATIO_DEN: i64 = 5;

/// Rule comparing income to expenses
pub struct BalanceRule;

impl BalanceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BalanceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for BalanceRule {
    fn id(&self) -> RuleKind {
        RuleKind::Balance
    }

    fn name(&self) -> &'static str {
        "Income vs Expenses"
    }

    fn evaluate(&self, summary: &TransactionSummary) -> Vec<Insight> {
        let income = summary.total_income;
        let expenses = summary.total_expenses;
        let data = serde_json::json!({
            "total_income": income,
            "total_expenses": expenses,
        });

        let income_paise = to_paise(income);
        let expense_paise = to_paise(expenses);

        let insight = if expense_paise > income_paise {
            Insight::new(
                RuleKind::Balance,
                InsightTag::Alert,
                format!(
                    "You are spending more than you earn! Your expenses ({}) exceed your income ({}).",
                    format_amount(expenses),
                    format_amount(income)
                ),
            )
        } else if income_paise > 0
            && expense_paise * WARNING_RATIO_DEN > income_paise * WARNING_RATIO_NUM
        {
            Insight::new(
                RuleKind::Balance,
                InsightTag::Warning,
                "You have spent over 80% of your income. Consider saving more.",
            )
        } else if income_paise > 0 {
            let saved = from_paise(income_paise - expense_paise);
            Insight::new(
                RuleKind::Balance,
                InsightTag::GoodJob,
                format!(
                    "You are living within your means. You have saved {}.",
                    format_amount(saved)
                ),
            )
        } else {
            return vec![];
        };

        vec![insight.with_data(data)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::Severity;

    fn summary(income: f64, expenses: f64) -> TransactionSummary {
        TransactionSummary {
            total_income: income,
            total_expenses: expenses,
            ..Default::default()
        }
    }

    fn evaluate(income: f64, expenses: f64) -> Vec<Insight> {
        BalanceRule::new().evaluate(&summary(income, expenses))
    }

    #[test]
    fn test_alert_when_expenses_exceed_income() {
        let insights = evaluate(0.0, 100.0);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].tag, InsightTag::Alert);
        assert_eq!(insights[0].severity, Severity::Alert);
        assert_eq!(
            insights[0].render(),
            "⚠️ **Alert**: You are spending more than you earn! Your expenses (₹100.00) exceed your income (₹0.00)."
        );
        assert_eq!(insights[0].data["total_expenses"], 100.0);
    }

    #[test]
    fn test_warning_above_eighty_percent() {
        let insights = evaluate(1000.0, 850.0);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].tag, InsightTag::Warning);
    }

    #[test]
    fn test_exactly_eighty_percent_is_good_job() {
        let insights = evaluate(1000.0, 800.0);
        assert_eq!(insights[0].tag, InsightTag::GoodJob);
        assert!(insights[0].render().ends_with("You have saved ₹200.00."));
    }

    #[test]
    fn test_sub_paise_noise_does_not_alert() {
        // 0.1 + 0.2 + 0.3 summed as floats lands just above 0.6
        let insights = evaluate(0.6, 0.1 + 0.2 + 0.3);
        assert_eq!(insights[0].tag, InsightTag::Warning);
    }

    #[test]
    fn test_equal_totals_is_warning_not_alert() {
        let insights = evaluate(500.0, 500.0);
        assert_eq!(insights[0].tag, InsightTag::Warning);
    }

    #[test]
    fn test_income_only_is_good_job() {
        let insights = evaluate(250.0, 0.0);
        assert_eq!(
            insights[0].render(),
            "✅ **Good Job**: You are living within your means. You have saved ₹250.00."
        );
    }

    #[test]
    fn test_no_activity_emits_nothing() {
        assert!(evaluate(0.0, 0.0).is_empty());
    }
}
