//! Category Ranking Insight
//!
//! Names the category with the highest expense total and, when that top
//! category is Food or Shopping above a threshold, follows with one tip.
//! Lower-ranked categories never produce a tip.

use crate::models::Category;

use super::engine::{InsightRule, TransactionSummary};
use super::types::{format_amount, Insight, InsightTag, RuleKind};

/// Food spend above this earns a cooking tip
pub const FOOD_TIP_THRESHOLD: f64 = 500.0;

/// Shopping spend above this earns a budgeting tip
pub const SHOPPING_TIP_THRESHOLD: f64 = 300.0;

/// Rule reporting the top spending category
pub struct CategoryRule;

impl CategoryRule {
    pub fn new() -> Self {
        Self
    }

    fn tip_for(category: Category, amount: f64) -> Option<&'static str> {
        match category {
            Category::Food if amount > FOOD_TIP_THRESHOLD => Some(
                "Your food expenses are quite high. Cooking at home more often could save you money.",
            ),
            Category::Shopping if amount > SHOPPING_TIP_THRESHOLD => {
                Some("Consider setting a budget for shopping to avoid impulse buys.")
            }
            _ => None,
        }
    }
}

impl Default for CategoryRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for CategoryRule {
    fn id(&self) -> RuleKind {
        RuleKind::CategoryRanking
    }

    fn name(&self) -> &'static str {
        "Top Spending Category"
    }

    fn evaluate(&self, summary: &TransactionSummary) -> Vec<Insight> {
        let Some((category, amount)) = summary.top_category() else {
            return vec![];
        };

        let data = serde_json::json!({
            "category": category.as_str(),
            "amount": amount,
        });

        let mut insights = vec![Insight::new(
            RuleKind::CategoryRanking,
            InsightTag::TopSpendingCategory,
            format!(
                "You spent the most on {} ({}).",
                category,
                format_amount(amount)
            ),
        )
        .with_highlight(category.as_str())
        .with_data(data.clone())];

        if let Some(tip) = Self::tip_for(category, amount) {
            insights.push(
                Insight::new(RuleKind::CategoryRanking, InsightTag::Tip, tip).with_data(data),
            );
        }

        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(totals: &[(Category, f64)]) -> Vec<Insight> {
        let summary = TransactionSummary {
            total_expenses: totals.iter().map(|(_, a)| a).sum(),
            expense_count: totals.len(),
            expenses_by_category: totals.iter().copied().collect(),
            ..Default::default()
        };
        CategoryRule::new().evaluate(&summary)
    }

    #[test]
    fn test_no_expenses_no_insight() {
        assert!(evaluate(&[]).is_empty());
    }

    #[test]
    fn test_top_category_named() {
        let insights = evaluate(&[(Category::Food, 120.0), (Category::Transport, 300.5)]);
        assert_eq!(insights.len(), 1);
        assert_eq!(
            insights[0].render(),
            "📊 **Top Spending Category**: You spent the most on **Transport** (₹300.50)."
        );
        assert_eq!(insights[0].highlights, vec!["Transport".to_string()]);
        assert_eq!(insights[0].data["category"], "Transport");
    }

    #[test]
    fn test_food_tip_above_threshold() {
        let insights = evaluate(&[(Category::Food, 600.0)]);
        assert_eq!(insights.len(), 2);
        assert_eq!(
            insights[1].render(),
            "💡 **Tip**: Your food expenses are quite high. Cooking at home more often could save you money."
        );
    }

    #[test]
    fn test_food_at_threshold_has_no_tip() {
        let insights = evaluate(&[(Category::Food, 500.0)]);
        assert_eq!(insights.len(), 1);
    }

    #[test]
    fn test_shopping_tip_above_threshold() {
        let insights = evaluate(&[(Category::Shopping, 300.01)]);
        assert_eq!(insights.len(), 2);
        assert_eq!(
            insights[1].render(),
            "💡 **Tip**: Consider setting a budget for shopping to avoid impulse buys."
        );
    }

    #[test]
    fn test_only_top_category_can_tip() {
        // Shopping exceeds its threshold but Rent is on top
        let insights = evaluate(&[(Category::Rent, 1200.0), (Category::Shopping, 900.0)]);
        assert_eq!(insights.len(), 1);
        assert!(insights.iter().all(|i| i.tag != InsightTag::Tip));
    }

    #[test]
    fn test_tie_prefers_earlier_category() {
        let insights = evaluate(&[(Category::Shopping, 700.0), (Category::Food, 700.0)]);
        assert!(insights[0].message.contains("Food"));
        // Food wins the tie and is over its threshold
        assert_eq!(insights.len(), 2);
        assert!(insights[1].message.contains("Cooking"));
    }
}
