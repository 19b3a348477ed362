//! Insight Engine - runs the registered rules over one user's transactions

use std::collections::BTreeMap;

use crate::models::{Category, Transaction};

use super::types::{from_paise, to_paise, Insight, RuleKind};
use super::{BalanceRule, CategoryRule};

/// Message returned when there is nothing to analyze
pub const NO_DATA_MESSAGE: &str = "No data available to generate insights. Add some expenses!";

/// Aggregates computed once and shared by every rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub income_count: usize,
    pub expense_count: usize,
    /// Expense totals keyed by category
    pub expenses_by_category: BTreeMap<Category, f64>,
}

impl TransactionSummary {
    /// Partition and group in a single pass; input order is irrelevant
    ///
    /// Amounts are summed as whole paise so the totals do not depend on the
    /// order the transactions arrive in.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut income_paise = 0_i64;
        let mut expense_paise = 0_i64;
        let mut by_category: BTreeMap<Category, i64> = BTreeMap::new();
        let mut summary = Self::default();

        for tx in transactions {
            let paise = to_paise(tx.amount);
            if tx.is_expense() {
                expense_paise += paise;
                summary.expense_count += 1;
                *by_category.entry(tx.category).or_insert(0) += paise;
            } else {
                income_paise += paise;
                summary.income_count += 1;
            }
        }

        summary.total_income = from_paise(income_paise);
        summary.total_expenses = from_paise(expense_paise);
        summary.expenses_by_category = by_category
            .into_iter()
            .map(|(category, paise)| (category, from_paise(paise)))
            .collect();

        summary
    }

    /// Categories with positive spend, largest first
    ///
    /// Equal totals keep the fixed category order (Food before Transport, ...).
    pub fn ranked_categories(&self) -> Vec<(Category, f64)> {
        let mut ranked: Vec<(Category, f64)> = self
            .expenses_by_category
            .iter()
            .filter(|(_, amount)| **amount > 0.0)
            .map(|(category, amount)| (*category, *amount))
            .collect();

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.index().cmp(&b.0.index()))
        });

        ranked
    }

    /// Top spending category, if any expense has a positive amount
    pub fn top_category(&self) -> Option<(Category, f64)> {
        self.ranked_categories().into_iter().next()
    }
}

/// A rule that inspects the summary and emits zero or more insights
pub trait InsightRule: Send + Sync {
    /// Rule family identifier
    fn id(&self) -> RuleKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Produce insights, in the order they should be shown
    fn evaluate(&self, summary: &TransactionSummary) -> Vec<Insight>;
}

/// The main insight engine
///
/// Rules run in registration order and their output is concatenated, so
/// the built-in order yields [balance?], [top category?], [tip?].
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules
    pub fn new() -> Self {
        let mut engine = Self::empty();

        engine.register(Box::new(BalanceRule::new()));
        engine.register(Box::new(CategoryRule::new()));

        engine
    }

    /// Create an engine with no rules registered
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// Register a rule; it runs after every rule registered before it
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Run every rule and collect structured insights
    ///
    /// Empty input produces no insights.
    pub fn analyze(&self, transactions: &[Transaction]) -> Vec<Insight> {
        let summary = TransactionSummary::from_transactions(transactions);
        let mut insights = vec![];

        for rule in &self.rules {
            let produced = rule.evaluate(&summary);
            tracing::debug!(
                rule = rule.id().as_str(),
                count = produced.len(),
                "Insight rule evaluated"
            );
            insights.extend(produced);
        }

        insights
    }

    /// Run every rule and render the results as display strings
    ///
    /// Empty input yields the single no-data message. Non-empty input that
    /// triggers no rule yields an empty list.
    pub fn generate(&self, transactions: &[Transaction]) -> Vec<String> {
        if transactions.is_empty() {
            return vec![NO_DATA_MESSAGE.to_string()];
        }

        self.analyze(transactions)
            .iter()
            .map(|insight| insight.render())
            .collect()
    }

    /// Get list of registered rule kinds
    pub fn rule_kinds(&self) -> Vec<RuleKind> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

/// Generate insight strings with the built-in rules
pub fn generate_insights(transactions: &[Transaction]) -> Vec<String> {
    InsightEngine::new().generate(transactions)
}

/// Like [`generate_insights`], treating a missing collection as empty
pub fn generate_insights_opt(transactions: Option<&[Transaction]>) -> Vec<String> {
    generate_insights(transactions.unwrap_or(&[]))
}
