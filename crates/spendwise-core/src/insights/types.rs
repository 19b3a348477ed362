//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency prefix used when rendering amounts
pub const CURRENCY_SYMBOL: &str = "₹";

/// Convert an amount to whole paise (hundredths), rounding half away from zero
pub fn to_paise(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Convert whole paise back to an amount
pub fn from_paise(paise: i64) -> f64 {
    paise as f64 / 100.0
}

/// Format an amount the way insight messages show it (two decimals)
pub fn format_amount(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}

/// Built-in rule families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Income vs expenses
    Balance,
    /// Top spending category and follow-up tip
    CategoryRanking,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Balance => "balance",
            RuleKind::CategoryRanking => "category_ranking",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The keyword every rendered insight leads with
///
/// Presentation layers key icons and colors off these labels, so the label
/// text is part of the output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightTag {
    Alert,
    Warning,
    GoodJob,
    Tip,
    TopSpendingCategory,
}

impl InsightTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightTag::Alert => "alert",
            InsightTag::Warning => "warning",
            InsightTag::GoodJob => "good_job",
            InsightTag::Tip => "tip",
            InsightTag::TopSpendingCategory => "top_spending_category",
        }
    }

    /// Human-readable keyword embedded in rendered strings
    pub fn label(&self) -> &'static str {
        match self {
            InsightTag::Alert => "Alert",
            InsightTag::Warning => "Warning",
            InsightTag::GoodJob => "Good Job",
            InsightTag::Tip => "Tip",
            InsightTag::TopSpendingCategory => "Top Spending Category",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            InsightTag::Alert | InsightTag::Warning => "⚠️",
            InsightTag::GoodJob => "✅",
            InsightTag::Tip => "💡",
            InsightTag::TopSpendingCategory => "📊",
        }
    }

    /// Default severity for insights carrying this tag
    pub fn severity(&self) -> Severity {
        match self {
            InsightTag::Alert => Severity::Alert,
            InsightTag::Warning => Severity::Warning,
            InsightTag::GoodJob => Severity::Success,
            InsightTag::Tip | InsightTag::TopSpendingCategory => Severity::Info,
        }
    }
}

impl fmt::Display for InsightTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for InsightTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alert" | "Alert" => Ok(InsightTag::Alert),
            "warning" | "Warning" => Ok(InsightTag::Warning),
            "good_job" | "Good Job" => Ok(InsightTag::GoodJob),
            "tip" | "Tip" => Ok(InsightTag::Tip),
            "top_spending_category" | "Top Spending Category" => {
                Ok(InsightTag::TopSpendingCategory)
            }
            _ => Err(format!("Unknown insight tag: {}", s)),
        }
    }
}

/// Severity level of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// Positive outcome worth reinforcing
    Success,
    /// Worth attention
    Warning,
    /// Requires immediate attention
    Alert,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Alert => "alert",
        }
    }

    /// Numeric priority (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Info => 1,
            Severity::Success => 2,
            Severity::Warning => 3,
            Severity::Alert => 4,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single observation produced by an insight rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Rule family that produced this insight
    pub rule: RuleKind,
    pub tag: InsightTag,
    pub severity: Severity,
    /// Plain-text body, without tag or markup
    pub message: String,
    /// Substrings of `message` a renderer should emphasize
    pub highlights: Vec<String>,
    /// Rule-specific structured data
    pub data: serde_json::Value,
}

impl Insight {
    /// Create an insight with the tag's default severity
    pub fn new(rule: RuleKind, tag: InsightTag, message: impl Into<String>) -> Self {
        Self {
            rule,
            tag,
            severity: tag.severity(),
            message: message.into(),
            highlights: Vec::new(),
            data: serde_json::Value::Null,
        }
    }

    pub fn with_highlight(mut self, text: impl Into<String>) -> Self {
        self.highlights.push(text.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Render as a "Tag: body" string with `**bold**` emphasis
    ///
    /// Output looks like `📊 **Top Spending Category**: You spent the most on **Food** (₹100.00).`
    pub fn render(&self) -> String {
        let mut body = self.message.clone();
        for highlight in &self.highlights {
            if highlight.is_empty() {
                continue;
            }
            body = body.replacen(highlight.as_str(), &format!("**{}**", highlight), 1);
        }
        format!("{} **{}**: {}", self.tag.emoji(), self.tag.label(), body)
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_two_decimals() {
        assert_eq!(format_amount(100.0), "₹100.00");
        assert_eq!(format_amount(49.5), "₹49.50");
        assert_eq!(format_amount(0.0), "₹0.00");
    }

    #[test]
    fn test_paise_conversion() {
        assert_eq!(to_paise(0.1), 10);
        assert_eq!(to_paise(19.999), 2000);
        assert_eq!(to_paise(0.1) + to_paise(0.2), to_paise(0.3));
        assert_eq!(from_paise(60), 0.6);
    }

    #[test]
    fn test_tag_labels() {
        assert_eq!(InsightTag::GoodJob.label(), "Good Job");
        assert_eq!(
            InsightTag::from_str("top_spending_category").unwrap(),
            InsightTag::TopSpendingCategory
        );
        assert_eq!(InsightTag::from_str("Good Job").unwrap(), InsightTag::GoodJob);
        assert!(InsightTag::from_str("Nope").is_err());
    }

    #[test]
    fn test_severity_priority() {
        assert!(Severity::Alert.priority() > Severity::Warning.priority());
        assert!(Severity::Warning.priority() > Severity::Success.priority());
        assert!(Severity::Success.priority() > Severity::Info.priority());
    }

    #[test]
    fn test_render_bolds_highlights() {
        let insight = Insight::new(
            RuleKind::CategoryRanking,
            InsightTag::TopSpendingCategory,
            "You spent the most on Rent (₹850.00).",
        )
        .with_highlight("Rent");

        assert_eq!(
            insight.render(),
            "📊 **Top Spending Category**: You spent the most on **Rent** (₹850.00)."
        );
        assert_eq!(insight.severity, Severity::Info);
    }

    #[test]
    fn test_render_without_highlights() {
        let insight = Insight::new(
            RuleKind::Balance,
            InsightTag::Warning,
            "You have spent over 80% of your income. Consider saving more.",
        );
        assert_eq!(
            insight.to_string(),
            "⚠️ **Warning**: You have spent over 80% of your income. Consider saving more."
        );
    }
}
