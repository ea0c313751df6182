use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Shared wire types mirrored from the financials backend. Everything here is
// ephemeral client-side view state; the backend owns persistence.

/// Reporting period resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Yearly,
    Quarterly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Yearly => "yearly",
            Granularity::Quarterly => "quarterly",
        }
    }

    /// Capitalized form for titles ("Yearly Data").
    pub fn title_case(&self) -> &'static str {
        match self {
            Granularity::Yearly => "Yearly",
            Granularity::Quarterly => "Quarterly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yearly" => Ok(Granularity::Yearly),
            "quarterly" => Ok(Granularity::Quarterly),
            other => Err(format!("unknown granularity: {other}")),
        }
    }
}

/// The five statement types the backend reports under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementType {
    #[serde(rename = "Income Statement")]
    IncomeStatement,
    #[serde(rename = "Balance Sheet")]
    BalanceSheet,
    #[serde(rename = "Cash Flow Statement")]
    CashFlowStatement,
    #[serde(rename = "Comprehensive Income")]
    ComprehensiveIncome,
    #[serde(rename = "Statement of Equity")]
    StatementOfEquity,
}

impl StatementType {
    /// Canonical display order for selectors and groupings.
    pub const ALL: [StatementType; 5] = [
        StatementType::IncomeStatement,
        StatementType::BalanceSheet,
        StatementType::CashFlowStatement,
        StatementType::ComprehensiveIncome,
        StatementType::StatementOfEquity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::IncomeStatement => "Income Statement",
            StatementType::BalanceSheet => "Balance Sheet",
            StatementType::CashFlowStatement => "Cash Flow Statement",
            StatementType::ComprehensiveIncome => "Comprehensive Income",
            StatementType::StatementOfEquity => "Statement of Equity",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatementType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown statement type: {s}"))
    }
}

// Financial data

/// One selectable series as listed by the normalized-labels endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetric {
    pub normalized_label: String,
    pub statement: StatementType,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialDataPoint {
    pub date: NaiveDate,
    pub value: f64,
    /// Fiscal quarter (1-4) when the backend knows it; used for
    /// year-over-year comparisons on quarterly data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_quarter: Option<u8>,
}

/// One plotted series; dimensional metrics yield one series per axis member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSeries {
    pub name: String,
    pub data: Vec<FinancialDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialData {
    pub ticker: String,
    pub metric: String,
    pub granularity: Granularity,
    pub series: Vec<FinancialSeries>,
}

/// One line item of a statement, with its position in the accounting
/// hierarchy given by the ordered `abstracts` path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementMetric {
    pub normalized_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<String>,
    #[serde(default)]
    pub abstracts: Vec<String>,
    pub data: Vec<FinancialDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementData {
    pub ticker: String,
    pub statement: StatementType,
    pub granularity: Granularity,
    pub metrics: Vec<StatementMetric>,
}

// Admin override tables

/// Concept normalization override, keyed by (statement, concept).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptOverride {
    pub concept: String,
    pub statement: StatementType,
    pub normalized_label: String,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_concept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_concept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The updatable subset of a concept override; the key comes from the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptOverridePatch {
    pub normalized_label: String,
    pub is_abstract: bool,
    pub parent_concept: Option<String>,
    pub abstract_concept: Option<String>,
    pub weight: Option<f64>,
    pub unit: Option<String>,
    pub description: Option<String>,
}

/// Dimension normalization override, keyed by (axis, member, member_label).
/// `member` and `member_label` may be the wildcard `"*"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionOverride {
    pub axis: String,
    pub member: String,
    pub member_label: String,
    pub normalized_axis_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_member_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionOverridePatch {
    pub normalized_axis_label: String,
    pub normalized_member_label: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Result of a CSV import, including per-row errors reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: u32,
    pub updated: u32,
    #[serde(default)]
    pub errors: Vec<ImportRowError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRowError {
    pub row: u32,
    pub message: String,
}

/// Body of the financials refresh trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub concurrent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_type_round_trips_display_names() {
        for stmt in StatementType::ALL {
            let json = serde_json::to_string(&stmt).unwrap();
            assert_eq!(json, format!("\"{}\"", stmt.as_str()));
            let back: StatementType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, stmt);
        }
    }

    #[test]
    fn statement_type_parses_case_insensitively() {
        assert_eq!(
            "balance sheet".parse::<StatementType>().unwrap(),
            StatementType::BalanceSheet
        );
        assert!("Profit Sheet".parse::<StatementType>().is_err());
    }

    #[test]
    fn granularity_uses_lowercase_wire_form() {
        assert_eq!(
            serde_json::to_string(&Granularity::Quarterly).unwrap(),
            "\"quarterly\""
        );
        assert_eq!("Yearly".parse::<Granularity>().unwrap(), Granularity::Yearly);
    }
}
