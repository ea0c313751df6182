use models::{FinancialMetric, StatementType};
use serde::{Deserialize, Serialize};

/// The two dashboards use different identities when deduplicating the
/// metric selector: the charts page keys on (label, statement), the
/// financials page on (label, axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    Statement,
    Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorEntry {
    pub normalized_label: String,
    pub statement: StatementType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<String>,
    pub count: u32,
    pub display_label: String,
    /// Stable value for the selector widget, encoded `label|axis` for
    /// dimensional metrics.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorGroup {
    pub statement: StatementType,
    pub entries: Vec<SelectorEntry>,
}

/// Prepares the metric selector: drops blank labels, deduplicates by the
/// requested identity keeping first occurrences, groups by statement in
/// canonical order, and sorts each group case-insensitively by label.
pub fn build_selector_groups(metrics: &[FinancialMetric], mode: DedupMode) -> Vec<SelectorGroup> {
    let mut seen: Vec<(String, Option<String>)> = Vec::new();
    let mut deduped: Vec<&FinancialMetric> = Vec::new();

    for metric in metrics {
        if metric.normalized_label.trim().is_empty() {
            continue;
        }
        let key = match mode {
            DedupMode::Statement => (
                metric.normalized_label.clone(),
                Some(metric.statement.as_str().to_string()),
            ),
            DedupMode::Axis => (metric.normalized_label.clone(), metric.axis.clone()),
        };
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        deduped.push(metric);
    }

    StatementType::ALL
        .iter()
        .filter_map(|statement| {
            let mut entries: Vec<SelectorEntry> = deduped
                .iter()
                .filter(|m| m.statement == *statement)
                .map(|m| selector_entry(m, mode))
                .collect();
            if entries.is_empty() {
                return None;
            }
            entries.sort_by(|a, b| {
                a.normalized_label
                    .to_lowercase()
                    .cmp(&b.normalized_label.to_lowercase())
            });
            Some(SelectorGroup {
                statement: *statement,
                entries,
            })
        })
        .collect()
}

fn selector_entry(metric: &FinancialMetric, mode: DedupMode) -> SelectorEntry {
    let dimensional = mode == DedupMode::Axis && metric.axis.is_some();

    let display_label = match (&metric.axis, dimensional) {
        (Some(axis), true) => format!("{} ({axis})", metric.normalized_label),
        _ => metric.normalized_label.clone(),
    };
    let value = match (&metric.axis, dimensional) {
        (Some(axis), true) => format!("{}|{axis}", metric.normalized_label),
        _ => metric.normalized_label.clone(),
    };

    SelectorEntry {
        normalized_label: metric.normalized_label.clone(),
        statement: metric.statement,
        axis: metric.axis.clone(),
        count: metric.count,
        display_label,
        value,
    }
}

/// Splits a selector value back into its label and optional axis.
pub fn parse_selector_value(value: &str) -> (String, Option<String>) {
    match value.split_once('|') {
        Some((label, axis)) => (label.to_string(), Some(axis.to_string())),
        None => (value.to_string(), None),
    }
}

/// Sorted unique axes among the metrics sharing the selected label and
/// statement; the dimension picker offers these.
pub fn available_dimensions(
    metrics: &[FinancialMetric],
    normalized_label: &str,
    statement: StatementType,
) -> Vec<String> {
    let mut axes: Vec<String> = metrics
        .iter()
        .filter(|m| m.normalized_label == normalized_label && m.statement == statement)
        .filter_map(|m| m.axis.clone())
        .filter(|a| !a.trim().is_empty())
        .collect();
    axes.sort();
    axes.dedup();
    axes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(label: &str, statement: StatementType, axis: Option<&str>) -> FinancialMetric {
        FinancialMetric {
            normalized_label: label.to_string(),
            statement,
            count: 4,
            axis: axis.map(|a| a.to_string()),
        }
    }

    #[test]
    fn statement_mode_collapses_axis_variants() {
        let metrics = vec![
            metric("Revenue", StatementType::IncomeStatement, None),
            metric("Revenue", StatementType::IncomeStatement, Some("Segment")),
            metric("Revenue", StatementType::ComprehensiveIncome, None),
        ];

        let groups = build_selector_groups(&metrics, DedupMode::Statement);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].statement, StatementType::IncomeStatement);
        assert_eq!(groups[0].entries.len(), 1);
        assert_eq!(groups[0].entries[0].value, "Revenue");
    }

    #[test]
    fn axis_mode_keeps_axis_variants_with_encoded_values() {
        let metrics = vec![
            metric("Revenue", StatementType::IncomeStatement, None),
            metric("Revenue", StatementType::IncomeStatement, Some("Segment")),
            metric("Revenue", StatementType::IncomeStatement, Some("Segment")),
        ];

        let groups = build_selector_groups(&metrics, DedupMode::Axis);
        let entries = &groups[0].entries;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "Revenue");
        assert_eq!(entries[1].value, "Revenue|Segment");
        assert_eq!(entries[1].display_label, "Revenue (Segment)");
    }

    #[test]
    fn groups_follow_canonical_statement_order_and_sort_labels() {
        let metrics = vec![
            metric("Total Assets", StatementType::BalanceSheet, None),
            metric("net income", StatementType::IncomeStatement, None),
            metric("Revenue", StatementType::IncomeStatement, None),
        ];

        let groups = build_selector_groups(&metrics, DedupMode::Statement);
        assert_eq!(groups[0].statement, StatementType::IncomeStatement);
        assert_eq!(groups[1].statement, StatementType::BalanceSheet);

        let labels: Vec<_> = groups[0]
            .entries
            .iter()
            .map(|e| e.normalized_label.as_str())
            .collect();
        // Case-insensitive ordering.
        assert_eq!(labels, vec!["net income", "Revenue"]);
    }

    #[test]
    fn blank_labels_are_skipped() {
        let metrics = vec![
            metric("  ", StatementType::IncomeStatement, None),
            metric("Revenue", StatementType::IncomeStatement, None),
        ];
        let groups = build_selector_groups(&metrics, DedupMode::Statement);
        assert_eq!(groups[0].entries.len(), 1);
    }

    #[test]
    fn selector_values_round_trip() {
        assert_eq!(parse_selector_value("Revenue"), ("Revenue".to_string(), None));
        assert_eq!(
            parse_selector_value("Revenue|Segment"),
            ("Revenue".to_string(), Some("Segment".to_string()))
        );
    }

    #[test]
    fn dimensions_are_sorted_and_unique() {
        let metrics = vec![
            metric("Revenue", StatementType::IncomeStatement, Some("Segment")),
            metric("Revenue", StatementType::IncomeStatement, Some("Geography")),
            metric("Revenue", StatementType::IncomeStatement, Some("Segment")),
            metric("Revenue", StatementType::BalanceSheet, Some("Other")),
            metric("Revenue", StatementType::IncomeStatement, None),
        ];

        assert_eq!(
            available_dimensions(&metrics, "Revenue", StatementType::IncomeStatement),
            vec!["Geography".to_string(), "Segment".to_string()]
        );
    }
}
