use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use models::{Granularity, StatementData, StatementMetric, StatementType};
use serde::Serialize;

use crate::format::{format_column_date, format_table_value};

/// A rendered statement table: header rows for the accounting hierarchy's
/// abstracts, metric rows beneath them, values aligned to a shared set of
/// date columns sorted newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementTableView {
    pub ticker: String,
    pub statement: StatementType,
    pub granularity: Granularity,
    pub columns: Vec<NaiveDate>,
    pub column_labels: Vec<String>,
    pub rows: Vec<StatementRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Header,
    Metric,
}

/// Direction of the inline mini-trend beside a metric row: up when the
/// latest value is at or above the earliest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementCell {
    pub value: Option<f64>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRow {
    pub kind: RowKind,
    /// Indentation level; headers sit at their path depth minus one,
    /// metrics at their full path depth.
    pub depth: usize,
    pub label: String,
    /// Full abstract path for headers, the enclosing path for metrics.
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<String>,
    /// Set on headers the caller has collapsed; their descendants are
    /// omitted from `rows` entirely.
    pub collapsed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendDirection>,
    pub cells: Vec<StatementCell>,
}

/// Builds the hierarchical table for one statement.
///
/// Metrics are grouped into a tree keyed by their full abstracts path, so
/// each unique path contributes exactly one header row even when the same
/// label recurs at the same depth under different parents. The tree is then
/// flattened in first-encounter order: every header is immediately followed
/// by its own metrics and nested subheaders. Rows under a collapsed header
/// path are omitted; the collapsed header itself stays visible.
pub fn build_statement_table(
    data: &StatementData,
    collapsed: &HashSet<Vec<String>>,
) -> StatementTableView {
    let columns = column_dates(&data.metrics);
    let column_labels = columns.iter().map(|d| format_column_date(*d)).collect();

    let mut root = Node::default();
    for (idx, metric) in data.metrics.iter().enumerate() {
        root.insert(&metric.abstracts, idx);
    }

    let mut rows = Vec::new();
    let mut path = Vec::new();
    flatten(
        &root, &mut path, false, collapsed, &data.metrics, &columns, &mut rows,
    );

    StatementTableView {
        ticker: data.ticker.clone(),
        statement: data.statement,
        granularity: data.granularity,
        columns,
        column_labels,
        rows,
    }
}

/// Union of all metric dates, newest first.
fn column_dates(metrics: &[StatementMetric]) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = metrics
        .iter()
        .flat_map(|m| m.data.iter().map(|p| p.date))
        .collect();
    dates.into_iter().rev().collect()
}

/// One level of the abstracts hierarchy. Entries keep the interleaved
/// first-encounter order of metrics and subheaders.
#[derive(Default)]
struct Node {
    entries: Vec<Entry>,
}

enum Entry {
    Child(String, Node),
    Metric(usize),
}

impl Node {
    fn insert(&mut self, path: &[String], metric_idx: usize) {
        match path.split_first() {
            None => self.entries.push(Entry::Metric(metric_idx)),
            Some((head, rest)) => {
                let pos = self
                    .entries
                    .iter()
                    .position(|e| matches!(e, Entry::Child(name, _) if name == head));
                let pos = match pos {
                    Some(pos) => pos,
                    None => {
                        self.entries.push(Entry::Child(head.clone(), Node::default()));
                        self.entries.len() - 1
                    }
                };
                if let Entry::Child(_, child) = &mut self.entries[pos] {
                    child.insert(rest, metric_idx);
                }
            }
        }
    }
}

fn flatten(
    node: &Node,
    path: &mut Vec<String>,
    hidden: bool,
    collapsed: &HashSet<Vec<String>>,
    metrics: &[StatementMetric],
    columns: &[NaiveDate],
    rows: &mut Vec<StatementRow>,
) {
    let metrics_hidden = hidden || collapsed.contains(path.as_slice());

    for entry in &node.entries {
        match entry {
            Entry::Metric(idx) => {
                if !metrics_hidden {
                    rows.push(metric_row(&metrics[*idx], path, columns));
                }
            }
            Entry::Child(name, child) => {
                path.push(name.clone());
                let is_collapsed = collapsed.contains(path.as_slice());
                if !hidden {
                    rows.push(StatementRow {
                        kind: RowKind::Header,
                        depth: path.len() - 1,
                        label: name.clone(),
                        path: path.clone(),
                        axis: None,
                        collapsed: is_collapsed,
                        trend: None,
                        cells: vec![
                            StatementCell {
                                value: None,
                                text: "—".to_string(),
                            };
                            columns.len()
                        ],
                    });
                }
                flatten(
                    child, path, hidden || is_collapsed, collapsed, metrics, columns, rows,
                );
                path.pop();
            }
        }
    }
}

fn metric_row(metric: &StatementMetric, path: &[String], columns: &[NaiveDate]) -> StatementRow {
    let cells = columns
        .iter()
        .map(|date| {
            let value = metric
                .data
                .iter()
                .find(|p| p.date == *date)
                .map(|p| p.value);
            StatementCell {
                value,
                text: format_table_value(value.unwrap_or(0.0)),
            }
        })
        .collect();

    StatementRow {
        kind: RowKind::Metric,
        depth: path.len(),
        label: metric.normalized_label.clone(),
        path: path.to_vec(),
        axis: metric.axis.clone(),
        collapsed: false,
        trend: trend_direction(metric),
        cells,
    }
}

/// Compares the earliest and latest data points by date.
pub fn trend_direction(metric: &StatementMetric) -> Option<TrendDirection> {
    let first = metric.data.iter().min_by_key(|p| p.date)?;
    let last = metric.data.iter().max_by_key(|p| p.date)?;
    if last.value >= first.value {
        Some(TrendDirection::Up)
    } else {
        Some(TrendDirection::Down)
    }
}
