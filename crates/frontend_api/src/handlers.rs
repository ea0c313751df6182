use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use models::{Granularity, StatementType};
use serde::{Deserialize, Serialize};
use view_engine::{
    available_dimensions, build_chart_view, build_selector_groups, build_statement_table,
    parse_selector_value, ChartView, DedupMode, SelectorGroup, StatementTableView,
};

use crate::{error::ApiError, provider::FinancialsProvider, Result};

pub type ProviderState = Arc<dyn FinancialsProvider>;

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "stonks-ui",
    }))
}

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub granularity: Granularity,
    /// Selector identity: `statement` (charts page) or `axis`
    /// (financials page).
    #[serde(default = "default_dedup")]
    pub dedup: DedupMode,
}

fn default_dedup() -> DedupMode {
    DedupMode::Statement
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub ticker: String,
    pub granularity: Granularity,
    pub groups: Vec<SelectorGroup>,
}

/// GET /api/:ticker/metrics
/// Grouped, deduplicated metric selector entries for a ticker.
pub async fn get_metrics(
    State(provider): State<ProviderState>,
    Path(ticker): Path<String>,
    Query(query): Query<MetricsQuery>,
) -> Result<impl IntoResponse> {
    let metrics = provider.normalized_labels(&ticker, query.granularity).await?;
    let groups = build_selector_groups(&metrics, query.dedup);

    Ok(Json(MetricsResponse {
        ticker,
        granularity: query.granularity,
        groups,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Selector value, `label` or `label|axis`.
    pub metric: String,
    pub granularity: Granularity,
    #[serde(default)]
    pub axis: Option<String>,
    #[serde(default)]
    pub statement: Option<StatementType>,
    /// `|`-separated series names; empty means every series is shown.
    #[serde(default)]
    pub selected: Option<String>,
    #[serde(default)]
    pub growth: bool,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub ticker: String,
    pub chart: ChartView,
    /// Axes offered by the dimension picker for the selected metric.
    pub available_dimensions: Vec<String>,
}

/// GET /api/:ticker/chart
/// Chart view model for one metric, optionally broken down by an axis.
pub async fn get_chart(
    State(provider): State<ProviderState>,
    Path(ticker): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse> {
    let (label, embedded_axis) = parse_selector_value(&query.metric);
    let axis = query.axis.clone().or(embedded_axis);

    let data = provider
        .financial_data(
            &ticker,
            &label,
            query.granularity,
            axis.as_deref(),
            query.statement,
        )
        .await?;

    let selected = split_list(query.selected.as_deref());
    let title = match &axis {
        Some(axis) => format!("{label} ({axis})"),
        None => label.clone(),
    };
    let description = format!("{ticker} - {} Data", query.granularity.title_case());

    let chart = build_chart_view(&data, &selected, query.growth, &title, &description);

    // The dimension picker needs the full metric list; only the charts page
    // (which knows the statement) offers it.
    let available_dimensions = match query.statement {
        Some(statement) => {
            let metrics = provider.normalized_labels(&ticker, query.granularity).await?;
            available_dimensions(&metrics, &label, statement)
        }
        None => Vec::new(),
    };

    Ok(Json(ChartResponse {
        ticker,
        chart,
        available_dimensions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    pub granularity: Granularity,
    /// `|`-separated collapsed header paths, segments joined by `/`.
    #[serde(default)]
    pub collapsed: Option<String>,
}

/// GET /api/:ticker/statements/:statement
/// Hierarchical table for one statement.
pub async fn get_statement_table(
    State(provider): State<ProviderState>,
    Path((ticker, statement)): Path<(String, String)>,
    Query(query): Query<StatementQuery>,
) -> Result<Json<StatementTableView>> {
    let statement =
        StatementType::from_str(&statement).map_err(ApiError::BadRequest)?;

    let data = provider
        .statement_data(&ticker, statement, query.granularity)
        .await?;
    let collapsed = parse_collapsed(query.collapsed.as_deref());

    Ok(Json(build_statement_table(&data, &collapsed)))
}

/// Splits a `|`-separated list query parameter.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split('|')
        .map(str::to_string)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses the collapsed-paths parameter: paths separated by `|`, path
/// segments joined by `/`.
pub(crate) fn parse_collapsed(raw: Option<&str>) -> HashSet<Vec<String>> {
    raw.unwrap_or_default()
        .split('|')
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<String>>()
        })
        .filter(|p: &Vec<String>| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_paths_parse_into_segment_lists() {
        let parsed = parse_collapsed(Some("Assets/Current|Operating Expenses"));
        assert!(parsed.contains(&vec!["Assets".to_string(), "Current".to_string()]));
        assert!(parsed.contains(&vec!["Operating Expenses".to_string()]));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn empty_collapse_params_parse_to_nothing() {
        assert!(parse_collapsed(None).is_empty());
        assert!(parse_collapsed(Some("")).is_empty());
        assert!(parse_collapsed(Some("||")).is_empty());
    }

    #[test]
    fn selected_series_split_on_pipes() {
        assert_eq!(
            split_list(Some("US|Europe Segment")),
            vec!["US".to_string(), "Europe Segment".to_string()]
        );
        assert!(split_list(None).is_empty());
    }
}
