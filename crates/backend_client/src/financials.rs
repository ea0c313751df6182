use models::{
    FinancialData, FinancialMetric, FinancialSeries, Granularity, StatementData, StatementMetric,
    StatementType,
};
use serde::Deserialize;

use crate::error::{check_status, Result};
use crate::BackendClient;

/// Wire envelope of the `/financials/` endpoint when queried for one metric;
/// the ticker/metric/granularity envelope is assembled client-side.
#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    series: Vec<FinancialSeries>,
}

/// Wire envelope of the `/financials/` endpoint when queried for a whole
/// statement (`short` form): every metric with its abstracts path.
#[derive(Debug, Deserialize)]
struct StatementResponse {
    #[serde(default)]
    metrics: Vec<StatementMetric>,
}

impl BackendClient {
    /// GET /financials/normalized-labels
    ///
    /// Lists the selectable metrics for a ticker. Rows the backend returns
    /// with a blank normalized label are dropped before display.
    pub async fn normalized_labels(
        &self,
        ticker: &str,
        granularity: Granularity,
    ) -> Result<Vec<FinancialMetric>> {
        let url = self.endpoint("financials/normalized-labels")?;
        let response = self
            .http()
            .get(url)
            .query(&[("ticker", ticker), ("granularity", granularity.as_str())])
            .send()
            .await?;

        let metrics: Vec<FinancialMetric> = check_status(response).await?.json().await?;
        Ok(filter_valid_metrics(metrics))
    }

    /// GET /financials/
    ///
    /// Time series for one normalized label, optionally broken down by an
    /// axis (one series per member) and narrowed to a statement.
    pub async fn financial_data(
        &self,
        ticker: &str,
        normalized_label: &str,
        granularity: Granularity,
        axis: Option<&str>,
        statement: Option<StatementType>,
    ) -> Result<FinancialData> {
        let url = self.endpoint("financials/")?;

        let mut query: Vec<(&str, String)> = vec![
            ("ticker", ticker.to_string()),
            ("granularity", granularity.as_str().to_string()),
            ("normalized_labels", normalized_label.to_string()),
        ];
        if let Some(axis) = axis {
            query.push(("axis", axis.to_string()));
        }
        if let Some(statement) = statement {
            query.push(("statement", statement.as_str().to_string()));
        }

        let response = self.http().get(url).query(&query).send().await?;
        let payload: SeriesResponse = check_status(response).await?.json().await?;

        let mut series = payload.series;
        for s in &mut series {
            s.data.sort_by_key(|p| p.date);
        }

        Ok(FinancialData {
            ticker: ticker.to_string(),
            metric: normalized_label.to_string(),
            granularity,
            series,
        })
    }

    /// GET /financials/ (short form)
    ///
    /// All metrics of one statement, each carrying its abstracts path, for
    /// the hierarchical statement table.
    pub async fn statement_data(
        &self,
        ticker: &str,
        statement: StatementType,
        granularity: Granularity,
    ) -> Result<StatementData> {
        let url = self.endpoint("financials/")?;
        let response = self
            .http()
            .get(url)
            .query(&[
                ("ticker", ticker),
                ("granularity", granularity.as_str()),
                ("statement", statement.as_str()),
                ("short", "true"),
            ])
            .send()
            .await?;

        let payload: StatementResponse = check_status(response).await?.json().await?;

        let mut metrics = payload.metrics;
        for m in &mut metrics {
            m.data.sort_by_key(|p| p.date);
        }

        Ok(StatementData {
            ticker: ticker.to_string(),
            statement,
            granularity,
            metrics,
        })
    }
}

/// Drops rows with a blank normalized label.
fn filter_valid_metrics(metrics: Vec<FinancialMetric>) -> Vec<FinancialMetric> {
    metrics
        .into_iter()
        .filter(|m| !m.normalized_label.trim().is_empty())
        .collect()
}
