use async_trait::async_trait;
use backend_client::{BackendClient, ClientError};
use models::{
    ConceptOverride, ConceptOverridePatch, DimensionOverride, DimensionOverridePatch,
    FinancialData, FinancialMetric, Granularity, ImportSummary, StatementData, StatementType,
};

pub type ProviderResult<T> = std::result::Result<T, ClientError>;

/// Data-access seam for the handlers.
/// This abstraction allows swapping the HTTP-backed implementation for a
/// canned one in tests.
#[async_trait]
pub trait FinancialsProvider: Send + Sync {
    async fn normalized_labels(
        &self,
        ticker: &str,
        granularity: Granularity,
    ) -> ProviderResult<Vec<FinancialMetric>>;

    async fn financial_data(
        &self,
        ticker: &str,
        normalized_label: &str,
        granularity: Granularity,
        axis: Option<&str>,
        statement: Option<StatementType>,
    ) -> ProviderResult<FinancialData>;

    async fn statement_data(
        &self,
        ticker: &str,
        statement: StatementType,
        granularity: Granularity,
    ) -> ProviderResult<StatementData>;

    async fn list_concept_overrides(
        &self,
        statement: Option<StatementType>,
    ) -> ProviderResult<Vec<ConceptOverride>>;
    async fn get_concept_override(
        &self,
        statement: StatementType,
        concept: &str,
    ) -> ProviderResult<ConceptOverride>;
    async fn create_concept_override(
        &self,
        row: &ConceptOverride,
    ) -> ProviderResult<ConceptOverride>;
    async fn update_concept_override(
        &self,
        statement: StatementType,
        concept: &str,
        patch: &ConceptOverridePatch,
    ) -> ProviderResult<ConceptOverride>;
    async fn delete_concept_override(
        &self,
        statement: StatementType,
        concept: &str,
    ) -> ProviderResult<()>;
    async fn export_concept_overrides(
        &self,
        statement: Option<StatementType>,
    ) -> ProviderResult<String>;
    async fn import_concept_overrides(
        &self,
        csv: Vec<u8>,
        filename: &str,
        update_existing: bool,
    ) -> ProviderResult<ImportSummary>;

    async fn list_dimension_overrides(&self) -> ProviderResult<Vec<DimensionOverride>>;
    async fn get_dimension_override(
        &self,
        axis: &str,
        member: &str,
        member_label: &str,
    ) -> ProviderResult<DimensionOverride>;
    async fn create_dimension_override(
        &self,
        row: &DimensionOverride,
    ) -> ProviderResult<DimensionOverride>;
    async fn update_dimension_override(
        &self,
        axis: &str,
        member: &str,
        member_label: &str,
        patch: &DimensionOverridePatch,
    ) -> ProviderResult<DimensionOverride>;
    async fn delete_dimension_override(
        &self,
        axis: &str,
        member: &str,
        member_label: &str,
    ) -> ProviderResult<()>;
    async fn export_dimension_overrides(&self) -> ProviderResult<String>;
    async fn import_dimension_overrides(
        &self,
        csv: Vec<u8>,
        filename: &str,
        update_existing: bool,
    ) -> ProviderResult<ImportSummary>;

    async fn refresh_financials(&self, concurrent: bool) -> ProviderResult<()>;
}

/// Production implementation backed by the HTTP client.
pub struct HttpFinancialsProvider {
    client: BackendClient,
}

impl HttpFinancialsProvider {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FinancialsProvider for HttpFinancialsProvider {
    async fn normalized_labels(
        &self,
        ticker: &str,
        granularity: Granularity,
    ) -> ProviderResult<Vec<FinancialMetric>> {
        self.client.normalized_labels(ticker, granularity).await
    }

    async fn financial_data(
        &self,
        ticker: &str,
        normalized_label: &str,
        granularity: Granularity,
        axis: Option<&str>,
        statement: Option<StatementType>,
    ) -> ProviderResult<FinancialData> {
        self.client
            .financial_data(ticker, normalized_label, granularity, axis, statement)
            .await
    }

    async fn statement_data(
        &self,
        ticker: &str,
        statement: StatementType,
        granularity: Granularity,
    ) -> ProviderResult<StatementData> {
        self.client
            .statement_data(ticker, statement, granularity)
            .await
    }

    async fn list_concept_overrides(
        &self,
        statement: Option<StatementType>,
    ) -> ProviderResult<Vec<ConceptOverride>> {
        self.client.list_concept_overrides(statement).await
    }

    async fn get_concept_override(
        &self,
        statement: StatementType,
        concept: &str,
    ) -> ProviderResult<ConceptOverride> {
        self.client.get_concept_override(statement, concept).await
    }

    async fn create_concept_override(
        &self,
        row: &ConceptOverride,
    ) -> ProviderResult<ConceptOverride> {
        self.client.create_concept_override(row).await
    }

    async fn update_concept_override(
        &self,
        statement: StatementType,
        concept: &str,
        patch: &ConceptOverridePatch,
    ) -> ProviderResult<ConceptOverride> {
        self.client
            .update_concept_override(statement, concept, patch)
            .await
    }

    async fn delete_concept_override(
        &self,
        statement: StatementType,
        concept: &str,
    ) -> ProviderResult<()> {
        self.client.delete_concept_override(statement, concept).await
    }

    async fn export_concept_overrides(
        &self,
        statement: Option<StatementType>,
    ) -> ProviderResult<String> {
        self.client.export_concept_overrides(statement).await
    }

    async fn import_concept_overrides(
        &self,
        csv: Vec<u8>,
        filename: &str,
        update_existing: bool,
    ) -> ProviderResult<ImportSummary> {
        self.client
            .import_concept_overrides(csv, filename, update_existing)
            .await
    }

    async fn list_dimension_overrides(&self) -> ProviderResult<Vec<DimensionOverride>> {
        self.client.list_dimension_overrides().await
    }

    async fn get_dimension_override(
        &self,
        axis: &str,
        member: &str,
        member_label: &str,
    ) -> ProviderResult<DimensionOverride> {
        self.client
            .get_dimension_override(axis, member, member_label)
            .await
    }

    async fn create_dimension_override(
        &self,
        row: &DimensionOverride,
    ) -> ProviderResult<DimensionOverride> {
        self.client.create_dimension_override(row).await
    }

    async fn update_dimension_override(
        &self,
        axis: &str,
        member: &str,
        member_label: &str,
        patch: &DimensionOverridePatch,
    ) -> ProviderResult<DimensionOverride> {
        self.client
            .update_dimension_override(axis, member, member_label, patch)
            .await
    }

    async fn delete_dimension_override(
        &self,
        axis: &str,
        member: &str,
        member_label: &str,
    ) -> ProviderResult<()> {
        self.client
            .delete_dimension_override(axis, member, member_label)
            .await
    }

    async fn export_dimension_overrides(&self) -> ProviderResult<String> {
        self.client.export_dimension_overrides().await
    }

    async fn import_dimension_overrides(
        &self,
        csv: Vec<u8>,
        filename: &str,
        update_existing: bool,
    ) -> ProviderResult<ImportSummary> {
        self.client
            .import_dimension_overrides(csv, filename, update_existing)
            .await
    }

    async fn refresh_financials(&self, concurrent: bool) -> ProviderResult<()> {
        self.client.refresh_financials(concurrent).await
    }
}
