use models::{
    ConceptOverride, ConceptOverridePatch, DimensionOverride, DimensionOverridePatch,
    ImportSummary, RefreshRequest, StatementType,
};
use reqwest::multipart::{Form, Part};

use crate::error::{check_status, Result};
use crate::BackendClient;

const CONCEPT_PATH: &str = "admin/concept-normalization-overrides";
const DIMENSION_PATH: &str = "admin/dimension-normalization-overrides";

// Concept normalization overrides, keyed by (statement, concept).
impl BackendClient {
    pub async fn list_concept_overrides(
        &self,
        statement: Option<StatementType>,
    ) -> Result<Vec<ConceptOverride>> {
        let url = self.endpoint(CONCEPT_PATH)?;
        let mut request = self.http().get(url);
        if let Some(statement) = statement {
            request = request.query(&[("statement", statement.as_str())]);
        }
        let response = request.send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn get_concept_override(
        &self,
        statement: StatementType,
        concept: &str,
    ) -> Result<ConceptOverride> {
        let url = self.keyed_endpoint(CONCEPT_PATH, &[statement.as_str(), concept])?;
        let response = self.http().get(url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn create_concept_override(
        &self,
        override_row: &ConceptOverride,
    ) -> Result<ConceptOverride> {
        let url = self.endpoint(CONCEPT_PATH)?;
        let response = self.http().post(url).json(override_row).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn update_concept_override(
        &self,
        statement: StatementType,
        concept: &str,
        patch: &ConceptOverridePatch,
    ) -> Result<ConceptOverride> {
        let url = self.keyed_endpoint(CONCEPT_PATH, &[statement.as_str(), concept])?;
        let response = self.http().put(url).json(patch).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn delete_concept_override(
        &self,
        statement: StatementType,
        concept: &str,
    ) -> Result<()> {
        let url = self.keyed_endpoint(CONCEPT_PATH, &[statement.as_str(), concept])?;
        let response = self.http().delete(url).send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// GET …/export: CSV text, optionally narrowed to one statement.
    pub async fn export_concept_overrides(
        &self,
        statement: Option<StatementType>,
    ) -> Result<String> {
        let url = self.endpoint(&format!("{CONCEPT_PATH}/export"))?;
        let mut request = self.http().get(url);
        if let Some(statement) = statement {
            request = request.query(&[("statement", statement.as_str())]);
        }
        let response = request.send().await?;
        Ok(check_status(response).await?.text().await?)
    }

    /// POST …/import: multipart CSV upload. Per-row errors come back in
    /// the summary rather than failing the request.
    pub async fn import_concept_overrides(
        &self,
        csv: Vec<u8>,
        filename: &str,
        update_existing: bool,
    ) -> Result<ImportSummary> {
        let url = self.endpoint(&format!("{CONCEPT_PATH}/import"))?;
        let form = Form::new().part(
            "file",
            Part::bytes(csv)
                .file_name(filename.to_string())
                .mime_str("text/csv")?,
        );
        let response = self
            .http()
            .post(url)
            .query(&[("update_existing", update_existing.to_string())])
            .multipart(form)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}

// Dimension normalization overrides, keyed by (axis, member, member_label);
// member and member_label may be the "*" wildcard.
impl BackendClient {
    pub async fn list_dimension_overrides(&self) -> Result<Vec<DimensionOverride>> {
        let url = self.endpoint(DIMENSION_PATH)?;
        let response = self.http().get(url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn get_dimension_override(
        &self,
        axis: &str,
        member: &str,
        member_label: &str,
    ) -> Result<DimensionOverride> {
        let url = self.keyed_endpoint(DIMENSION_PATH, &[axis, member, member_label])?;
        let response = self.http().get(url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn create_dimension_override(
        &self,
        override_row: &DimensionOverride,
    ) -> Result<DimensionOverride> {
        let url = self.endpoint(DIMENSION_PATH)?;
        let response = self.http().post(url).json(override_row).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn update_dimension_override(
        &self,
        axis: &str,
        member: &str,
        member_label: &str,
        patch: &DimensionOverridePatch,
    ) -> Result<DimensionOverride> {
        let url = self.keyed_endpoint(DIMENSION_PATH, &[axis, member, member_label])?;
        let response = self.http().put(url).json(patch).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn delete_dimension_override(
        &self,
        axis: &str,
        member: &str,
        member_label: &str,
    ) -> Result<()> {
        let url = self.keyed_endpoint(DIMENSION_PATH, &[axis, member, member_label])?;
        let response = self.http().delete(url).send().await?;
        check_status(response).await?;
        Ok(())
    }

    pub async fn export_dimension_overrides(&self) -> Result<String> {
        let url = self.endpoint(&format!("{DIMENSION_PATH}/export"))?;
        let response = self.http().get(url).send().await?;
        Ok(check_status(response).await?.text().await?)
    }

    pub async fn import_dimension_overrides(
        &self,
        csv: Vec<u8>,
        filename: &str,
        update_existing: bool,
    ) -> Result<ImportSummary> {
        let url = self.endpoint(&format!("{DIMENSION_PATH}/import"))?;
        let form = Form::new().part(
            "file",
            Part::bytes(csv)
                .file_name(filename.to_string())
                .mime_str("text/csv")?,
        );
        let response = self
            .http()
            .post(url)
            .query(&[("update_existing", update_existing.to_string())])
            .multipart(form)
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}

impl BackendClient {
    /// POST /admin/financials/refresh
    pub async fn refresh_financials(&self, concurrent: bool) -> Result<()> {
        let url = self.endpoint("admin/financials/refresh")?;
        let response = self
            .http()
            .post(url)
            .json(&RefreshRequest { concurrent })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
