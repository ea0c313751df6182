use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use models::{RefreshRequest, StatementType};
use serde::Deserialize;
use std::str::FromStr;
use view_engine::{
    sort_concept_overrides, sort_dimension_overrides, ConceptSortColumn, DimensionSortColumn,
    SortDirection,
};

use crate::forms::{
    ConceptOverrideForm, ConceptPatchForm, DimensionOverrideForm, DimensionPatchForm,
};
use crate::handlers::ProviderState;
use crate::{error::ApiError, Result};

fn default_direction() -> SortDirection {
    SortDirection::Asc
}

#[derive(Debug, Deserialize)]
pub struct ListConceptQuery {
    #[serde(default)]
    pub statement: Option<StatementType>,
    #[serde(default)]
    pub sort: Option<ConceptSortColumn>,
    #[serde(default = "default_direction")]
    pub direction: SortDirection,
}

/// GET /admin/api/concept-normalization-overrides
pub async fn list_concept_overrides(
    State(provider): State<ProviderState>,
    Query(query): Query<ListConceptQuery>,
) -> Result<impl IntoResponse> {
    let mut rows = provider.list_concept_overrides(query.statement).await?;
    if let Some(column) = query.sort {
        sort_concept_overrides(&mut rows, column, query.direction);
    }
    Ok(Json(rows))
}

/// GET /admin/api/concept-normalization-overrides/:statement/:concept
pub async fn get_concept_override(
    State(provider): State<ProviderState>,
    Path((statement, concept)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let statement = StatementType::from_str(&statement).map_err(ApiError::BadRequest)?;
    let row = provider.get_concept_override(statement, &concept).await?;
    Ok(Json(row))
}

/// POST /admin/api/concept-normalization-overrides
pub async fn create_concept_override(
    State(provider): State<ProviderState>,
    Json(form): Json<ConceptOverrideForm>,
) -> Result<impl IntoResponse> {
    let row = form.into_override()?;
    let created = provider.create_concept_override(&row).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /admin/api/concept-normalization-overrides/:statement/:concept
/// The path names the immutable key; the body carries the staged edit.
pub async fn update_concept_override(
    State(provider): State<ProviderState>,
    Path((statement, concept)): Path<(String, String)>,
    Json(form): Json<ConceptPatchForm>,
) -> Result<impl IntoResponse> {
    let statement = StatementType::from_str(&statement).map_err(ApiError::BadRequest)?;
    let patch = form.into_patch()?;
    let updated = provider
        .update_concept_override(statement, &concept, &patch)
        .await?;
    Ok(Json(updated))
}

/// DELETE /admin/api/concept-normalization-overrides/:statement/:concept
pub async fn delete_concept_override(
    State(provider): State<ProviderState>,
    Path((statement, concept)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let statement = StatementType::from_str(&statement).map_err(ApiError::BadRequest)?;
    provider.delete_concept_override(statement, &concept).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ExportConceptQuery {
    #[serde(default)]
    pub statement: Option<StatementType>,
}

/// GET /admin/api/concept-normalization-overrides/export
pub async fn export_concept_overrides(
    State(provider): State<ProviderState>,
    Query(query): Query<ExportConceptQuery>,
) -> Result<impl IntoResponse> {
    let csv = provider.export_concept_overrides(query.statement).await?;
    Ok(csv_attachment(concept_export_filename(query.statement), csv))
}

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub update_existing: bool,
}

/// POST /admin/api/concept-normalization-overrides/import
/// Multipart CSV upload; the summary carries the backend's per-row errors.
pub async fn import_concept_overrides(
    State(provider): State<ProviderState>,
    Query(query): Query<ImportQuery>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (csv, filename) = read_csv_field(multipart).await?;
    let summary = provider
        .import_concept_overrides(csv, &filename, query.update_existing)
        .await?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
pub struct ListDimensionQuery {
    #[serde(default)]
    pub sort: Option<DimensionSortColumn>,
    #[serde(default = "default_direction")]
    pub direction: SortDirection,
}

/// GET /admin/api/dimension-normalization-overrides
pub async fn list_dimension_overrides(
    State(provider): State<ProviderState>,
    Query(query): Query<ListDimensionQuery>,
) -> Result<impl IntoResponse> {
    let mut rows = provider.list_dimension_overrides().await?;
    if let Some(column) = query.sort {
        sort_dimension_overrides(&mut rows, column, query.direction);
    }
    Ok(Json(rows))
}

/// GET /admin/api/dimension-normalization-overrides/:axis/:member/:member_label
pub async fn get_dimension_override(
    State(provider): State<ProviderState>,
    Path((axis, member, member_label)): Path<(String, String, String)>,
) -> Result<impl IntoResponse> {
    let row = provider
        .get_dimension_override(&axis, &member, &member_label)
        .await?;
    Ok(Json(row))
}

/// POST /admin/api/dimension-normalization-overrides
pub async fn create_dimension_override(
    State(provider): State<ProviderState>,
    Json(form): Json<DimensionOverrideForm>,
) -> Result<impl IntoResponse> {
    let row = form.into_override()?;
    let created = provider.create_dimension_override(&row).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /admin/api/dimension-normalization-overrides/:axis/:member/:member_label
pub async fn update_dimension_override(
    State(provider): State<ProviderState>,
    Path((axis, member, member_label)): Path<(String, String, String)>,
    Json(form): Json<DimensionPatchForm>,
) -> Result<impl IntoResponse> {
    let patch = form.into_patch()?;
    let updated = provider
        .update_dimension_override(&axis, &member, &member_label, &patch)
        .await?;
    Ok(Json(updated))
}

/// DELETE /admin/api/dimension-normalization-overrides/:axis/:member/:member_label
pub async fn delete_dimension_override(
    State(provider): State<ProviderState>,
    Path((axis, member, member_label)): Path<(String, String, String)>,
) -> Result<impl IntoResponse> {
    provider
        .delete_dimension_override(&axis, &member, &member_label)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/api/dimension-normalization-overrides/export
pub async fn export_dimension_overrides(
    State(provider): State<ProviderState>,
) -> Result<impl IntoResponse> {
    let csv = provider.export_dimension_overrides().await?;
    Ok(csv_attachment(
        "dimension-normalization-overrides.csv".to_string(),
        csv,
    ))
}

/// POST /admin/api/dimension-normalization-overrides/import
pub async fn import_dimension_overrides(
    State(provider): State<ProviderState>,
    Query(query): Query<ImportQuery>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (csv, filename) = read_csv_field(multipart).await?;
    let summary = provider
        .import_dimension_overrides(csv, &filename, query.update_existing)
        .await?;
    Ok(Json(summary))
}

/// POST /admin/api/financials/refresh
pub async fn refresh_financials(
    State(provider): State<ProviderState>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse> {
    provider.refresh_financials(request.concurrent).await?;

    let mode = if request.concurrent {
        "concurrent"
    } else {
        "synchronous"
    };
    Ok(Json(serde_json::json!({
        "status": "success",
        "message": format!("Financials refreshed successfully ({mode} mode)"),
    })))
}

fn concept_export_filename(statement: Option<StatementType>) -> String {
    match statement {
        Some(statement) => format!(
            "concept-normalization-overrides-{}.csv",
            statement.as_str().replace(' ', "-")
        ),
        None => "concept-normalization-overrides.csv".to_string(),
    }
}

fn csv_attachment(filename: String, csv: String) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "text/csv".parse().unwrap());
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{filename}\"").parse().unwrap(),
    );
    (StatusCode::OK, headers, csv)
}

/// Pulls the uploaded CSV out of the multipart body.
async fn read_csv_field(mut multipart: Multipart) -> Result<(Vec<u8>, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("import.csv").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("unreadable file field: {e}")))?;
            return Ok((bytes.to_vec(), filename));
        }
    }
    Err(ApiError::BadRequest(
        "multipart body is missing a 'file' field".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_filename_embeds_the_statement_filter() {
        assert_eq!(
            concept_export_filename(None),
            "concept-normalization-overrides.csv"
        );
        assert_eq!(
            concept_export_filename(Some(StatementType::CashFlowStatement)),
            "concept-normalization-overrides-Cash-Flow-Statement.csv"
        );
    }
}
