use models::{
    ConceptOverride, ConceptOverridePatch, DimensionOverride, DimensionOverridePatch,
    StatementType,
};
use serde::Deserialize;

use crate::error::ApiError;

/// Staged concept override edit, as submitted by the admin form.
///
/// The form keeps weight/unit/parent editable only for non-abstract rows;
/// conversion enforces that here so a stale client cannot submit an
/// abstract row carrying value-only fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ConceptOverrideForm {
    pub concept: String,
    pub statement: StatementType,
    pub normalized_label: String,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub parent_concept: Option<String>,
    #[serde(default)]
    pub abstract_concept: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ConceptOverrideForm {
    pub fn into_override(self) -> Result<ConceptOverride, ApiError> {
        if self.concept.trim().is_empty() {
            return Err(ApiError::BadRequest("concept is required".to_string()));
        }
        if self.normalized_label.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "normalized_label is required".to_string(),
            ));
        }

        let (parent_concept, weight, unit) = if self.is_abstract {
            (None, None, None)
        } else {
            (
                non_blank(self.parent_concept),
                // Non-abstract rows default to a plain additive USD value.
                Some(self.weight.unwrap_or(1.0)),
                Some(
                    non_blank(self.unit).unwrap_or_else(|| "usd".to_string()),
                ),
            )
        };

        Ok(ConceptOverride {
            concept: self.concept.trim().to_string(),
            statement: self.statement,
            normalized_label: self.normalized_label.trim().to_string(),
            is_abstract: self.is_abstract,
            parent_concept,
            abstract_concept: non_blank(self.abstract_concept),
            weight,
            unit,
            description: non_blank(self.description),
            updated_at: None,
        })
    }
}

/// Staged concept override update; the (statement, concept) key comes from
/// the request path and cannot change.
#[derive(Debug, Clone, Deserialize)]
pub struct ConceptPatchForm {
    pub normalized_label: String,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub parent_concept: Option<String>,
    #[serde(default)]
    pub abstract_concept: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ConceptPatchForm {
    pub fn into_patch(self) -> Result<ConceptOverridePatch, ApiError> {
        if self.normalized_label.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "normalized_label is required".to_string(),
            ));
        }

        let (parent_concept, weight, unit) = if self.is_abstract {
            (None, None, None)
        } else {
            (
                non_blank(self.parent_concept),
                Some(self.weight.unwrap_or(1.0)),
                Some(
                    non_blank(self.unit).unwrap_or_else(|| "usd".to_string()),
                ),
            )
        };

        Ok(ConceptOverridePatch {
            normalized_label: self.normalized_label.trim().to_string(),
            is_abstract: self.is_abstract,
            parent_concept,
            abstract_concept: non_blank(self.abstract_concept),
            weight,
            unit,
            description: non_blank(self.description),
        })
    }
}

/// Staged dimension override edit. Blank member / member label mean "match
/// any" and are stored as the `"*"` wildcard; tags arrive as one
/// comma-separated string.
#[derive(Debug, Clone, Deserialize)]
pub struct DimensionOverrideForm {
    pub axis: String,
    #[serde(default)]
    pub member: Option<String>,
    #[serde(default)]
    pub member_label: Option<String>,
    pub normalized_axis_label: String,
    #[serde(default)]
    pub normalized_member_label: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl DimensionOverrideForm {
    pub fn into_override(self) -> Result<DimensionOverride, ApiError> {
        if self.axis.trim().is_empty() {
            return Err(ApiError::BadRequest("axis is required".to_string()));
        }
        if self.normalized_axis_label.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "normalized_axis_label is required".to_string(),
            ));
        }

        Ok(DimensionOverride {
            axis: self.axis.trim().to_string(),
            member: wildcard_or(self.member),
            member_label: wildcard_or(self.member_label),
            normalized_axis_label: self.normalized_axis_label.trim().to_string(),
            normalized_member_label: non_blank(self.normalized_member_label),
            tags: parse_tags(self.tags.as_deref()),
            updated_at: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DimensionPatchForm {
    pub normalized_axis_label: String,
    #[serde(default)]
    pub normalized_member_label: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl DimensionPatchForm {
    pub fn into_patch(self) -> Result<DimensionOverridePatch, ApiError> {
        if self.normalized_axis_label.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "normalized_axis_label is required".to_string(),
            ));
        }

        Ok(DimensionOverridePatch {
            normalized_axis_label: self.normalized_axis_label.trim().to_string(),
            normalized_member_label: non_blank(self.normalized_member_label),
            tags: parse_tags(self.tags.as_deref()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn wildcard_or(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| "*".to_string())
}

/// Comma-separated tags, trimmed and de-blanked; no tags at all becomes
/// `None` rather than an empty list.
fn parse_tags(raw: Option<&str>) -> Option<Vec<String>> {
    let tags: Vec<String> = raw?
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept_form() -> ConceptOverrideForm {
        ConceptOverrideForm {
            concept: "us-gaap:Revenues".to_string(),
            statement: StatementType::IncomeStatement,
            normalized_label: "Revenue".to_string(),
            is_abstract: false,
            parent_concept: None,
            abstract_concept: None,
            weight: None,
            unit: None,
            description: None,
        }
    }

    #[test]
    fn non_abstract_rows_default_weight_and_unit() {
        let row = concept_form().into_override().unwrap();
        assert_eq!(row.weight, Some(1.0));
        assert_eq!(row.unit.as_deref(), Some("usd"));
    }

    #[test]
    fn abstract_rows_drop_value_fields() {
        let mut form = concept_form();
        form.is_abstract = true;
        form.parent_concept = Some("us-gaap:OperatingExpenses".to_string());
        form.weight = Some(-1.0);
        form.unit = Some("usdPerShare".to_string());
        form.abstract_concept = Some("us-gaap:OperatingExpensesAbstract".to_string());

        let row = form.into_override().unwrap();
        assert!(row.is_abstract);
        assert_eq!(row.parent_concept, None);
        assert_eq!(row.weight, None);
        assert_eq!(row.unit, None);
        // The abstract reference itself survives.
        assert_eq!(
            row.abstract_concept.as_deref(),
            Some("us-gaap:OperatingExpensesAbstract")
        );
    }

    #[test]
    fn blank_concept_or_label_is_rejected() {
        let mut form = concept_form();
        form.concept = "  ".to_string();
        assert!(form.into_override().is_err());

        let mut form = concept_form();
        form.normalized_label = String::new();
        assert!(form.clone().into_override().is_err());
    }

    #[test]
    fn dimension_blanks_become_wildcards() {
        let form = DimensionOverrideForm {
            axis: "us-gaap:StatementBusinessSegmentsAxis".to_string(),
            member: Some("   ".to_string()),
            member_label: None,
            normalized_axis_label: "Segment".to_string(),
            normalized_member_label: Some(String::new()),
            tags: Some("core, , growth ".to_string()),
        };

        let row = form.into_override().unwrap();
        assert_eq!(row.member, "*");
        assert_eq!(row.member_label, "*");
        assert_eq!(row.normalized_member_label, None);
        assert_eq!(
            row.tags,
            Some(vec!["core".to_string(), "growth".to_string()])
        );
    }

    #[test]
    fn empty_tag_strings_become_none() {
        assert_eq!(parse_tags(None), None);
        assert_eq!(parse_tags(Some("")), None);
        assert_eq!(parse_tags(Some(" , ,")), None);
    }
}
