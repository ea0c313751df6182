use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use models::{ConceptOverride, DimensionOverride};
use serde::Deserialize;

/// Column sort for the admin override tables. String columns compare
/// case-insensitively; absent values sort last in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptSortColumn {
    Concept,
    Statement,
    NormalizedLabel,
    IsAbstract,
    ParentConcept,
    AbstractConcept,
    Weight,
    Unit,
    Description,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionSortColumn {
    Axis,
    Member,
    MemberLabel,
    NormalizedAxisLabel,
    NormalizedMemberLabel,
    Tags,
    UpdatedAt,
}

enum SortKey {
    Text(String),
    Number(f64),
    Time(DateTime<Utc>),
    Missing,
}

fn text(value: &str) -> SortKey {
    SortKey::Text(value.to_lowercase())
}

fn optional_text(value: &Option<String>) -> SortKey {
    match value {
        Some(v) if !v.trim().is_empty() => text(v),
        _ => SortKey::Missing,
    }
}

fn compare(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    use SortKey::*;

    match (a, b) {
        (Missing, Missing) => Ordering::Equal,
        (Missing, _) => Ordering::Greater,
        (_, Missing) => Ordering::Less,
        _ => {
            let ordering = match (a, b) {
                (Text(a), Text(b)) => a.cmp(b),
                (Number(a), Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
                (Time(a), Time(b)) => a.cmp(b),
                _ => Ordering::Equal,
            };
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

fn concept_key(row: &ConceptOverride, column: ConceptSortColumn) -> SortKey {
    match column {
        ConceptSortColumn::Concept => text(&row.concept),
        ConceptSortColumn::Statement => text(row.statement.as_str()),
        ConceptSortColumn::NormalizedLabel => text(&row.normalized_label),
        ConceptSortColumn::IsAbstract => SortKey::Number(if row.is_abstract { 1.0 } else { 0.0 }),
        ConceptSortColumn::ParentConcept => optional_text(&row.parent_concept),
        ConceptSortColumn::AbstractConcept => optional_text(&row.abstract_concept),
        ConceptSortColumn::Weight => row.weight.map(SortKey::Number).unwrap_or(SortKey::Missing),
        ConceptSortColumn::Unit => optional_text(&row.unit),
        ConceptSortColumn::Description => optional_text(&row.description),
        ConceptSortColumn::UpdatedAt => {
            row.updated_at.map(SortKey::Time).unwrap_or(SortKey::Missing)
        }
    }
}

fn dimension_key(row: &DimensionOverride, column: DimensionSortColumn) -> SortKey {
    match column {
        DimensionSortColumn::Axis => text(&row.axis),
        DimensionSortColumn::Member => text(&row.member),
        DimensionSortColumn::MemberLabel => text(&row.member_label),
        DimensionSortColumn::NormalizedAxisLabel => text(&row.normalized_axis_label),
        DimensionSortColumn::NormalizedMemberLabel => optional_text(&row.normalized_member_label),
        DimensionSortColumn::Tags => match &row.tags {
            Some(tags) if !tags.is_empty() => text(&tags.join(",")),
            _ => SortKey::Missing,
        },
        DimensionSortColumn::UpdatedAt => {
            row.updated_at.map(SortKey::Time).unwrap_or(SortKey::Missing)
        }
    }
}

/// Stable sort of concept override rows by one column.
pub fn sort_concept_overrides(
    rows: &mut [ConceptOverride],
    column: ConceptSortColumn,
    direction: SortDirection,
) {
    rows.sort_by(|a, b| compare(&concept_key(a, column), &concept_key(b, column), direction));
}

/// Stable sort of dimension override rows by one column.
pub fn sort_dimension_overrides(
    rows: &mut [DimensionOverride],
    column: DimensionSortColumn,
    direction: SortDirection,
) {
    rows.sort_by(|a, b| {
        compare(
            &dimension_key(a, column),
            &dimension_key(b, column),
            direction,
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use models::StatementType;

    fn concept(concept: &str, weight: Option<f64>) -> ConceptOverride {
        ConceptOverride {
            concept: concept.to_string(),
            statement: StatementType::IncomeStatement,
            normalized_label: "Revenue".to_string(),
            is_abstract: false,
            parent_concept: None,
            abstract_concept: None,
            weight,
            unit: None,
            description: None,
            updated_at: None,
        }
    }

    #[test]
    fn string_sort_ignores_case() {
        let mut rows = vec![
            concept("us-gaap:Zulu", None),
            concept("US-GAAP:alpha", None),
            concept("us-gaap:Mid", None),
        ];
        sort_concept_overrides(&mut rows, ConceptSortColumn::Concept, SortDirection::Asc);
        let order: Vec<_> = rows.iter().map(|r| r.concept.as_str()).collect();
        assert_eq!(order, vec!["US-GAAP:alpha", "us-gaap:Mid", "us-gaap:Zulu"]);
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let mut rows = vec![
            concept("a", None),
            concept("b", Some(1.0)),
            concept("c", Some(-1.0)),
        ];

        sort_concept_overrides(&mut rows, ConceptSortColumn::Weight, SortDirection::Asc);
        let asc: Vec<_> = rows.iter().map(|r| r.concept.as_str()).collect();
        assert_eq!(asc, vec!["c", "b", "a"]);

        sort_concept_overrides(&mut rows, ConceptSortColumn::Weight, SortDirection::Desc);
        let desc: Vec<_> = rows.iter().map(|r| r.concept.as_str()).collect();
        assert_eq!(desc, vec!["b", "c", "a"]);
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let stamp = |h| Utc.with_ymd_and_hms(2025, 6, 1, h, 0, 0).unwrap();
        let mut rows = vec![
            ConceptOverride {
                updated_at: Some(stamp(12)),
                ..concept("late", None)
            },
            ConceptOverride {
                updated_at: Some(stamp(8)),
                ..concept("early", None)
            },
            concept("never", None),
        ];

        sort_concept_overrides(&mut rows, ConceptSortColumn::UpdatedAt, SortDirection::Asc);
        let order: Vec<_> = rows.iter().map(|r| r.concept.as_str()).collect();
        assert_eq!(order, vec!["early", "late", "never"]);
    }

    #[test]
    fn dimension_rows_sort_by_axis() {
        let row = |axis: &str| DimensionOverride {
            axis: axis.to_string(),
            member: "*".to_string(),
            member_label: "*".to_string(),
            normalized_axis_label: "Segment".to_string(),
            normalized_member_label: None,
            tags: None,
            updated_at: None,
        };
        let mut rows = vec![row("srt:GeographyAxis"), row("us-gaap:SegmentAxis")];
        sort_dimension_overrides(&mut rows, DimensionSortColumn::Axis, SortDirection::Desc);
        assert_eq!(rows[0].axis, "us-gaap:SegmentAxis");
    }
}
