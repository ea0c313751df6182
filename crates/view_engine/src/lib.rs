//! Presentation transforms for the financials frontend.
//!
//! Everything here is a pure function over already-fetched backend data:
//! hierarchical statement tables, chart view models with growth rates,
//! metric selector preparation, and admin table sorting. No I/O.

pub mod admin_sort;
pub mod chart;
pub mod format;
pub mod selectors;
pub mod statement_table;

pub use admin_sort::{
    sort_concept_overrides, sort_dimension_overrides, ConceptSortColumn, DimensionSortColumn,
    SortDirection,
};
pub use chart::{build_chart_view, growth_rates, toggle_selection, ChartSeries, ChartView};
pub use selectors::{
    available_dimensions, build_selector_groups, parse_selector_value, DedupMode, SelectorEntry,
    SelectorGroup,
};
pub use statement_table::{
    build_statement_table, RowKind, StatementRow, StatementTableView, TrendDirection,
};
