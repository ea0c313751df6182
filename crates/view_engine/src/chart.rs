use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use models::{FinancialData, FinancialSeries, Granularity};
use serde::Serialize;

use crate::format::format_category_date;

/// Fixed palette assigned to series by their original order, so a series
/// keeps its color regardless of the current selection.
pub const SERIES_PALETTE: [&str; 10] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#06b6d4", "#84cc16", "#f97316",
    "#ec4899", "#6366f1",
];

/// Percentage growth values are clamped to this magnitude so one extreme
/// period cannot flatten the rest of the growth line.
const GROWTH_CAP: f64 = 1000.0;

/// Render-ready chart view model: bar series on a shared category axis plus
/// an optional period-over-period growth line on a secondary axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub title: String,
    pub description: String,
    pub granularity: Granularity,
    pub dates: Vec<NaiveDate>,
    pub categories: Vec<String>,
    /// Multi-series charts stack; a single series renders as plain bars.
    pub stacked: bool,
    pub series: Vec<ChartSeries>,
    /// Growth percentage per category, `None` where no comparison exists.
    pub growth: Vec<Option<f64>>,
    pub show_growth: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub color: String,
    /// Selection dims rather than hides: an unselected series stays in the
    /// chart at reduced opacity.
    pub dimmed: bool,
    pub values: Vec<Option<f64>>,
    /// Columns where this series is the topmost non-zero bar of the stack
    /// and should get rounded corners.
    pub rounded: Vec<bool>,
}

/// Assembles the chart view model. An empty `selected` slice means every
/// series is shown undimmed.
pub fn build_chart_view(
    data: &FinancialData,
    selected: &[String],
    show_growth: bool,
    title: &str,
    description: &str,
) -> ChartView {
    let dates = sorted_dates(&data.series);
    let categories = dates
        .iter()
        .map(|d| format_category_date(*d, data.granularity))
        .collect();

    let single = data.series.len() == 1;
    let has_selection = !selected.is_empty();

    let series: Vec<ChartSeries> = data
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let values: Vec<Option<f64>> = dates.iter().map(|d| value_at(s, *d)).collect();
            ChartSeries {
                name: s.name.clone(),
                color: SERIES_PALETTE[i % SERIES_PALETTE.len()].to_string(),
                dimmed: has_selection && !selected.contains(&s.name),
                values,
                rounded: Vec::new(),
            }
        })
        .collect();

    let series = mark_rounded(series, single);

    ChartView {
        title: title.to_string(),
        description: description.to_string(),
        granularity: data.granularity,
        growth: growth_rates(data, selected),
        categories,
        stacked: !single,
        series,
        dates,
        show_growth,
    }
}

/// Legend click behavior: clicking the selected series clears the selection
/// (show everything), clicking any other selects exactly that one.
pub fn toggle_selection(selected: &[String], clicked: &str) -> Vec<String> {
    if selected.iter().any(|s| s == clicked) {
        Vec::new()
    } else {
        vec![clicked.to_string()]
    }
}

/// Period-over-period growth of the visible series' total, aligned to the
/// ascending date axis.
///
/// Yearly data compares against the immediately preceding period. Quarterly
/// data compares year-over-year against the same fiscal quarter of the
/// previous calendar year, and yields `None` when the backend did not
/// report a fiscal quarter for either side.
pub fn growth_rates(data: &FinancialData, selected: &[String]) -> Vec<Option<f64>> {
    let dates = sorted_dates(&data.series);
    let visible: Vec<&FinancialSeries> = if selected.is_empty() {
        data.series.iter().collect()
    } else {
        data.series
            .iter()
            .filter(|s| selected.contains(&s.name))
            .collect()
    };

    dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let current = total_at(&visible, *date);
            let previous = match data.granularity {
                Granularity::Yearly => {
                    if i > 0 {
                        total_at(&visible, dates[i - 1])
                    } else {
                        0.0
                    }
                }
                Granularity::Quarterly => {
                    match matching_quarter(&visible, &dates[..i], *date) {
                        Some(prev_date) => total_at(&visible, prev_date),
                        None => 0.0,
                    }
                }
            };

            if current == 0.0 && previous == 0.0 {
                return None;
            }
            if previous == 0.0 {
                return None;
            }
            let growth = (current - previous) / previous.abs() * 100.0;
            Some(growth.clamp(-GROWTH_CAP, GROWTH_CAP))
        })
        .collect()
}

fn sorted_dates(series: &[FinancialSeries]) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = series
        .iter()
        .flat_map(|s| s.data.iter().map(|p| p.date))
        .collect();
    dates.into_iter().collect()
}

fn value_at(series: &FinancialSeries, date: NaiveDate) -> Option<f64> {
    series.data.iter().find(|p| p.date == date).map(|p| p.value)
}

fn total_at(visible: &[&FinancialSeries], date: NaiveDate) -> f64 {
    visible.iter().filter_map(|s| value_at(s, date)).sum()
}

/// Fiscal quarter of a date, read from the first visible series.
fn fiscal_quarter_at(visible: &[&FinancialSeries], date: NaiveDate) -> Option<u8> {
    visible
        .first()
        .and_then(|s| s.data.iter().find(|p| p.date == date))
        .and_then(|p| p.fiscal_quarter)
}

/// Finds the date in `earlier` carrying the same fiscal quarter one
/// calendar year before `date`.
fn matching_quarter(
    visible: &[&FinancialSeries],
    earlier: &[NaiveDate],
    date: NaiveDate,
) -> Option<NaiveDate> {
    let current_quarter = fiscal_quarter_at(visible, date)?;
    let previous_year = date.year() - 1;

    earlier.iter().copied().find(|candidate| {
        candidate.year() == previous_year
            && fiscal_quarter_at(visible, *candidate) == Some(current_quarter)
    })
}

/// Flags, per column, the topmost non-zero series of the stack. A single
/// series is always rounded.
fn mark_rounded(mut series: Vec<ChartSeries>, single: bool) -> Vec<ChartSeries> {
    let columns = series.first().map(|s| s.values.len()).unwrap_or(0);

    for s in &mut series {
        s.rounded = vec![single; columns];
    }
    if single {
        return series;
    }

    for col in 0..columns {
        let top = series
            .iter()
            .rposition(|s| matches!(s.values[col], Some(v) if v != 0.0));
        if let Some(top) = top {
            series[top].rounded[col] = true;
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::FinancialDataPoint;

    fn point(year: i32, month: u32, value: f64) -> FinancialDataPoint {
        FinancialDataPoint {
            date: NaiveDate::from_ymd_opt(year, month, 28).unwrap(),
            value,
            fiscal_quarter: None,
        }
    }

    fn quarter_point(year: i32, month: u32, value: f64, fq: u8) -> FinancialDataPoint {
        FinancialDataPoint {
            fiscal_quarter: Some(fq),
            ..point(year, month, value)
        }
    }

    fn series(name: &str, data: Vec<FinancialDataPoint>) -> FinancialSeries {
        FinancialSeries {
            name: name.to_string(),
            data,
        }
    }

    fn yearly(series_list: Vec<FinancialSeries>) -> FinancialData {
        FinancialData {
            ticker: "AAPL".to_string(),
            metric: "Revenue".to_string(),
            granularity: Granularity::Yearly,
            series: series_list,
        }
    }

    fn quarterly(series_list: Vec<FinancialSeries>) -> FinancialData {
        FinancialData {
            granularity: Granularity::Quarterly,
            ..yearly(series_list)
        }
    }

    #[test]
    fn yearly_growth_compares_with_previous_period() {
        let data = yearly(vec![series(
            "Total",
            vec![point(2021, 12, 100.0), point(2022, 12, 150.0), point(2023, 12, 120.0)],
        )]);

        let growth = growth_rates(&data, &[]);
        assert_eq!(growth[0], None);
        assert_eq!(growth[1], Some(50.0));
        assert_eq!(growth[2], Some(-20.0));
    }

    #[test]
    fn growth_is_capped_at_plus_minus_1000() {
        let data = yearly(vec![series(
            "Total",
            vec![point(2022, 12, 1.0), point(2023, 12, 1000.0)],
        )]);

        assert_eq!(growth_rates(&data, &[])[1], Some(1000.0));
    }

    #[test]
    fn negative_previous_uses_absolute_base() {
        let data = yearly(vec![series(
            "Total",
            vec![point(2022, 12, -100.0), point(2023, 12, -50.0)],
        )]);

        assert_eq!(growth_rates(&data, &[])[1], Some(50.0));
    }

    #[test]
    fn zero_totals_yield_no_growth() {
        let data = yearly(vec![series(
            "Total",
            vec![point(2021, 12, 0.0), point(2022, 12, 0.0), point(2023, 12, 5.0)],
        )]);

        let growth = growth_rates(&data, &[]);
        // Both zero, then previous zero with a non-zero current.
        assert_eq!(growth[1], None);
        assert_eq!(growth[2], None);
    }

    #[test]
    fn quarterly_growth_matches_same_fiscal_quarter_a_year_back() {
        let data = quarterly(vec![series(
            "Total",
            vec![
                quarter_point(2022, 3, 100.0, 1),
                quarter_point(2022, 6, 200.0, 2),
                quarter_point(2023, 3, 130.0, 1),
                quarter_point(2023, 6, 150.0, 2),
            ],
        )]);

        let growth = growth_rates(&data, &[]);
        assert_eq!(growth[0], None);
        assert_eq!(growth[1], None);
        assert_eq!(growth[2], Some(30.0)); // Q1 vs Q1
        assert_eq!(growth[3], Some(-25.0)); // Q2 vs Q2
    }

    #[test]
    fn quarterly_growth_needs_fiscal_quarters() {
        let data = quarterly(vec![series(
            "Total",
            vec![point(2022, 3, 100.0), point(2023, 3, 130.0)],
        )]);

        assert_eq!(growth_rates(&data, &[]), vec![None, None]);
    }

    #[test]
    fn selection_restricts_growth_to_visible_series() {
        let data = yearly(vec![
            series("US", vec![point(2022, 12, 100.0), point(2023, 12, 110.0)]),
            series("EU", vec![point(2022, 12, 100.0), point(2023, 12, 190.0)]),
        ]);

        let all = growth_rates(&data, &[]);
        assert_eq!(all[1], Some(50.0));

        let only_eu = growth_rates(&data, &["EU".to_string()]);
        assert_eq!(only_eu[1], Some(90.0));
    }

    #[test]
    fn selection_dims_without_reordering_or_recoloring() {
        let data = yearly(vec![
            series("US", vec![point(2023, 12, 1.0)]),
            series("EU", vec![point(2023, 12, 2.0)]),
        ]);

        let view = build_chart_view(&data, &["EU".to_string()], false, "Revenue", "");
        assert_eq!(view.series[0].name, "US");
        assert!(view.series[0].dimmed);
        assert_eq!(view.series[0].color, SERIES_PALETTE[0]);
        assert!(!view.series[1].dimmed);
        assert_eq!(view.series[1].color, SERIES_PALETTE[1]);

        let none_selected = build_chart_view(&data, &[], false, "Revenue", "");
        assert!(none_selected.series.iter().all(|s| !s.dimmed));
    }

    #[test]
    fn topmost_nonzero_series_gets_rounded_corners() {
        let data = yearly(vec![
            series("US", vec![point(2022, 12, 1.0), point(2023, 12, 1.0)]),
            series("EU", vec![point(2022, 12, 0.0), point(2023, 12, 2.0)]),
        ]);

        let view = build_chart_view(&data, &[], false, "Revenue", "");
        assert!(view.stacked);
        // 2022: EU is zero, US is the top of the stack. 2023: EU is on top.
        assert_eq!(view.series[0].rounded, vec![true, false]);
        assert_eq!(view.series[1].rounded, vec![false, true]);
    }

    #[test]
    fn single_series_is_always_rounded_and_unstacked() {
        let data = yearly(vec![series("Total", vec![point(2023, 12, 1.0)])]);
        let view = build_chart_view(&data, &[], false, "Revenue", "");
        assert!(!view.stacked);
        assert_eq!(view.series[0].rounded, vec![true]);
    }

    #[test]
    fn legend_click_toggles_between_solo_and_all() {
        assert_eq!(toggle_selection(&[], "US"), vec!["US".to_string()]);
        assert_eq!(
            toggle_selection(&["US".to_string()], "EU"),
            vec!["EU".to_string()]
        );
        assert!(toggle_selection(&["US".to_string()], "US").is_empty());
    }
}
