use chrono::NaiveDate;
use models::Granularity;

/// Formats a statement table cell. Zero renders as an em dash so sparse
/// statements stay readable; large magnitudes scale to K/M/B.
pub fn format_table_value(value: f64) -> String {
    if value == 0.0 {
        return "—".to_string();
    }

    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

/// Formats a money amount for chart tooltips and axes: sign, dollar sign,
/// T/B/M/K scaling with two decimals.
pub fn format_money(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs >= 1e12 {
        format!("{sign}${:.2}T", abs / 1e12)
    } else if abs >= 1e9 {
        format!("{sign}${:.2}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("{sign}${:.2}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("{sign}${:.2}K", abs / 1e3)
    } else {
        format!("{sign}${abs:.2}")
    }
}

/// Statement table column heading ("Mar 2024").
pub fn format_column_date(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Chart category label: year only for yearly data, month + year for
/// quarterly data.
pub fn format_category_date(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Yearly => date.format("%Y").to_string(),
        Granularity::Quarterly => date.format("%b %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_values_scale_by_magnitude() {
        assert_eq!(format_table_value(0.0), "—");
        assert_eq!(format_table_value(2_500_000_000.0), "2.5B");
        assert_eq!(format_table_value(-1_200_000.0), "-1.2M");
        assert_eq!(format_table_value(45_300.0), "45.3K");
        assert_eq!(format_table_value(512.4), "512");
    }

    #[test]
    fn money_keeps_sign_and_two_decimals() {
        assert_eq!(format_money(1_250_000_000_000.0), "$1.25T");
        assert_eq!(format_money(-3_400_000_000.0), "-$3.40B");
        assert_eq!(format_money(7_500_000.0), "$7.50M");
        assert_eq!(format_money(980.0), "$980.00");
        assert_eq!(format_money(-12.5), "-$12.50");
    }

    #[test]
    fn date_labels_follow_granularity() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(format_column_date(date), "Mar 2024");
        assert_eq!(format_category_date(date, Granularity::Yearly), "2024");
        assert_eq!(
            format_category_date(date, Granularity::Quarterly),
            "Mar 2024"
        );
    }
}
