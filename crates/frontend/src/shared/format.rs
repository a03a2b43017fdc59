//! Display formatting for dates, amounts and percentages

use chrono::{DateTime, NaiveDate, Utc};

/// 2024-03-15 -> "15/03/2024"
pub fn format_day(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_optional_day(date: Option<NaiveDate>) -> String {
    date.map(format_day).unwrap_or_else(|| "-".to_string())
}

/// Timestamp in the user's reading order, minutes precision
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

/// Groups thousands with a space and keeps the given number of decimals
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, c) in integer_part.chars().enumerate() {
        if i > 0 && (integer_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match decimal_part {
        Some(d) => format!("{}{},{}", sign, grouped, d),
        None => format!("{}{}", sign, grouped),
    }
}

/// Amount in dinars
pub fn format_money(value: f64) -> String {
    format!("{} DA", format_number(value, 2))
}

pub fn format_percent(value: f64) -> String {
    format!("{} %", format_number(value, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_day(date), "05/03/2024");
        assert_eq!(format_optional_day(None), "-");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 10).unwrap();
        assert_eq!(format_timestamp(&ts), "31/12/2024 23:59");
    }

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(1234567.891, 2), "1 234 567,89");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1000.0, 0), "1 000");
        assert_eq!(format_number(-1234.5, 1), "-1 234,5");
        assert_eq!(format_number(0.0, 2), "0,00");
    }

    #[test]
    fn test_money_and_percent() {
        assert_eq!(format_money(2500000.0), "2 500 000,00 DA");
        assert_eq!(format_percent(87.26), "87,3 %");
    }
}
