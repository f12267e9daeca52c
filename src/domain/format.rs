// en-US display formatting for dashboard figures
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// `$1,234.57`. Shows at least `min(2, max_fraction_digits)` fraction digits.
pub fn format_currency(value: f64, max_fraction_digits: usize) -> String {
    let body = format_unsigned(value.abs(), max_fraction_digits.min(2), max_fraction_digits);
    format!("{}${}", sign(value, &body), body)
}

/// `0.3519` → `35.19%`.
pub fn format_percentage(fraction: f64, max_fraction_digits: usize) -> String {
    let percent = fraction * 100.0;
    let body = format_unsigned(percent.abs(), 0, max_fraction_digits);
    format!("{}{}%", sign(percent, &body), body)
}

/// Thousands separators, up to three fraction digits.
pub fn format_number(value: f64) -> String {
    let body = format_unsigned(value.abs(), 0, 3);
    format!("{}{}", sign(value, &body), body)
}

/// `Jan 15, 2023`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn trend_symbol(value: f64) -> &'static str {
    if value > 0.0 {
        "↑"
    } else if value < 0.0 {
        "↓"
    } else {
        ""
    }
}

pub fn trend_class(value: f64) -> &'static str {
    if value > 0.0 {
        "trend-up"
    } else if value < 0.0 {
        "trend-down"
    } else {
        ""
    }
}

/// Relative change from `previous` to `current`. A zero baseline counts as
/// full growth when anything was gained.
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 1.0 } else { 0.0 };
    }
    (current - previous) / previous.abs()
}

fn sign(value: f64, body: &str) -> &'static str {
    // -0.001 rounds to "0" and keeps no sign
    if value < 0.0 && body.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    }
}

fn format_unsigned(value: f64, min_fraction_digits: usize, max_fraction_digits: usize) -> String {
    let scale = 10u64.pow(max_fraction_digits as u32);
    // f64::round sends ties away from zero, matching en-US number formatting
    let scaled = (value * scale as f64).round() as u64;
    let whole = (scaled / scale).to_formatted_string(&Locale::en);

    if max_fraction_digits == 0 {
        return whole;
    }
    let mut frac = format!("{:0width$}", scaled % scale, width = max_fraction_digits);
    while frac.len() > min_fraction_digits && frac.ends_with('0') {
        frac.pop();
    }

    if frac.is_empty() {
        whole
    } else {
        format!("{}.{}", whole, frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(350021.63, 2), "$350,021.63");
        assert_eq!(format_currency(350021.63, 0), "$350,022");
        assert_eq!(format_currency(4200259.56, 0), "$4,200,260");
        assert_eq!(format_currency(12.5, 2), "$12.50");
        assert_eq!(format_currency(-8000.0, 2), "-$8,000.00");
        assert_eq!(format_currency(999.999, 2), "$1,000.00");
        assert_eq!(format_currency(-0.001, 2), "$0.00");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_currency(2.5, 0), "$3");
        assert_eq!(format_currency(-2.5, 0), "-$3");
        assert_eq!(format_currency(0.125, 2), "$0.13");
        assert_eq!(format_currency(128762.5, 0), "$128,763");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_percentage(0.005, 0), "1%");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.3519, 2), "35.19%");
        assert_eq!(format_percentage(0.227, 2), "22.7%");
        assert_eq!(format_percentage(-0.0866, 2), "-8.66%");
        assert_eq!(format_percentage(0.17, 2), "17%");
        assert_eq!(format_percentage(0.0, 2), "0%");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(812.0), "812");
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(1234.5678), "1,234.568");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 5, 2023");
    }

    #[test]
    fn test_trend_helpers() {
        assert_eq!(trend_symbol(0.08), "↑");
        assert_eq!(trend_symbol(-0.03), "↓");
        assert_eq!(trend_symbol(0.0), "");
        assert_eq!(trend_class(0.08), "trend-up");
        assert_eq!(trend_class(-0.03), "trend-down");
        assert_eq!(trend_class(0.0), "");
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(percentage_change(150.0, 100.0), 0.5);
        assert_eq!(percentage_change(-50.0, -100.0), 0.5);
        assert_eq!(percentage_change(10.0, 0.0), 1.0);
        assert_eq!(percentage_change(0.0, 0.0), 0.0);
    }
}
