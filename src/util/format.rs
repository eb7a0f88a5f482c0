//! Number formatting for the console report.

/// Credits with thousands separators: `1,234,567 Cr`.
pub fn credits(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = value.abs().round() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{grouped} Cr")
    } else {
        format!("{grouped} Cr")
    }
}

/// Minutes, switching to `Xh Ym` past the hour mark.
pub fn minutes(value: f64) -> String {
    if value < 60.0 {
        format!("{value:.1} min")
    } else {
        let whole = value as u64;
        format!("{}h {}m", whole / 60, whole % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_group_thousands() {
        assert_eq!(credits(0.0), "0 Cr");
        assert_eq!(credits(999.0), "999 Cr");
        assert_eq!(credits(1_000.0), "1,000 Cr");
        assert_eq!(credits(21_598_088.0), "21,598,088 Cr");
    }

    #[test]
    fn credits_round_and_keep_sign() {
        assert_eq!(credits(1_499.6), "1,500 Cr");
        assert_eq!(credits(-1_234.0), "-1,234 Cr");
    }

    #[test]
    fn minutes_switch_to_hours() {
        assert_eq!(minutes(22.6), "22.6 min");
        assert_eq!(minutes(59.94), "59.9 min");
        assert_eq!(minutes(83.2), "1h 23m");
    }
}
