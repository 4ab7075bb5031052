use time::OffsetDateTime;

/// Philippine peso amount, e.g. `₱5,000,000` or `₱1,234.5`.
pub fn format_peso(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    match fraction {
        0 => format!("{sign}₱{whole}"),
        f if f % 10 == 0 => format!("{sign}₱{whole}.{}", f / 10),
        f => format!("{sign}₱{whole}.{f:02}"),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `December 15, 2025`
pub fn format_long_date(at: OffsetDateTime) -> String {
    format!("{} {}, {}", at.month(), at.day(), at.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn peso_amounts() {
        assert_eq!(format_peso(5_000_000.0), "₱5,000,000");
        assert_eq!(format_peso(800_000.0), "₱800,000");
        assert_eq!(format_peso(999.0), "₱999");
        assert_eq!(format_peso(1234.5), "₱1,234.5");
        assert_eq!(format_peso(1234.56), "₱1,234.56");
        assert_eq!(format_peso(1234.05), "₱1,234.05");
        assert_eq!(format_peso(-250.0), "-₱250");
        assert_eq!(format_peso(0.0), "₱0");
    }

    #[test]
    fn long_dates() {
        assert_eq!(format_long_date(datetime!(2025-12-15 00:00 UTC)), "December 15, 2025");
        assert_eq!(format_long_date(datetime!(2026-03-01 13:00 UTC)), "March 1, 2026");
    }
}
