//! Naira amount formatting for letters and status cards.

use rust_decimal::{Decimal, RoundingStrategy};

const MAX_FRACTION_DIGITS: u32 = 3;

/// Format an amount with comma thousands separators.
///
/// At most three fraction digits are kept and trailing zeros are dropped:
/// `5000` → `"5,000"`, `1234567.50` → `"1,234,567.5"`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(dec!(5000)), "5,000");
        assert_eq!(format_amount(dec!(1234567)), "1,234,567");
        assert_eq!(format_amount(dec!(100000)), "100,000");
    }

    #[test]
    fn small_amounts_are_ungrouped() {
        assert_eq!(format_amount(dec!(0)), "0");
        assert_eq!(format_amount(dec!(999)), "999");
    }

    #[test]
    fn trailing_zeros_trimmed() {
        assert_eq!(format_amount(dec!(1234567.50)), "1,234,567.5");
        assert_eq!(format_amount(dec!(5000.00)), "5,000");
    }

    #[test]
    fn at_most_three_fraction_digits() {
        assert_eq!(format_amount(dec!(0.12345)), "0.123");
        assert_eq!(format_amount(dec!(2.0005)), "2.001");
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(format_amount(dec!(-2500)), "-2,500");
    }
}
