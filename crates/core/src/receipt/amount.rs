//! Amount extraction strategies.
//!
//! Receipts print amounts in the Brazilian convention: `.` groups thousands
//! and `,` separates cents (`1.234,56`).

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

/// An optional label (`R$`, `VALOR`, `TOTAL`, `PAGO`) followed by an amount.
static AMOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:R\$|VALOR|TOTAL|PAGO)?\s?([0-9]{1,3}(?:\.[0-9]{3})*,[0-9]{2})")
        .expect("amount pattern is a valid regex")
});

/// Amounts must stay below this to fit the `NUMERIC(19, 4)` record column.
/// Equal to 10^15 (low word `0xA4C6_8000`, middle word `0x0003_8D7E`, scale 0).
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Picks the paid amount out of receipt text.
pub trait AmountStrategy: Send + Sync + std::fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Returns the amount, or `None` when the text holds none.
    ///
    /// `text` has its line breaks replaced by spaces.
    fn extract(&self, text: &str) -> Option<Decimal>;
}

/// Takes the first amount that appears in the text.
///
/// Receipts that print a fee or a balance before the paid total yield the
/// wrong figure.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatch;

impl AmountStrategy for FirstMatch {
    fn name(&self) -> &'static str {
        "first_match"
    }

    fn extract(&self, text: &str) -> Option<Decimal> {
        AMOUNT_PATTERN
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_brl(m.as_str()))
    }
}

/// Parses `1.234,56` into `1234.56`.
///
/// Amounts at or above `AMOUNT_LIMIT` are treated as unreadable.
#[must_use]
pub fn parse_brl(amount: &str) -> Option<Decimal> {
    let normalized = amount.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized)
        .ok()
        .filter(|value| *value < AMOUNT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("R$ 1.234,56", dec!(1234.56))]
    #[case("VALOR: 50,00", dec!(50.00))]
    #[case("valor pago 1.200,00", dec!(1200.00))]
    #[case("TOTAL R$12,34", dec!(12.34))]
    #[case("Pix enviado 7,50 em 18/10", dec!(7.50))]
    #[case("R$ 1.000.000,01", dec!(1000000.01))]
    fn test_first_match_reads_amount(#[case] text: &str, #[case] expected: Decimal) {
        assert_eq!(FirstMatch.extract(text), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("Comprovante de transferência")]
    #[case("R$ 100")]
    #[case("R$ 100.00")]
    #[case("Data 18/10/2026 12:30")]
    fn test_first_match_without_amount(#[case] text: &str) {
        assert_eq!(FirstMatch.extract(text), None);
    }

    #[test]
    fn test_first_match_keeps_first_amount() {
        let text = "Taxa R$ 5,00 Tarifa isenta Total R$ 100,00";
        assert_eq!(FirstMatch.extract(text), Some(dec!(5.00)));
    }

    #[test]
    fn test_unseparated_thousands_match_trailing_digits() {
        // Only up to three digits may precede the comma without a separator.
        assert_eq!(FirstMatch.extract("1234,56"), Some(dec!(234.56)));
    }

    #[test]
    fn test_parse_brl() {
        assert_eq!(parse_brl("1.234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_brl("0,00"), Some(Decimal::ZERO));
        assert_eq!(parse_brl("abc"), None);
    }

    #[test]
    fn test_amount_limit_is_ten_to_the_fifteenth() {
        assert_eq!(AMOUNT_LIMIT, dec!(1_000_000_000_000_000));
    }

    #[test]
    fn test_amount_beyond_column_capacity_is_unreadable() {
        assert_eq!(
            FirstMatch.extract("R$ 999.999.999.999.999,99"),
            Some(dec!(999999999999999.99))
        );
        assert_eq!(FirstMatch.extract("R$ 1.000.000.000.000.000,00"), None);
        assert_eq!(parse_brl("12.345.678.901.234.567,00"), None);
    }

    proptest! {
        #[test]
        fn prop_formatted_amounts_round_trip(reais in 0u64..1_000_000_000, cents in 0u64..100) {
            let formatted = format_brl(reais, cents);
            let expected = Decimal::from(reais) + Decimal::new(i64::try_from(cents).unwrap(), 2);

            prop_assert_eq!(FirstMatch.extract(&format!("Valor R$ {formatted}")), Some(expected));
        }
    }

    fn format_brl(reais: u64, cents: u64) -> String {
        let digits = reais.to_string();
        let mut grouped = String::new();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        format!("{grouped},{cents:02}")
    }
}
