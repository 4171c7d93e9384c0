use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};

/// Standard number decimal places for the given currency
/// (ex. JPY = 0, BRL = 2).
fn decimal_places(currency: Currency) -> usize {
    currency.exponent().unwrap_or(0) as usize
}

/// Formats the magnitude of `amount` pt-BR style ('.' thousands separator,
/// ',' decimal mark), prefixed with the currency symbol: `R$ 1.234,56`.
///
/// The sign is dropped; use `format_signed_amount` to show it.
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let decimal_places = decimal_places(currency);
    let scale = 10f64.powi(decimal_places as i32);
    // Round once on the scaled value so 0.999 doesn't print as "0,100".
    let scaled = (amount.abs() * scale).round() as u64;
    let scale = scale as u64;
    let integer_part = (scaled / scale).to_formatted_string(&Locale::pt);
    if decimal_places == 0 {
        return format!("{} {}", currency.symbol(), integer_part);
    }
    format!(
        "{} {},{:0decimal_places$}",
        currency.symbol(),
        integer_part,
        scaled % scale,
    )
}

/// Like `format_amount`, with an explicit `+ ` or `- ` in front.
pub fn format_signed_amount(amount: f64, currency: Currency) -> String {
    let sign = if amount >= 0.0 { '+' } else { '-' };
    format!("{} {}", sign, format_amount(amount, currency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_brazilian_real() {
        assert_eq!(format_amount(1234.56, Currency::BRL), "R$ 1.234,56");
        assert_eq!(format_amount(0.5, Currency::BRL), "R$ 0,50");
        assert_eq!(format_amount(-40.0, Currency::BRL), "R$ 40,00");
        assert_eq!(format_amount(0.999, Currency::BRL), "R$ 1,00");
    }

    #[test]
    fn formats_sign_explicitly() {
        assert_eq!(format_signed_amount(100.0, Currency::BRL), "+ R$ 100,00");
        assert_eq!(format_signed_amount(-1500.0, Currency::BRL), "- R$ 1.500,00");
    }
}
