use once_cell::sync::Lazy;
use regex::Regex;

// Optional sign, optional currency code and symbol, grouped amount, optional trailing code.
static PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(-)?\s*(?:(?:USD|US|CAD|CA|AUD|AU|EUR|GBP)\s*)?[$€£¥]?\s*",
        r"([0-9][0-9,]*(?:\.[0-9]+)?)",
        r"(?:\s+(?:USD|CAD|AUD|EUR|GBP))?\s*$",
    ))
    .expect("price pattern is valid")
});

/// Parse a currency-formatted price such as `$1,299.00` into an amount.
///
/// Returns `None` for anything that is not a non-negative number once the
/// currency marks and thousands separators are gone (`N/A`, `FREE`, `-$5`).
pub fn parse_price(text: &str) -> Option<f64> {
    let caps = PRICE_RE.captures(text)?;
    if caps.get(1).is_some() {
        return None;
    }

    let digits = caps.get(2)?.as_str().replace(',', "");
    let amount: f64 = digits.parse().ok()?;

    (amount.is_finite() && amount >= 0.0).then_some(amount)
}
