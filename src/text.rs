//! Text extraction helpers shared by the site parsers.

/// Parses a price from scraped text, handling French number formats.
///
/// Keeps digits and separators, then treats a comma as the decimal
/// separator when present ("1.299,99 €" and "29,99€" both work); plain
/// dot-decimal text parses as-is.
pub fn parse_price_value(text: &str) -> Option<f64> {
    let cleaned: String =
        text.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',').collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    normalized.parse().ok().filter(|p: &f64| p.is_finite())
}

/// Parses the leading unsigned integer of a text, like "42 commentaires".
pub fn parse_leading_u32(text: &str) -> u32 {
    let digits: String = text.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Parses an integer from text that may carry a sign and unit suffix,
/// like "350°" or "-12°".
pub fn parse_signed_i32(text: &str) -> i32 {
    let cleaned: String =
        text.trim().chars().filter(|c| c.is_ascii_digit() || *c == '-').collect();
    cleaned.parse().unwrap_or(0)
}
