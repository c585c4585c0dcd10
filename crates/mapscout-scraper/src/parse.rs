//! Field-specific parsers for review data.

/// Extract a review count from visible text such as `"1,234 reviews"`.
///
/// Every non-digit character is stripped, thousands separators included.
/// No digits left means the count is absent — a page literally showing
/// `"0"` still yields `Some(0)`.
pub fn parse_review_count(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse a star rating from an accessibility label such as `"4,5 stars"`.
///
/// Takes the first whitespace-separated token and normalizes a comma
/// decimal separator before parsing. Anything unparsable is absent.
pub fn parse_rating(label: &str) -> Option<f64> {
    let token = label.split_whitespace().next()?;
    token.replace(',', ".").parse().ok()
}
