//! Title parsing
//!
//! Source titles look like `Toy Story (1995)`. The service matches on bare
//! title text, and the year doubles as the release year.

/// Split a trailing `(DDDD)` off a title
///
/// Returns the text before the suffix and the four digits. Trailing
/// whitespace after the closing parenthesis is ignored.
fn split_year_suffix(title: &str) -> Option<(&str, &str)> {
    let trimmed = title.trim_end();
    let bytes = trimmed.as_bytes();
    if bytes.len() < 6 {
        return None;
    }

    let start = bytes.len() - 6;
    let suffix = &bytes[start..];
    let is_year = suffix[0] == b'('
        && suffix[5] == b')'
        && suffix[1..5].iter().all(u8::is_ascii_digit);

    // All six suffix bytes are ASCII, so `start` is a char boundary
    is_year.then(|| (&trimmed[..start], &trimmed[start + 1..start + 5]))
}

/// Title used as the service search key
///
/// Strips exactly one trailing `(YYYY)` and surrounding whitespace. Titles
/// without the suffix are only trimmed.
pub fn clean_title(title: &str) -> String {
    let trimmed = title.trim();
    match split_year_suffix(trimmed) {
        Some((head, _)) => head.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Release year from a trailing `(YYYY)`, or `None` when unknown
///
/// Only four-digit years (1000-9999) count.
pub fn extract_release_year(title: &str) -> Option<i32> {
    split_year_suffix(title.trim())
        .and_then(|(_, digits)| digits.parse::<i32>().ok())
        .filter(|year| (1000..=9999).contains(year))
}
