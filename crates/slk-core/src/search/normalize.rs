//! Fixed-width text and timestamp normalization for table cells.
//!
//! All timestamps are rendered in UTC so output does not depend on the
//! machine's time zone.

use chrono::DateTime;

const ELLIPSIS: &str = "...";

/// Flatten `s` onto one line and cut it to at most `max_len` characters.
///
/// Newlines become spaces and carriage returns are dropped. Strings longer
/// than `max_len` keep their first `max_len - 3` characters followed by
/// `"..."`. When `max_len` is below 3 there is no room for the ellipsis and
/// the string is cut to `max_len` characters.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    let cleaned: String = s
        .chars()
        .filter(|&c| c != '\r')
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();

    if cleaned.chars().count() <= max_len {
        return cleaned;
    }
    if max_len < ELLIPSIS.len() {
        return cleaned.chars().take(max_len).collect();
    }

    let mut out: String = cleaned.chars().take(max_len - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Format Unix seconds as `YYYY-MM-DD` (UTC).
///
/// `0` means "no timestamp" and yields an empty string. Values chrono cannot
/// represent are printed as the raw number.
#[must_use]
pub fn format_unix_seconds(ts: i64) -> String {
    if ts == 0 {
        return String::new();
    }
    DateTime::from_timestamp(ts, 0)
        .map_or_else(|| ts.to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}

/// Format a provider timestamp (`"<seconds>.<micros>"`) as `YYYY-MM-DD HH:MM` (UTC).
///
/// Anything that does not start with an integer second count is returned
/// unchanged.
#[must_use]
pub fn format_provider_timestamp(ts: &str) -> String {
    let seconds = ts.split_once('.').map_or(ts, |(secs, _)| secs);
    seconds
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map_or_else(
            || ts.to_string(),
            |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
        )
}
