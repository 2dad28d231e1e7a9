// ABOUTME: Presentation helpers shared by every page: escaping, currency, stars, dates, durations
// ABOUTME: Pure functions so formatting rules are unit tested in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use std::borrow::Cow;
use std::fmt::Write;

use chrono::{DateTime, Utc};

/// Escape text for an HTML body
#[must_use]
pub fn esc(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escape text for a double-quoted attribute
#[must_use]
pub fn attr(text: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(text)
}

/// Price in Vietnamese dong with dot thousands separators: `1.999.000 ₫`
#[must_use]
pub fn format_vnd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped} ₫")
}

/// Discount percentage, when the course sells below list price
#[must_use]
pub fn discount_percent(current: i64, original: i64) -> Option<i64> {
    if original <= 0 || current >= original {
        return None;
    }
    Some(((original - current) * 100 + original / 2) / original)
}

/// Five-star widget: full, half and empty stars for a 0..=5 rating
#[must_use]
pub fn stars(rating: f64) -> String {
    let rating = rating.clamp(0.0, 5.0);
    let halves = (rating * 2.0).round() as i64;
    let full = halves / 2;
    let half = halves % 2;
    let empty = 5 - full - half;

    let mut html = String::from(r#"<span class="stars" aria-hidden="true">"#);
    for _ in 0..full {
        html.push_str(r#"<i class="bi bi-star-fill"></i>"#);
    }
    if half == 1 {
        html.push_str(r#"<i class="bi bi-star-half"></i>"#);
    }
    for _ in 0..empty {
        html.push_str(r#"<i class="bi bi-star"></i>"#);
    }
    html.push_str("</span>");
    html
}

/// Rating with one decimal: `4.5`
#[must_use]
pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

/// Calendar date: `dd/mm/yyyy`
#[must_use]
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// Lecture length: `mm:ss`, or `h:mm:ss` past an hour
#[must_use]
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Course length in hours: `12.5 hours`
#[must_use]
pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 10.0).round() / 10.0;
    if (rounded - rounded.trunc()).abs() < f64::EPSILON {
        format!("{} hours", rounded as i64)
    } else {
        format!("{rounded:.1} hours")
    }
}

/// Student count with a `k` suffix past a thousand: `12.5k`
#[must_use]
pub fn format_count(count: i64) -> String {
    if count >= 1000 {
        let tenths = (count + 50) / 100;
        if tenths % 10 == 0 {
            format!("{}k", tenths / 10)
        } else {
            format!("{}.{}k", tenths / 10, tenths % 10)
        }
    } else {
        count.to_string()
    }
}

/// Shorten text to `max` characters, ending with an ellipsis
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// `<option>` list with one entry selected
#[must_use]
pub fn options<'a, I>(items: I, selected: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut html = String::new();
    for (value, label) in items {
        let _ = write!(
            html,
            r#"<option value="{}"{}>{}</option>"#,
            attr(value),
            if value == selected { " selected" } else { "" },
            esc(label)
        );
    }
    html
}

/// Link to a URL-encoded path segment, for category names
#[must_use]
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_vnd() {
        assert_eq!(format_vnd(1_999_000), "1.999.000 ₫");
        assert_eq!(format_vnd(0), "0 ₫");
        assert_eq!(format_vnd(999), "999 ₫");
        assert_eq!(format_vnd(1000), "1.000 ₫");
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(discount_percent(500_000, 1_000_000), Some(50));
        assert_eq!(discount_percent(1_000_000, 1_000_000), None);
        assert_eq!(discount_percent(10, 0), None);
    }

    #[test]
    fn test_stars_counts() {
        let html = stars(3.5);
        assert_eq!(html.matches("bi-star-fill").count(), 3);
        assert_eq!(html.matches("bi-star-half").count(), 1);
        assert_eq!(html.matches(r#"class="bi bi-star""#).count(), 1);

        let zero = stars(0.0);
        assert_eq!(zero.matches(r#"class="bi bi-star""#).count(), 5);
        assert_eq!(stars(9.0).matches("bi-star-fill").count(), 5);
    }

    #[test]
    fn test_durations_and_dates() {
        assert_eq!(format_duration(65), "01:05");
        assert_eq!(format_duration(3725), "1:02:05");
        assert_eq!(format_hours(12.0), "12 hours");
        assert_eq!(format_hours(1.25), "1.3 hours");
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 10, 0, 0).unwrap();
        assert_eq!(format_date(&at), "09/03/2025");
    }

    #[test]
    fn test_counts_and_truncate() {
        assert_eq!(format_count(950), "950");
        assert_eq!(format_count(12_500), "12.5k");
        assert_eq!(format_count(2000), "2k");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(esc("<b>&"), "&lt;b&gt;&amp;");
        assert_eq!(attr(r#"a"b"#), "a&quot;b");
    }
}
