//! Slug, date and price formatting helpers shared by every renderer.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde_json::Number;

/// Text rendered in place of a date that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Characters left untouched by `encode_uri_component`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid slug pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Derive a URL slug from a title.
///
/// Lowercases, drops everything except ASCII word characters, whitespace and
/// `-`, then turns each whitespace run into a single `-`. Distinct titles may
/// collapse to the same slug.
///
/// ```
/// use pressgen_core::format::slugify;
///
/// assert_eq!(slugify("Tips Hemat 2024: Mulai dari Sekarang!"), "tips-hemat-2024-mulai-dari-sekarang");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    WHITESPACE_RUN
        .replace_all(&stripped, "-")
        .trim()
        .to_string()
}

/// Parse a record date, keeping the offset it was written with.
///
/// Accepts RFC 3339, naive date-times (read as UTC) and plain `YYYY-MM-DD`
/// dates (UTC midnight).
fn parse_with_offset(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt);
    }

    let utc = FixedOffset::east_opt(0)?;

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            return Some(naive.and_utc().with_timezone(&utc));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().with_timezone(&utc))
}

/// Parse a record date into UTC. Returns `None` for unparseable input.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    parse_with_offset(input).map(|dt| dt.with_timezone(&Utc))
}

/// Render a record date in long Indonesian form, e.g. `15 Januari 2024`.
///
/// The calendar date is taken as written, without converting its offset.
/// Unparseable input yields [`INVALID_DATE`].
pub fn format_date(input: &str) -> String {
    match parse_with_offset(input) {
        Some(dt) => {
            let month = MONTHS_ID[dt.month0() as usize];
            format!("{} {} {}", dt.day(), month, dt.year())
        }
        None => INVALID_DATE.to_string(),
    }
}

/// Text of a JSON number as pages print it.
///
/// Floats with no fractional part print without one, so `1500000.0` and
/// `1e6` read `1500000` and `1000000`. Exponents are always expanded.
pub fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() => value.to_string(),
        _ => number.to_string(),
    }
}

/// Insert a `.` every three digits from the right of each run of digits.
///
/// No rounding is applied; a fractional part is grouped the same way, so
/// `1234.5678` reads `1.234.5.678`.
pub fn format_price(price: &Number) -> String {
    group_thousands(&number_text(price))
}

fn group_thousands(text: &str) -> String {
    let mut grouped = String::with_capacity(text.len() + text.len() / 3);
    let mut rest = text;

    while !rest.is_empty() {
        let run = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, tail) = rest.split_at(run);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }

        let other = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        grouped.push_str(&tail[..other]);
        rest = &tail[other..];
    }

    grouped
}

/// Percent-encode text for use as a single URI component.
pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Escape text for HTML text content or attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Rust & Go"), "rust-go");
        assert_eq!(slugify("Harga   Emas Naik"), "harga-emas-naik");
        assert_eq!(slugify("snake_case-title"), "snake_case-title");
        assert_eq!(slugify("Kamera Mirrorless Terbaik!"), "kamera-mirrorless-terbaik");
    }

    #[test]
    fn test_slugify_keeps_edge_whitespace_as_hyphen() {
        assert_eq!(slugify("  Spaced Out "), "-spaced-out-");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        let titles = [
            "Hello, World!",
            "  Spaced  Out ",
            "Ünïcode Tïtle — with dash",
            "10 Tips: Produktivitas (Bagian 2)",
            "already-a-slug",
            "",
        ];

        for title in titles {
            let once = slugify(title);
            assert_eq!(slugify(&once), once, "slugify not idempotent for {title:?}");
        }
    }

    #[test]
    fn test_slug_collision() {
        assert_eq!(slugify("Tips & Trik"), slugify("Tips Trik!"));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-15"), "15 Januari 2024");
        assert_eq!(format_date("2023-12-01T08:30:00Z"), "1 Desember 2023");
        assert_eq!(format_date("2024-08-17T23:00:00+07:00"), "17 Agustus 2024");
        assert_eq!(format_date("2024-05-02T10:00:00"), "2 Mei 2024");
    }

    #[test]
    fn test_format_invalid_date() {
        assert_eq!(format_date("kemarin"), INVALID_DATE);
        assert_eq!(format_date(""), INVALID_DATE);
        assert_eq!(format_date("2024-13-45"), INVALID_DATE);
    }

    #[test]
    fn test_parse_date() {
        let dt = parse_date("2024-08-17T23:00:00+07:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-08-17T16:00:00+00:00");

        let date_only = parse_date("2024-01-15").unwrap();
        assert_eq!(date_only.to_rfc3339(), "2024-01-15T00:00:00+00:00");

        assert!(parse_date("not a date").is_none());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(&Number::from(1_234_567)), "1.234.567");
        assert_eq!(format_price(&Number::from(150_000)), "150.000");
        assert_eq!(format_price(&Number::from(999)), "999");
        assert_eq!(format_price(&Number::from(1000)), "1.000");
        assert_eq!(format_price(&Number::from(0)), "0");
        assert_eq!(format_price(&Number::from(-1500)), "-1.500");
    }

    #[test]
    fn test_format_price_fraction() {
        let price = Number::from_f64(1234.5).unwrap();
        assert_eq!(format_price(&price), "1.234.5");

        let price = Number::from_f64(1234.5678).unwrap();
        assert_eq!(format_price(&price), "1.234.5.678");
    }

    #[test]
    fn test_format_price_whole_floats() {
        let written: Number = serde_json::from_str("1500000.0").unwrap();
        assert_eq!(format_price(&written), "1.500.000");

        let exponent: Number = serde_json::from_str("1e6").unwrap();
        assert_eq!(format_price(&exponent), "1.000.000");

        let negative: Number = serde_json::from_str("-2500.0").unwrap();
        assert_eq!(format_price(&negative), "-2.500");
    }

    #[test]
    fn test_number_text() {
        assert_eq!(number_text(&Number::from(42)), "42");
        assert_eq!(number_text(&Number::from_f64(0.25).unwrap()), "0.25");
        assert_eq!(number_text(&Number::from_f64(3.0).unwrap()), "3");
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(
            encode_uri_component("Saya tertarik dengan produk UI Kit"),
            "Saya%20tertarik%20dengan%20produk%20UI%20Kit"
        );
        assert_eq!(encode_uri_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_uri_component("(ok)!*~'._-"), "(ok)!*~'._-");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"Say "hi" & <b>"#), "Say &quot;hi&quot; &amp; &lt;b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
