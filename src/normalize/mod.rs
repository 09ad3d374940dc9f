//! Field normalizers: free-text dates to canonical timestamps, relative
//! URLs to absolute ones, delimiter-joined tag text to ordered lists.
//!
//! All functions are pure. Unparsable input degrades to an absent value
//! (`None` / empty vec) rather than an error; whether absence drops the
//! candidate is decided by the extraction engine against the adapter's
//! required fields.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// "3 小時前", "10分鐘前" and friends.
static RELATIVE_ZH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*(秒|分鐘|分钟|小時|小时|天|週|周)前").expect("valid regex")
});

/// "3 hours ago", "1 day ago" and friends.
static RELATIVE_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(second|minute|min|hour|hr|day|week)s?\s+ago").expect("valid regex")
});

/// Parse a free-text publish date into a canonical UTC timestamp.
///
/// Recognizes RFC 3339/2822, relative phrasing in the source locales
/// (Chinese and English), and common absolute layouts with `-`, `/`, `.`
/// or CJK date markers as separators. Naive datetimes are taken as UTC.
/// Returns `None` for anything unrecognized.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    parse_date_at(text, Utc::now())
}

fn parse_date_at(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = parse_relative(text, now) {
        return Some(dt);
    }

    parse_absolute(text, now)
}

fn parse_relative(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match text {
        "剛剛" | "刚刚" | "just now" => return Some(now),
        "今天" | "today" => return Some(now),
        "昨天" | "yesterday" => return Some(now - Duration::days(1)),
        "前天" => return Some(now - Duration::days(2)),
        _ => {}
    }

    let captures = RELATIVE_ZH
        .captures(text)
        .or_else(|| RELATIVE_EN.captures(text))?;
    let amount: i64 = captures[1].parse().ok()?;
    // The English pattern matches case-insensitively, so lower the unit
    // before dispatching.
    let delta = match captures[2].to_lowercase().as_str() {
        "秒" | "second" => Duration::seconds(amount),
        "分鐘" | "分钟" | "minute" | "min" => Duration::minutes(amount),
        "小時" | "小时" | "hour" | "hr" => Duration::hours(amount),
        "天" | "day" => Duration::days(amount),
        "週" | "周" | "week" => Duration::weeks(amount),
        _ => return None,
    };
    Some(now - delta)
}

fn parse_absolute(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    // Collapse the separator zoo down to dashes: 2025/06/20, 2025.06.20 and
    // 2025年06月20日 all become 2025-06-20.
    let normalized: String = text
        .replace(['/', '.'], "-")
        .replace(['年', '月'], "-")
        .replace('日', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    const DATETIME_FORMATS: [&str; 3] =
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    // Year-less layouts are anchored to the current year, bare times to today.
    let with_year = format!("{}-{}", now.year(), normalized);
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%d"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&with_year, format) {
            return Some(dt.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(&normalized, format) {
            return Some(now.date_naive().and_time(time).and_utc());
        }
    }

    None
}

/// Resolve a selector-extracted `href`/`src` value against the adapter's
/// base URL. Already-absolute values pass through; empty input and
/// unresolvable values yield `None`.
pub fn absolutize(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match Url::parse(raw) {
        Ok(url) => Some(url.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            base.join(raw).ok().map(|url| url.to_string())
        }
        Err(_) => None,
    }
}

/// Delimiters seen across the scraped sites: ASCII and fullwidth commas and
/// semicolons, the CJK enumeration comma, slashes, and pipes.
const LIST_DELIMITERS: [char; 7] = [',', '，', '、', '/', ';', '；', '|'];

/// Split one or more raw tag/category texts into an ordered list of trimmed,
/// non-empty strings. Source order is preserved and duplicates are kept.
pub fn split_list<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .flat_map(|part| {
            part.as_ref()
                .split(&LIST_DELIMITERS[..])
                .map(|piece| piece.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|piece| !piece.is_empty())
        .collect()
}
