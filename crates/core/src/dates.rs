//! Natural-language date window normalization.
//!
//! Converts relative/absolute time expressions ("next month", "after 20th
//! August", "in 3 weeks") into a concrete UTC day range plus a human label.
//! The reference instant `now` is injected by the caller so results are
//! deterministic.

use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;

use crate::normalize::normalize;
use crate::types::DateWindow;

/// Width of the catchall window when no time text is supplied.
pub const DEFAULT_WINDOW_DAYS: u64 = 56;

const MONTH_NAMES: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

const MONTH_DISPLAY: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Month-name alternation for the regex rules; accepts the usual
/// three-letter abbreviations.
const MONTH_ALT: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

// ============================================================================
// Loose date parsing
// ============================================================================

/// Parse a day/month/year phrase with an optional leading weekday and
/// ordinal suffixes: "Wed 20th August 2025", "20 August 2025".
///
/// Returns `None` if any of day/month/year fails to parse.
pub fn parse_loose_date(text: &str) -> Option<NaiveDate> {
    let lowered = text.to_lowercase().replace(',', " ");
    let ordinal = Regex::new(r"(\d+)(?:st|nd|rd|th)\b").expect("Invalid regex");
    let cleaned = ordinal.replace_all(&lowered, "$1");

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let first = tokens.first()?;
    // A non-numeric first token is a weekday name; day/month/year follow it.
    let offset = if first.chars().all(|c| c.is_ascii_digit()) { 0 } else { 1 };

    let day: u32 = tokens.get(offset)?.parse().ok()?;
    let month = month_from_token(tokens.get(offset + 1)?)?;
    let year: i32 = tokens.get(offset + 2)?.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_from_token(token: &str) -> Option<u32> {
    if let Ok(number) = token.parse::<u32>() {
        return (1..=12).contains(&number).then_some(number);
    }
    if token.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .find(|(name, _)| name.starts_with(token))
        .map(|(_, month)| *month)
}

// ============================================================================
// Window normalization
// ============================================================================

/// Normalize free time text into a concrete day window. Fixed pattern
/// rules, first match wins; `now` is the caller's UTC day.
pub fn normalize_date_window(text: &str, now: NaiveDate) -> DateWindow {
    let t = normalize(text);

    if t.is_empty() {
        return default_window(now);
    }

    if t.contains("anytime") || t.contains("any time") || t.contains("whenever") {
        return DateWindow::new(now, now + Months::new(12), "anytime (next 12 months)");
    }

    if t.contains("this month") {
        return month_window(now.year(), now.month(), "this month");
    }

    if t.contains("next month") {
        let (year, month) = if now.month() == 12 {
            (now.year() + 1, 1)
        } else {
            (now.year(), now.month() + 1)
        };
        return month_window(year, month, "next month");
    }

    if t.contains("next week") {
        // Monday-to-Sunday of the following week; a Monday still advances a
        // full week.
        let offset = 7 - now.weekday().num_days_from_monday() as u64;
        let start = now + Days::new(offset);
        return DateWindow::new(start, start + Days::new(6), "next week");
    }

    let in_weeks = Regex::new(r"\bin (\d+) weeks?\b").expect("Invalid regex");
    if let Some(caps) = in_weeks.captures(&t) {
        if let Ok(n) = caps[1].parse::<u64>() {
            let start = now + Days::new(n * 7);
            return DateWindow::new(start, start + Days::new(7), format!("in {} weeks", n));
        }
    }

    let next_weeks = Regex::new(r"\bnext (\d+) weeks?\b").expect("Invalid regex");
    if let Some(caps) = next_weeks.captures(&t) {
        if let Ok(n) = caps[1].parse::<u64>() {
            return DateWindow::new(now, now + Days::new(n * 7), format!("next {} weeks", n));
        }
    }

    if let Some(window) = after_day_window(&t, now) {
        return window;
    }

    let end_of = Regex::new(&format!(r"\bend of ({})\b", MONTH_ALT)).expect("Invalid regex");
    if let Some(caps) = end_of.captures(&t) {
        if let Some(month) = month_from_token(&caps[1]) {
            let year = rollover_year(now, month);
            if let Some(start) = NaiveDate::from_ymd_opt(year, month, 25) {
                return DateWindow::new(
                    start,
                    month_end(year, month),
                    format!("end of {}", month_display(month)),
                );
            }
        }
    }

    // A bare month name anywhere in the text selects that whole month.
    for (name, month) in MONTH_NAMES {
        if t.contains(name) {
            let year = rollover_year(now, *month);
            return month_window(year, *month, month_display(*month));
        }
    }

    default_window(now)
}

/// "after|later than|from D <month>": starts at the named day ("from",
/// inclusive) or the following day ("after"/"later than", exclusive) and
/// runs to month-end.
fn after_day_window(t: &str, now: NaiveDate) -> Option<DateWindow> {
    let re = Regex::new(&format!(
        r"\b(after|later than|from) (\d{{1,2}})(?:st|nd|rd|th)? ({})\b",
        MONTH_ALT
    ))
    .expect("Invalid regex");

    let caps = re.captures(t)?;
    let keyword = &caps[1];
    let day: u32 = caps[2].parse().ok()?;
    let month = month_from_token(&caps[3])?;

    let year = rollover_year(now, month);
    let named = NaiveDate::from_ymd_opt(year, month, day)?;
    let start = if keyword == "from" { named } else { named + Days::new(1) };
    let end = month_end(year, month).max(start);

    Some(DateWindow::new(
        start,
        end,
        format!("{} {} {}", keyword, day, month_display(month)),
    ))
}

fn default_window(now: NaiveDate) -> DateWindow {
    DateWindow::new(now, now + Days::new(DEFAULT_WINDOW_DAYS), "next 8 weeks")
}

fn month_window(year: i32, month: u32, label: impl Into<String>) -> DateWindow {
    DateWindow {
        start: NaiveDate::from_ymd_opt(year, month, 1),
        end: Some(month_end(year, month)),
        label: label.into(),
    }
}

/// Month-end computed as the day before the first of the following month.
fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).expect("valid first of month") - Days::new(1)
}

/// A named month that already passed this year rolls forward one year.
fn rollover_year(now: NaiveDate, month: u32) -> i32 {
    if month < now.month() {
        now.year() + 1
    } else {
        now.year()
    }
}

fn month_display(month: u32) -> &'static str {
    MONTH_DISPLAY[(month - 1) as usize]
}
