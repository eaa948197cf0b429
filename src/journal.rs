//! Symptom journal engine.
//!
//! Pure functions over a user's entry collection: upsert-by-date, exact
//! date lookup, calendar-grid derivation for the month view, and the
//! rolling metrics shown on the dashboard (adherence percentage,
//! crisis-free streak, current-status flag).

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{JournalEntry, PainIndicator};

/// Most recent entry above this pain level flips the dashboard into
/// "monitor closely".
const HIGH_PAIN_THRESHOLD: u8 = 6;

// ═══════════════════════════════════════════
// Entry collection operations
// ═══════════════════════════════════════════

/// Insert-or-replace keyed by calendar date.
///
/// An existing entry for the same date is replaced in place, preserving
/// the position of every other entry; otherwise the entry is appended.
/// Returns the new collection — the caller persists it.
pub fn upsert_entry(entries: &[JournalEntry], entry: JournalEntry) -> Vec<JournalEntry> {
    let mut next = entries.to_vec();
    match next.iter_mut().find(|e| e.date == entry.date) {
        Some(slot) => *slot = entry,
        None => next.push(entry),
    }
    next
}

/// Exact-match lookup by ISO date string.
pub fn entry_for_date<'a>(entries: &'a [JournalEntry], date: &str) -> Option<&'a JournalEntry> {
    entries.iter().find(|e| e.date == date)
}

/// Entry with the maximum date. Lexicographic comparison on `YYYY-MM-DD`
/// strings is chronological comparison.
pub fn most_recent_entry(entries: &[JournalEntry]) -> Option<&JournalEntry> {
    entries.iter().max_by(|a, b| a.date.cmp(&b.date))
}

// ═══════════════════════════════════════════
// Calendar layout helpers
// ═══════════════════════════════════════════

/// Number of days in the given month. An out-of-range month yields 0.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

/// Weekday of the 1st of the month, Sunday-based (Sunday = 0).
pub fn first_weekday_offset(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Day cells for a 7-column week grid starting Sunday: leading `None`
/// placeholders for the days before the 1st, then `Some(1..=last)`.
pub fn month_grid(year: i32, month: u32) -> Vec<Option<u32>> {
    let mut cells = Vec::new();
    for _ in 0..first_weekday_offset(year, month) {
        cells.push(None);
    }
    for day in 1..=days_in_month(year, month) {
        cells.push(Some(day));
    }
    cells
}

/// Grid for the month containing the local current date.
pub fn current_month_grid() -> Vec<Option<u32>> {
    let today = Local::now().date_naive();
    month_grid(today.year(), today.month())
}

/// ISO `YYYY-MM-DD` string for a day cell of the given month.
pub fn iso_date(year: i32, month: u32, day: u32) -> String {
    format!("{year:04}-{month:02}-{day:02}")
}

// ═══════════════════════════════════════════
// Metrics
// ═══════════════════════════════════════════

/// Percentage of entries with meds taken, rounded. Empty input is 0, not a
/// division by zero.
pub fn compute_adherence(entries: &[JournalEntry]) -> u8 {
    if entries.is_empty() {
        return 0;
    }
    let taken = entries.iter().filter(|e| e.meds_taken).count();
    ((taken as f64 / entries.len() as f64) * 100.0).round() as u8
}

/// Days since the most recent crisis, or the "not applicable" sentinel
/// when the journal holds no crisis entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrisisFreeStreak {
    Days(i64),
    NotApplicable,
}

impl fmt::Display for CrisisFreeStreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days}"),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Whole days elapsed since the latest crisis entry (ties on the date
/// string resolve to that same date). No crisis entries — or a crisis date
/// that does not parse — yields the sentinel rather than a number.
pub fn crisis_free_streak(entries: &[JournalEntry], today: NaiveDate) -> CrisisFreeStreak {
    let latest = entries
        .iter()
        .filter(|e| e.is_crisis)
        .max_by(|a, b| a.date.cmp(&b.date));

    match latest {
        None => CrisisFreeStreak::NotApplicable,
        Some(entry) => match NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d") {
            Ok(date) => CrisisFreeStreak::Days((today - date).num_days()),
            Err(e) => {
                tracing::warn!(date = %entry.date, error = %e, "Unparseable crisis date");
                CrisisFreeStreak::NotApplicable
            }
        },
    }
}

/// Calendar-day indicator bucket for a recorded pain level.
///
/// Exact thresholds, shared with the month view: above 7 severe, above 4
/// moderate, exactly 0 wellness, anything else mild.
pub fn classify_pain(pain_level: u8) -> PainIndicator {
    if pain_level > 7 {
        PainIndicator::Severe
    } else if pain_level > 4 {
        PainIndicator::Moderate
    } else if pain_level == 0 {
        PainIndicator::Wellness
    } else {
        PainIndicator::Mild
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub crisis_free: CrisisFreeStreak,
    pub adherence_pct: u8,
    /// True when the most recent entry reports pain above the monitoring
    /// threshold.
    pub high_pain: bool,
}

pub fn dashboard_summary(entries: &[JournalEntry], today: NaiveDate) -> DashboardSummary {
    DashboardSummary {
        crisis_free: crisis_free_streak(entries, today),
        adherence_pct: compute_adherence(entries),
        high_pain: most_recent_entry(entries)
            .map(|e| e.pain_level > HIGH_PAIN_THRESHOLD)
            .unwrap_or(false),
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
