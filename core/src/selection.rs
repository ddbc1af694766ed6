//! # Selection Rules
//!
//! The registry frequently returns several candidates for what should be a
//! single record: duplicate registrations, superseded regulation versions,
//! stale "active" flags. These functions pick exactly one.
//!
//! The shared policy is "latest date wins, higher id breaks ties". Dates that
//! are missing or unparseable rank as the Unix epoch instead of failing, so
//! selection is total over any input. Inputs are never modified.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use cvm_proxy_common::models::{RegistrationSummary, RegulationDocument};

/// A record that can take part in latest-by-date selection.
pub trait Dated {
    fn date(&self) -> Option<&str>;
    fn id(&self) -> i64;
}

impl Dated for RegistrationSummary {
    fn date(&self) -> Option<&str> {
        self.registered_at.as_deref()
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl Dated for RegulationDocument {
    fn date(&self) -> Option<&str> {
        self.effective_from.as_deref()
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Picks the candidate with the latest date, breaking ties by the greater id.
///
/// Returns `None` only for an empty input. Candidates equal on both keys
/// resolve to the first one encountered.
pub fn pick_latest_by_date<'a, T, I>(candidates: I) -> Option<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    candidates.into_iter().min_by(|a, b| latest_first(*a, *b))
}

/// Chooses one registration among the search results.
pub fn pick_registration_summary(summaries: &[RegistrationSummary]) -> Option<&RegistrationSummary> {
    pick_latest_by_date(summaries)
}

/// Chooses the current regulation document.
///
/// Before ranking, narrows the candidates to the first non-empty tier of:
/// 1. documents with an effective date that are explicitly active,
/// 2. documents with an effective date,
/// 3. every document.
pub fn pick_latest_document(documents: &[RegulationDocument]) -> Option<&RegulationDocument> {
    let dated: Vec<&RegulationDocument> = documents.iter().filter(|d| d.has_effective_date()).collect();
    let active: Vec<&RegulationDocument> = dated.iter().copied().filter(|d| d.is_active()).collect();

    if !active.is_empty() {
        pick_latest_by_date(active)
    } else if !dated.is_empty() {
        pick_latest_by_date(dated)
    } else {
        pick_latest_by_date(documents)
    }
}

/// Orders `a` before `b` when `a` is the better pick.
fn latest_first<T: Dated>(a: &T, b: &T) -> Ordering {
    let rank_a = (date_value(a.date()), a.id());
    let rank_b = (date_value(b.date()), b.id());
    rank_b.cmp(&rank_a)
}

/// Milliseconds since the Unix epoch, or `0` when absent or unparseable.
///
/// Accepts RFC 3339 timestamps, offset-less `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC)
/// and plain `YYYY-MM-DD` dates (UTC midnight).
pub fn date_value(value: Option<&str>) -> i64 {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return 0;
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return ts.timestamp_millis();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc().timestamp_millis();
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return midnight.and_utc().timestamp_millis();
        }
    }
    0
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
