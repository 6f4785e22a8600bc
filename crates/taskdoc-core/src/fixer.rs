//! Deterministic repairs for common task defects
//!
//! The rules run in a fixed order (priority, status, created, updated, owner,
//! validations) and each rewrite is reported as a [`FixRecord`]. Applying the
//! fixer to its own output produces no further records.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::types::{
    field_text, is_falsy, FixRecord, Task, DATE_FORMAT, DEFAULT_PRIORITY, DEFAULT_STATUS,
    PRIORITIES, STATUSES,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::trace;

/// Rewrites a task in place and reports what changed
pub trait TaskFixer: Send + Sync {
    /// Apply every rule to `task`, returning one record per rewritten field
    fn apply_basic_fixes(&self, task: &mut Task) -> Vec<FixRecord>;
}

/// Options accepted by [`BasicFixer`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixerOptions {
    /// Date used to fill missing or unparseable dates, defaults to the UTC today
    pub today: Option<NaiveDate>,
}

impl FixerOptions {
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

/// The standard rule set
#[derive(Debug, Clone)]
pub struct BasicFixer {
    today: NaiveDate,
}

impl Default for BasicFixer {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicFixer {
    /// Fixer that fills dates with the current UTC day
    pub fn new() -> Self {
        Self::with_options(FixerOptions::default())
    }

    pub fn with_options(options: FixerOptions) -> Self {
        Self {
            today: options.today.unwrap_or_else(|| Utc::now().date_naive()),
        }
    }

    /// The date written into missing or unparseable date fields
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn fix_choice(
        task: &mut Task,
        id: &str,
        field: &str,
        allowed: &[&str],
        fallback: &str,
        fixes: &mut Vec<FixRecord>,
    ) {
        let current = field_text(task, field);
        if current.is_empty() || !allowed.contains(&current.as_str()) {
            Self::rewrite(task, id, field, Value::from(fallback), fixes);
        }
    }

    fn fix_date(&self, task: &mut Task, id: &str, field: &str, fixes: &mut Vec<FixRecord>) {
        let raw = field_text(task, field);
        let normalized = match parse_loose_date(&raw) {
            Some(date) => date.format(DATE_FORMAT).to_string(),
            None => self.today.format(DATE_FORMAT).to_string(),
        };
        if raw.is_empty() || normalized != raw {
            Self::rewrite(task, id, field, Value::from(normalized), fixes);
        }
    }

    fn fix_owner(task: &mut Task, id: &str, fixes: &mut Vec<FixRecord>) {
        let raw = field_text(task, "owner");
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let titled = title_case(trimmed);
        if titled != trimmed {
            Self::rewrite(task, id, "owner", Value::from(titled), fixes);
        }
    }

    fn fix_validations(task: &mut Task, id: &str, fixes: &mut Vec<FixRecord>) {
        if is_falsy(task.get("validations")) {
            Self::rewrite(task, id, "validations", Value::Array(Vec::new()), fixes);
        }
    }

    fn rewrite(task: &mut Task, id: &str, field: &str, new: Value, fixes: &mut Vec<FixRecord>) {
        let old = task.insert(field.to_string(), new.clone());
        trace!(id, field, ?old, ?new, "Rewrote task field");
        fixes.push(FixRecord::new(id, field, old, new));
    }
}

impl TaskFixer for BasicFixer {
    fn apply_basic_fixes(&self, task: &mut Task) -> Vec<FixRecord> {
        let id = field_text(task, "id");
        let mut fixes = Vec::new();

        Self::fix_choice(task, &id, "priority", &PRIORITIES, DEFAULT_PRIORITY, &mut fixes);
        Self::fix_choice(task, &id, "status", &STATUSES, DEFAULT_STATUS, &mut fixes);
        self.fix_date(task, &id, "created", &mut fixes);
        self.fix_date(task, &id, "updated", &mut fixes);
        Self::fix_owner(task, &id, &mut fixes);
        Self::fix_validations(task, &id, &mut fixes);

        fixes
    }
}

/// Collapse whitespace runs and capitalise each word
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parse a date the way loose human input tends to arrive.
///
/// Timestamps carrying an offset are converted to UTC before the calendar
/// day is taken; timestamps without one are read as UTC.
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    // Year or year-month alone
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('-') {
        None if s.len() == 4 && all_digits(s) => {
            NaiveDate::parse_from_str(&format!("{}-01-01", s), DATE_FORMAT).ok()
        }
        Some((year, month)) if year.len() == 4 && all_digits(year) && all_digits(month) => {
            NaiveDate::parse_from_str(&format!("{}-01", s), DATE_FORMAT).ok()
        }
        _ => None,
    }
}
