//! Pattern based exemption of tasks from validation
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::types::{field_text, Task};
use regex::{Regex, RegexBuilder};

/// Fields a pattern is matched against
const MATCHED_FIELDS: [&str; 3] = ["id", "owner", "summary"];

/// Decides whether a task is skipped entirely
pub trait ExclusionFilter: Send + Sync {
    fn should_exclude(&self, task: &Task) -> bool;
}

/// Glob-like exclusion where `*` matches any run of characters.
///
/// Every other character is literal, the match covers the whole field and
/// case is ignored. A task is excluded when its `id`, `owner` or `summary`
/// matches.
#[derive(Debug, Clone, Default)]
pub struct PatternExclusionFilter {
    regex: Option<Regex>,
}

impl PatternExclusionFilter {
    /// Build a filter; `None` or an empty pattern never excludes anything
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let regex = match pattern {
            Some(p) if !p.is_empty() => Some(compile_glob(p)?),
            _ => None,
        };
        Ok(Self { regex })
    }
}

impl ExclusionFilter for PatternExclusionFilter {
    fn should_exclude(&self, task: &Task) -> bool {
        let Some(regex) = &self.regex else {
            return false;
        };
        MATCHED_FIELDS
            .iter()
            .any(|field| regex.is_match(&field_text(task, field)))
    }
}

fn compile_glob(pattern: &str) -> Result<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    RegexBuilder::new(&format!("^{}$", body))
        .case_insensitive(true)
        .build()
        .map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
