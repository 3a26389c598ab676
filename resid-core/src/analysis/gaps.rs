//! Free-ID suggestions.
//!
//! Walks upward from the floor, yielding every value that is not in use:
//! first the holes below the largest used value, then consecutive values
//! past it. Stops after `count` values, at the optional lookahead bound, or
//! at `u64::MAX`.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::declaration::DeclarationSet;

/// Default number of suggestions.
pub const DEFAULT_SUGGEST_COUNT: usize = 10;

/// Where a suggested value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionReason {
    /// Unused value below the largest used ID
    Gap,
    /// Value past the largest used ID
    AfterLargest,
}

impl SuggestionReason {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Gap => "based on gap in ID range",
            Self::AfterLargest => "after largest ID",
        }
    }
}

/// A free value that can be used for a new declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub value: u64,
    pub reason: SuggestionReason,
}

/// Configurable gap walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapSuggester {
    min_value: u64,
    count: usize,
    lookahead: Option<u64>,
}

impl GapSuggester {
    pub fn new(min_value: u64) -> Self {
        Self {
            min_value,
            count: DEFAULT_SUGGEST_COUNT,
            lookahead: None,
        }
    }

    /// How many values to produce at most.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Never suggest past `max used + lookahead`.
    pub fn with_lookahead(mut self, lookahead: Option<u64>) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Suggestions for `set`, ascending.
    ///
    /// An empty set has no largest ID to anchor on and yields nothing.
    pub fn suggest(&self, set: &DeclarationSet) -> Vec<Suggestion> {
        let used: BTreeSet<u64> = set
            .iter()
            .map(|d| d.value)
            .filter(|v| *v >= self.min_value)
            .collect();
        let Some(&max_used) = used.last() else {
            return Vec::new();
        };
        let upper = match self.lookahead {
            Some(extra) => max_used.saturating_add(extra),
            None => u64::MAX,
        };

        let mut out = Vec::with_capacity(self.count.min(1024));
        let mut candidate = self.min_value;
        while out.len() < self.count && candidate <= upper {
            if !used.contains(&candidate) {
                let reason = if candidate < max_used {
                    SuggestionReason::Gap
                } else {
                    SuggestionReason::AfterLargest
                };
                out.push(Suggestion {
                    value: candidate,
                    reason,
                });
            }
            match candidate.checked_add(1) {
                Some(next) => candidate = next,
                None => break,
            }
        }
        out
    }
}

/// Up to `count` free values `>= min_value`, ascending.
pub fn suggest_ids(set: &DeclarationSet, min_value: u64, count: usize) -> Vec<u64> {
    GapSuggester::new(min_value)
        .with_count(count)
        .suggest(set)
        .into_iter()
        .map(|s| s.value)
        .collect()
}
