use std::sync::Arc;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::model::{contains_ignore_case, Catalog, CatalogEntry};

/// Added on top of the fuzzy score when the query is a literal
/// case-insensitive substring of the field.
pub const SUBSTRING_BONUS: u32 = 20;

/// Approximate matching capability. Returns 0 when `candidate` does not
/// match `query` at all.
pub trait FuzzyScorer: Send + Sync {
    fn fuzzy_score(&self, query: &str, candidate: &str) -> u32;
}

pub struct SkimScorer {
    matcher: SkimMatcherV2,
}

impl Default for SkimScorer {
    fn default() -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }
}

impl FuzzyScorer for SkimScorer {
    fn fuzzy_score(&self, query: &str, candidate: &str) -> u32 {
        self.matcher
            .fuzzy_match(candidate, query)
            .map(|score| score.clamp(0, u32::MAX as i64) as u32)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMatch<'a> {
    pub entry: &'a Arc<CatalogEntry>,
    pub score: u32,
}

#[derive(Clone)]
pub struct MatchEngine {
    scorer: Arc<dyn FuzzyScorer>,
    score_keywords: bool,
}

impl MatchEngine {
    pub fn new(scorer: Arc<dyn FuzzyScorer>) -> Self {
        Self {
            scorer,
            score_keywords: false,
        }
    }

    pub fn with_keyword_scoring(mut self, enabled: bool) -> Self {
        self.score_keywords = enabled;
        self
    }

    /// Scores one entry. A field only counts when the query is a literal
    /// case-insensitive substring of it. The name is tried first, then the
    /// command, then keywords (when enabled); the first field that contains
    /// the query decides the score. The query is used exactly as typed.
    pub fn score(&self, query: &str, entry: &CatalogEntry) -> u32 {
        if query.trim().is_empty() || entry.name.trim().is_empty() || entry.command.trim().is_empty() {
            return 0;
        }

        if let Some(score) = self.score_field(query, &entry.name) {
            return score;
        }
        if let Some(score) = self.score_field(query, &entry.command) {
            return score;
        }
        if self.score_keywords {
            return entry
                .keywords()
                .filter_map(|keyword| self.score_field(query, keyword))
                .max()
                .unwrap_or(0);
        }
        0
    }

    /// `Some(fuzzy + bonus)` when `field` contains `query`, `None` otherwise.
    fn score_field(&self, query: &str, field: &str) -> Option<u32> {
        if !contains_ignore_case(field, query) {
            return None;
        }
        let fuzzy = self.scorer.fuzzy_score(query, field);
        Some(fuzzy.saturating_add(SUBSTRING_BONUS))
    }

    /// Entries with a positive score, best first. Equal scores keep catalog
    /// order.
    pub fn rank<'a>(&self, query: &str, catalog: &'a Catalog) -> Vec<ScoredMatch<'a>> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, ScoredMatch<'a>)> = catalog
            .entries()
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let score = self.score(query, entry);
                (score > 0).then_some((index, ScoredMatch { entry, score }))
            })
            .collect();

        scored.sort_by(|a, b| b.1.score.cmp(&a.1.score).then_with(|| a.0.cmp(&b.0)));
        scored.into_iter().map(|(_, scored)| scored).collect()
    }
}
