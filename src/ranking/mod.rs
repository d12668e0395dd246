//! Suggestion ranking for the search box.
//!
//! Candidates come from the library and the search history (see
//! [`collect_candidates`](crate::core::collect_candidates)); this module
//! scores them against the typed query and returns the best few. Matching is
//! case-insensitive with two tiers: contiguous substring hits score a flat
//! ceiling, everything else falls back to subsequence matching with
//! gap-decayed credit. Category bonuses then nudge structured candidates
//! (platform, status, genre, developer) above plain titles, and push history
//! entries below everything unless they match well.

mod score;

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::core::{Candidate, CandidateKind, Suggestion};

/// Score for a contiguous substring match, the ceiling of the fuzzy tier
pub const DEFAULT_SUBSTRING_SCORE: f64 = 100.0;
/// Multiplier turning average subsequence credit into points
pub const DEFAULT_FUZZY_SCALE: f64 = 70.0;
/// Points deducted per candidate character beyond the query length
pub const DEFAULT_LENGTH_PENALTY: f64 = 0.5;
/// Maximum number of suggestions returned
pub const DEFAULT_LIMIT: usize = 8;

pub const DEFAULT_PLATFORM_BONUS: f64 = 12.0;
pub const DEFAULT_STATUS_BONUS: f64 = 15.0;
pub const DEFAULT_GENRE_BONUS: f64 = 8.0;
pub const DEFAULT_DEVELOPER_BONUS: f64 = 5.0;
pub const DEFAULT_HISTORY_BONUS: f64 = -20.0;

/// Ranking knobs, defaulting to the values above
#[derive(Debug, Clone, Copy)]
pub struct RankerConfig {
    pub substring_score: f64,
    pub fuzzy_scale: f64,
    pub length_penalty: f64,
    pub limit: usize,
    pub platform_bonus: f64,
    pub status_bonus: f64,
    pub genre_bonus: f64,
    pub developer_bonus: f64,
    pub history_bonus: f64,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            substring_score: DEFAULT_SUBSTRING_SCORE,
            fuzzy_scale: DEFAULT_FUZZY_SCALE,
            length_penalty: DEFAULT_LENGTH_PENALTY,
            limit: DEFAULT_LIMIT,
            platform_bonus: DEFAULT_PLATFORM_BONUS,
            status_bonus: DEFAULT_STATUS_BONUS,
            genre_bonus: DEFAULT_GENRE_BONUS,
            developer_bonus: DEFAULT_DEVELOPER_BONUS,
            history_bonus: DEFAULT_HISTORY_BONUS,
        }
    }
}

impl RankerConfig {
    /// Additive score adjustment for a candidate's category
    pub fn kind_bonus(&self, kind: CandidateKind) -> f64 {
        match kind {
            CandidateKind::Title => 0.0,
            CandidateKind::Platform => self.platform_bonus,
            CandidateKind::Status => self.status_bonus,
            CandidateKind::Genre => self.genre_bonus,
            CandidateKind::Developer => self.developer_bonus,
            CandidateKind::History => self.history_bonus,
        }
    }
}

/// Scores and orders search suggestions
#[derive(Debug, Clone, Default)]
pub struct SuggestionRanker {
    config: RankerConfig,
}

impl SuggestionRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RankerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Rank `candidates` against `query`, best first, keeping at most
    /// `config.limit` suggestions.
    ///
    /// Candidates are dropped when they do not match, when the match score
    /// alone is zero or below, or when the category bonus drags the final
    /// score to zero or below (history entries). Duplicate (kind, text)
    /// pairs keep their first occurrence, so callers feeding library entries
    /// before history entries get the library's casing. Ties keep candidate
    /// order. A blank query returns none.
    pub fn rank(&self, query: &str, candidates: &[Candidate]) -> Vec<Suggestion> {
        self.rank_limited(query, candidates, self.config.limit)
    }

    /// Like [`rank`](SuggestionRanker::rank) with a per-call result limit
    pub fn rank_limited(
        &self,
        query: &str,
        candidates: &[Candidate],
        limit: usize,
    ) -> Vec<Suggestion> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut seen: HashSet<(CandidateKind, String)> = HashSet::new();
        let mut suggestions = Vec::new();

        for candidate in candidates {
            let text_lower = candidate.text.to_lowercase();
            let Some(base) = score::match_score(&query, &text_lower, &self.config) else {
                continue;
            };
            // A candidate must earn a positive match score on its own;
            // category bonuses only reorder survivors.
            if base <= 0.0 {
                continue;
            }
            let score = base + self.config.kind_bonus(candidate.kind);
            if score <= 0.0 {
                continue;
            }
            if !seen.insert((candidate.kind, text_lower)) {
                continue;
            }
            suggestions.push(Suggestion {
                text: candidate.text.clone(),
                kind: candidate.kind,
                score,
                subject_id: candidate.subject_id.clone(),
            });
        }

        suggestions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        suggestions.truncate(limit);
        suggestions
    }
}
