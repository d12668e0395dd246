use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::GameRecord;

/// Origin category of a suggestion candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Title,
    Platform,
    Genre,
    Developer,
    Status,
    History,
}

impl CandidateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Title => "title",
            CandidateKind::Platform => "platform",
            CandidateKind::Genre => "genre",
            CandidateKind::Developer => "developer",
            CandidateKind::Status => "status",
            CandidateKind::History => "history",
        }
    }
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single string considered by the suggestion ranker
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Literal text being matched against
    pub text: String,

    /// Origin category
    pub kind: CandidateKind,

    /// Back-reference to the originating game, if any. Never used for
    /// matching, only carried through for downstream action.
    pub subject_id: Option<String>,
}

impl Candidate {
    pub fn new(text: impl Into<String>, kind: CandidateKind) -> Self {
        Self {
            text: text.into(),
            kind,
            subject_id: None,
        }
    }

    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }
}

/// Ranked suggestion returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: CandidateKind,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
}

impl Suggestion {
    /// Render the suggestion as a search/filter expression.
    ///
    /// Category suggestions become structured filters (`platform:PC`,
    /// `status:completed`); title and history suggestions stay plain text.
    pub fn filter_string(&self) -> String {
        match self.kind {
            CandidateKind::Title | CandidateKind::History => self.text.clone(),
            kind => format!("{}:{}", kind.as_str(), self.text),
        }
    }
}

/// Derive ranker candidates from the current library and search history.
///
/// Candidates are rebuilt on every call and never persisted. Blank texts are
/// dropped and each category is deduplicated case-insensitively, keeping the
/// first occurrence; output order follows library order, then history order.
pub fn collect_candidates(games: &[GameRecord], history: &[String]) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut seen: HashSet<(CandidateKind, String)> = HashSet::new();

    for game in games {
        push_unique(
            &mut out,
            &mut seen,
            &game.title,
            CandidateKind::Title,
            Some(&game.id),
        );
        for platform in &game.platforms {
            push_unique(&mut out, &mut seen, platform, CandidateKind::Platform, None);
        }
        for genre in &game.genres {
            push_unique(&mut out, &mut seen, genre, CandidateKind::Genre, None);
        }
        for developer in &game.developers {
            push_unique(&mut out, &mut seen, developer, CandidateKind::Developer, None);
        }
        push_unique(
            &mut out,
            &mut seen,
            game.status.as_str(),
            CandidateKind::Status,
            None,
        );
    }

    for entry in history {
        push_unique(&mut out, &mut seen, entry, CandidateKind::History, None);
    }

    out
}

fn push_unique(
    out: &mut Vec<Candidate>,
    seen: &mut HashSet<(CandidateKind, String)>,
    text: &str,
    kind: CandidateKind,
    subject_id: Option<&str>,
) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    if !seen.insert((kind, trimmed.to_lowercase())) {
        return;
    }
    out.push(Candidate {
        text: trimmed.to_string(),
        kind,
        subject_id: subject_id.map(str::to_string),
    });
}
