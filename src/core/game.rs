use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a game sits in the player's backlog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayStatus {
    Playing,
    Completed,
    Backlog,
    OnHold,
    Dropped,
    Wishlist,
}

impl PlayStatus {
    /// Stable lowercase name, used as suggestion text and in filter strings
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayStatus::Playing => "playing",
            PlayStatus::Completed => "completed",
            PlayStatus::Backlog => "backlog",
            PlayStatus::OnHold => "on_hold",
            PlayStatus::Dropped => "dropped",
            PlayStatus::Wishlist => "wishlist",
        }
    }
}

impl Default for PlayStatus {
    fn default() -> Self {
        PlayStatus::Backlog
    }
}

impl std::fmt::Display for PlayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked game in the player's library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    /// Opaque identifier, also used as the image-cache subject id
    pub id: String,

    /// Game title
    pub title: String,

    /// Platform(s) the game is owned/played on
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Genre(s)
    #[serde(default)]
    pub genres: Vec<String>,

    /// Developer(s)
    #[serde(default)]
    pub developers: Vec<String>,

    /// Tags/keywords
    #[serde(default)]
    pub tags: Vec<String>,

    /// Backlog status
    #[serde(default)]
    pub status: PlayStatus,

    /// Personal rating (0.0-10.0)
    #[serde(default)]
    pub rating: Option<f64>,

    /// Total logged play time in hours
    #[serde(default)]
    pub hours_played: Option<f64>,

    /// Release year
    #[serde(default)]
    pub year: Option<i32>,

    /// Timestamp when this game was added to the library
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl GameRecord {
    /// Create a new GameRecord with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            platforms: Vec::new(),
            genres: Vec::new(),
            developers: Vec::new(),
            tags: Vec::new(),
            status: PlayStatus::default(),
            rating: None,
            hours_played: None,
            year: None,
            added_at: Utc::now(),
        }
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        if let Some(year) = self.year {
            format!("{} ({})", self.title, year)
        } else {
            self.title.clone()
        }
    }
}
