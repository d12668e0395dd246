//! User-assigned artwork, the highest-priority image source.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::core::{GameRecord, ImageSet};
use crate::error::Result;

use super::ImageSource;

/// In-memory registry of images the user picked by hand.
///
/// Assignments are keyed by game id and override anything other sources
/// would return, so the engine should register this source first.
#[derive(Debug, Default)]
pub struct ManualImageSource {
    assignments: Mutex<HashMap<String, ImageSet>>,
}

impl ManualImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `images` to a game, replacing any previous assignment
    pub fn assign(&self, game_id: impl Into<String>, images: ImageSet) {
        self.lock().insert(game_id.into(), images);
    }

    /// Drop the assignment for a game, returning it if one existed
    pub fn unassign(&self, game_id: &str) -> Option<ImageSet> {
        self.lock().remove(game_id)
    }

    pub fn is_assigned(&self, game_id: &str) -> bool {
        self.lock().contains_key(game_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, ImageSet>> {
        self.assignments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ImageSource for ManualImageSource {
    fn name(&self) -> &str {
        "manual"
    }

    async fn fetch_images(&self, game: &GameRecord) -> Result<ImageSet> {
        Ok(self.lock().get(&game.id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unassigned_game_yields_empty_set() {
        let source = ManualImageSource::new();
        let game = GameRecord::new("witcher-3", "The Witcher 3");

        let images = source.fetch_images(&game).await.unwrap();
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_assignment_round_trip() {
        let source = ManualImageSource::new();
        let game = GameRecord::new("witcher-3", "The Witcher 3");
        let images = ImageSet::default().with_cover("file:///covers/witcher3.png");

        source.assign("witcher-3", images.clone());
        assert!(source.is_assigned("witcher-3"));
        assert_eq!(source.fetch_images(&game).await.unwrap(), images);
    }

    #[tokio::test]
    async fn test_reassignment_replaces() {
        let source = ManualImageSource::new();
        let game = GameRecord::new("witcher-3", "The Witcher 3");

        source.assign("witcher-3", ImageSet::default().with_cover("old.png"));
        source.assign("witcher-3", ImageSet::default().with_cover("new.png"));

        let images = source.fetch_images(&game).await.unwrap();
        assert_eq!(images.cover.as_deref(), Some("new.png"));
    }

    #[tokio::test]
    async fn test_unassign() {
        let source = ManualImageSource::new();
        let game = GameRecord::new("witcher-3", "The Witcher 3");

        source.assign("witcher-3", ImageSet::default().with_cover("c.png"));
        assert!(source.unassign("witcher-3").is_some());
        assert!(source.unassign("witcher-3").is_none());
        assert!(source.fetch_images(&game).await.unwrap().is_empty());
    }
}
