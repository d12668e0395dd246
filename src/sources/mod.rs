//! Pluggable origins for game artwork.

pub mod manual;

use async_trait::async_trait;

use crate::core::{GameRecord, ImageSet};
use crate::error::Result;

pub use manual::ManualImageSource;

/// A place images can be fetched from.
///
/// Sources are consulted in registration order by the engine; returning an
/// empty [`ImageSet`] means "nothing for this game here" and hands the
/// lookup to the next source. Errors are logged by the engine and treated
/// the same way.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Short name used in logs and resolution results
    fn name(&self) -> &str;

    /// Look up images for a game
    async fn fetch_images(&self, game: &GameRecord) -> Result<ImageSet>;
}
