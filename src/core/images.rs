use serde::{Deserialize, Serialize};

/// Resolved images for a single game, one reference per named slot.
///
/// References are opaque strings (URL or data URI). The set of slots is
/// closed: anything a metadata source returns beyond these is dropped at
/// the type boundary rather than carried along as loose fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    /// Wide banner image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,

    /// Full-bleed background image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    /// Box-art / cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    /// Ordered gallery screenshots
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<String>,
}

impl ImageSet {
    /// True when no slot holds a reference
    pub fn is_empty(&self) -> bool {
        self.banner.is_none()
            && self.background.is_none()
            && self.cover.is_none()
            && self.screenshots.is_empty()
    }

    /// Set the banner slot
    pub fn with_banner(mut self, reference: impl Into<String>) -> Self {
        self.banner = Some(reference.into());
        self
    }

    /// Set the background slot
    pub fn with_background(mut self, reference: impl Into<String>) -> Self {
        self.background = Some(reference.into());
        self
    }

    /// Set the cover slot
    pub fn with_cover(mut self, reference: impl Into<String>) -> Self {
        self.cover = Some(reference.into());
        self
    }

    /// Append a screenshot to the gallery
    pub fn with_screenshot(mut self, reference: impl Into<String>) -> Self {
        self.screenshots.push(reference.into());
        self
    }
}
