//! Image asset availability
//!
//! Images load asynchronously in the browser. Until (or unless) they arrive,
//! the renderer draws procedural stand-ins. The simulation only cares about
//! the natural size of a ready image, which drives Mega projectile sizing.

use serde::{Deserialize, Serialize};

/// Visual entities that may be backed by an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    PlayerShip,
    MegaProjectile,
}

/// Natural pixel dimensions of a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

/// Readiness of each image-backed entity kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetStatus {
    player_ship: Option<ImageSize>,
    mega_projectile: Option<ImageSize>,
}

impl AssetStatus {
    fn slot(&mut self, kind: AssetKind) -> &mut Option<ImageSize> {
        match kind {
            AssetKind::PlayerShip => &mut self.player_ship,
            AssetKind::MegaProjectile => &mut self.mega_projectile,
        }
    }

    /// Record a successfully decoded image. Degenerate sizes are ignored.
    pub fn mark_ready(&mut self, kind: AssetKind, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            *self.slot(kind) = Some(ImageSize { width, height });
        } else {
            log::warn!("Ignoring {:?} image with size {}x{}", kind, width, height);
        }
    }

    /// Forget an image (load error or eviction)
    pub fn mark_unavailable(&mut self, kind: AssetKind) {
        *self.slot(kind) = None;
    }

    pub fn image(&self, kind: AssetKind) -> Option<ImageSize> {
        match kind {
            AssetKind::PlayerShip => self.player_ship,
            AssetKind::MegaProjectile => self.mega_projectile,
        }
    }

    pub fn is_ready(&self, kind: AssetKind) -> bool {
        self.image(kind).is_some()
    }
}
