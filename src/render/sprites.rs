use raylib::prelude::*;
use tracing::warn;

/// Width and height of one sprite on the sheet.
const SPRITE_W: f32 = 16.0;
const SPRITE_H: f32 = 32.0;

/// Stable handle into the sprite sheet. Enemies occupy the first row,
/// pickups the second; index 4 of the pickup row is the emptied husk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Enemy(u8),
    Pickup(u8),
}

/// Explicit sprite table sliced from one sheet, built once at startup and
/// passed by reference into the renderer. Nothing global.
pub struct SpriteAtlas {
    texture: Texture2D,
}

impl SpriteAtlas {
    /// Load the sheet from disk. A missing or unreadable file logs a warning
    /// and returns `None`; the renderer then falls back to colored outlines.
    pub fn load(rl: &mut RaylibHandle, thread: &RaylibThread, path: &str) -> Option<Self> {
        match rl.load_texture(thread, path) {
            Ok(texture) => Some(Self { texture }),
            Err(err) => {
                warn!("sprite sheet {} unavailable: {}", path, err);
                None
            }
        }
    }

    pub fn texture(&self) -> &Texture2D {
        &self.texture
    }

    /// Source rectangle of a sprite on the sheet.
    pub fn source_rect(id: SpriteId) -> Rectangle {
        match id {
            SpriteId::Enemy(i) => Rectangle::new(i as f32 * SPRITE_W, 0.0, SPRITE_W, SPRITE_H),
            SpriteId::Pickup(i) => {
                Rectangle::new(i as f32 * SPRITE_W, SPRITE_H, SPRITE_W, SPRITE_H)
            }
        }
    }
}
