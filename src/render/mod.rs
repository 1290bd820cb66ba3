pub mod projector;
pub mod renderer;
pub mod sprites;

pub use projector::{fade_color, DrawItem, Fill, ProjectableObject, Projector};
pub use renderer::Renderer;
pub use sprites::{SpriteAtlas, SpriteId};
