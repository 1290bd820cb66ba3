mod entity;
mod game_state;
mod player;

pub use entity::{ContactOutcome, EnemyParams, Entity, EntityKind};
pub use game_state::{GameState, PlayerInput};
pub use player::Player;
