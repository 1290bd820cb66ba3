use rand::Rng;
use raylib::prelude::*;
use tracing::info;

use crate::map::vec::{rotated_deg, scaled_to};
use crate::map::GridMap;
use crate::raycaster::{line_of_sight, CollisionResolver};
use crate::render::{ProjectableObject, SpriteId};

/// What touching the player did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Nothing happened (e.g. an already-emptied pickup).
    Inert,
    /// The entity killed the player.
    Lethal,
    /// A star was collected.
    Collected,
}

/// Enemy tuning. Defaults match the slowest baseline enemy.
#[derive(Debug, Clone, Copy)]
pub struct EnemyParams {
    pub move_speed: f32,
    /// Wander turn rate in degrees per second.
    pub turn_speed: f32,
    /// Distance within which the player can be spotted.
    pub sight: f32,
    /// Seconds an enemy stays aggressive after losing sight of the player.
    pub aggro_cooldown: f32,
}

impl Default for EnemyParams {
    fn default() -> Self {
        Self {
            move_speed: 25.0,
            turn_speed: 180.0,
            sight: 120.0,
            aggro_cooldown: 5.0,
        }
    }
}

/// The closed set of dynamic entity behaviors.
pub enum EntityKind {
    Enemy {
        params: EnemyParams,
        /// Current wander/chase heading, unit length.
        vel: Vector2,
        aggro: bool,
        cooldown: f32,
    },
    Pickup {
        collected: bool,
    },
}

/// A dynamic world object: a patrolling enemy or a star pickup.
pub struct Entity {
    pub name: String,
    pub position: Vector2,
    /// Footprint edge length in world units.
    pub width: f32,
    /// Visual height in world units, used by the projector.
    pub height: f32,
    /// Contact radius against the player.
    pub radius: f32,
    pub sprite: Option<SpriteId>,
    pub kind: EntityKind,
}

impl Entity {
    pub fn enemy(name: &str, sprite: u8, position: Vector2, params: EnemyParams) -> Self {
        let heading = rand::thread_rng().gen::<f32>() * 360.0;
        Self {
            name: name.to_string(),
            position,
            width: 4.0,
            height: 8.0,
            radius: 3.0,
            sprite: Some(SpriteId::Enemy(sprite)),
            kind: EntityKind::Enemy {
                params,
                vel: rotated_deg(Vector2::new(0.0, 1.0), heading),
                aggro: false,
                cooldown: 0.0,
            },
        }
    }

    pub fn pickup(name: &str, sprite: u8, position: Vector2) -> Self {
        Self {
            name: name.to_string(),
            position,
            width: 4.0,
            height: 8.0,
            radius: 10.0,
            sprite: Some(SpriteId::Pickup(sprite)),
            kind: EntityKind::Pickup { collected: false },
        }
    }

    /// A pickup that still counts toward the win condition.
    pub fn is_star(&self) -> bool {
        matches!(self.kind, EntityKind::Pickup { collected: false })
    }

    pub fn color_2d(&self) -> Color {
        match self.kind {
            EntityKind::Enemy { .. } => Color::new(255, 0, 0, 255),
            EntityKind::Pickup { collected: false } => Color::new(0, 255, 255, 255),
            EntityKind::Pickup { collected: true } => Color::new(0, 150, 255, 255),
        }
    }

    /// Axis-aligned footprint square, centered on the position.
    pub fn footprint(&self) -> Rectangle {
        Rectangle::new(
            self.position.x - self.width / 2.0,
            self.position.y - self.width / 2.0,
            self.width,
            self.width,
        )
    }

    /// The read-only view the projector consumes.
    pub fn projectable(&self) -> ProjectableObject {
        ProjectableObject {
            position: self.position,
            width: self.width,
            height: self.height,
            sprite: self.sprite,
            color: self.color_2d(),
        }
    }

    /// Advance one frame. The grid and resolver come in as read-only
    /// collaborators; entities never reach back into game state.
    pub fn update(
        &mut self,
        grid: &GridMap,
        resolver: &CollisionResolver,
        player_pos: Vector2,
        game_over: bool,
        dt: f32,
    ) {
        let position = self.position;
        if let EntityKind::Enemy {
            params,
            vel,
            aggro,
            cooldown,
        } = &mut self.kind
        {
            let spotted = !game_over
                && position.distance_to(player_pos) < params.sight
                && line_of_sight(grid, position, player_pos);
            if spotted {
                *cooldown = params.aggro_cooldown;
                if !*aggro {
                    info!("{} became aggressive", self.name);
                    *aggro = true;
                }
            }
            if *aggro && (*cooldown < 0.0 || game_over) {
                info!("{} became passive", self.name);
                *aggro = false;
            }

            let mut rng = rand::thread_rng();
            if *aggro {
                *vel = scaled_to(player_pos - position, 1.0);
            } else {
                let wobble = 2.0 * (rng.gen::<f32>() - 0.5) * params.turn_speed * dt;
                *vel = rotated_deg(*vel, wobble);
            }

            let speed = if *aggro {
                params.move_speed
            } else {
                0.666 * params.move_speed
            };
            let target = position + *vel * (speed * dt);
            let resolved = resolver.resolve(grid, target);
            if !*aggro && resolved.distance_to(target) > f32::EPSILON {
                // bumped a wall while wandering: pick a fresh heading
                *vel = rotated_deg(*vel, rng.gen::<f32>() * 360.0);
            }
            self.position = resolved;
            *cooldown -= dt;
        }
    }

    /// Apply the effect of touching the player.
    pub fn on_player_contact(&mut self) -> ContactOutcome {
        match &mut self.kind {
            EntityKind::Enemy { .. } => ContactOutcome::Lethal,
            EntityKind::Pickup { collected } if !*collected => {
                // the star empties in place; the husk stays visible
                *collected = true;
                self.sprite = Some(SpriteId::Pickup(4));
                ContactOutcome::Collected
            }
            EntityKind::Pickup { .. } => ContactOutcome::Inert,
        }
    }
}
