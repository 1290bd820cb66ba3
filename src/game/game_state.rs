use rand::Rng;
use raylib::prelude::*;
use tracing::info;

use super::{ContactOutcome, EnemyParams, Entity, Player};
use crate::map::GridMap;
use crate::raycaster::{cast_ray, line_of_sight, CollisionResolver, Ray, RayHit};

/// One frame of player input, already folded down from raw key state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// -1, 0 or 1.
    pub forward: f32,
    pub strafe: f32,
    pub turn: f32,
    pub jump: bool,
}

/// The whole simulation: grid, player, entities and the per-frame ray field.
///
/// Update and render are strictly phased: one `update` call finishes all
/// movement, collision resolution and the ray-field recompute before any
/// drawing happens.
pub struct GameState {
    pub grid: GridMap,
    pub player: Player,
    pub entities: Vec<Entity>,
    /// One hit per screen column, left to right. Rebuilt from scratch every
    /// frame; nothing is cached across frames.
    pub ray_field: Vec<RayHit>,
    pub resolver: CollisionResolver,
    pub elapsed: f32,
    pub total_stars: usize,
    game_over: bool,
}

impl GameState {
    pub fn new(grid: GridMap, player: Player, entities: Vec<Entity>) -> Self {
        let mut state = Self {
            grid,
            player,
            entities: Vec::new(),
            ray_field: Vec::new(),
            resolver: CollisionResolver::default(),
            elapsed: 0.0,
            total_stars: 0,
            game_over: false,
        };
        for entity in entities {
            state.add_entity(entity);
        }
        state.update_ray_field();
        state
    }

    /// A fresh scattered level with the standard enemy roster and four stars.
    pub fn demo() -> Self {
        let grid = GridMap::new(64, 48, 16.0).randomize(0.2, 5);
        let spawn = Vector2::new(grid.world_width() / 2.0, grid.world_height() / 2.0);
        Self::from_grid(grid, spawn)
    }

    /// Populate a grid with the player at `spawn` plus enemies and stars at
    /// their standard stations, clearing wall cells around everyone.
    pub fn from_grid(mut grid: GridMap, spawn: Vector2) -> Self {
        let mut rng = rand::thread_rng();
        let w = grid.world_width();
        let h = grid.world_height();
        let cs = grid.cell_size();

        let mut entities = vec![
            Entity::enemy(
                "Skulker",
                0,
                Vector2::new(w * 0.25, h * 0.25),
                EnemyParams {
                    move_speed: 25.0,
                    aggro_cooldown: 15.0,
                    ..EnemyParams::default()
                },
            ),
            Entity::enemy(
                "Observer",
                1,
                Vector2::new(w * 0.75, h * 0.25),
                EnemyParams {
                    move_speed: 30.0,
                    sight: 200.0,
                    ..EnemyParams::default()
                },
            ),
            Entity::enemy(
                "Remorse",
                2,
                Vector2::new(w * 0.75, h * 0.75),
                EnemyParams {
                    move_speed: 40.0,
                    sight: 90.0,
                    aggro_cooldown: 10.0,
                    ..EnemyParams::default()
                },
            ),
            Entity::enemy(
                "Conjurer",
                3,
                Vector2::new(w * 0.25, h * 0.75),
                EnemyParams {
                    move_speed: 20.0,
                    turn_speed: 90.0,
                    sight: 150.0,
                    ..EnemyParams::default()
                },
            ),
        ];
        for i in 0..4 {
            let pos = Vector2::new(
                cs * (0.5 + rng.gen_range(0..grid.width) as f32),
                cs * (0.5 + rng.gen_range(0..grid.height) as f32),
            );
            entities.push(Entity::pickup(&format!("Pickup {}", i + 1), i as u8 % 4, pos));
        }

        // open up the cells around every spawn position
        let player_cell = grid.cell_coords_at(spawn);
        grid.clear_cells_around(player_cell);
        for entity in &entities {
            let cell = grid.cell_coords_at(entity.position);
            grid.clear_cells_around(cell);
        }

        Self::new(grid, Player::new(spawn), entities)
    }

    pub fn add_entity(&mut self, entity: Entity) {
        if entity.is_star() {
            self.total_stars += 1;
        }
        self.entities.push(entity);
    }

    pub fn stars_remaining(&self) -> usize {
        self.entities.iter().filter(|e| e.is_star()).count()
    }

    pub fn is_win(&self) -> bool {
        self.stars_remaining() == 0
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over || self.is_win()
    }

    pub fn kill_player(&mut self, killed_by: &str) {
        info!("player was killed by {}", killed_by);
        self.game_over = true;
    }

    pub fn has_line_of_sight(&self, from: Vector2, to: Vector2) -> bool {
        line_of_sight(&self.grid, from, to)
    }

    /// Advance the simulation one frame: player motion (clamped by the
    /// resolver), entity updates, contact effects, then the ray field.
    pub fn update(&mut self, input: &PlayerInput, dt: f32) {
        self.player.turn(input.turn, dt);
        let target = self.player.walk(input.forward, input.strafe, dt);
        self.player.position = self.resolver.resolve(&self.grid, target);
        if input.jump && !self.is_game_over() {
            self.player.jump();
        }
        self.player.update_vertical(dt);

        let game_over = self.is_game_over();
        let player_pos = self.player.position;

        // Snapshot the entity count: anything appended mid-update joins the
        // next frame instead of being half-updated in this one.
        let count = self.entities.len();
        {
            let grid = &self.grid;
            let resolver = &self.resolver;
            for entity in self.entities.iter_mut().take(count) {
                entity.update(grid, resolver, player_pos, game_over, dt);
            }
        }

        if !game_over {
            for i in 0..count {
                if player_pos.distance_to(self.entities[i].position) <= self.entities[i].radius {
                    match self.entities[i].on_player_contact() {
                        ContactOutcome::Lethal => {
                            let name = self.entities[i].name.clone();
                            self.kill_player(&name);
                        }
                        ContactOutcome::Collected => {
                            info!(
                                "collected {} ({} remaining)",
                                self.entities[i].name,
                                self.stars_remaining()
                            );
                        }
                        ContactOutcome::Inert => {}
                    }
                }
            }
        }

        self.update_ray_field();

        if !self.is_game_over() {
            self.elapsed += dt;
        }
    }

    /// Recompute the frame's ray field: one cast per sampled FOV direction.
    pub fn update_ray_field(&mut self) {
        self.ray_field.clear();
        let origin = self.player.position;
        let sight = self.player.sight;
        for (i, direction) in self.player.ray_directions().into_iter().enumerate() {
            let ray = Ray {
                origin,
                direction,
                max_distance: sight,
            };
            self.ray_field.push(cast_ray(&self.grid, i as i32, &ray, false, &[]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALL: Color = Color::new(100, 100, 100, 255);

    fn empty_arena() -> GridMap {
        let mut grid = GridMap::new(16, 16, 16.0);
        grid.fill_border(WALL);
        grid
    }

    fn center_player(grid: &GridMap) -> Player {
        let mut player = Player::new(Vector2::new(
            grid.world_width() / 2.0,
            grid.world_height() / 2.0,
        ));
        player.facing = Vector2::new(0.0, 1.0);
        player
    }

    #[test]
    fn test_ray_field_has_one_hit_per_column() {
        let grid = empty_arena();
        let player = center_player(&grid);
        let ray_count = player.ray_count;
        let mut state = GameState::new(grid, player, Vec::new());
        state.update(&PlayerInput::default(), 1.0 / 60.0);
        assert_eq!(state.ray_field.len(), ray_count);
        for (i, hit) in state.ray_field.iter().enumerate() {
            assert_eq!(hit.column, i as i32);
        }
    }

    #[test]
    fn test_line_of_sight_through_state() {
        // 3x3 bordered grid: the single interior cell sees itself
        let mut grid = GridMap::new(3, 3, 16.0);
        grid.fill_border(WALL);
        let player = Player::new(Vector2::new(24.0, 24.0));
        let state = GameState::new(grid, player, Vec::new());
        let center = Vector2::new(24.0, 24.0);
        assert!(state.has_line_of_sight(center, center));
    }

    #[test]
    fn test_collecting_all_stars_wins() {
        let grid = empty_arena();
        let player = center_player(&grid);
        let at_player = player.position;
        let star = Entity::pickup("Pickup 1", 0, at_player);
        let mut state = GameState::new(grid, player, vec![star]);
        assert_eq!(state.total_stars, 1);
        assert!(!state.is_win());

        state.update(&PlayerInput::default(), 1.0 / 60.0);
        assert_eq!(state.stars_remaining(), 0);
        assert!(state.is_win());
        assert!(state.is_game_over());
        // the husk remains as an entity
        assert_eq!(state.entities.len(), 1);
        assert!(!state.entities[0].is_star());
    }

    #[test]
    fn test_enemy_contact_kills() {
        let grid = empty_arena();
        let player = center_player(&grid);
        let enemy = Entity::enemy("Skulker", 0, player.position, EnemyParams::default());
        let mut state = GameState::new(grid, player, vec![enemy]);
        // keep one star in play so the game isn't already won
        let far = Vector2::new(40.0, 40.0);
        state.add_entity(Entity::pickup("Pickup 1", 0, far));

        state.update(&PlayerInput::default(), 1.0 / 60.0);
        assert!(state.is_game_over());
        assert!(!state.is_win());
    }

    #[test]
    fn test_clock_stops_at_game_over() {
        let grid = empty_arena();
        let player = center_player(&grid);
        let mut state = GameState::new(grid, player, Vec::new());
        // no stars at all counts as a win immediately
        assert!(state.is_game_over());
        state.update(&PlayerInput::default(), 1.0);
        assert_eq!(state.elapsed, 0.0);
    }

    #[test]
    fn test_movement_is_wall_clamped() {
        let mut grid = GridMap::new(6, 6, 16.0);
        grid.fill_border(WALL);
        let mut player = Player::new(Vector2::new(48.0, 70.0));
        player.facing = Vector2::new(0.0, 1.0);
        player.move_speed = 40.0;
        let mut state = GameState::new(grid, player, Vec::new());
        state.add_entity(Entity::pickup("Pickup 1", 0, Vector2::new(24.0, 24.0)));

        // a step that lands on the border wall at y = 80
        let input = PlayerInput {
            forward: 1.0,
            ..PlayerInput::default()
        };
        state.update(&input, 0.25);
        let cell = state.grid.cell_coords_at(state.player.position);
        assert!(!state.grid.is_solid(cell.0, cell.1));
        // ejected to exactly the buffer clearance from the wall face
        assert!((state.player.position.y - (80.0 - state.resolver.buffer)).abs() < 1e-3);
        assert!((state.player.position.x - 48.0).abs() < 1e-3);
    }

    #[test]
    fn test_demo_is_playable() {
        let state = GameState::demo();
        assert_eq!(state.total_stars, 4);
        assert_eq!(state.entities.len(), 8);
        // the player spawn was carved open
        let cell = state.grid.cell_coords_at(state.player.position);
        assert!(!state.grid.is_solid(cell.0, cell.1));
        assert_eq!(state.ray_field.len(), state.player.ray_count);
    }
}
