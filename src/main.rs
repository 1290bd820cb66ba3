use raylib::prelude::*;
use tracing::{info, warn};

mod game;
mod map;
mod raycaster;
mod render;

use game::{GameState, PlayerInput};
use map::LevelFile;
use raycaster::MIN_RAY_COUNT;
use render::{Projector, Renderer, SpriteAtlas};

const SCREEN_WIDTH: i32 = 960;
const SCREEN_HEIGHT: i32 = 720;
const SPRITE_SHEET_PATH: &str = "assets/art.png";
const LEVEL_PATH: &str = "level.json";

fn main() {
    tracing_subscriber::fmt().init();

    let (mut rl, thread) = raylib::init()
        .size(SCREEN_WIDTH, SCREEN_HEIGHT)
        .title("raycrawl")
        .build();
    rl.set_target_fps(60);

    let atlas = SpriteAtlas::load(&mut rl, &thread, SPRITE_SHEET_PATH);
    let projector = Projector::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let renderer = Renderer::new(SCREEN_WIDTH, SCREEN_HEIGHT);

    let mut state = GameState::demo();
    let mut first_person = true;
    let mut show_controls = true;

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            info!("resetting level");
            state = GameState::demo();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F) {
            first_person = !first_person;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_C) {
            show_controls = !show_controls;
        }

        // ray-count tuning, one column per ray at most
        let step = if rl.is_key_down(KeyboardKey::KEY_LEFT_SHIFT) {
            10
        } else {
            5
        };
        if rl.is_key_pressed(KeyboardKey::KEY_EQUAL) {
            state.player.ray_count = (state.player.ray_count + step).min(SCREEN_WIDTH as usize);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_MINUS) {
            state.player.ray_count = state.player.ray_count.saturating_sub(step).max(MIN_RAY_COUNT);
        }

        if rl.is_key_pressed(KeyboardKey::KEY_F5) {
            let file = LevelFile::from_world(&state.grid, state.player.position);
            match file.save(LEVEL_PATH) {
                Ok(()) => info!("level saved to {}", LEVEL_PATH),
                Err(err) => warn!("failed to save level: {}", err),
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_F9) {
            match LevelFile::load(LEVEL_PATH).and_then(|file| file.into_world()) {
                Ok((grid, spawn)) => {
                    info!("level loaded from {}", LEVEL_PATH);
                    state = GameState::from_grid(grid, spawn);
                }
                Err(err) => warn!("failed to load level: {}", err),
            }
        }

        let input = read_input(&rl, &state);
        state.update(&input, dt);

        let fps = rl.get_fps() as u32;
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(state.grid.background);

        if first_person {
            let snapshots: Vec<_> = state.entities.iter().map(|e| e.projectable()).collect();
            let visible = projector.visible_objects(&state.player, &snapshots);
            let items = projector.project(
                &state.ray_field,
                &visible,
                &state.player,
                state.grid.background,
            );
            renderer.draw_scene(&mut d, &items, atlas.as_ref());
        } else {
            renderer.draw_top_down(&mut d, &state);
        }

        draw_hud(&renderer, &mut d, &state, fps, first_person, show_controls);
    }
}

/// Fold raw key state into one frame of input. Movement locks once the game
/// is over; turning stays free so the player can look around.
fn read_input(rl: &RaylibHandle, state: &GameState) -> PlayerInput {
    let mut turn = 0.0;
    if rl.is_key_down(KeyboardKey::KEY_Q) || rl.is_key_down(KeyboardKey::KEY_LEFT) {
        turn -= 1.0;
    }
    if rl.is_key_down(KeyboardKey::KEY_E) || rl.is_key_down(KeyboardKey::KEY_RIGHT) {
        turn += 1.0;
    }

    let mut forward = 0.0;
    let mut strafe = 0.0;
    if !state.is_game_over() {
        if rl.is_key_down(KeyboardKey::KEY_W) || rl.is_key_down(KeyboardKey::KEY_UP) {
            forward += 1.0;
        }
        if rl.is_key_down(KeyboardKey::KEY_S) || rl.is_key_down(KeyboardKey::KEY_DOWN) {
            forward -= 1.0;
        }
        if rl.is_key_down(KeyboardKey::KEY_A) {
            strafe -= 1.0;
        }
        if rl.is_key_down(KeyboardKey::KEY_D) {
            strafe += 1.0;
        }
    }

    PlayerInput {
        forward,
        strafe,
        turn,
        jump: rl.is_key_pressed(KeyboardKey::KEY_SPACE),
    }
}

fn draw_hud(
    renderer: &Renderer,
    d: &mut RaylibDrawHandle,
    state: &GameState,
    fps: u32,
    first_person: bool,
    show_controls: bool,
) {
    let mut text = format!("FPS {}", fps);
    if show_controls {
        text.push_str(&format!(
            "\n[WASD][QE] or arrows to move\nRAYS: {} [+/-] to change\n[SPACE] to jump\n[R] to reset\n[F] switch to {}\n[F5/F9] save/load level\n[C] to hide controls",
            state.player.ray_count,
            if first_person { "2D" } else { "3D" },
        ));
    } else {
        text.push_str("\n[C] to show controls");
    }
    renderer.draw_text_block(d, &text, 4, 4, 16, 0.0);

    let collected = state.total_stars - state.stars_remaining();
    let stars = format!("Collect all stars ({}/{})", collected, state.total_stars);
    renderer.draw_text_block(d, &stars, SCREEN_WIDTH - 4, 4, 16, 1.0);

    if state.is_game_over() {
        let banner = if state.is_win() {
            let mins = (state.elapsed as i32) / 60;
            let secs = state.elapsed - (mins * 60) as f32;
            format!("You win!\n{}:{:04.1}\nPress [R] to restart", mins, secs)
        } else {
            "You lose!\nPress [R] to restart".to_string()
        };
        renderer.draw_text_block(d, &banner, SCREEN_WIDTH / 2, SCREEN_HEIGHT / 2, 24, 0.5);
    }
}
