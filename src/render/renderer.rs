use raylib::prelude::*;

use super::projector::{fade_color, DrawItem, Fill};
use super::sprites::SpriteAtlas;
use crate::game::GameState;

/// Draws the projector's output (and the top-down debug view) against a
/// raylib draw handle. Owns no world state.
pub struct Renderer {
    pub screen_width: i32,
    pub screen_height: i32,
}

impl Renderer {
    pub fn new(screen_width: i32, screen_height: i32) -> Self {
        Self {
            screen_width,
            screen_height,
        }
    }

    /// Paint the ordered draw list. Items arrive far-to-near, so plain
    /// sequential drawing is the depth sort.
    pub fn draw_scene(
        &self,
        d: &mut RaylibDrawHandle,
        items: &[DrawItem],
        atlas: Option<&SpriteAtlas>,
    ) {
        for item in items {
            match item.fill {
                Fill::Solid(color) => d.draw_rectangle_rec(item.rect, color),
                Fill::Sprite { id, fallback } => match atlas {
                    Some(atlas) => d.draw_texture_pro(
                        atlas.texture(),
                        SpriteAtlas::source_rect(id),
                        item.rect,
                        Vector2::zero(),
                        0.0,
                        Color::WHITE,
                    ),
                    None => self.draw_outline(d, item.rect, fallback),
                },
                Fill::Outline(color) => self.draw_outline(d, item.rect, color),
            }
        }
    }

    /// Top-down view: the frame's rays, the wall cells near the camera and
    /// every entity footprint, all centered on the player.
    pub fn draw_top_down(&self, d: &mut RaylibDrawHandle, state: &GameState) {
        let player = &state.player;
        let half_w = self.screen_width as f32 / 2.0;
        let half_h = self.screen_height as f32 / 2.0;
        let cam = Vector2::new(half_w - player.position.x, half_h - player.position.y);
        let background = fade_color(state.grid.background, Color::WHITE, 0.05);

        for hit in &state.ray_field {
            match hit.point {
                Some(point) => {
                    let color = match hit.material {
                        Some(material) => {
                            fade_color(material, background, hit.distance() / player.sight)
                        }
                        None => background,
                    };
                    d.draw_line_v(hit.origin + cam, point + cam, color);
                }
                None => {
                    let end = hit.origin + hit.direction * player.sight;
                    d.draw_line_v(hit.origin + cam, end + cam, background);
                }
            }
        }

        // only the cells inside the camera rectangle get drawn
        let cell_size = state.grid.cell_size();
        let camera_rect = Rectangle::new(
            player.position.x - half_w,
            player.position.y - half_h,
            self.screen_width as f32,
            self.screen_height as f32,
        );
        for (x, y) in state.grid.cells_in_rect(camera_rect) {
            if let Some(material) = state.grid.cell(x, y) {
                let rect = Rectangle::new(
                    x as f32 * cell_size + cam.x,
                    y as f32 * cell_size + cam.y,
                    cell_size,
                    cell_size,
                );
                d.draw_rectangle_rec(rect, material);
            }
        }

        for entity in &state.entities {
            let footprint = entity.footprint();
            let rect = Rectangle::new(footprint.x + cam.x, footprint.y + cam.y, footprint.width, footprint.height);
            self.draw_outline(d, rect, entity.color_2d());
        }
    }

    /// Multiline HUD text on a solid backing. `anchor` 0.0 left-aligns at x,
    /// 0.5 centers, 1.0 right-aligns.
    pub fn draw_text_block(
        &self,
        d: &mut RaylibDrawHandle,
        text: &str,
        x: i32,
        y: i32,
        size: i32,
        anchor: f32,
    ) {
        let mut line_y = y;
        for line in text.lines() {
            let width = d.measure_text(line, size);
            let line_x = x - (anchor * width as f32) as i32;
            d.draw_rectangle(line_x - 2, line_y, width + 4, size, Color::BLACK);
            d.draw_text(line, line_x, line_y, size, Color::WHITE);
            line_y += size;
        }
    }

    fn draw_outline(&self, d: &mut RaylibDrawHandle, rect: Rectangle, color: Color) {
        d.draw_rectangle_lines(
            rect.x as i32,
            rect.y as i32,
            rect.width as i32,
            rect.height as i32,
            color,
        );
    }
}
