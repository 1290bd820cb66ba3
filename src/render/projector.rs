use raylib::prelude::*;

use super::sprites::SpriteId;
use crate::game::Player;
use crate::map::vec::{rotated_deg, signed_angle_deg};
use crate::raycaster::RayHit;

/// Distances below this are treated as this, so an object standing exactly on
/// the viewer never divides by zero.
const MIN_DEPTH: f32 = 0.001;

/// Read-only view of a dynamic object, everything the projector needs and
/// nothing more.
#[derive(Debug, Clone, Copy)]
pub struct ProjectableObject {
    pub position: Vector2,
    /// Footprint edge length in world units.
    pub width: f32,
    /// True height in world units.
    pub height: f32,
    pub sprite: Option<SpriteId>,
    /// Fill used when no sprite (or no atlas) is available.
    pub color: Color,
}

/// How to paint one draw-list rectangle.
#[derive(Debug, Clone, Copy)]
pub enum Fill {
    /// Flat-colored wall slice.
    Solid(Color),
    /// Billboarded sprite; `fallback` paints an outline when the atlas is
    /// missing.
    Sprite { id: SpriteId, fallback: Color },
    /// Outline only (sprite-less object).
    Outline(Color),
}

/// One rectangle of the frame's draw list, ordered far to near.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem {
    pub rect: Rectangle,
    pub fill: Fill,
    pub depth: f32,
}

/// Linear blend from `color` toward `target` by `amount` in [0, 1].
pub fn fade_color(color: Color, target: Color, amount: f32) -> Color {
    let a = amount.clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| (from as f32 + a * (to as f32 - from as f32)).round() as u8;
    Color::new(
        mix(color.r, target.r),
        mix(color.g, target.g),
        mix(color.b, target.b),
        255,
    )
}

/// Turns the frame's ray field and the visible objects into an ordered list
/// of screen rectangles via angular pinhole projection.
///
/// Wall shading and height both use the raw ray length; no cosine correction
/// toward the view axis is applied, so walls bow slightly at the screen
/// edges. That look is part of the renderer's identity — keep it.
pub struct Projector {
    pub screen_width: i32,
    pub screen_height: i32,
    /// World-space height of every wall.
    pub wall_height: f32,
    /// Eye height above the floor when standing.
    pub eye_level: f32,
}

impl Projector {
    pub fn new(screen_width: i32, screen_height: i32) -> Self {
        Self {
            screen_width,
            screen_height,
            wall_height: 5.0,
            eye_level: 2.7,
        }
    }

    /// Objects within sight range and inside the horizontal FOV cone.
    pub fn visible_objects(
        &self,
        player: &Player,
        objects: &[ProjectableObject],
    ) -> Vec<ProjectableObject> {
        let half_fov = player.fov.0 / 2.0;
        objects
            .iter()
            .copied()
            .filter(|object| {
                let to_object = object.position - player.position;
                let distance = to_object.length();
                distance > 0.0
                    && distance <= player.sight
                    && signed_angle_deg(player.facing, to_object).abs() <= half_fov
            })
            .collect()
    }

    /// Build the frame's draw list: one item per wall hit plus one per
    /// visible object, painter-sorted so the farthest item comes first.
    pub fn project(
        &self,
        ray_field: &[RayHit],
        objects: &[ProjectableObject],
        player: &Player,
        background: Color,
    ) -> Vec<DrawItem> {
        let eye = self.eye_level + player.z;
        let mut items: Vec<DrawItem> = Vec::with_capacity(ray_field.len() + objects.len());

        let columns = ray_field.len().max(1) as i32;
        for hit in ray_field {
            if let Some(material) = hit.material {
                if hit.point.is_some() {
                    items.push(self.wall_item(hit, material, columns, eye, player, background));
                }
            }
        }
        for object in objects {
            items.push(self.object_item(object, eye, player));
        }

        // painter's algorithm: draw far to near, nearer rects overwrite
        items.sort_by(|a, b| {
            b.depth
                .partial_cmp(&a.depth)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        items
    }

    fn wall_item(
        &self,
        hit: &RayHit,
        material: Color,
        columns: i32,
        eye: f32,
        player: &Player,
        background: Color,
    ) -> DrawItem {
        let distance = hit.distance().max(MIN_DEPTH);
        let (y1, y2) = self.screen_band(self.wall_height, eye, distance, player.fov.1 / 2.0);

        let x1 = self.screen_width * hit.column / columns;
        let x2 = self.screen_width * (hit.column + 1) / columns;

        DrawItem {
            rect: Rectangle::new(
                x1 as f32,
                y1,
                (x2 - x1 + 1) as f32,
                y2 - y1 + 1.0,
            ),
            fill: Fill::Solid(fade_color(material, background, distance / player.sight)),
            depth: distance,
        }
    }

    fn object_item(&self, object: &ProjectableObject, eye: f32, player: &Player) -> DrawItem {
        let to_object = object.position - player.position;
        let distance = to_object.length().max(MIN_DEPTH);
        let half_fov_x = player.fov.0 / 2.0;

        let (y1, y2) = self.screen_band(object.height, eye, distance, player.fov.1 / 2.0);
        let rect_height = y2 - y1 + 1.0;
        // perspective compression preserves the true aspect ratio
        let rect_width = rect_height / object.height * object.width;

        let left_edge = rotated_deg(player.facing, -half_fov_x);
        let angle_from_left = signed_angle_deg(left_edge, to_object);
        let center_x = angle_from_left / (half_fov_x * 2.0) * self.screen_width as f32;

        let fill = match object.sprite {
            Some(id) => Fill::Sprite {
                id,
                fallback: object.color,
            },
            None => Fill::Outline(object.color),
        };

        DrawItem {
            rect: Rectangle::new(center_x - rect_width / 2.0, y1, rect_width, rect_height),
            fill,
            depth: distance,
        }
    }

    /// Vertical screen band subtended by something `subject_height` tall at
    /// `distance`: the angles above and below the eye line map linearly
    /// against half the vertical FOV onto the screen halves.
    fn screen_band(&self, subject_height: f32, eye: f32, distance: f32, half_fov_y: f32) -> (f32, f32) {
        let h = self.screen_height as f32;
        let theta_upper = (subject_height - eye).atan2(distance).to_degrees();
        let theta_lower = eye.atan2(distance).to_degrees().abs();
        let y1 = if theta_upper >= half_fov_y {
            0.0
        } else {
            h / 2.0 * (1.0 - theta_upper / half_fov_y)
        };
        let y2 = if theta_lower >= half_fov_y {
            h
        } else {
            h / 2.0 * (1.0 + theta_lower / half_fov_y)
        };
        (y1, y2)
    }
}
