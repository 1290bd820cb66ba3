use std::path::Path;

use raylib::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::GridMap;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read or write level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cell data does not match level dimensions ({width}x{height}, {cells} cells)")]
    Shape { width: i32, height: i32, cells: usize },
}

/// On-disk representation of a level: grid dimensions, materials as RGB
/// triples, and the player spawn point. JSON on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelFile {
    pub width: i32,
    pub height: i32,
    pub cell_size: f32,
    pub background: [u8; 3],
    pub cells: Vec<Option<[u8; 3]>>,
    pub spawn: [f32; 2],
}

impl LevelFile {
    /// Snapshot a grid and spawn point into a serializable level.
    pub fn from_world(grid: &GridMap, spawn: Vector2) -> Self {
        let mut cells = Vec::with_capacity((grid.width * grid.height) as usize);
        for y in 0..grid.height {
            for x in 0..grid.width {
                cells.push(grid.cell(x, y).map(|c| [c.r, c.g, c.b]));
            }
        }
        Self {
            width: grid.width,
            height: grid.height,
            cell_size: grid.cell_size(),
            background: [grid.background.r, grid.background.g, grid.background.b],
            cells,
            spawn: [spawn.x, spawn.y],
        }
    }

    /// Rebuild the grid and spawn point this level describes.
    pub fn into_world(self) -> Result<(GridMap, Vector2), LevelError> {
        if self.width <= 0
            || self.height <= 0
            || self.cell_size <= 0.0
            || self.cells.len() != (self.width * self.height) as usize
        {
            return Err(LevelError::Shape {
                width: self.width,
                height: self.height,
                cells: self.cells.len(),
            });
        }
        let mut grid = GridMap::new(self.width, self.height, self.cell_size);
        grid.background = Color::new(self.background[0], self.background[1], self.background[2], 255);
        for y in 0..self.height {
            for x in 0..self.width {
                let material = self.cells[(y * self.width + x) as usize]
                    .map(|[r, g, b]| Color::new(r, g, b, 255));
                grid.set_cell(x, y, material);
            }
        }
        Ok((grid, Vector2::new(self.spawn[0], self.spawn[1])))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let bytes = serde_json::to_vec(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_round_trip() {
        let mut grid = GridMap::new(6, 5, 16.0);
        grid.fill_border(Color::new(120, 60, 60, 255));
        grid.set_cell(2, 2, Some(Color::new(10, 200, 30, 255)));

        let file = LevelFile::from_world(&grid, Vector2::new(40.0, 40.0));
        let json = serde_json::to_vec(&file).unwrap();
        let reloaded: LevelFile = serde_json::from_slice(&json).unwrap();
        let (grid2, spawn) = reloaded.into_world().unwrap();

        assert_eq!(grid2.width, 6);
        assert_eq!(grid2.height, 5);
        assert!((grid2.cell_size() - 16.0).abs() < 1e-6);
        assert!((spawn.x - 40.0).abs() < 1e-6);

        let material = grid2.cell(2, 2).unwrap();
        assert_eq!(material.g, 200);
        assert!(grid2.is_solid(0, 0));
        assert!(!grid2.is_solid(3, 2));
    }

    #[test]
    fn test_level_shape_mismatch_rejected() {
        let grid = GridMap::new(4, 4, 16.0);
        let mut file = LevelFile::from_world(&grid, Vector2::zero());
        file.cells.pop();
        assert!(matches!(file.into_world(), Err(LevelError::Shape { .. })));
    }
}
