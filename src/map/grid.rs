use rand::Rng;
use raylib::prelude::*;

/// What a grid query outside [0,width)×[0,height) reports.
///
/// `Open` is the classic convention: the border must be filled with blocking
/// cells by the level or entities can walk off the map. `Solid` hardens the
/// boundary without a border fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutOfBounds {
    /// Out-of-range cells read as empty.
    Open,
    /// Out-of-range cells read as a wall of the given material.
    Solid(Color),
}

/// Occupancy grid of uniform square cells.
///
/// Each cell is either empty or holds a blocking wall material (its color).
/// Built once at level start; gameplay only reads it.
pub struct GridMap {
    pub width: i32,
    pub height: i32,
    cell_size: f32,
    cells: Vec<Option<Color>>,
    pub out_of_bounds: OutOfBounds,
    pub background: Color,
}

impl GridMap {
    /// Create an empty grid. `cell_size` is the world-space edge length of a cell.
    pub fn new(width: i32, height: i32, cell_size: f32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            width,
            height,
            cell_size,
            cells: vec![None; (width * height) as usize],
            out_of_bounds: OutOfBounds::Open,
            background: Color::BLACK,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total world-space width of the grid.
    pub fn world_width(&self) -> f32 {
        self.width as f32 * self.cell_size
    }

    /// Total world-space height of the grid.
    pub fn world_height(&self) -> f32 {
        self.height as f32 * self.cell_size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Material at cell (x, y). Out-of-range queries follow the
    /// [`OutOfBounds`] policy instead of being an error.
    pub fn cell(&self, x: i32, y: i32) -> Option<Color> {
        if self.in_bounds(x, y) {
            self.cells[(y * self.width + x) as usize]
        } else {
            match self.out_of_bounds {
                OutOfBounds::Open => None,
                OutOfBounds::Solid(material) => Some(material),
            }
        }
    }

    /// Set the material of cell (x, y). Out-of-range writes are ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, material: Option<Color>) {
        if self.in_bounds(x, y) {
            self.cells[(y * self.width + x) as usize] = material;
        }
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some()
    }

    /// Cell coordinates containing the world-space point (floor division).
    pub fn cell_coords_at(&self, point: Vector2) -> (i32, i32) {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    /// Material at a world-space point.
    pub fn material_at(&self, point: Vector2) -> Option<Color> {
        let (x, y) = self.cell_coords_at(point);
        self.cell(x, y)
    }

    /// Cell coordinates intersecting a world-space rectangle, clamped to the
    /// grid. Used to cull the top-down view to the camera area.
    pub fn cells_in_rect(&self, rect: Rectangle) -> Vec<(i32, i32)> {
        let x_min = ((rect.x / self.cell_size) as i32).max(0);
        let y_min = ((rect.y / self.cell_size) as i32).max(0);
        let x_max = (((rect.x + rect.width) / self.cell_size) as i32 + 1).min(self.width);
        let y_max = (((rect.y + rect.height) / self.cell_size) as i32 + 1).min(self.height);

        let mut cells = Vec::new();
        for x in x_min..x_max {
            for y in y_min..y_max {
                cells.push((x, y));
            }
        }
        cells
    }

    /// Fill the outermost ring of cells with a wall material.
    pub fn fill_border(&mut self, material: Color) {
        for x in 0..self.width {
            self.set_cell(x, 0, Some(material));
            self.set_cell(x, self.height - 1, Some(material));
        }
        for y in 0..self.height {
            self.set_cell(0, y, Some(material));
            self.set_cell(self.width - 1, y, Some(material));
        }
    }

    /// Clear the 3×3 block of cells around a cell, opening up space for a
    /// spawn point.
    pub fn clear_cells_around(&mut self, cell: (i32, i32)) {
        for x in cell.0 - 1..=cell.0 + 1 {
            for y in cell.1 - 1..=cell.1 + 1 {
                self.set_cell(x, y, None);
            }
        }
    }

    /// Scatter walls over the grid: each cell becomes a wall with probability
    /// `chance`, drawing from `n_colors` random materials, then the border is
    /// filled so nothing can leave the map.
    pub fn randomize(mut self, chance: f32, n_colors: usize) -> Self {
        let mut rng = rand::thread_rng();
        let colors: Vec<Color> = (0..n_colors.max(1))
            .map(|_| {
                Color::new(
                    rng.gen_range(50..=255),
                    rng.gen_range(50..=255),
                    rng.gen_range(50..=255),
                    255,
                )
            })
            .collect();

        for x in 0..self.width {
            for y in 0..self.height {
                if rng.gen::<f32>() < chance {
                    let color = colors[rng.gen_range(0..colors.len())];
                    self.set_cell(x, y, Some(color));
                }
            }
        }
        self.fill_border(colors[0]);
        self
    }
}
