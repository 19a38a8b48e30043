//! Square tile map and obstacle queries

/// Square battle map of `size` x `size` cells with static obstacles.
///
/// The map only answers queries; layouts are supplied by the host, never
/// generated here.
#[derive(Debug, Clone)]
pub struct Map {
    size: i32,
    obstacles: Vec<bool>,
}

impl Map {
    /// Create an open map with the given side length in cells
    pub fn new(size: i32) -> Self {
        let size = size.max(1);
        Self {
            size,
            obstacles: vec![false; (size * size) as usize],
        }
    }

    /// Side length of the map in cells
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Mark a cell as an obstacle; out-of-range coordinates are ignored
    pub fn set_obstacle(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.index(x, y) {
            self.obstacles[idx] = true;
        }
    }

    /// Clear an obstacle; out-of-range coordinates are ignored
    pub fn clear_obstacle(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.index(x, y) {
            self.obstacles[idx] = false;
        }
    }

    /// Whether the given cell is blocked by an obstacle.
    ///
    /// Cells outside the map are reported as open: leaving the map is the
    /// edge-reflection rule's concern, not the obstacle rule's.
    pub fn is_obstacle(&self, cell_x: i32, cell_y: i32) -> bool {
        self.index(cell_x, cell_y)
            .map(|idx| self.obstacles[idx])
            .unwrap_or(false)
    }

    /// Whether the given cell lies inside the map bounds
    pub fn in_bounds(&self, cell_x: i32, cell_y: i32) -> bool {
        cell_x >= 0 && cell_x < self.size && cell_y >= 0 && cell_y < self.size
    }

    /// Resolve a continuous coordinate to its cell index.
    ///
    /// Truncates toward zero, matching how entity positions are compared
    /// against projectile positions everywhere in the simulation.
    pub fn cell_of(coord: f32) -> i32 {
        coord as i32
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some((y * self.size + x) as usize)
        } else {
            None
        }
    }
}
