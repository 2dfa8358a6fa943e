//! Occupancy grid construction from obstacle records.
//!
//! Discretizes the obstacle field into a binary grid for one altitude
//! layer: a cell is blocked iff some obstacle's footprint, inflated by
//! the safety distance, covers it and the obstacle's top reaches the
//! planning altitude.

use crate::colliders::ObstacleRecord;

/// Integer grid index. Row indexes north, col indexes east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Euclidean distance to another cell, in cell units.
    #[inline]
    pub fn distance(&self, other: &Cell) -> f32 {
        let dr = (other.row - self.row) as f32;
        let dc = (other.col - self.col) as f32;
        (dr * dr + dc * dc).sqrt()
    }

    /// Chebyshev distance (8-connected move count).
    #[inline]
    pub fn chebyshev_distance(&self, other: &Cell) -> i32 {
        (other.row - self.row).abs().max((other.col - self.col).abs())
    }

    /// Manhattan distance (4-connected move count).
    #[inline]
    pub fn manhattan_distance(&self, other: &Cell) -> i32 {
        (other.row - self.row).abs() + (other.col - self.col).abs()
    }
}

/// Binary occupancy grid for a single altitude layer.
///
/// Cell (0, 0) corresponds to world position
/// (`north_offset`, `east_offset`); offsets are the floor of the minimum
/// inflated obstacle extents.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    occupied: Vec<bool>,
    north_offset: i32,
    east_offset: i32,
}

impl OccupancyGrid {
    /// Build a grid from obstacle records for the given flight altitude
    /// and safety distance.
    ///
    /// Obstacles whose top (`alt + d_alt + safety`) stays below the target
    /// altitude do not block this layer. An empty obstacle list yields a
    /// degenerate 1x1 free grid with zero offsets.
    pub fn from_obstacles(
        obstacles: &[ObstacleRecord],
        target_altitude: f32,
        safety_distance: f32,
    ) -> Self {
        if obstacles.is_empty() {
            return Self {
                width: 1,
                height: 1,
                occupied: vec![false],
                north_offset: 0,
                east_offset: 0,
            };
        }

        let mut north_min = f32::MAX;
        let mut north_max = f32::MIN;
        let mut east_min = f32::MAX;
        let mut east_max = f32::MIN;

        for o in obstacles {
            north_min = north_min.min(o.north - o.d_north - safety_distance);
            north_max = north_max.max(o.north + o.d_north + safety_distance);
            east_min = east_min.min(o.east - o.d_east - safety_distance);
            east_max = east_max.max(o.east + o.d_east + safety_distance);
        }

        let north_offset = north_min.floor() as i32;
        let east_offset = east_min.floor() as i32;

        let height = (north_max - north_min).ceil() as usize + 1;
        let width = (east_max - east_min).ceil() as usize + 1;

        let mut grid = Self {
            width,
            height,
            occupied: vec![false; width * height],
            north_offset,
            east_offset,
        };

        for o in obstacles {
            // Altitude gating: short obstacles do not block this layer
            if o.alt + o.d_alt + safety_distance < target_altitude {
                continue;
            }

            let row_min = (o.north - o.d_north - safety_distance - north_offset as f32).floor();
            let row_max = (o.north + o.d_north + safety_distance - north_offset as f32).ceil();
            let col_min = (o.east - o.d_east - safety_distance - east_offset as f32).floor();
            let col_max = (o.east + o.d_east + safety_distance - east_offset as f32).ceil();

            // Clamp footprint indices to grid bounds rather than fault
            let row_min = (row_min as i64).clamp(0, height as i64 - 1) as usize;
            let row_max = (row_max as i64).clamp(0, height as i64 - 1) as usize;
            let col_min = (col_min as i64).clamp(0, width as i64 - 1) as usize;
            let col_max = (col_max as i64).clamp(0, width as i64 - 1) as usize;

            for row in row_min..=row_max {
                for col in col_min..=col_max {
                    grid.occupied[row * width + col] = true;
                }
            }
        }

        grid
    }

    /// Grid width in cells (east axis).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells (north axis).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// World north coordinate of cell row 0.
    #[inline]
    pub fn north_offset(&self) -> i32 {
        self.north_offset
    }

    /// World east coordinate of cell col 0.
    #[inline]
    pub fn east_offset(&self) -> i32 {
        self.east_offset
    }

    /// Check whether a cell lies within grid bounds.
    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.height
            && (cell.col as usize) < self.width
    }

    /// Check whether a cell is blocked. Out-of-bounds cells are blocked.
    #[inline]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        if !self.in_bounds(cell) {
            return true;
        }
        self.occupied[cell.row as usize * self.width + cell.col as usize]
    }

    /// Convert a local (north, east) position to the containing cell.
    #[inline]
    pub fn world_to_cell(&self, north: f32, east: f32) -> Cell {
        Cell::new(
            (north - self.north_offset as f32).ceil() as i32,
            (east - self.east_offset as f32).ceil() as i32,
        )
    }

    /// Convert a cell back to a local (north, east) position.
    #[inline]
    pub fn cell_to_world(&self, cell: Cell) -> (f32, f32) {
        (
            (cell.row + self.north_offset) as f32,
            (cell.col + self.east_offset) as f32,
        )
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|&&o| o).count()
    }
}
