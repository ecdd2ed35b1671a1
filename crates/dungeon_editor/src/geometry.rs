//! Pixel/grid coordinate mapping
//!
//! Converts pointer positions (in grid pixels, i.e. already relative to the
//! grid's top-left corner) into cells, wall directions and wall boundaries.
//! The cell size is always rounded to a whole number of pixels before any
//! division so that repeated zoom/pan never accumulates fractional drift.

use dungeon_core::{Direction, GridPos};
use serde::{Deserialize, Serialize};

/// A pointer position in grid pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

impl PixelPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: PixelPos) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Orientation of a grid line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// A line of constant y, separating a cell from its north/south neighbour
    Horizontal,
    /// A line of constant x, separating a cell from its east/west neighbour
    Vertical,
}

/// A point snapped onto a grid line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBoundary {
    pub x: f32,
    pub y: f32,
    pub axis: Axis,
}

/// Round a cell size to a whole, positive number of pixels
pub fn snap_cell_size(cell_size: f32) -> i32 {
    if cell_size.is_finite() {
        (cell_size.round() as i32).max(1)
    } else {
        1
    }
}

/// Cell containing a pixel, without bounds checking (may be negative)
pub fn pixel_to_cell(pixel_x: f32, pixel_y: f32, cell_size: f32) -> GridPos {
    let size = snap_cell_size(cell_size) as f32;
    GridPos::new(
        (pixel_x / size).floor() as i32,
        (pixel_y / size).floor() as i32,
    )
}

/// Cell under the pointer, or `None` outside `[0,width) x [0,height)`
pub fn cell_at(
    pixel_x: f32,
    pixel_y: f32,
    cell_size: f32,
    width: u32,
    height: u32,
) -> Option<GridPos> {
    let pos = pixel_to_cell(pixel_x, pixel_y, cell_size);
    let inside = pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < width && (pos.y as u32) < height;
    inside.then_some(pos)
}

/// Wall slot of `cell` the pointer is closest to.
///
/// The axis with the larger offset from the cell centre wins and its sign
/// picks the side. A pointer exactly on the centre resolves to south.
pub fn nearest_wall_direction(
    pixel_x: f32,
    pixel_y: f32,
    cell: GridPos,
    cell_size: f32,
) -> Direction {
    let size = snap_cell_size(cell_size) as f32;
    let center_x = cell.x as f32 * size + size / 2.0;
    let center_y = cell.y as f32 * size + size / 2.0;
    let dx = pixel_x - center_x;
    let dy = pixel_y - center_y;

    if dx == 0.0 && dy == 0.0 {
        return Direction::South;
    }
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Direction::East
        } else {
            Direction::West
        }
    } else if dy < 0.0 {
        Direction::North
    } else {
        Direction::South
    }
}

/// Snap a pointer onto the closest of the four grid lines around its cell.
///
/// Equal distances prefer top, then bottom, then left, then right.
pub fn nearest_wall_boundary(pixel_x: f32, pixel_y: f32, cell_size: f32) -> WallBoundary {
    let size = snap_cell_size(cell_size) as f32;
    let cell = pixel_to_cell(pixel_x, pixel_y, cell_size);
    let left = cell.x as f32 * size;
    let top = cell.y as f32 * size;

    let candidates = [
        (pixel_y - top, Axis::Horizontal, top),
        (top + size - pixel_y, Axis::Horizontal, top + size),
        (pixel_x - left, Axis::Vertical, left),
        (left + size - pixel_x, Axis::Vertical, left + size),
    ];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }

    let (_, axis, line) = best;
    match axis {
        Axis::Horizontal => WallBoundary {
            x: pixel_x,
            y: line,
            axis,
        },
        Axis::Vertical => WallBoundary {
            x: line,
            y: pixel_y,
            axis,
        },
    }
}

fn boundary_index(coord: f32, size: f32) -> i32 {
    let index = (coord / size).floor() as i32;
    let on_line = coord > 0.0 && (coord / size).fract() == 0.0;
    let index = if on_line { index - 1 } else { index };
    index.max(0)
}

/// Map a boundary coordinate back to a concrete cell.
///
/// A coordinate lying exactly on a grid line resolves to the cell on its
/// left/upper side; line zero resolves to the first cell. Negative input is
/// clamped to zero.
pub fn boundary_to_cell(boundary_x: f32, boundary_y: f32, cell_size: f32) -> GridPos {
    let size = snap_cell_size(cell_size) as f32;
    GridPos::new(boundary_index(boundary_x, size), boundary_index(boundary_y, size))
}

/// Pan/zoom state of the view onto the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the grid's top-left corner
    pub offset: PixelPos,
    pub zoom: f32,
    pub base_cell_size: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: PixelPos::default(),
            zoom: 1.0,
            base_cell_size: crate::preferences::DEFAULT_CELL_SIZE,
        }
    }
}

impl Viewport {
    pub fn new(base_cell_size: f32) -> Self {
        Self {
            base_cell_size,
            ..Default::default()
        }
    }

    /// On-screen cell size in whole pixels
    pub fn cell_size(&self) -> f32 {
        snap_cell_size(self.base_cell_size * self.zoom) as f32
    }

    /// Convert a screen position to grid pixels
    pub fn screen_to_grid(&self, screen: PixelPos) -> PixelPos {
        PixelPos::new(screen.x - self.offset.x, screen.y - self.offset.y)
    }

    /// Screen position of a cell's top-left corner, matching `screen_to_grid`
    pub fn cell_origin(&self, cell: GridPos) -> PixelPos {
        let size = self.cell_size();
        PixelPos::new(
            self.offset.x + cell.x as f32 * size,
            self.offset.y + cell.y as f32 * size,
        )
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(0.1, 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at() {
        assert_eq!(cell_at(0.0, 0.0, 32.0, 10, 10), Some(GridPos::new(0, 0)));
        assert_eq!(cell_at(31.9, 32.0, 32.0, 10, 10), Some(GridPos::new(0, 1)));
        assert_eq!(cell_at(319.0, 10.0, 32.0, 10, 10), Some(GridPos::new(9, 0)));
        assert_eq!(cell_at(320.0, 10.0, 32.0, 10, 10), None);
        assert_eq!(cell_at(-0.5, 10.0, 32.0, 10, 10), None);
    }

    #[test]
    fn test_cell_size_is_rounded() {
        // 31.6 rounds to 32, so pixel 63.9 is still in cell 1
        assert_eq!(cell_at(63.9, 0.0, 31.6, 10, 10), Some(GridPos::new(1, 0)));
        assert_eq!(snap_cell_size(0.2), 1);
        assert_eq!(snap_cell_size(f32::NAN), 1);
    }

    #[test]
    fn test_nearest_wall_direction() {
        let cell = GridPos::new(1, 1);
        // Cell (1,1) spans 32..64, centre at 48
        assert_eq!(nearest_wall_direction(48.0, 34.0, cell, 32.0), Direction::North);
        assert_eq!(nearest_wall_direction(48.0, 62.0, cell, 32.0), Direction::South);
        assert_eq!(nearest_wall_direction(62.0, 50.0, cell, 32.0), Direction::East);
        assert_eq!(nearest_wall_direction(33.0, 46.0, cell, 32.0), Direction::West);
        assert_eq!(nearest_wall_direction(48.0, 48.0, cell, 32.0), Direction::South);
    }

    #[test]
    fn test_nearest_wall_boundary() {
        let top = nearest_wall_boundary(40.0, 33.0, 32.0);
        assert_eq!(top, WallBoundary { x: 40.0, y: 32.0, axis: Axis::Horizontal });

        let bottom = nearest_wall_boundary(50.0, 62.0, 32.0);
        assert_eq!(bottom, WallBoundary { x: 50.0, y: 64.0, axis: Axis::Horizontal });

        let right = nearest_wall_boundary(63.0, 50.0, 32.0);
        assert_eq!(right, WallBoundary { x: 64.0, y: 50.0, axis: Axis::Vertical });

        let left = nearest_wall_boundary(2.0, 15.0, 32.0);
        assert_eq!(left, WallBoundary { x: 0.0, y: 15.0, axis: Axis::Vertical });
    }

    #[test]
    fn test_boundary_to_cell_prefers_lower_side() {
        // Horizontal line y=64 between rows 1 and 2 resolves to row 1
        assert_eq!(boundary_to_cell(40.0, 64.0, 32.0), GridPos::new(1, 1));
        // Vertical line x=96 between columns 2 and 3 resolves to column 2
        assert_eq!(boundary_to_cell(96.0, 40.0, 32.0), GridPos::new(2, 1));
        // Line zero resolves to the first cell
        assert_eq!(boundary_to_cell(0.0, 0.0, 32.0), GridPos::new(0, 0));
        // Off-line coordinates use plain division
        assert_eq!(boundary_to_cell(70.0, 10.0, 32.0), GridPos::new(2, 0));
        // Negative input clamps
        assert_eq!(boundary_to_cell(-40.0, -1.0, 32.0), GridPos::new(0, 0));
    }

    #[test]
    fn test_viewport_round_trip_has_no_drift() {
        let mut viewport = Viewport::new(32.0);
        viewport.set_zoom(1.37);
        viewport.pan(13.25, -7.5);
        let size = viewport.cell_size();
        assert_eq!(size, 44.0);

        for x in 0..50 {
            let cell = GridPos::new(x, x / 2);
            let origin = viewport.cell_origin(cell);
            let grid = viewport.screen_to_grid(PixelPos::new(origin.x + 0.5, origin.y + 0.5));
            assert_eq!(pixel_to_cell(grid.x, grid.y, size), cell);
        }
    }
}
