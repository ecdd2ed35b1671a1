//! Stroke rasterization: turning two grid points into an ordered batch of
//! cell edits

use crate::geometry::Axis;
use dungeon_core::{
    CellPatch, CellUpdate, Direction, DungeonError, DungeonResult, Floor, FloorSurface, GridPos,
    Wall, WallType, Walls,
};
use tracing::debug;

/// New floor surface for one cell of a stroke
#[derive(Debug, Clone, PartialEq)]
pub struct FloorEdit {
    pub position: GridPos,
    pub floor: FloorSurface,
}

impl From<FloorEdit> for CellUpdate {
    fn from(edit: FloorEdit) -> Self {
        CellUpdate::new(edit.position, CellPatch::floor(edit.floor))
    }
}

/// Full wall record for one cell of a wall stroke. Only the stroked slot
/// differs from what the cell already had.
#[derive(Debug, Clone, PartialEq)]
pub struct WallEdit {
    pub position: GridPos,
    pub walls: Walls,
}

impl From<WallEdit> for CellUpdate {
    fn from(edit: WallEdit) -> Self {
        CellUpdate::new(edit.position, CellPatch::walls(edit.walls))
    }
}

/// Bresenham's line algorithm - generates all grid coordinates along a line,
/// both endpoints included, walking from `start` to `end`
fn bresenham_line(start: GridPos, end: GridPos) -> Vec<GridPos> {
    let mut points = Vec::new();

    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = start.x;
    let mut y = start.y;

    loop {
        points.push(GridPos::new(x, y));

        if x == end.x && y == end.y {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == end.x {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == end.y {
                break;
            }
            err += dx;
            y += sy;
        }
    }

    points
}

/// Cells covered by a stroke, ordered from `start` to `end`.
///
/// The line is always traced from the lexicographically smaller endpoint so
/// that swapping the endpoints covers exactly the same cells.
pub fn cells_along_line(start: GridPos, end: GridPos) -> Vec<GridPos> {
    if start == end {
        return vec![start];
    }
    if start <= end {
        bresenham_line(start, end)
    } else {
        let mut points = bresenham_line(end, start);
        points.reverse();
        points
    }
}

/// Floor edits for a cell-fill stroke
pub fn floors_along_line(start: GridPos, end: GridPos, floor: &FloorSurface) -> Vec<FloorEdit> {
    cells_along_line(start, end)
        .into_iter()
        .map(|position| FloorEdit {
            position,
            floor: floor.clone(),
        })
        .collect()
}

/// Axis of a wall stroke. Equal rows make a horizontal stroke (checked
/// first, so a single-cell stroke is horizontal); anything not axis-aligned
/// is `InvalidGeometry`.
pub fn wall_stroke_axis(start: GridPos, end: GridPos) -> DungeonResult<Axis> {
    if start.y == end.y {
        Ok(Axis::Horizontal)
    } else if start.x == end.x {
        Ok(Axis::Vertical)
    } else {
        Err(DungeonError::InvalidGeometry)
    }
}

/// Wall edits for a stroke along grid lines.
///
/// A horizontal stroke sets the south slot of every cell in the row range, a
/// vertical stroke sets the east slot of every cell in the column range.
/// `delete` clears the slot instead. Every other slot keeps its current
/// value. Diagonal strokes and cells outside the floor produce no edits.
pub fn walls_along_line(
    floor: &Floor,
    start: GridPos,
    end: GridPos,
    wall_type: &WallType,
    delete: bool,
) -> Vec<WallEdit> {
    walls_along_grid_line(floor, start, end, None, wall_type, delete)
}

/// Like [`walls_along_line`], but a stroke that stays on one cell follows
/// `line` (the axis of the grid line it was drawn on) instead of defaulting
/// to horizontal
pub fn walls_along_grid_line(
    floor: &Floor,
    start: GridPos,
    end: GridPos,
    line: Option<Axis>,
    wall_type: &WallType,
    delete: bool,
) -> Vec<WallEdit> {
    let axis = match (line, wall_stroke_axis(start, end)) {
        (Some(line), Ok(_)) if start == end => line,
        (_, Ok(axis)) => axis,
        (_, Err(err)) => {
            debug!(?start, ?end, "{}", err);
            return Vec::new();
        }
    };
    let wall = (!delete).then(|| Wall::new(wall_type.clone()));

    let (slot, positions): (Direction, Vec<GridPos>) = match axis {
        Axis::Horizontal => (
            Direction::South,
            (start.x.min(end.x)..=start.x.max(end.x))
                .map(|x| GridPos::new(x, start.y))
                .collect(),
        ),
        Axis::Vertical => (
            Direction::East,
            (start.y.min(end.y)..=start.y.max(end.y))
                .map(|y| GridPos::new(start.x, y))
                .collect(),
        ),
    };

    positions
        .into_iter()
        .filter_map(|position| {
            floor.cell(position).map(|cell| WallEdit {
                position,
                walls: cell.walls.with(slot, wall.clone()),
            })
        })
        .collect()
}
