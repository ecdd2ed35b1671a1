//! Eraser tool
//!
//! Walls: only the wall nearest the pointer. Events and decorations: all of
//! them. Floor: back to the default surface.

use super::{label_for, Edit, EditLayer, PointerEvent, ToolContext};
use crate::geometry::nearest_wall_direction;
use dungeon_core::{CellPatch, CellUpdate, FloorSurface};

pub(super) fn handle(event: &PointerEvent, ctx: &ToolContext<'_>) -> Option<Edit> {
    let pos = ctx.cell_at(event.pos)?;
    let cell = ctx.floor.cell(pos)?;
    let layer = ctx.palette.layer;

    let patch = match layer {
        EditLayer::Walls => {
            let direction = nearest_wall_direction(event.pos.x, event.pos.y, pos, ctx.cell_size);
            if cell.walls.get(direction).is_none() {
                return None;
            }
            CellPatch::walls(cell.walls.with(direction, None))
        }
        EditLayer::Events => {
            if cell.events.is_empty() {
                return None;
            }
            CellPatch::events(Vec::new())
        }
        EditLayer::Decorations => {
            if cell.decorations.is_empty() {
                return None;
            }
            CellPatch::decorations(Vec::new())
        }
        EditLayer::Floor => {
            if cell.floor == FloorSurface::default() {
                return None;
            }
            CellPatch::floor(FloorSurface::default())
        }
    };
    ctx.batch(vec![CellUpdate::new(pos, patch)], &label_for("Erase", layer))
}
