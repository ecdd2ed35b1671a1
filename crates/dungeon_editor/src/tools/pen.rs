//! Pen tool: a click edits one cell or wall, a drag strokes a line

use super::{label_for, paint_patch, Edit, EditLayer, PointerEvent, PointerKind, ToolContext};
use crate::geometry::{
    boundary_to_cell, nearest_wall_boundary, nearest_wall_direction, pixel_to_cell, Axis,
    PixelPos,
};
use crate::raster::{cells_along_line, floors_along_line, walls_along_grid_line};
use dungeon_core::{CellPatch, CellUpdate, GridPos};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    pub gesture: Option<PenGesture>,
}

/// A pen press that has not been released yet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenGesture {
    /// Raw pointer pixel at press
    pub origin: PixelPos,
    pub start: GridPos,
    /// Grid line the press snapped to, walls layer only
    pub line: Option<Axis>,
    /// Running end point, only meaningful once `dragging`
    pub end: GridPos,
    pub dragging: bool,
    /// Delete modifier held at press
    pub delete: bool,
}

/// Stroke target under a pixel. Wall strokes snap onto the nearest grid line
/// first, so the target is the cell owning that line's south/east slot, and
/// the line's axis comes back with it.
fn stroke_target(pos: PixelPos, ctx: &ToolContext<'_>) -> (GridPos, Option<Axis>) {
    match ctx.palette.layer {
        EditLayer::Walls => {
            let boundary = nearest_wall_boundary(pos.x, pos.y, ctx.cell_size);
            (
                boundary_to_cell(boundary.x, boundary.y, ctx.cell_size),
                Some(boundary.axis),
            )
        }
        _ => (pixel_to_cell(pos.x, pos.y, ctx.cell_size), None),
    }
}

pub(super) fn handle(
    state: DragState,
    event: &PointerEvent,
    ctx: &ToolContext<'_>,
) -> (DragState, Option<Edit>) {
    match (event.kind, state.gesture) {
        (PointerKind::Press, _) => {
            if ctx.cell_at(event.pos).is_none() {
                return (DragState::default(), None);
            }
            let (start, line) = stroke_target(event.pos, ctx);
            let gesture = PenGesture {
                origin: event.pos,
                start,
                line,
                end: start,
                dragging: false,
                delete: event.modifiers.delete,
            };
            (
                DragState {
                    gesture: Some(gesture),
                },
                None,
            )
        }
        (PointerKind::Move, Some(mut gesture)) => {
            track(&mut gesture, event.pos, ctx);
            (
                DragState {
                    gesture: Some(gesture),
                },
                None,
            )
        }
        (PointerKind::Release, Some(mut gesture)) => {
            track(&mut gesture, event.pos, ctx);
            let edit = if gesture.dragging {
                stroke(&gesture, ctx)
            } else {
                click(&gesture, ctx)
            };
            (DragState::default(), edit)
        }
        _ => (state, None),
    }
}

fn track(gesture: &mut PenGesture, pos: PixelPos, ctx: &ToolContext<'_>) {
    if !gesture.dragging && gesture.origin.distance(pos) > ctx.drag_threshold {
        trace!(start = ?gesture.start, "pen drag started");
        gesture.dragging = true;
    }
    if gesture.dragging {
        gesture.end = stroke_target(pos, ctx).0;
    }
}

/// Rasterize the dragged line into one batch
fn stroke(gesture: &PenGesture, ctx: &ToolContext<'_>) -> Option<Edit> {
    let palette = ctx.palette;
    let floor = ctx.floor;
    let updates: Vec<CellUpdate> = match palette.layer {
        EditLayer::Walls => walls_along_grid_line(
            floor,
            gesture.start,
            gesture.end,
            gesture.line,
            &palette.wall_type,
            gesture.delete,
        )
        .into_iter()
        .filter(|edit| floor.cell(edit.position).map(|c| &c.walls) != Some(&edit.walls))
        .map(CellUpdate::from)
        .collect(),
        EditLayer::Floor => {
            let surface = if gesture.delete {
                Default::default()
            } else {
                palette.paint_floor().clone()
            };
            floors_along_line(gesture.start, gesture.end, &surface)
                .into_iter()
                .filter(|edit| {
                    floor
                        .cell(edit.position)
                        .is_some_and(|cell| cell.floor != edit.floor)
                })
                .map(CellUpdate::from)
                .collect()
        }
        EditLayer::Events | EditLayer::Decorations => cells_along_line(gesture.start, gesture.end)
            .into_iter()
            .filter_map(|pos| {
                let cell = floor.cell(pos)?;
                paint_patch(cell, palette, gesture.delete).map(|patch| CellUpdate::new(pos, patch))
            })
            .collect(),
    };
    ctx.batch(updates, &label_for("Draw", palette.layer))
}

/// Edit the single cell or wall under the press
fn click(gesture: &PenGesture, ctx: &ToolContext<'_>) -> Option<Edit> {
    let palette = ctx.palette;
    let pos = ctx.cell_at(gesture.origin)?;
    let cell = ctx.floor.cell(pos)?;

    let patch = match palette.layer {
        EditLayer::Walls => {
            let walls = if let (Some(captured), false) = (&palette.captured, gesture.delete) {
                captured.walls.clone()
            } else {
                let direction =
                    nearest_wall_direction(gesture.origin.x, gesture.origin.y, pos, ctx.cell_size);
                let wall = if gesture.delete || cell.walls.get(direction).is_some() {
                    None
                } else {
                    Some(palette.paint_wall())
                };
                cell.walls.with(direction, wall)
            };
            (walls != cell.walls).then(|| CellPatch::walls(walls))?
        }
        _ => paint_patch(cell, palette, gesture.delete)?,
    };
    ctx.batch(
        vec![CellUpdate::new(pos, patch)],
        &label_for("Edit", palette.layer),
    )
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{handle_pointer_event, Palette, Tool, ToolKind};
    use super::*;
    use dungeon_core::{Direction, Floor, FloorSurface, FloorType, Wall, WallType};

    fn run(tool: Tool, events: &[PointerEvent], ctx: &ToolContext<'_>) -> (Tool, Option<Edit>) {
        let mut tool = tool;
        let mut last = None;
        for event in events {
            let (next, edit) = handle_pointer_event(tool, event, ctx);
            tool = next;
            if edit.is_some() {
                last = edit;
            }
        }
        (tool, last)
    }

    fn floor_palette(floor_type: FloorType) -> Palette {
        Palette {
            floor: FloorSurface::new(floor_type),
            ..Default::default()
        }
    }

    #[test]
    fn test_small_move_stays_a_click() {
        let floor = Floor::new("1F".to_string(), 5, 5);
        let palette = floor_palette(FloorType::Damage);
        let ctx = ctx(&floor, &palette);
        let p = center(2, 2);
        let nudged = PixelPos::new(p.x + 3.0, p.y + 4.0);

        let (tool, edit) = run(
            Tool::from(ToolKind::Pen),
            &[press(p), moved(nudged), release(nudged)],
            &ctx,
        );
        assert_eq!(tool, Tool::Pen(DragState::default()));
        let updates = updates(edit);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].position, GridPos::new(2, 2));
    }

    #[test]
    fn test_drag_rasterizes_line() {
        let floor = Floor::new("1F".to_string(), 6, 6);
        let palette = floor_palette(FloorType::Slippery);
        let ctx = ctx(&floor, &palette);

        let (_, edit) = run(
            Tool::from(ToolKind::Pen),
            &[
                press(center(0, 0)),
                moved(center(2, 0)),
                release(center(4, 2)),
            ],
            &ctx,
        );
        let positions: Vec<_> = updates(edit).iter().map(|u| u.position).collect();
        assert_eq!(positions.first(), Some(&GridPos::new(0, 0)));
        assert_eq!(positions.last(), Some(&GridPos::new(4, 2)));
        assert_eq!(positions.len(), 5);
    }

    #[test]
    fn test_drag_off_the_floor_keeps_inside_cells() {
        let floor = Floor::new("1F".to_string(), 3, 3);
        let palette = floor_palette(FloorType::Pit);
        let ctx = ctx(&floor, &palette);

        let (_, edit) = run(
            Tool::from(ToolKind::Pen),
            &[press(center(0, 1)), release(center(7, 1))],
            &ctx,
        );
        assert_eq!(updates(edit).len(), 3);
    }

    #[test]
    fn test_press_outside_floor_is_ignored() {
        let floor = Floor::new("1F".to_string(), 3, 3);
        let palette = floor_palette(FloorType::Pit);
        let ctx = ctx(&floor, &palette);

        let (tool, edit) = run(
            Tool::from(ToolKind::Pen),
            &[press(center(5, 5)), release(center(1, 1))],
            &ctx,
        );
        assert!(edit.is_none());
        assert!(!tool.has_pending_gesture());
    }

    #[test]
    fn test_click_toggles_nearest_wall() {
        let mut floor = Floor::new("1F".to_string(), 4, 4);
        let palette = Palette {
            layer: EditLayer::Walls,
            ..Default::default()
        };
        // Near the top edge of (1,1)
        let near_north = PixelPos::new(48.0, 35.0);

        let (_, edit) = run(
            Tool::from(ToolKind::Pen),
            &[press(near_north), release(near_north)],
            &ctx(&floor, &palette),
        );
        let update = updates(edit).remove(0);
        assert_eq!(update.position, GridPos::new(1, 1));
        assert_eq!(
            update.patch.walls.as_ref().and_then(|w| w.north.clone()),
            Some(Wall::new(WallType::Normal))
        );
        floor.apply(update).unwrap();

        // Second click removes it again
        let (_, edit) = run(
            Tool::from(ToolKind::Pen),
            &[press(near_north), release(near_north)],
            &ctx(&floor, &palette),
        );
        let update = updates(edit).remove(0);
        assert!(update.patch.walls.unwrap().get(Direction::North).is_none());
    }

    #[test]
    fn test_wall_drag_strokes_south_slots() {
        let floor = Floor::new("1F".to_string(), 5, 5);
        let palette = Palette {
            layer: EditLayer::Walls,
            ..Default::default()
        };
        let ctx = ctx(&floor, &palette);

        // Along the line y=64, which is the south edge of row 1
        let (_, edit) = run(
            Tool::from(ToolKind::Pen),
            &[
                press(PixelPos::new(10.0, 62.0)),
                moved(PixelPos::new(60.0, 63.0)),
                release(PixelPos::new(110.0, 63.0)),
            ],
            &ctx,
        );
        let updates = updates(edit);
        let positions: Vec<_> = updates.iter().map(|u| u.position).collect();
        assert_eq!(
            positions,
            vec![GridPos::new(0, 1), GridPos::new(1, 1), GridPos::new(2, 1), GridPos::new(3, 1)]
        );
        assert!(updates
            .iter()
            .all(|u| u.patch.walls.as_ref().is_some_and(|w| w.south.is_some())));
    }

    #[test]
    fn test_short_wall_drag_on_vertical_line_sets_east_slot() {
        let floor = Floor::new("1F".to_string(), 4, 4);
        let palette = Palette {
            layer: EditLayer::Walls,
            ..Default::default()
        };
        let ctx = ctx(&floor, &palette);

        // Down the line x=64 without leaving cell (1,0)'s segment
        let (_, edit) = run(
            Tool::from(ToolKind::Pen),
            &[
                press(PixelPos::new(63.0, 8.0)),
                moved(PixelPos::new(63.0, 20.0)),
                release(PixelPos::new(63.0, 20.0)),
            ],
            &ctx,
        );
        let updates = updates(edit);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].position, GridPos::new(1, 0));
        let walls = updates[0].patch.walls.as_ref().unwrap();
        assert_eq!(walls.east, Some(Wall::new(WallType::Normal)));
        assert!(walls.south.is_none());
    }

    #[test]
    fn test_event_click_appends() {
        let mut floor = Floor::new("1F".to_string(), 3, 3);
        let palette = Palette {
            layer: EditLayer::Events,
            ..Default::default()
        };
        for _ in 0..2 {
            let (_, edit) = run(
                Tool::from(ToolKind::Pen),
                &[press(center(1, 1)), release(center(1, 1))],
                &ctx(&floor, &palette),
            );
            for update in updates(edit) {
                floor.apply(update).unwrap();
            }
        }
        assert_eq!(floor.cell(GridPos::new(1, 1)).unwrap().events.len(), 2);
    }
}
