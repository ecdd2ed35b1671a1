//! Fill tool
//!
//! Matches on attributes, not connectivity: every cell on the floor whose
//! floor type and passability equal the clicked cell's is rewritten, whether
//! or not it touches the clicked cell.

use super::{Edit, PointerEvent, ToolContext};
use dungeon_core::{CellPatch, CellUpdate, FloorSurface};
use tracing::debug;

pub(super) fn handle(event: &PointerEvent, ctx: &ToolContext<'_>) -> Option<Edit> {
    let pos = ctx.cell_at(event.pos)?;
    let target = ctx.floor.cell(pos)?.floor.clone();
    let replacement = if event.modifiers.delete {
        FloorSurface::default()
    } else {
        ctx.palette.paint_floor().clone()
    };
    if replacement == target {
        return None;
    }

    let updates: Vec<CellUpdate> = ctx
        .floor
        .iter_cells()
        .filter(|cell| {
            cell.floor.floor_type == target.floor_type && cell.floor.passable == target.passable
        })
        .map(|cell| CellUpdate::new(cell.position, CellPatch::floor(replacement.clone())))
        .collect();
    debug!(count = updates.len(), ?target, "fill");
    ctx.batch(updates, "Fill floor")
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{handle_pointer_event, Palette, Tool};
    use dungeon_core::{Floor, FloorSurface, FloorType, GridPos};

    #[test]
    fn test_fill_matches_attributes_not_connectivity() {
        let mut floor = Floor::new("1F".to_string(), 3, 3);
        floor.cell_mut(GridPos::new(1, 1)).unwrap().floor = FloorSurface::new(FloorType::Damage);
        // Normal but impassable: different pair, untouched
        floor.cell_mut(GridPos::new(2, 2)).unwrap().floor.passable = false;
        let palette = Palette {
            floor: FloorSurface::new(FloorType::Slippery),
            ..Default::default()
        };

        let (_, edit) =
            handle_pointer_event(Tool::Fill, &press(center(0, 0)), &ctx(&floor, &palette));
        let positions: Vec<_> = updates(edit).iter().map(|u| u.position).collect();
        assert!(positions.contains(&GridPos::new(0, 0)));
        assert!(positions.contains(&GridPos::new(0, 1)));
        assert!(!positions.contains(&GridPos::new(1, 1)));
        assert!(!positions.contains(&GridPos::new(2, 2)));
        assert_eq!(positions.len(), 7);
    }

    #[test]
    fn test_fill_with_same_value_is_noop() {
        let floor = Floor::new("1F".to_string(), 3, 3);
        let palette = Palette::default();
        let (_, edit) =
            handle_pointer_event(Tool::Fill, &press(center(0, 0)), &ctx(&floor, &palette));
        assert!(edit.is_none());
    }
}
