//! Eyedropper tool: copy a cell's floor and walls into the palette

use super::{CapturedCell, Edit, PointerEvent, ToolContext};

/// Pick up the clicked cell's floor and walls
pub(super) fn handle(event: &PointerEvent, ctx: &ToolContext<'_>) -> Option<Edit> {
    let pos = ctx.cell_at(event.pos)?;
    let cell = ctx.floor.cell(pos)?;
    Some(Edit::Capture(CapturedCell {
        floor: cell.floor.clone(),
        walls: cell.walls.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{handle_pointer_event, Palette, Tool};
    use super::*;
    use dungeon_core::{Floor, FloorSurface, FloorType, GridPos, Wall, WallType};

    #[test]
    fn test_captures_floor_and_walls() {
        let mut floor = Floor::new("1F".to_string(), 3, 3);
        let cell = floor.cell_mut(GridPos::new(2, 1)).unwrap();
        cell.floor = FloorSurface::new(FloorType::Warp);
        cell.walls.west = Some(Wall::new(WallType::HiddenDoor));
        let palette = Palette::default();

        let (tool, edit) =
            handle_pointer_event(Tool::Eyedropper, &press(center(2, 1)), &ctx(&floor, &palette));
        assert_eq!(tool, Tool::Eyedropper);
        match edit {
            Some(Edit::Capture(captured)) => {
                assert_eq!(captured.floor.floor_type, FloorType::Warp);
                assert_eq!(captured.walls.west, Some(Wall::new(WallType::HiddenDoor)));
            }
            other => panic!("expected capture, got {:?}", other),
        }
    }

    #[test]
    fn test_release_does_nothing() {
        let floor = Floor::new("1F".to_string(), 3, 3);
        let palette = Palette::default();
        let (_, edit) =
            handle_pointer_event(Tool::Eyedropper, &release(center(1, 1)), &ctx(&floor, &palette));
        assert!(edit.is_none());
    }
}
