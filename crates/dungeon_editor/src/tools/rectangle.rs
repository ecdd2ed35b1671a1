//! Rectangle tool: first click anchors, second click edits the whole area

use super::{label_for, paint_patch, Edit, PointerEvent, PointerKind, ToolContext};
use dungeon_core::{CellUpdate, GridPos, GridRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnchorState {
    pub anchor: Option<GridPos>,
}

pub(super) fn handle(
    state: AnchorState,
    event: &PointerEvent,
    ctx: &ToolContext<'_>,
) -> (AnchorState, Option<Edit>) {
    if event.kind != PointerKind::Press {
        return (state, None);
    }
    let Some(pos) = ctx.cell_at(event.pos) else {
        return (state, None);
    };
    match state.anchor {
        None => (AnchorState { anchor: Some(pos) }, None),
        Some(anchor) => {
            let rect = GridRect::from_corners(anchor, pos);
            let edit = fill_rect(rect, event.modifiers.delete, ctx);
            (AnchorState::default(), edit)
        }
    }
}

fn fill_rect(rect: GridRect, delete: bool, ctx: &ToolContext<'_>) -> Option<Edit> {
    let updates = rect
        .positions()
        .filter_map(|pos| {
            let cell = ctx.floor.cell(pos)?;
            paint_patch(cell, ctx.palette, delete).map(|patch| CellUpdate::new(pos, patch))
        })
        .collect();
    let verb = if delete { "Clear" } else { "Fill" };
    ctx.batch(updates, &format!("{} rectangle", label_for(verb, ctx.palette.layer)))
}
