//! Range selection for template creation

use super::{Edit, PointerEvent, PointerKind, ToolContext};
use dungeon_core::{GridPos, GridRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub start: Option<GridPos>,
    pub end: Option<GridPos>,
    /// Frozen; the next click starts a new selection
    pub confirmed: bool,
}

impl SelectionState {
    /// A selection has been started but not confirmed
    pub fn is_pending(&self) -> bool {
        self.start.is_some() && !self.confirmed
    }

    pub fn rect(&self) -> Option<GridRect> {
        let start = self.start?;
        Some(GridRect::from_corners(start, self.end.unwrap_or(start)))
    }

    /// Freeze a pending selection
    pub fn confirm(self) -> (SelectionState, Option<Edit>) {
        if !self.is_pending() {
            return (self, None);
        }
        let confirmed = SelectionState {
            confirmed: true,
            ..self
        };
        (confirmed, confirmed.rect().map(Edit::ConfirmSelection))
    }
}

pub(super) fn handle(
    state: SelectionState,
    event: &PointerEvent,
    ctx: &ToolContext<'_>,
) -> (SelectionState, Option<Edit>) {
    let Some(pos) = ctx.cell_at(event.pos) else {
        return (state, None);
    };
    match event.kind {
        PointerKind::Press if state.is_pending() => SelectionState {
            end: Some(pos),
            ..state
        }
        .confirm(),
        PointerKind::Press => (
            SelectionState {
                start: Some(pos),
                end: Some(pos),
                confirmed: false,
            },
            None,
        ),
        // Hover preview of the far corner
        PointerKind::Move if state.is_pending() => (
            SelectionState {
                end: Some(pos),
                ..state
            },
            None,
        ),
        _ => (state, None),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{handle_pointer_event, Palette, Tool, ToolKind};
    use super::*;
    use dungeon_core::Floor;

    #[test]
    fn test_second_click_confirms() {
        let floor = Floor::new("1F".to_string(), 6, 6);
        let palette = Palette::default();
        let ctx = ctx(&floor, &palette);

        let (tool, edit) =
            handle_pointer_event(Tool::from(ToolKind::RangeSelect), &press(center(4, 1)), &ctx);
        assert!(edit.is_none());
        assert!(tool.has_pending_gesture());

        let (tool, _) = handle_pointer_event(tool, &moved(center(3, 3)), &ctx);
        let (tool, edit) = handle_pointer_event(tool, &press(center(1, 3)), &ctx);
        assert!(!tool.has_pending_gesture());
        match edit {
            Some(Edit::ConfirmSelection(rect)) => {
                assert_eq!(rect.min, GridPos::new(1, 1));
                assert_eq!(rect.max, GridPos::new(4, 3));
            }
            other => panic!("expected confirmation, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_confirm() {
        let state = SelectionState {
            start: Some(GridPos::new(2, 2)),
            end: None,
            confirmed: false,
        };
        let (state, edit) = state.confirm();
        assert!(state.confirmed);
        assert_eq!(
            edit,
            Some(Edit::ConfirmSelection(GridRect::from_corners(
                GridPos::new(2, 2),
                GridPos::new(2, 2)
            )))
        );
        // Confirming twice does nothing
        assert_eq!(state.confirm().1, None);
    }

    #[test]
    fn test_click_after_confirm_starts_over() {
        let floor = Floor::new("1F".to_string(), 6, 6);
        let palette = Palette::default();
        let ctx = ctx(&floor, &palette);
        let confirmed = Tool::RangeSelect(SelectionState {
            start: Some(GridPos::new(0, 0)),
            end: Some(GridPos::new(1, 1)),
            confirmed: true,
        });

        let (tool, edit) = handle_pointer_event(confirmed, &press(center(5, 5)), &ctx);
        assert!(edit.is_none());
        assert_eq!(
            tool,
            Tool::RangeSelect(SelectionState {
                start: Some(GridPos::new(5, 5)),
                end: Some(GridPos::new(5, 5)),
                confirmed: false,
            })
        );
    }
}
