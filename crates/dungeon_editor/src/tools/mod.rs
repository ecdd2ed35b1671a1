//! Editor tools - pen, rectangle, fill, eyedropper, eraser, template and
//! range selection
//!
//! Every tool is a variant of [`Tool`] that owns its in-progress gesture
//! state. [`handle_pointer_event`] is the only entry point: it consumes the
//! current tool and one pointer event and returns the next tool state plus
//! at most one [`Edit`]. Tools never touch the model themselves; edits are
//! applied by the caller through the model's commit path.

mod eraser;
mod eyedropper;
mod fill;
mod pen;
mod range_select;
mod rectangle;
mod template;

pub use pen::{DragState, PenGesture};
pub use range_select::SelectionState;
pub use rectangle::AnchorState;
pub use template::TemplateState;

use crate::geometry::{cell_at, PixelPos};
use crate::model::CellBatch;
use dungeon_core::{
    Cell, CellPatch, Decoration, DecorationType, Event, EventType, Floor, FloorSurface, GridPos,
    GridRect, Template, Wall, WallType, Walls,
};
use serde::{Deserialize, Serialize};

/// Which part of a cell the pen, rectangle and eraser act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditLayer {
    #[default]
    Floor,
    Walls,
    Events,
    Decorations,
}

impl EditLayer {
    pub fn label(&self) -> &'static str {
        match self {
            EditLayer::Floor => "Floor",
            EditLayer::Walls => "Walls",
            EditLayer::Events => "Events",
            EditLayer::Decorations => "Decorations",
        }
    }
}

/// Floor and walls picked up by the eyedropper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedCell {
    pub floor: FloorSurface,
    pub walls: Walls,
}

/// Values the tools write
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    pub layer: EditLayer,
    pub floor: FloorSurface,
    pub wall_type: WallType,
    pub event_type: EventType,
    pub decoration_type: DecorationType,
    /// When set, pen and rectangle apply this instead of `floor`/`wall_type`
    pub captured: Option<CapturedCell>,
    /// Active template for the template tool
    pub template: Option<Template>,
}

impl Palette {
    /// Floor surface to paint, preferring the captured buffer
    pub fn paint_floor(&self) -> &FloorSurface {
        self.captured
            .as_ref()
            .map(|captured| &captured.floor)
            .unwrap_or(&self.floor)
    }

    pub fn paint_wall(&self) -> Wall {
        Wall::new(self.wall_type.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Press,
    Move,
    Release,
    /// Escape-equivalent: abandon the pending gesture
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Clear/reset instead of apply
    pub delete: bool,
}

/// A pointer event in grid pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: PixelPos,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, pos: PixelPos, modifiers: Modifiers) -> Self {
        Self {
            kind,
            pos,
            modifiers,
        }
    }

    pub fn cancel() -> Self {
        Self::new(PointerKind::Cancel, PixelPos::default(), Modifiers::default())
    }
}

/// Read-only inputs a tool needs to turn an event into an edit
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub floor: &'a Floor,
    pub floor_index: usize,
    pub cell_size: f32,
    pub drag_threshold: f32,
    pub palette: &'a Palette,
}

impl ToolContext<'_> {
    /// In-bounds cell under a pixel
    pub fn cell_at(&self, pos: PixelPos) -> Option<GridPos> {
        cell_at(
            pos.x,
            pos.y,
            self.cell_size,
            self.floor.width,
            self.floor.height,
        )
    }

    /// Wrap updates into a batch for the current floor, dropping empty ones
    fn batch(&self, updates: Vec<dungeon_core::CellUpdate>, label: &str) -> Option<Edit> {
        if updates.is_empty() {
            None
        } else {
            Some(Edit::Apply(CellBatch::new(self.floor_index, updates, label)))
        }
    }
}

/// The outcome of a tool gesture
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Cell updates to commit as one history entry
    Apply(CellBatch),
    /// Replace the palette's captured buffer
    Capture(CapturedCell),
    /// A range selection was frozen
    ConfirmSelection(GridRect),
    /// The gesture was refused; nothing changes
    Rejected { reason: String },
}

/// Tool identity without gesture state, used for tool switching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Pen,
    Rectangle,
    Fill,
    Eyedropper,
    Eraser,
    Template,
    RangeSelect,
}

impl ToolKind {
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Pen,
            ToolKind::Rectangle,
            ToolKind::Fill,
            ToolKind::Eyedropper,
            ToolKind::Eraser,
            ToolKind::Template,
            ToolKind::RangeSelect,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Pen => "Pen",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Fill => "Fill",
            ToolKind::Eyedropper => "Eyedropper",
            ToolKind::Eraser => "Eraser",
            ToolKind::Template => "Template",
            ToolKind::RangeSelect => "Range Select",
        }
    }
}

/// The active tool and its gesture state
#[derive(Debug, Clone, PartialEq)]
pub enum Tool {
    Pen(DragState),
    Rectangle(AnchorState),
    Fill,
    Eyedropper,
    Eraser,
    Template(TemplateState),
    RangeSelect(SelectionState),
}

impl Default for Tool {
    fn default() -> Self {
        Tool::from(ToolKind::default())
    }
}

impl From<ToolKind> for Tool {
    fn from(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Pen => Tool::Pen(DragState::default()),
            ToolKind::Rectangle => Tool::Rectangle(AnchorState::default()),
            ToolKind::Fill => Tool::Fill,
            ToolKind::Eyedropper => Tool::Eyedropper,
            ToolKind::Eraser => Tool::Eraser,
            ToolKind::Template => Tool::Template(TemplateState::default()),
            ToolKind::RangeSelect => Tool::RangeSelect(SelectionState::default()),
        }
    }
}

impl Tool {
    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Pen(_) => ToolKind::Pen,
            Tool::Rectangle(_) => ToolKind::Rectangle,
            Tool::Fill => ToolKind::Fill,
            Tool::Eyedropper => ToolKind::Eyedropper,
            Tool::Eraser => ToolKind::Eraser,
            Tool::Template(_) => ToolKind::Template,
            Tool::RangeSelect(_) => ToolKind::RangeSelect,
        }
    }

    /// True while a drag, rectangle anchor or open selection is pending
    pub fn has_pending_gesture(&self) -> bool {
        match self {
            Tool::Pen(state) => state.gesture.is_some(),
            Tool::Rectangle(state) => state.anchor.is_some(),
            Tool::RangeSelect(state) => state.is_pending(),
            _ => false,
        }
    }

    /// The same tool with any pending gesture discarded. Template rotation
    /// is a setting, not a gesture, and survives.
    pub fn cancelled(self) -> Tool {
        match self {
            Tool::Pen(_) => Tool::Pen(DragState::default()),
            Tool::Rectangle(_) => Tool::Rectangle(AnchorState::default()),
            Tool::RangeSelect(_) => Tool::RangeSelect(SelectionState::default()),
            other => other,
        }
    }
}

/// Feed one pointer event to a tool
pub fn handle_pointer_event(
    tool: Tool,
    event: &PointerEvent,
    ctx: &ToolContext<'_>,
) -> (Tool, Option<Edit>) {
    if event.kind == PointerKind::Cancel {
        return (tool.cancelled(), None);
    }
    match tool {
        Tool::Pen(state) => {
            let (state, edit) = pen::handle(state, event, ctx);
            (Tool::Pen(state), edit)
        }
        Tool::Rectangle(state) => {
            let (state, edit) = rectangle::handle(state, event, ctx);
            (Tool::Rectangle(state), edit)
        }
        Tool::Fill => (Tool::Fill, on_press(event, || fill::handle(event, ctx))),
        Tool::Eyedropper => (
            Tool::Eyedropper,
            on_press(event, || eyedropper::handle(event, ctx)),
        ),
        Tool::Eraser => (Tool::Eraser, on_press(event, || eraser::handle(event, ctx))),
        Tool::Template(state) => {
            let edit = on_press(event, || template::handle(&state, event, ctx));
            (Tool::Template(state), edit)
        }
        Tool::RangeSelect(state) => {
            let (state, edit) = range_select::handle(state, event, ctx);
            (Tool::RangeSelect(state), edit)
        }
    }
}

/// Single-click tools act on press only
fn on_press(event: &PointerEvent, act: impl FnOnce() -> Option<Edit>) -> Option<Edit> {
    if event.kind == PointerKind::Press {
        act()
    } else {
        None
    }
}

/// Patch for painting one whole cell on the palette's layer, as the
/// rectangle tool and pen strokes on non-wall layers do.
///
/// Returns `None` when the cell would not change.
fn paint_patch(cell: &Cell, palette: &Palette, delete: bool) -> Option<CellPatch> {
    let patch = match palette.layer {
        EditLayer::Floor => {
            let floor = if delete {
                FloorSurface::default()
            } else {
                palette.paint_floor().clone()
            };
            if floor == cell.floor {
                return None;
            }
            CellPatch::floor(floor)
        }
        EditLayer::Walls => {
            let walls = if delete {
                Walls::default()
            } else if let Some(captured) = &palette.captured {
                captured.walls.clone()
            } else {
                let full = Walls::uniform(Some(palette.paint_wall()));
                // Toggle: a fully walled cell of this type is cleared
                if cell.walls == full {
                    Walls::default()
                } else {
                    full
                }
            };
            if walls == cell.walls {
                return None;
            }
            CellPatch::walls(walls)
        }
        EditLayer::Events => {
            if delete {
                if cell.events.is_empty() {
                    return None;
                }
                CellPatch::events(Vec::new())
            } else {
                let mut events = cell.events.clone();
                events.push(Event::new(palette.event_type.clone(), cell.position));
                CellPatch::events(events)
            }
        }
        EditLayer::Decorations => {
            if delete {
                if cell.decorations.is_empty() {
                    return None;
                }
                CellPatch::decorations(Vec::new())
            } else {
                CellPatch::decorations(vec![Decoration::new(
                    palette.decoration_type.clone(),
                    cell.position,
                )])
            }
        }
    };
    Some(patch)
}

fn label_for(verb: &str, layer: EditLayer) -> String {
    format!("{} {}", verb, layer.label().to_lowercase())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub const CELL: f32 = 32.0;

    /// Pixel at the centre of a cell
    pub fn center(x: i32, y: i32) -> PixelPos {
        PixelPos::new(x as f32 * CELL + CELL / 2.0, y as f32 * CELL + CELL / 2.0)
    }

    pub fn press(pos: PixelPos) -> PointerEvent {
        PointerEvent::new(PointerKind::Press, pos, Modifiers::default())
    }

    pub fn press_delete(pos: PixelPos) -> PointerEvent {
        PointerEvent::new(PointerKind::Press, pos, Modifiers { delete: true })
    }

    pub fn moved(pos: PixelPos) -> PointerEvent {
        PointerEvent::new(PointerKind::Move, pos, Modifiers::default())
    }

    pub fn release(pos: PixelPos) -> PointerEvent {
        PointerEvent::new(PointerKind::Release, pos, Modifiers::default())
    }

    pub fn ctx<'a>(floor: &'a Floor, palette: &'a Palette) -> ToolContext<'a> {
        ToolContext {
            floor,
            floor_index: 0,
            cell_size: CELL,
            drag_threshold: crate::preferences::DEFAULT_DRAG_THRESHOLD,
            palette,
        }
    }

    pub fn updates(edit: Option<Edit>) -> Vec<dungeon_core::CellUpdate> {
        match edit {
            Some(Edit::Apply(batch)) => batch.updates,
            other => panic!("expected cell updates, got {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use dungeon_core::{Direction, FloorType};

    #[test]
    fn test_cancel_discards_pending_gestures() {
        let floor = Floor::new("1F".to_string(), 5, 5);
        let palette = Palette::default();
        let ctx = ctx(&floor, &palette);

        let (tool, edit) = handle_pointer_event(
            Tool::from(ToolKind::Rectangle),
            &press(center(1, 1)),
            &ctx,
        );
        assert!(edit.is_none());
        assert!(tool.has_pending_gesture());

        let (tool, edit) = handle_pointer_event(tool, &PointerEvent::cancel(), &ctx);
        assert!(edit.is_none());
        assert_eq!(tool, Tool::Rectangle(AnchorState::default()));
    }

    #[test]
    fn test_tool_kind_round_trip() {
        for kind in ToolKind::all() {
            assert_eq!(Tool::from(*kind).kind(), *kind);
        }
    }

    #[test]
    fn test_paint_patch_prefers_captured_floor() {
        let cell = Cell::new(GridPos::new(0, 0));
        let palette = Palette {
            floor: FloorSurface::new(FloorType::Damage),
            captured: Some(CapturedCell {
                floor: FloorSurface::new(FloorType::Warp),
                walls: Walls::default(),
            }),
            ..Default::default()
        };
        let patch = paint_patch(&cell, &palette, false).unwrap();
        assert_eq!(patch.floor.unwrap().floor_type, FloorType::Warp);
        assert!(paint_patch(&cell, &palette, true).is_none());
    }

    #[test]
    fn test_wall_layer_toggles_full_enclosure() {
        let palette = Palette {
            layer: EditLayer::Walls,
            ..Default::default()
        };
        let mut cell = Cell::new(GridPos::new(0, 0));
        let patch = paint_patch(&cell, &palette, false).unwrap();
        cell.apply(patch);
        assert!(Direction::all()
            .iter()
            .all(|dir| cell.walls.get(*dir).is_some()));

        let patch = paint_patch(&cell, &palette, false).unwrap();
        assert_eq!(patch.walls, Some(Walls::default()));
    }
}
