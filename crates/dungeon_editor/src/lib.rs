//! dungeon_editor - Editing engine for grid-based dungeon maps
//!
//! This crate turns pointer input into undoable edits of a
//! [`dungeon_core::Dungeon`]:
//! - Pixel/grid mapping with pan and zoom (`geometry`)
//! - Line and wall stroke rasterization (`raster`)
//! - Bounded snapshot undo/redo (`history`)
//! - Atomic, validated mutations (`model`)
//! - Pen, rectangle, fill, eyedropper, eraser, template and range-select
//!   tools (`tools`)
//! - Persisted editor preferences (`preferences`)
//!
//! # Usage
//!
//! ```rust,ignore
//! use dungeon_editor::{DungeonEditor, EditorPreferences, Modifiers, PixelPos, ToolKind};
//!
//! let mut editor = DungeonEditor::from_preferences(EditorPreferences::load());
//! editor.select_tool(ToolKind::Pen);
//! editor.pointer_down(PixelPos::new(40.0, 40.0), Modifiers::default())?;
//! editor.pointer_up(PixelPos::new(40.0, 40.0), Modifiers::default())?;
//! editor.undo()?;
//! ```

pub mod geometry;
pub mod history;
pub mod model;
pub mod preferences;
pub mod raster;
pub mod tools;

pub use dungeon_core;

pub use geometry::{Axis, PixelPos, Viewport, WallBoundary};
pub use history::HistoryManager;
pub use model::{CellBatch, DungeonModel, EditListener, EditNotice};
pub use preferences::{EditorPreferences, PreferencesError, SharedWallMode};
pub use tools::{
    CapturedCell, Edit, EditLayer, Modifiers, Palette, PointerEvent, PointerKind, Tool,
    ToolContext, ToolKind,
};

use dungeon_core::{Dungeon, DungeonError, DungeonResult, Floor, GridRect, Rotation, Template};
use tools::handle_pointer_event;
use tracing::{debug, info, warn};

/// The editor session: model, active tool, palette and view.
///
/// Pointer positions passed to the `pointer_*` methods are screen pixels;
/// the viewport converts them to grid pixels before the tool sees them.
#[derive(Debug)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct DungeonEditor {
    model: DungeonModel,
    tool: Tool,
    palette: Palette,
    current_floor: usize,
    /// Confirmed range selection, input for template creation
    selection: Option<GridRect>,
    viewport: Viewport,
    preferences: EditorPreferences,
}

impl DungeonEditor {
    pub fn new(dungeon: Dungeon, preferences: EditorPreferences) -> Self {
        Self {
            model: DungeonModel::new(dungeon, &preferences),
            tool: Tool::default(),
            palette: Palette::default(),
            current_floor: 0,
            selection: None,
            viewport: Viewport::new(preferences.cell_size),
            preferences,
        }
    }

    /// A session on a fresh, untitled dungeon sized from the preferences
    pub fn from_preferences(preferences: EditorPreferences) -> Self {
        let dungeon = Dungeon::new(
            "Untitled".to_string(),
            String::new(),
            preferences.default_floor_width,
            preferences.default_floor_height,
        );
        Self::new(dungeon, preferences)
    }

    /// Install the change listener
    pub fn set_listener(&mut self, listener: EditListener) {
        self.model.set_listener(listener);
    }

    /// Start over with a blank dungeon; history is cleared
    pub fn new_project(
        &mut self,
        name: String,
        author: String,
        width: u32,
        height: u32,
    ) -> DungeonResult<()> {
        if width == 0 || height == 0 {
            return Err(DungeonError::invariant("floor size must be non-zero"));
        }
        self.replace_dungeon(Dungeon::new(name, author, width, height))
    }

    /// Load a dungeon document; history is cleared
    pub fn open_json(&mut self, json: &str) -> DungeonResult<()> {
        self.replace_dungeon(Dungeon::from_json(json)?)
    }

    pub fn to_json(&self) -> DungeonResult<String> {
        self.dungeon().to_json_pretty()
    }

    fn replace_dungeon(&mut self, dungeon: Dungeon) -> DungeonResult<()> {
        self.model.replace_dungeon(dungeon)?;
        self.tool = std::mem::take(&mut self.tool).cancelled();
        self.current_floor = 0;
        self.selection = None;
        Ok(())
    }

    pub fn model(&self) -> &DungeonModel {
        &self.model
    }

    /// Direct access for floor and dungeon-level operations
    pub fn model_mut(&mut self) -> &mut DungeonModel {
        &mut self.model
    }

    pub fn dungeon(&self) -> &Dungeon {
        self.model.dungeon()
    }

    /// Index of the floor being edited, kept in range when floors are
    /// removed or an undo shrinks the floor list
    pub fn current_floor(&self) -> usize {
        self.current_floor
            .min(self.dungeon().floor_count().saturating_sub(1))
    }

    pub fn floor(&self) -> DungeonResult<&Floor> {
        self.model.floor(self.current_floor())
    }

    /// Switch floors, discarding any pending gesture
    pub fn set_current_floor(&mut self, index: usize) -> DungeonResult<()> {
        if index >= self.dungeon().floor_count() {
            return Err(DungeonError::NoSuchFloor(index));
        }
        self.cancel();
        self.current_floor = index;
        self.selection = None;
        Ok(())
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Switch tools, discarding any pending gesture
    pub fn select_tool(&mut self, kind: ToolKind) {
        if self.tool.kind() != kind {
            debug!(tool = kind.label(), "selected tool");
            self.tool = Tool::from(kind);
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn preferences(&self) -> &EditorPreferences {
        &self.preferences
    }

    pub fn selection(&self) -> Option<GridRect> {
        self.selection
    }

    pub fn pointer_down(&mut self, screen: PixelPos, modifiers: Modifiers) -> DungeonResult<()> {
        self.dispatch(PointerKind::Press, screen, modifiers)
    }

    pub fn pointer_move(&mut self, screen: PixelPos, modifiers: Modifiers) -> DungeonResult<()> {
        self.dispatch(PointerKind::Move, screen, modifiers)
    }

    pub fn pointer_up(&mut self, screen: PixelPos, modifiers: Modifiers) -> DungeonResult<()> {
        self.dispatch(PointerKind::Release, screen, modifiers)
    }

    /// Abandon any pending drag, rectangle anchor or selection. Never
    /// touches the model or its history.
    pub fn cancel(&mut self) {
        if self.tool.has_pending_gesture() {
            debug!(tool = self.tool.kind().label(), "gesture cancelled");
        }
        self.tool = std::mem::take(&mut self.tool).cancelled();
    }

    /// Freeze the pending range selection without a second click
    pub fn confirm_selection(&mut self) -> Option<GridRect> {
        if let Tool::RangeSelect(state) = &self.tool {
            let (state, edit) = state.confirm();
            self.tool = Tool::RangeSelect(state);
            if let Some(Edit::ConfirmSelection(rect)) = edit {
                self.selection = Some(rect);
            }
        }
        self.selection
    }

    /// Turn the template tool's rotation a quarter clockwise
    pub fn rotate_template_clockwise(&mut self) -> Option<Rotation> {
        match &mut self.tool {
            Tool::Template(state) => {
                state.rotate_clockwise();
                Some(state.rotation)
            }
            _ => None,
        }
    }

    /// Cut the confirmed selection into a template and make it the active one
    pub fn create_template_from_selection(&mut self, name: String) -> DungeonResult<Template> {
        let rect = self
            .selection
            .ok_or_else(|| DungeonError::invariant("no confirmed selection"))?;
        let template = Template::from_region(self.floor()?, rect, name)?;
        info!(
            template = %template.name,
            width = template.width,
            height = template.height,
            "created template"
        );
        self.palette.template = Some(template.clone());
        Ok(template)
    }

    /// Capture the current floor as a full-map template
    pub fn create_full_map_template(&self, name: String) -> DungeonResult<Template> {
        Template::from_floor(self.floor()?, name)
    }

    /// Replace the current floor with a full-map template
    pub fn apply_full_map_template(&mut self, template: &Template) -> DungeonResult<()> {
        let index = self.current_floor();
        self.cancel();
        self.model.apply_full_map_template(index, template)
    }

    pub fn undo(&mut self) -> DungeonResult<()> {
        self.cancel();
        self.model.undo()
    }

    pub fn redo(&mut self) -> DungeonResult<()> {
        self.cancel();
        self.model.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.model.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.model.can_redo()
    }

    fn dispatch(
        &mut self,
        kind: PointerKind,
        screen: PixelPos,
        modifiers: Modifiers,
    ) -> DungeonResult<()> {
        let event = PointerEvent::new(kind, self.viewport.screen_to_grid(screen), modifiers);
        let floor_index = self.current_floor();
        let ctx = ToolContext {
            floor: self.model.floor(floor_index)?,
            floor_index,
            cell_size: self.viewport.cell_size(),
            drag_threshold: self.preferences.drag_threshold,
            palette: &self.palette,
        };
        let (tool, edit) = handle_pointer_event(std::mem::take(&mut self.tool), &event, &ctx);
        self.tool = tool;
        match edit {
            Some(edit) => self.apply_edit(edit),
            None => Ok(()),
        }
    }

    fn apply_edit(&mut self, edit: Edit) -> DungeonResult<()> {
        match edit {
            Edit::Apply(batch) => {
                if let Err(err) = self.model.apply_batch(batch) {
                    self.model.notify(EditNotice::Rejected {
                        reason: err.to_string(),
                    });
                    return Err(err);
                }
            }
            Edit::Capture(captured) => {
                debug!(floor = ?captured.floor.floor_type, "captured cell");
                self.palette.captured = Some(captured);
            }
            Edit::ConfirmSelection(rect) => {
                debug!(?rect, "selection confirmed");
                self.selection = Some(rect);
            }
            Edit::Rejected { reason } => {
                warn!(%reason, "edit rejected");
                self.model.notify(EditNotice::Rejected { reason });
            }
        }
        Ok(())
    }
}

/// Inserts a [`DungeonEditor`] built from the saved preferences
#[cfg(feature = "bevy")]
pub struct DungeonEditorPlugin;

#[cfg(feature = "bevy")]
impl bevy::prelude::Plugin for DungeonEditorPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        app.insert_resource(DungeonEditor::from_preferences(EditorPreferences::load()));
    }
}
