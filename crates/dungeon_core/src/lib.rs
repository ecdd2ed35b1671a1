//! Core data structures for dungeon_editor
//!
//! This crate provides the fundamental types for representing grid-based
//! dungeon maps:
//! - `Dungeon` - An ordered, never-empty list of floors plus project resources
//! - `Floor` - A fixed-size grid of cells with environment metadata
//! - `Cell` - Floor surface, four wall slots, events and decorations
//! - `Template` - A rotatable rectangular cut-out of cell content
//! - `DungeonError` - The recoverable error taxonomy shared by all operations

mod cell;
mod decoration;
mod dungeon;
mod error;
mod event;
mod floor;
mod grid;
mod template;

pub use cell::{
    Cell, CellPatch, CellUpdate, FloorSurface, FloorType, Wall, WallType, Walls,
};
pub use decoration::{Decoration, DecorationAppearance, DecorationType};
pub use dungeon::{CustomTypeDef, Dungeon, ResourceMetadata, DUNGEON_FORMAT_VERSION};
pub use error::{DungeonError, DungeonResult, HistoryDirection};
pub use event::{
    Event, EventAction, EventAppearance, EventMetadata, EventTrigger, EventType, RepeatPolicy,
    TriggerType,
};
pub use floor::{Floor, FloorEnvironment};
pub use grid::{Direction, GridPos, GridRect};
pub use template::{Rotation, Template, TemplateCell};
