//! The dungeon model: single source of truth for the edited dungeon
//!
//! Every mutation clones the current dungeon into a candidate, applies the
//! whole change to the candidate and only then commits it to the history.
//! A failing operation therefore never leaves a partially applied state.
//! Cloning is cheap because floors are shared between snapshots until a
//! commit writes to them.

use crate::history::HistoryManager;
use crate::preferences::{EditorPreferences, SharedWallMode};
use dungeon_core::{
    Cell, CellPatch, CellUpdate, Direction, Dungeon, DungeonError, DungeonResult, Floor,
    FloorEnvironment, Template,
};
use std::fmt;
use tracing::{debug, info, warn};

/// Change notifications delivered to the injected listener
#[derive(Debug, Clone, PartialEq)]
pub enum EditNotice {
    /// A mutation was committed as one history entry
    Committed { label: String },
    Undone,
    Redone,
    /// The whole dungeon was replaced (new project or load)
    Replaced,
    /// An operation was refused and nothing changed
    Rejected { reason: String },
}

/// Callback receiving `EditNotice`s, e.g. to trigger a re-render
pub type EditListener = Box<dyn FnMut(&EditNotice) + Send + Sync>;

/// A batch of cell updates on one floor, committed as a single unit
#[derive(Debug, Clone, PartialEq)]
pub struct CellBatch {
    pub floor: usize,
    pub updates: Vec<CellUpdate>,
    /// Human-readable description for history/notifications
    pub label: String,
}

impl CellBatch {
    pub fn new(floor: usize, updates: Vec<CellUpdate>, label: impl Into<String>) -> Self {
        Self {
            floor,
            updates,
            label: label.into(),
        }
    }
}

pub struct DungeonModel {
    history: HistoryManager<Dungeon>,
    shared_walls: SharedWallMode,
    listener: Option<EditListener>,
}

impl fmt::Debug for DungeonModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DungeonModel")
            .field("dungeon", &self.dungeon().name)
            .field("history_len", &self.history.len())
            .field("history_index", &self.history.index())
            .field("shared_walls", &self.shared_walls)
            .finish()
    }
}

impl DungeonModel {
    pub fn new(dungeon: Dungeon, preferences: &EditorPreferences) -> Self {
        Self {
            history: HistoryManager::new(dungeon, preferences.history_limit),
            shared_walls: preferences.shared_walls,
            listener: None,
        }
    }

    /// Install the change listener, replacing any previous one
    pub fn set_listener(&mut self, listener: EditListener) {
        self.listener = Some(listener);
    }

    pub(crate) fn notify(&mut self, notice: EditNotice) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&notice);
        }
    }

    pub fn set_shared_wall_mode(&mut self, mode: SharedWallMode) {
        self.shared_walls = mode;
    }

    pub fn shared_wall_mode(&self) -> SharedWallMode {
        self.shared_walls
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.history.set_limit(limit);
    }

    /// The current dungeon
    pub fn dungeon(&self) -> &Dungeon {
        self.history.current()
    }

    /// Get floor by index
    pub fn floor(&self, index: usize) -> DungeonResult<&Floor> {
        self.dungeon()
            .floor(index)
            .ok_or(DungeonError::NoSuchFloor(index))
    }

    /// Get cell at position on a floor
    pub fn get_cell(&self, floor_index: usize, pos: dungeon_core::GridPos) -> DungeonResult<&Cell> {
        let floor = self.floor(floor_index)?;
        floor.cell(pos).ok_or_else(|| floor.out_of_bounds(pos))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Run `change` against a candidate copy and commit it if it succeeds
    fn mutate<R>(
        &mut self,
        label: &str,
        change: impl FnOnce(&mut Dungeon, SharedWallMode) -> DungeonResult<R>,
    ) -> DungeonResult<R> {
        let mut candidate = self.dungeon().clone();
        match change(&mut candidate, self.shared_walls) {
            Ok(result) => {
                self.history.commit(candidate);
                debug!(
                    label,
                    history = self.history.len(),
                    "committed dungeon change"
                );
                self.notify(EditNotice::Committed {
                    label: label.to_string(),
                });
                Ok(result)
            }
            Err(err) => {
                warn!(label, error = %err, "rejected dungeon change");
                Err(err)
            }
        }
    }

    /// Shallow-merge the provided fields into one cell
    pub fn set_cell(
        &mut self,
        floor_index: usize,
        pos: dungeon_core::GridPos,
        patch: CellPatch,
    ) -> DungeonResult<()> {
        self.set_cells(floor_index, vec![CellUpdate::new(pos, patch)])
            .map(|_| ())
    }

    /// Apply a batch of updates as one commit; returns how many were applied
    pub fn set_cells(
        &mut self,
        floor_index: usize,
        updates: Vec<CellUpdate>,
    ) -> DungeonResult<usize> {
        self.apply_batch(CellBatch::new(floor_index, updates, "Edit cells"))
    }

    /// Apply a batch atomically: every position is checked before anything
    /// is written, and the whole batch becomes a single history entry. An
    /// empty batch commits nothing.
    pub fn apply_batch(&mut self, batch: CellBatch) -> DungeonResult<usize> {
        let floor = self.floor(batch.floor)?;
        if let Some(bad) = batch.updates.iter().find(|u| !floor.contains(u.position)) {
            let err = floor.out_of_bounds(bad.position);
            warn!(label = %batch.label, error = %err, "rejected cell batch");
            return Err(err);
        }
        if batch.updates.is_empty() {
            return Ok(0);
        }

        let CellBatch {
            floor: floor_index,
            updates,
            label,
        } = batch;
        let count = updates.len();
        self.mutate(&label, move |dungeon, shared_walls| {
            let floor = dungeon
                .floor_mut(floor_index)
                .ok_or(DungeonError::NoSuchFloor(floor_index))?;
            for update in updates {
                match shared_walls {
                    SharedWallMode::Independent => floor.apply(update)?,
                    SharedWallMode::Mirrored => apply_mirrored(floor, update)?,
                }
            }
            Ok(count)
        })
    }

    /// Append a blank floor and return its index
    pub fn add_floor(&mut self, name: String, width: u32, height: u32) -> DungeonResult<usize> {
        let index = self.mutate("Add floor", |dungeon, _| {
            dungeon.add_floor(name, width, height)
        })?;
        info!(floor = index, width, height, "added floor");
        Ok(index)
    }

    /// Remove a floor; the last floor can never be removed
    pub fn remove_floor(&mut self, index: usize) -> DungeonResult<()> {
        self.mutate("Remove floor", |dungeon, _| dungeon.remove_floor(index))?;
        info!(floor = index, "removed floor");
        Ok(())
    }

    pub fn rename_floor(&mut self, index: usize, name: String) -> DungeonResult<()> {
        self.mutate("Rename floor", |dungeon, _| dungeon.rename_floor(index, name))
    }

    /// Deep-copy a floor; returns the index of the copy
    pub fn duplicate_floor(&mut self, source: usize, name: String) -> DungeonResult<usize> {
        let index = self.mutate("Duplicate floor", |dungeon, _| {
            dungeon.duplicate_floor(source, name)
        })?;
        info!(source, floor = index, "duplicated floor");
        Ok(index)
    }

    pub fn move_floor(&mut self, from: usize, to: usize) -> DungeonResult<()> {
        self.mutate("Reorder floors", |dungeon, _| dungeon.move_floor(from, to))
    }

    pub fn set_dungeon_info(&mut self, name: String, author: String) -> DungeonResult<()> {
        self.mutate("Edit dungeon info", |dungeon, _| {
            dungeon.name = name;
            dungeon.author = author;
            Ok(())
        })
    }

    pub fn set_floor_environment(
        &mut self,
        index: usize,
        environment: FloorEnvironment,
    ) -> DungeonResult<()> {
        self.mutate("Edit floor environment", |dungeon, _| {
            let floor = dungeon
                .floor_mut(index)
                .ok_or(DungeonError::NoSuchFloor(index))?;
            floor.environment = environment;
            Ok(())
        })
    }

    /// Replace a floor's whole grid (and size) with a full-map template
    pub fn apply_full_map_template(
        &mut self,
        index: usize,
        template: &Template,
    ) -> DungeonResult<()> {
        if !template.is_full_map {
            return Err(DungeonError::invariant(
                "only full-map templates can replace a whole floor",
            ));
        }
        if template.width == 0 || template.height == 0 {
            return Err(DungeonError::invariant("full-map template is empty"));
        }
        self.mutate("Apply map template", |dungeon, _| {
            let floor = dungeon
                .floor_mut(index)
                .ok_or(DungeonError::NoSuchFloor(index))?;
            floor.width = template.width;
            floor.height = template.height;
            floor.cells = template.to_cells();
            floor.validate()
        })?;
        info!(floor = index, template = %template.name, "applied full-map template");
        Ok(())
    }

    /// Swap in a different dungeon (new project or load). History restarts
    /// from the new dungeon.
    pub fn replace_dungeon(&mut self, dungeon: Dungeon) -> DungeonResult<()> {
        dungeon.validate()?;
        info!(name = %dungeon.name, floors = dungeon.floor_count(), "replaced dungeon");
        self.history.reset(dungeon);
        self.notify(EditNotice::Replaced);
        Ok(())
    }

    /// Restore the previous snapshot
    pub fn undo(&mut self) -> DungeonResult<()> {
        self.history.undo()?;
        debug!(index = self.history.index(), "undo");
        self.notify(EditNotice::Undone);
        Ok(())
    }

    /// Re-apply the next snapshot
    pub fn redo(&mut self) -> DungeonResult<()> {
        self.history.redo()?;
        debug!(index = self.history.index(), "redo");
        self.notify(EditNotice::Redone);
        Ok(())
    }
}

/// Apply an update and copy every changed wall slot onto the neighbour's
/// opposite slot
fn apply_mirrored(floor: &mut Floor, update: CellUpdate) -> DungeonResult<()> {
    let pos = update.position;
    let old_walls = floor
        .cell(pos)
        .map(|cell| cell.walls.clone())
        .ok_or_else(|| floor.out_of_bounds(pos))?;
    floor.apply(update)?;
    let new_walls = floor
        .cell(pos)
        .map(|cell| cell.walls.clone())
        .ok_or_else(|| floor.out_of_bounds(pos))?;

    for &direction in Direction::all() {
        let slot = new_walls.slot(direction);
        if slot == old_walls.slot(direction) {
            continue;
        }
        if let Some(neighbor) = floor.cell_mut(pos.step(direction)) {
            neighbor.walls.set(direction.opposite(), slot.clone());
        }
    }
    Ok(())
}
