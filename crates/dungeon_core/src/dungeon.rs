//! Dungeon: the ordered set of floors making up one project

use crate::{DungeonError, DungeonResult, Floor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Current format version written by `to_json`
pub const DUNGEON_FORMAT_VERSION: u32 = 1;

/// A user-defined floor/wall/event/decoration type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTypeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Project-level resources shared by all floors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_floor_types: Vec<CustomTypeDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_wall_types: Vec<CustomTypeDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_event_types: Vec<CustomTypeDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_decoration_types: Vec<CustomTypeDef>,
    /// Anything else a front end wants to keep with the project
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for ResourceMetadata {
    fn default() -> Self {
        Self {
            version: DUNGEON_FORMAT_VERSION,
            custom_floor_types: Vec::new(),
            custom_wall_types: Vec::new(),
            custom_event_types: Vec::new(),
            custom_decoration_types: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

/// A dungeon: an ordered, never-empty list of floors.
///
/// Floors sit behind `Arc` so that cloning a dungeon for a history snapshot
/// shares every floor that a commit does not touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub author: String,
    pub floors: Vec<Arc<Floor>>,
    #[serde(default)]
    pub resources: ResourceMetadata,
}

impl Dungeon {
    /// Create a dungeon with a single blank floor
    pub fn new(name: String, author: String, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            author,
            floors: vec![Arc::new(Floor::new("1F".to_string(), width, height))],
            resources: ResourceMetadata::default(),
        }
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    /// Get floor by index
    pub fn floor(&self, index: usize) -> Option<&Floor> {
        self.floors.get(index).map(|f| f.as_ref())
    }

    /// Get a floor for writing, detaching it from any snapshot that shares it
    pub fn floor_mut(&mut self, index: usize) -> Option<&mut Floor> {
        self.floors.get_mut(index).map(Arc::make_mut)
    }

    pub fn floor_index(&self, id: Uuid) -> Option<usize> {
        self.floors.iter().position(|f| f.id == id)
    }

    fn check_index(&self, index: usize) -> DungeonResult<()> {
        if index < self.floors.len() {
            Ok(())
        } else {
            Err(DungeonError::NoSuchFloor(index))
        }
    }

    /// Append a blank floor and return its index
    pub fn add_floor(&mut self, name: String, width: u32, height: u32) -> DungeonResult<usize> {
        if width == 0 || height == 0 {
            return Err(DungeonError::invariant(format!(
                "floor size must be positive, got {}x{}",
                width, height
            )));
        }
        self.floors.push(Arc::new(Floor::new(name, width, height)));
        Ok(self.floors.len() - 1)
    }

    /// Remove a floor. The last remaining floor can never be removed.
    pub fn remove_floor(&mut self, index: usize) -> DungeonResult<Floor> {
        self.check_index(index)?;
        if self.floors.len() == 1 {
            return Err(DungeonError::invariant("cannot remove the last floor"));
        }
        let floor = self.floors.remove(index);
        Ok(Arc::unwrap_or_clone(floor))
    }

    pub fn rename_floor(&mut self, index: usize, name: String) -> DungeonResult<()> {
        let floor = self
            .floor_mut(index)
            .ok_or(DungeonError::NoSuchFloor(index))?;
        floor.name = name;
        Ok(())
    }

    /// Deep-copy a floor and insert the copy right after its source.
    ///
    /// The copy gets a fresh floor id and fresh event/decoration ids so ids
    /// stay unique across the dungeon.
    pub fn duplicate_floor(&mut self, source: usize, name: String) -> DungeonResult<usize> {
        let mut copy = self
            .floor(source)
            .cloned()
            .ok_or(DungeonError::NoSuchFloor(source))?;
        copy.id = Uuid::new_v4();
        copy.name = name;
        for cell in copy.cells.iter_mut().flatten() {
            for event in &mut cell.events {
                event.id = Uuid::new_v4();
            }
            for decoration in &mut cell.decorations {
                decoration.id = Uuid::new_v4();
            }
        }
        let index = source + 1;
        self.floors.insert(index, Arc::new(copy));
        Ok(index)
    }

    /// Move a floor to a new position in the floor order
    pub fn move_floor(&mut self, from: usize, to: usize) -> DungeonResult<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let floor = self.floors.remove(from);
        self.floors.insert(to, floor);
        Ok(())
    }

    /// Check the structural invariants of the whole tree
    pub fn validate(&self) -> DungeonResult<()> {
        if self.floors.is_empty() {
            return Err(DungeonError::invariant("dungeon has no floors"));
        }
        let mut event_ids = HashSet::new();
        for floor in &self.floors {
            floor.validate()?;
            for event in floor.iter_cells().flat_map(|cell| &cell.events) {
                if !event_ids.insert(event.id) {
                    return Err(DungeonError::invariant(format!(
                        "event id {} appears more than once (floor '{}')",
                        event.id, floor.name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> DungeonResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> DungeonResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a dungeon document
    pub fn from_json(json: &str) -> DungeonResult<Self> {
        let dungeon: Dungeon = serde_json::from_str(json)?;
        if let Err(err) = dungeon.validate() {
            warn!(error = %err, name = %dungeon.name, "rejected dungeon document");
            return Err(err);
        }
        debug!(name = %dungeon.name, floors = dungeon.floors.len(), "parsed dungeon document");
        Ok(dungeon)
    }
}
