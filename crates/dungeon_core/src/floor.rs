//! A single floor of a dungeon: a fixed-size grid of cells

use crate::{Cell, CellUpdate, Direction, DungeonError, DungeonResult, GridPos, Wall};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lighting, ceiling and audio settings. Opaque to the editor; kept as raw
/// JSON so renderers can evolve their formats independently.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FloorEnvironment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<serde_json::Value>,
}

/// One level of a dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: Uuid,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// `height` rows of `width` cells
    pub cells: Vec<Vec<Cell>>,
    #[serde(default)]
    pub environment: FloorEnvironment,
}

impl Floor {
    /// Create a floor where every cell is a blank passable cell
    pub fn new(name: String, width: u32, height: u32) -> Self {
        let cells = (0..height as i32)
            .map(|y| {
                (0..width as i32)
                    .map(|x| Cell::new(GridPos::new(x, y)))
                    .collect()
            })
            .collect();
        Self {
            id: Uuid::new_v4(),
            name,
            width,
            height,
            cells,
            environment: FloorEnvironment::default(),
        }
    }

    /// Check if a position lies inside `[0,width) x [0,height)`
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Get cell at position
    pub fn cell(&self, pos: GridPos) -> Option<&Cell> {
        if !self.contains(pos) {
            return None;
        }
        self.cells
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    /// Get mutable cell at position
    pub fn cell_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        if !self.contains(pos) {
            return None;
        }
        self.cells
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Iterate all cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn out_of_bounds(&self, pos: GridPos) -> DungeonError {
        DungeonError::OutOfBounds {
            x: pos.x,
            y: pos.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Apply a single patch in place
    pub fn apply(&mut self, update: CellUpdate) -> DungeonResult<()> {
        let err = self.out_of_bounds(update.position);
        let cell = self.cell_mut(update.position).ok_or(err)?;
        cell.apply(update.patch);
        Ok(())
    }

    /// The wall visible on one side of a cell.
    ///
    /// Walls between neighbours are stored on both cells independently, so
    /// this looks at the cell's own slot first and falls back to the
    /// neighbour's opposite slot.
    pub fn effective_wall(&self, pos: GridPos, direction: Direction) -> Option<&Wall> {
        let own = self.cell(pos)?.walls.get(direction);
        own.or_else(|| {
            self.cell(pos.step(direction))
                .and_then(|neighbor| neighbor.walls.get(direction.opposite()))
        })
    }

    /// Check grid shape and that every cell, event and decoration sits at
    /// its grid index
    pub fn validate(&self) -> DungeonResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DungeonError::invariant(format!(
                "floor '{}' has zero size {}x{}",
                self.name, self.width, self.height
            )));
        }
        if self.cells.len() != self.height as usize {
            return Err(DungeonError::invariant(format!(
                "floor '{}' has {} rows, expected {}",
                self.name,
                self.cells.len(),
                self.height
            )));
        }
        for (y, row) in self.cells.iter().enumerate() {
            if row.len() != self.width as usize {
                return Err(DungeonError::invariant(format!(
                    "floor '{}' row {} has {} cells, expected {}",
                    self.name,
                    y,
                    row.len(),
                    self.width
                )));
            }
            for (x, cell) in row.iter().enumerate() {
                let expected = GridPos::new(x as i32, y as i32);
                let misplaced = cell.position != expected
                    || cell.events.iter().any(|e| e.position != expected)
                    || cell.decorations.iter().any(|d| d.position != expected);
                if misplaced {
                    return Err(DungeonError::invariant(format!(
                        "floor '{}' has content at ({}, {}) that does not match its grid index",
                        self.name, x, y
                    )));
                }
            }
        }
        Ok(())
    }
}
