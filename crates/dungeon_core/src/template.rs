//! Templates: reusable rectangular cut-outs of cell content
//!
//! A template stores cell content independent of where it came from. It can
//! be rotated in 90 degree steps and projected back onto a floor at any
//! origin where it fits. Full-map templates represent a whole floor and are
//! only ever applied as a whole-floor replacement.

use crate::{
    Cell, CellPatch, CellUpdate, Decoration, DungeonError, DungeonResult, Event, Floor,
    FloorSurface, GridPos, GridRect, Walls,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Clockwise rotation in 90 degree steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Parse a multiple of 90 degrees (any multiple, wrapped to one turn)
    pub fn from_degrees(degrees: u16) -> Option<Rotation> {
        match degrees % 360 {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }

    /// Number of clockwise quarter turns
    pub fn quarter_turns(self) -> u16 {
        self.degrees() / 90
    }

    pub fn clockwise(self) -> Rotation {
        self.add(Rotation::R90)
    }

    pub fn add(self, other: Rotation) -> Rotation {
        match (self.degrees() + other.degrees()) % 360 {
            90 => Rotation::R90,
            180 => Rotation::R180,
            270 => Rotation::R270,
            _ => Rotation::R0,
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> u16 {
        rotation.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
            .ok_or_else(|| format!("rotation must be a multiple of 90 degrees, got {}", degrees))
    }
}

/// Content of one template cell. Event and decoration positions are local
/// to the template's top-left corner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateCell {
    pub floor: FloorSurface,
    #[serde(default)]
    pub walls: Walls,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
}

impl TemplateCell {
    fn from_cell(cell: &Cell, local: GridPos) -> Self {
        let mut content = Self {
            floor: cell.floor.clone(),
            walls: cell.walls.clone(),
            events: cell.events.clone(),
            decorations: cell.decorations.clone(),
        };
        content.anchor(local);
        content
    }

    fn anchor(&mut self, pos: GridPos) {
        for event in &mut self.events {
            event.position = pos;
        }
        for decoration in &mut self.decorations {
            decoration.position = pos;
        }
    }

    /// Patch writing this content at a world position, with fresh ids so
    /// repeated placements never duplicate an event or decoration id
    fn to_patch(&self) -> CellPatch {
        let mut events = self.events.clone();
        for event in &mut events {
            event.id = Uuid::new_v4();
        }
        let mut decorations = self.decorations.clone();
        for decoration in &mut decorations {
            decoration.id = Uuid::new_v4();
        }
        CellPatch {
            floor: Some(self.floor.clone()),
            walls: Some(self.walls.clone()),
            events: Some(events),
            decorations: Some(decorations),
        }
    }
}

/// A reusable rectangular snapshot of cell content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// `height` rows of `width` cells
    pub cells: Vec<Vec<TemplateCell>>,
    #[serde(default)]
    pub rotation: Rotation,
    /// Represents an entire floor rather than a sub-region
    #[serde(default)]
    pub is_full_map: bool,
}

impl Template {
    /// Create a template of blank cells
    pub fn new(name: String, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            width,
            height,
            cells: vec![vec![TemplateCell::default(); width as usize]; height as usize],
            rotation: Rotation::R0,
            is_full_map: false,
        }
    }

    /// Cut a rectangular region out of a floor
    pub fn from_region(floor: &Floor, rect: GridRect, name: String) -> DungeonResult<Self> {
        for corner in [rect.min, rect.max] {
            if !floor.contains(corner) {
                return Err(floor.out_of_bounds(corner));
            }
        }
        let cells = (rect.min.y..=rect.max.y)
            .map(|y| {
                (rect.min.x..=rect.max.x)
                    .filter_map(|x| {
                        let local = GridPos::new(x - rect.min.x, y - rect.min.y);
                        floor
                            .cell(GridPos::new(x, y))
                            .map(|cell| TemplateCell::from_cell(cell, local))
                    })
                    .collect()
            })
            .collect();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            width: rect.width(),
            height: rect.height(),
            cells,
            rotation: Rotation::R0,
            is_full_map: false,
        })
    }

    /// Capture a whole floor as a full-map template
    pub fn from_floor(floor: &Floor, name: String) -> DungeonResult<Self> {
        let rect = GridRect::from_corners(
            GridPos::new(0, 0),
            GridPos::new(floor.width as i32 - 1, floor.height as i32 - 1),
        );
        let mut template = Self::from_region(floor, rect, name)?;
        template.is_full_map = true;
        Ok(template)
    }

    /// Get template cell at a local position
    pub fn cell(&self, x: u32, y: u32) -> Option<&TemplateCell> {
        self.cells.get(y as usize).and_then(|row| row.get(x as usize))
    }

    /// One clockwise quarter turn: sizes swap, a cell at (x, y) moves to
    /// (height - 1 - y, x) and its walls turn with it.
    fn rotated_clockwise(&self) -> Template {
        let (old_w, old_h) = (self.width, self.height);
        let cells = (0..old_w)
            .map(|new_y| {
                (0..old_h)
                    .filter_map(|new_x| {
                        let (x, y) = (new_y, old_h - 1 - new_x);
                        self.cell(x, y).map(|source| {
                            let mut cell = source.clone();
                            cell.walls = cell.walls.rotated_clockwise();
                            cell.anchor(GridPos::new(new_x as i32, new_y as i32));
                            cell
                        })
                    })
                    .collect()
            })
            .collect();
        Template {
            id: self.id,
            name: self.name.clone(),
            width: old_h,
            height: old_w,
            cells,
            rotation: self.rotation.clockwise(),
            is_full_map: self.is_full_map,
        }
    }

    /// A copy rotated clockwise by `rotation`
    pub fn rotate(&self, rotation: Rotation) -> Template {
        let mut rotated = self.clone();
        for _ in 0..rotation.quarter_turns() {
            rotated = rotated.rotated_clockwise();
        }
        rotated
    }

    /// Check that the template fits on `floor` with its top-left at `origin`
    pub fn check_fits(&self, origin: GridPos, floor: &Floor) -> DungeonResult<()> {
        let fits = origin.x >= 0
            && origin.y >= 0
            && origin.x as u64 + self.width as u64 <= floor.width as u64
            && origin.y as u64 + self.height as u64 <= floor.height as u64;
        if fits {
            Ok(())
        } else {
            Err(DungeonError::TemplateOutOfBounds {
                x: origin.x,
                y: origin.y,
                width: self.width,
                height: self.height,
                floor_width: floor.width,
                floor_height: floor.height,
            })
        }
    }

    /// Updates that overwrite every touched cell with this template's content,
    /// translated so the template's top-left lands on `origin`.
    ///
    /// Full-map templates are rejected: they only apply to a whole floor.
    pub fn placement(&self, origin: GridPos, floor: &Floor) -> DungeonResult<Vec<CellUpdate>> {
        if self.is_full_map {
            return Err(DungeonError::invariant(
                "full-map templates can only replace a whole floor",
            ));
        }
        self.check_fits(origin, floor)?;
        let updates = self
            .cells
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter().enumerate().map(move |(x, cell)| {
                    CellUpdate::new(origin.translate(x as i32, y as i32), cell.to_patch())
                })
            })
            .collect();
        Ok(updates)
    }

    /// Validate and write this template onto `floor`. Nothing is written
    /// when the template does not fit.
    pub fn place(&self, origin: GridPos, floor: &mut Floor) -> DungeonResult<()> {
        for update in self.placement(origin, floor)? {
            floor.apply(update)?;
        }
        Ok(())
    }

    /// Materialize the template as a full cell grid anchored at (0, 0)
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        self.cells
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, content)| {
                        let mut cell = Cell::new(GridPos::new(x as i32, y as i32));
                        cell.apply(content.to_patch());
                        cell
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, EventType, FloorType, Wall, WallType};

    /// 3x2 floor with a distinct surface per cell and a wall on one side
    fn asymmetric_floor() -> Floor {
        let mut floor = Floor::new("src".to_string(), 3, 2);
        let types = [
            FloorType::Normal,
            FloorType::Damage,
            FloorType::Slippery,
            FloorType::Pit,
            FloorType::Warp,
            FloorType::Custom("ice".to_string()),
        ];
        for (i, floor_type) in types.into_iter().enumerate() {
            let pos = GridPos::new(i as i32 % 3, i as i32 / 3);
            floor.cell_mut(pos).unwrap().floor = FloorSurface::new(floor_type);
        }
        floor.cell_mut(GridPos::new(0, 0)).unwrap().walls.north = Some(Wall::new(WallType::Door));
        floor
            .cell_mut(GridPos::new(2, 1))
            .unwrap()
            .events
            .push(crate::Event::new(EventType::Treasure, GridPos::new(2, 1)));
        floor
    }

    fn full_template() -> Template {
        let floor = asymmetric_floor();
        let rect = GridRect::from_corners(GridPos::new(0, 0), GridPos::new(2, 1));
        Template::from_region(&floor, rect, "room".to_string()).unwrap()
    }

    #[test]
    fn test_from_region_uses_local_positions() {
        let floor = asymmetric_floor();
        let rect = GridRect::from_corners(GridPos::new(1, 0), GridPos::new(2, 1));
        let template = Template::from_region(&floor, rect, "part".to_string()).unwrap();
        assert_eq!((template.width, template.height), (2, 2));
        assert_eq!(template.cell(0, 0).unwrap().floor.floor_type, FloorType::Damage);
        assert_eq!(template.cell(1, 1).unwrap().events[0].position, GridPos::new(1, 1));
        assert!(!template.is_full_map);

        let outside = GridRect::from_corners(GridPos::new(1, 0), GridPos::new(3, 1));
        assert!(Template::from_region(&floor, outside, "bad".to_string()).is_err());
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let template = full_template();
        let rotated = template.rotate(Rotation::R90);
        assert_eq!((rotated.width, rotated.height), (2, 3));
        assert_eq!(rotated.rotation, Rotation::R90);
        // Old top-left (0,0) moves to the top-right corner
        let corner = rotated.cell(1, 0).unwrap();
        assert_eq!(corner.floor.floor_type, FloorType::Normal);
        assert!(corner.walls.get(Direction::North).is_none());
        assert_eq!(corner.walls.east, Some(Wall::new(WallType::Door)));
        // Old bottom-right (2,1) moves to the bottom-left corner
        let treasure = rotated.cell(0, 2).unwrap();
        assert_eq!(treasure.floor.floor_type, FloorType::Custom("ice".to_string()));
        assert_eq!(treasure.events[0].position, GridPos::new(0, 2));
    }

    #[test]
    fn test_four_quarter_turns_are_identity() {
        let template = full_template();
        let mut turned = template.clone();
        for _ in 0..4 {
            turned = turned.rotate(Rotation::R90);
        }
        assert_eq!(turned, template);
        assert_eq!(template.rotate(Rotation::R180).rotate(Rotation::R180), template);
    }

    #[test]
    fn test_place_rejects_overflow_without_mutation() {
        let template = Template::new("3x3".to_string(), 3, 3);
        let mut floor = Floor::new("dst".to_string(), 8, 8);
        floor.cell_mut(GridPos::new(7, 0)).unwrap().floor = FloorSurface::new(FloorType::Warp);
        let before = floor.clone();

        let result = template.place(GridPos::new(8 - 2, 0), &mut floor);
        assert!(matches!(result, Err(DungeonError::TemplateOutOfBounds { .. })));
        assert_eq!(floor, before);

        assert!(template.place(GridPos::new(-1, 0), &mut floor).is_err());
        assert!(template.place(GridPos::new(5, 5), &mut floor).is_ok());
    }

    #[test]
    fn test_place_translates_content() {
        let template = full_template();
        let mut floor = Floor::new("dst".to_string(), 6, 6);
        template.place(GridPos::new(3, 4), &mut floor).unwrap();

        let cell = floor.cell(GridPos::new(5, 5)).unwrap();
        assert_eq!(cell.floor.floor_type, FloorType::Custom("ice".to_string()));
        assert_eq!(cell.events[0].position, GridPos::new(5, 5));
        assert_ne!(cell.events[0].id, template.cell(2, 1).unwrap().events[0].id);
        assert!(floor.cell(GridPos::new(3, 4)).unwrap().walls.north.is_some());
        assert!(floor.validate().is_ok());
    }

    #[test]
    fn test_full_map_template_not_placeable_at_origin() {
        let floor = asymmetric_floor();
        let template = Template::from_floor(&floor, "whole".to_string()).unwrap();
        assert!(template.is_full_map);
        let mut target = Floor::new("dst".to_string(), 10, 10);
        assert!(matches!(
            template.place(GridPos::new(0, 0), &mut target),
            Err(DungeonError::InvariantViolation(_))
        ));

        let cells = template.to_cells();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1][2].position, GridPos::new(2, 1));
    }

    #[test]
    fn test_rotation_serializes_as_degrees() {
        assert_eq!(serde_json::to_string(&Rotation::R270).unwrap(), "270");
        let parsed: Rotation = serde_json::from_str("90").unwrap();
        assert_eq!(parsed, Rotation::R90);
        assert!(serde_json::from_str::<Rotation>("45").is_err());
    }
}
