//! Cell contents: floor surface, walls, events and decorations

use crate::{Decoration, Direction, Event, GridPos};
use serde::{Deserialize, Serialize};

/// The kind of ground a cell has
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorType {
    #[default]
    Normal,
    Damage,
    Slippery,
    Pit,
    Warp,
    /// A project-defined floor type, referenced by id
    Custom(String),
}

impl FloorType {
    /// Get display name for UI
    pub fn display_name(&self) -> &str {
        match self {
            FloorType::Normal => "Normal",
            FloorType::Damage => "Damage",
            FloorType::Slippery => "Slippery",
            FloorType::Pit => "Pit",
            FloorType::Warp => "Warp",
            FloorType::Custom(id) => id,
        }
    }

    /// Passability a freshly painted cell of this type starts with
    pub fn default_passable(&self) -> bool {
        !matches!(self, FloorType::Pit)
    }

    /// Returns the built-in floor types
    pub fn all_builtin() -> &'static [FloorType] {
        &[
            FloorType::Normal,
            FloorType::Damage,
            FloorType::Slippery,
            FloorType::Pit,
            FloorType::Warp,
        ]
    }
}

/// Ground of a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloorSurface {
    #[serde(rename = "type")]
    pub floor_type: FloorType,
    pub passable: bool,
}

impl FloorSurface {
    /// Surface of the given type with its default passability
    pub fn new(floor_type: FloorType) -> Self {
        let passable = floor_type.default_passable();
        Self {
            floor_type,
            passable,
        }
    }
}

impl Default for FloorSurface {
    fn default() -> Self {
        Self {
            floor_type: FloorType::Normal,
            passable: true,
        }
    }
}

/// The kind of wall in a wall slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallType {
    #[default]
    Normal,
    Door,
    LockedDoor,
    HiddenDoor,
    Breakable,
    Oneway,
    Invisible,
    Event,
    /// A project-defined wall type, referenced by id
    Custom(String),
}

impl WallType {
    /// Get display name for UI
    pub fn display_name(&self) -> &str {
        match self {
            WallType::Normal => "Wall",
            WallType::Door => "Door",
            WallType::LockedDoor => "Locked Door",
            WallType::HiddenDoor => "Hidden Door",
            WallType::Breakable => "Breakable Wall",
            WallType::Oneway => "One-way Wall",
            WallType::Invisible => "Invisible Wall",
            WallType::Event => "Event Wall",
            WallType::Custom(id) => id,
        }
    }

    /// Fixed see-through lookup. Not user-settable in the base tool flow.
    pub fn is_transparent(&self) -> bool {
        matches!(self, WallType::Invisible | WallType::Event)
    }

    /// Returns the built-in wall types
    pub fn all_builtin() -> &'static [WallType] {
        &[
            WallType::Normal,
            WallType::Door,
            WallType::LockedDoor,
            WallType::HiddenDoor,
            WallType::Breakable,
            WallType::Oneway,
            WallType::Invisible,
            WallType::Event,
        ]
    }
}

/// A wall occupying one slot of a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    #[serde(rename = "type")]
    pub wall_type: WallType,
    pub transparent: bool,
}

impl Wall {
    /// Create a wall, deriving transparency from its type
    pub fn new(wall_type: WallType) -> Self {
        let transparent = wall_type.is_transparent();
        Self {
            wall_type,
            transparent,
        }
    }
}

/// The four directional wall slots of a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Walls {
    #[serde(default)]
    pub north: Option<Wall>,
    #[serde(default)]
    pub east: Option<Wall>,
    #[serde(default)]
    pub south: Option<Wall>,
    #[serde(default)]
    pub west: Option<Wall>,
}

impl Walls {
    /// All four slots set to the same wall
    pub fn uniform(wall: Option<Wall>) -> Self {
        Self {
            north: wall.clone(),
            east: wall.clone(),
            south: wall.clone(),
            west: wall,
        }
    }

    pub fn get(&self, direction: Direction) -> Option<&Wall> {
        self.slot(direction).as_ref()
    }

    pub fn slot(&self, direction: Direction) -> &Option<Wall> {
        match direction {
            Direction::North => &self.north,
            Direction::East => &self.east,
            Direction::South => &self.south,
            Direction::West => &self.west,
        }
    }

    pub fn slot_mut(&mut self, direction: Direction) -> &mut Option<Wall> {
        match direction {
            Direction::North => &mut self.north,
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
        }
    }

    /// Replace one slot, leaving the other three untouched
    pub fn set(&mut self, direction: Direction, wall: Option<Wall>) {
        *self.slot_mut(direction) = wall;
    }

    /// Copy of these walls with a single slot replaced
    pub fn with(&self, direction: Direction, wall: Option<Wall>) -> Walls {
        let mut walls = self.clone();
        walls.set(direction, wall);
        walls
    }

    pub fn is_empty(&self) -> bool {
        Direction::all().iter().all(|&dir| self.get(dir).is_none())
    }

    /// Walls after turning the cell 90 degrees clockwise: the north wall
    /// ends up facing east, east faces south, and so on.
    pub fn rotated_clockwise(&self) -> Walls {
        Walls {
            north: self.west.clone(),
            east: self.north.clone(),
            south: self.east.clone(),
            west: self.south.clone(),
        }
    }
}

/// A single grid unit of a floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub position: GridPos,
    pub floor: FloorSurface,
    #[serde(default)]
    pub walls: Walls,
    /// Display and interaction order
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
}

impl Cell {
    /// An empty passable cell
    pub fn new(position: GridPos) -> Self {
        Self {
            position,
            floor: FloorSurface::default(),
            walls: Walls::default(),
            events: Vec::new(),
            decorations: Vec::new(),
        }
    }

    /// Shallow-merge the fields present in `patch`.
    ///
    /// Events and decorations are re-anchored to this cell's position.
    pub fn apply(&mut self, patch: CellPatch) {
        if let Some(floor) = patch.floor {
            self.floor = floor;
        }
        if let Some(walls) = patch.walls {
            self.walls = walls;
        }
        if let Some(mut events) = patch.events {
            for event in &mut events {
                event.position = self.position;
            }
            self.events = events;
        }
        if let Some(mut decorations) = patch.decorations {
            for decoration in &mut decorations {
                decoration.position = self.position;
            }
            self.decorations = decorations;
        }
    }

    /// True when the cell holds nothing beyond a default floor
    pub fn is_blank(&self) -> bool {
        self.floor == FloorSurface::default()
            && self.walls.is_empty()
            && self.events.is_empty()
            && self.decorations.is_empty()
    }

    /// Events ordered for interaction: highest priority first, ties keep
    /// their stacking order.
    pub fn events_by_priority(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().collect();
        events.sort_by(|a, b| b.priority.cmp(&a.priority));
        events
    }
}

/// A partial cell update. Only fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<FloorSurface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walls: Option<Walls>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorations: Option<Vec<Decoration>>,
}

impl CellPatch {
    pub fn floor(floor: FloorSurface) -> Self {
        Self {
            floor: Some(floor),
            ..Default::default()
        }
    }

    pub fn walls(walls: Walls) -> Self {
        Self {
            walls: Some(walls),
            ..Default::default()
        }
    }

    pub fn events(events: Vec<Event>) -> Self {
        Self {
            events: Some(events),
            ..Default::default()
        }
    }

    pub fn decorations(decorations: Vec<Decoration>) -> Self {
        Self {
            decorations: Some(decorations),
            ..Default::default()
        }
    }

    /// Patch that rewrites every field with the contents of `cell`
    pub fn from_cell(cell: &Cell) -> Self {
        Self {
            floor: Some(cell.floor.clone()),
            walls: Some(cell.walls.clone()),
            events: Some(cell.events.clone()),
            decorations: Some(cell.decorations.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.floor.is_none()
            && self.walls.is_none()
            && self.events.is_none()
            && self.decorations.is_none()
    }
}

/// A patch addressed to a cell position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub position: GridPos,
    pub patch: CellPatch,
}

impl CellUpdate {
    pub fn new(position: GridPos, patch: CellPatch) -> Self {
        Self { position, patch }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventType;

    #[test]
    fn test_wall_transparency_lookup() {
        assert!(!Wall::new(WallType::Normal).transparent);
        assert!(!Wall::new(WallType::Door).transparent);
        assert!(Wall::new(WallType::Invisible).transparent);
        assert!(Wall::new(WallType::Event).transparent);
        assert!(!Wall::new(WallType::Custom("bars".to_string())).transparent);
    }

    #[test]
    fn test_pit_defaults_impassable() {
        assert!(!FloorSurface::new(FloorType::Pit).passable);
        assert!(FloorSurface::new(FloorType::Warp).passable);
    }

    #[test]
    fn test_walls_rotation() {
        let walls = Walls {
            north: Some(Wall::new(WallType::Door)),
            ..Default::default()
        };
        let rotated = walls.rotated_clockwise();
        assert_eq!(rotated.east, Some(Wall::new(WallType::Door)));
        assert!(rotated.north.is_none());

        let full_turn = rotated
            .rotated_clockwise()
            .rotated_clockwise()
            .rotated_clockwise();
        assert_eq!(full_turn, walls);
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut cell = Cell::new(GridPos::new(1, 1));
        cell.walls.west = Some(Wall::new(WallType::Normal));

        cell.apply(CellPatch::floor(FloorSurface::new(FloorType::Damage)));
        assert_eq!(cell.floor.floor_type, FloorType::Damage);
        assert!(cell.walls.west.is_some());

        let event = Event::new(EventType::Treasure, GridPos::new(9, 9));
        cell.apply(CellPatch::events(vec![event]));
        assert_eq!(cell.events[0].position, GridPos::new(1, 1));
        assert_eq!(cell.floor.floor_type, FloorType::Damage);
    }

    #[test]
    fn test_events_by_priority_is_stable() {
        let mut cell = Cell::new(GridPos::new(0, 0));
        let mut low = Event::new(EventType::Sign, cell.position);
        low.priority = 0;
        let mut high = Event::new(EventType::Monster, cell.position);
        high.priority = 5;
        let mut also_low = Event::new(EventType::Treasure, cell.position);
        also_low.priority = 0;
        cell.events = vec![low.clone(), high.clone(), also_low.clone()];

        let ordered: Vec<_> = cell.events_by_priority().iter().map(|e| e.id).collect();
        assert_eq!(ordered, vec![high.id, low.id, also_low.id]);
    }

    #[test]
    fn test_floor_type_serialization() {
        let json = serde_json::to_string(&FloorType::Slippery).unwrap();
        assert_eq!(json, "\"slippery\"");
        let custom: FloorType = serde_json::from_str("{\"custom\":\"lava\"}").unwrap();
        assert_eq!(custom, FloorType::Custom("lava".to_string()));
    }
}
