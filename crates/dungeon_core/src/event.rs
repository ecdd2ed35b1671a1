//! Events placed on cells (treasure, monsters, signs, ...)

use crate::GridPos;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Milliseconds since the unix epoch, zero if the clock is before it
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Treasure,
    Monster,
    Stairs,
    Trap,
    Npc,
    Sign,
    Heal,
    Save,
    Boss,
    Warp,
    /// A project-defined event type, referenced by id
    Custom(String),
}

impl EventType {
    /// Get display name for UI
    pub fn display_name(&self) -> &str {
        match self {
            EventType::Treasure => "Treasure",
            EventType::Monster => "Monster",
            EventType::Stairs => "Stairs",
            EventType::Trap => "Trap",
            EventType::Npc => "NPC",
            EventType::Sign => "Sign",
            EventType::Heal => "Heal Point",
            EventType::Save => "Save Point",
            EventType::Boss => "Boss",
            EventType::Warp => "Warp",
            EventType::Custom(id) => id,
        }
    }

    /// Marker color used until the user picks one
    pub fn default_color(&self) -> &'static str {
        match self {
            EventType::Treasure => "#FFD700",
            EventType::Monster => "#FF4444",
            EventType::Stairs => "#FFFFFF",
            EventType::Trap => "#FF8800",
            EventType::Npc => "#44AAFF",
            EventType::Sign => "#AA8855",
            EventType::Heal => "#44FF44",
            EventType::Save => "#AA44FF",
            EventType::Boss => "#880000",
            EventType::Warp => "#00FFFF",
            EventType::Custom(_) => "#CCCCCC",
        }
    }
}

/// How an event is drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAppearance {
    pub visible: bool,
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// Player presses the action button facing the event
    #[default]
    Interact,
    /// Player steps onto the cell
    Touch,
    /// Runs as soon as the floor is entered
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatPolicy {
    #[default]
    Once,
    Always,
    /// Fires at most this many times
    Count(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventTrigger {
    #[serde(rename = "type")]
    pub trigger_type: TriggerType,
    pub repeat: RepeatPolicy,
}

/// One step of an event script. Parameters are opaque to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAction {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub created: u64,
    pub modified: u64,
    pub version: u32,
}

impl EventMetadata {
    pub fn now() -> Self {
        let now = now_millis();
        Self {
            created: now,
            modified: now,
            version: 1,
        }
    }
}

/// An event placed on a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Always equal to the owning cell's position
    pub position: GridPos,
    pub appearance: EventAppearance,
    #[serde(default)]
    pub trigger: EventTrigger,
    #[serde(default)]
    pub actions: Vec<EventAction>,
    pub enabled: bool,
    /// Higher runs first when several events share a cell
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub flags: BTreeMap<String, serde_json::Value>,
    pub metadata: EventMetadata,
}

impl Event {
    /// Create an event with a fresh id and default appearance for its type
    pub fn new(event_type: EventType, position: GridPos) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: event_type.display_name().to_string(),
            description: String::new(),
            position,
            appearance: EventAppearance {
                visible: true,
                color: event_type.default_color().to_string(),
                icon: String::new(),
            },
            trigger: EventTrigger::default(),
            actions: Vec::new(),
            enabled: true,
            priority: 0,
            flags: BTreeMap::new(),
            metadata: EventMetadata::now(),
            event_type,
        }
    }

    /// Record a modification
    pub fn touch(&mut self) {
        self.metadata.modified = now_millis();
        self.metadata.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event() {
        let event = Event::new(EventType::Monster, GridPos::new(2, 3));
        assert_eq!(event.name, "Monster");
        assert_eq!(event.position, GridPos::new(2, 3));
        assert_eq!(event.appearance.color, "#FF4444");
        assert!(event.enabled);
        assert_eq!(event.metadata.version, 1);
        assert_ne!(event.id, Event::new(EventType::Monster, event.position).id);
    }

    #[test]
    fn test_touch_bumps_version() {
        let mut event = Event::new(EventType::Sign, GridPos::new(0, 0));
        let created = event.metadata.created;
        event.touch();
        assert_eq!(event.metadata.version, 2);
        assert!(event.metadata.modified >= created);
        assert_eq!(event.metadata.created, created);
    }

    #[test]
    fn test_event_serialization() {
        let mut event = Event::new(EventType::Trap, GridPos::new(1, 1));
        event.trigger.repeat = RepeatPolicy::Count(3);
        event
            .flags
            .insert("armed".to_string(), serde_json::Value::Bool(true));
        event.actions.push(EventAction {
            action_type: "damage".to_string(),
            params: BTreeMap::from([("amount".to_string(), serde_json::json!(10))]),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"trap\""));
        let restored: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
    }
}
