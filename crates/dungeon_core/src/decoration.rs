//! Decorations placed on cells

use crate::GridPos;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationType {
    #[default]
    Torch,
    Pillar,
    Statue,
    Plant,
    Rubble,
    Banner,
    /// A project-defined decoration type, referenced by id
    Custom(String),
}

impl DecorationType {
    /// Get display name for UI
    pub fn display_name(&self) -> &str {
        match self {
            DecorationType::Torch => "Torch",
            DecorationType::Pillar => "Pillar",
            DecorationType::Statue => "Statue",
            DecorationType::Plant => "Plant",
            DecorationType::Rubble => "Rubble",
            DecorationType::Banner => "Banner",
            DecorationType::Custom(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationAppearance {
    pub visible: bool,
    pub color: String,
    #[serde(default)]
    pub icon: String,
    /// Draw order among decorations
    #[serde(default)]
    pub layer: i32,
    /// Degrees
    #[serde(default)]
    pub rotation: f32,
    pub scale: f32,
}

impl Default for DecorationAppearance {
    fn default() -> Self {
        Self {
            visible: true,
            color: "#FFFFFF".to_string(),
            icon: String::new(),
            layer: 0,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub decoration_type: DecorationType,
    pub name: String,
    pub position: GridPos,
    #[serde(default)]
    pub appearance: DecorationAppearance,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Decoration {
    /// Create a decoration with a fresh id
    pub fn new(decoration_type: DecorationType, position: GridPos) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: decoration_type.display_name().to_string(),
            position,
            appearance: DecorationAppearance::default(),
            properties: BTreeMap::new(),
            decoration_type,
        }
    }
}
