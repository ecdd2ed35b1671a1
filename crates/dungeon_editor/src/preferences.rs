//! Editor preferences and their save/load operations

use crate::history::DEFAULT_HISTORY_LIMIT;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PREFERENCES_FILE: &str = "preferences.json";

/// Pointer travel (in pixels) before a press turns into a drag
pub const DEFAULT_DRAG_THRESHOLD: f32 = 5.0;
pub const DEFAULT_CELL_SIZE: f32 = 32.0;
pub const DEFAULT_FLOOR_SIZE: u32 = 20;

/// How writes treat the wall shared by two neighbouring cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedWallMode {
    /// Each side is stored and written independently. A wall written on one
    /// side is still visible from the other through the effective-wall read.
    #[default]
    Independent,
    /// Every wall write is mirrored onto the neighbour's opposite slot in
    /// the same commit.
    Mirrored,
}

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Snapshots kept by the undo history
    pub history_limit: usize,
    pub drag_threshold: f32,
    pub cell_size: f32,
    pub default_floor_width: u32,
    pub default_floor_height: u32,
    pub shared_walls: SharedWallMode,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            cell_size: DEFAULT_CELL_SIZE,
            default_floor_width: DEFAULT_FLOOR_SIZE,
            default_floor_height: DEFAULT_FLOOR_SIZE,
            shared_walls: SharedWallMode::Independent,
        }
    }
}

impl EditorPreferences {
    /// Get the config directory path for the editor
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "dungeon_editor", "dungeon_editor")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the preferences file path
    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(PREFERENCES_FILE))
    }

    /// Parse preferences; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, PreferencesError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load preferences from the config directory, returning defaults if
    /// not found or unreadable
    pub fn load() -> Self {
        let loaded = Self::preferences_path()
            .ok_or(PreferencesError::NoConfigDir)
            .and_then(|path| Self::load_from(&path));
        match loaded {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("Could not load preferences: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load preferences from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save preferences to the config directory
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::preferences_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save preferences to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved preferences to {:?}", path);
        Ok(())
    }
}
