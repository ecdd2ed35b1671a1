//! Error type shared by the data model and the editing engine

use std::fmt;

/// Which way through the history an undo/redo request tried to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryDirection::Undo => write!(f, "undo"),
            HistoryDirection::Redo => write!(f, "redo"),
        }
    }
}

/// Errors produced by dungeon operations.
///
/// Every variant is recoverable: the operation that reported it left the
/// dungeon unchanged.
#[derive(Debug, thiserror::Error)]
pub enum DungeonError {
    #[error("position ({x}, {y}) is outside the {width}x{height} floor")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    #[error("floor index {0} does not exist")]
    NoSuchFloor(usize),
    #[error("template {width}x{height} does not fit at ({x}, {y}) on a {floor_width}x{floor_height} floor")]
    TemplateOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        floor_width: u32,
        floor_height: u32,
    },
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("wall strokes must be horizontal or vertical")]
    InvalidGeometry,
    #[error("nothing to {0}")]
    HistoryBoundary(HistoryDirection),
    #[error("invalid dungeon json: {0}")]
    Json(#[from] serde_json::Error),
}

impl DungeonError {
    pub fn invariant(message: impl Into<String>) -> Self {
        DungeonError::InvariantViolation(message.into())
    }

    /// True for the out-of-bounds family (cells, floors, template placement)
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            DungeonError::OutOfBounds { .. }
                | DungeonError::NoSuchFloor(_)
                | DungeonError::TemplateOutOfBounds { .. }
        )
    }
}

pub type DungeonResult<T> = Result<T, DungeonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DungeonError::OutOfBounds {
            x: 5,
            y: -1,
            width: 4,
            height: 4,
        };
        assert_eq!(err.to_string(), "position (5, -1) is outside the 4x4 floor");
        assert!(err.is_out_of_bounds());

        let err = DungeonError::HistoryBoundary(HistoryDirection::Redo);
        assert_eq!(err.to_string(), "nothing to redo");
        assert!(!err.is_out_of_bounds());
    }
}
