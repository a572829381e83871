//! The bundled level pack
//!
//! Levels ship as JSON embedded at compile time. Order in the file is play
//! order; new levels are appended.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{LevelError, World, parse_level};

const BUNDLED_LEVELS: &str = include_str!("../levels/levels.json");

/// One hand-authored level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    /// Equal-width tile rows, top to bottom
    pub rows: Vec<String>,
}

impl LevelDef {
    pub fn parse(&self) -> Result<World, LevelError> {
        parse_level(self.rows.as_slice())
    }
}

#[derive(Debug, Error)]
pub enum LevelPackError {
    #[error("level pack is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level pack has no levels")]
    Empty,
    #[error("level {index} ({name}) is invalid: {source}")]
    Level {
        index: usize,
        name: String,
        #[source]
        source: LevelError,
    },
}

/// Ordered list of levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPack {
    levels: Vec<LevelDef>,
}

impl LevelPack {
    /// The ten levels compiled into the crate
    pub fn bundled() -> Result<Self, LevelPackError> {
        Self::from_json(BUNDLED_LEVELS)
    }

    /// Load and validate a pack. Every level must parse.
    pub fn from_json(json: &str) -> Result<Self, LevelPackError> {
        let pack: LevelPack = serde_json::from_str(json)?;
        pack.validate()?;
        log::debug!("Loaded level pack with {} levels", pack.len());
        Ok(pack)
    }

    pub fn validate(&self) -> Result<(), LevelPackError> {
        if self.levels.is_empty() {
            return Err(LevelPackError::Empty);
        }
        for (index, level) in self.levels.iter().enumerate() {
            level.parse().map_err(|source| LevelPackError::Level {
                index,
                name: level.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDef> {
        self.levels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDef> {
        self.levels.iter()
    }
}
