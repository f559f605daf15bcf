//! Tunable rule parameters.
//!
//! Every field falls back to its constant in [`crate::constants`], so a
//! rules file only needs to mention what it changes:
//!
//! ```
//! use skirmish::config::Rules;
//!
//! let rules = Rules::from_json_str(r#"{ "shot_range": 3 }"#).expect("valid rules");
//! assert_eq!(rules.shot_range, 3);
//! assert_eq!(rules.move_cost, skirmish::MOVE_COST);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{FIRST_ENTITY_ID, MOVE_COST, SHOT_COST, SHOT_RANGE};

/// Failure to read or parse a rules file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read rules from {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The contents are not valid rules JSON.
    #[error("invalid rules JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Costs and limits applied by the action rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Energy debited per step.
    pub move_cost: i32,
    /// Energy debited per shot.
    pub shot_cost: i32,
    /// Cells a shot travels at most.
    pub shot_range: u32,
    /// First identifier issued by the entity store.
    pub first_entity_id: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            move_cost: MOVE_COST,
            shot_cost: SHOT_COST,
            shot_range: SHOT_RANGE,
            first_entity_id: FIRST_ENTITY_ID,
        }
    }
}

impl Rules {
    /// Parses rules from a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads rules from a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid rules JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
