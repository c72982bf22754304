/*
config.rs

Copyright 2025 Hervé Quatremain

This file is part of Mazegen.

Mazegen is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Mazegen is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Mazegen. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Skill levels.
//!
//! A skill level selects the dimensions of the maze and the maximum number of rooms for
//! non-perfect mazes. The built-in table provides 16 levels, from a 5x5 maze with one room to a
//! 300x250 maze with up to 150 rooms.
//!
//! A level without rooms can only be used for perfect mazes.
//!
//! Deployments can provide their own table as a JSON array:
//!
//! ```json
//! [
//!     { "width": 4, "height": 4, "max_rooms": 0 },
//!     { "width": 12, "height": 12, "max_rooms": 2 }
//! ]
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::errors::ConfigurationError;

/// Smallest grid side. A maze needs at least an exit and a starting position.
const MIN_SIDE: usize = 2;

/// Smallest grid side when the level can have rooms: a 2x2 room, a one-cell margin on each side,
/// and one more cell so that the room can stay away from the exit wherever the exit is.
const MIN_SIDE_WITH_ROOMS: usize = 5;

/// Built-in table: `(width, height, max_rooms)` for each skill level.
const DEFAULT_TABLE: [(usize, usize, usize); 16] = [
    (5, 5, 1),
    (12, 12, 2),
    (15, 15, 2),
    (20, 15, 3),
    (25, 20, 4),
    (25, 25, 5),
    (35, 25, 10),
    (35, 35, 10),
    (40, 40, 20),
    (60, 60, 25),
    (70, 70, 25),
    (80, 75, 50),
    (90, 75, 60),
    (110, 90, 70),
    (150, 120, 80),
    (300, 250, 150),
];

/// Configuration for one skill level.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct SkillRow {
    /// Number of cells from west to east.
    pub width: usize,

    /// Number of cells from north to south.
    pub height: usize,

    /// Maximum number of rooms in a non-perfect maze.
    pub max_rooms: usize,
}

/// Skill level table, indexed by the skill level.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "Vec<SkillRow>", into = "Vec<SkillRow>")]
pub struct SkillTable {
    rows: Vec<SkillRow>,
}

impl Default for SkillTable {
    fn default() -> Self {
        Self {
            rows: DEFAULT_TABLE
                .iter()
                .map(|&(width, height, max_rooms)| SkillRow {
                    width,
                    height,
                    max_rooms,
                })
                .collect(),
        }
    }
}

impl TryFrom<Vec<SkillRow>> for SkillTable {
    type Error = ConfigurationError;

    fn try_from(rows: Vec<SkillRow>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<SkillTable> for Vec<SkillRow> {
    fn from(table: SkillTable) -> Self {
        table.rows
    }
}

impl SkillTable {
    /// Create a [`SkillTable`] object from its rows.
    ///
    /// # Errors
    ///
    /// The method returns an error if the table is empty, has more than 256 levels, or has a
    /// level with dimensions too small for a maze (or for its rooms).
    pub fn new(rows: Vec<SkillRow>) -> Result<Self, ConfigurationError> {
        if rows.is_empty() {
            return Err(ConfigurationError::InvalidTable(
                "the table has no levels".to_string(),
            ));
        }
        if rows.len() > usize::from(u8::MAX) + 1 {
            return Err(ConfigurationError::InvalidTable(format!(
                "{} levels (256 at most)",
                rows.len()
            )));
        }
        for (level, row) in rows.iter().enumerate() {
            if row.width < MIN_SIDE || row.height < MIN_SIDE {
                return Err(ConfigurationError::InvalidTable(format!(
                    "level {level}: {}x{} is smaller than {MIN_SIDE}x{MIN_SIDE}",
                    row.width, row.height
                )));
            }
            if row.max_rooms > 0
                && (row.width < MIN_SIDE_WITH_ROOMS || row.height < MIN_SIDE_WITH_ROOMS)
            {
                return Err(ConfigurationError::InvalidTable(format!(
                    "level {level}: {}x{} is too small for rooms",
                    row.width, row.height
                )));
            }
        }
        Ok(Self { rows })
    }

    /// Read a table from its JSON representation.
    pub fn from_json<R: Read>(reader: R) -> Result<Self, Box<dyn Error>> {
        let table: SkillTable = serde_json::from_reader(reader)?;
        debug!("Loaded a skill table with {} levels", table.rows.len());
        Ok(table)
    }

    /// Read a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        debug!("Skill table file: {path:?}");
        let file: File = File::open(path)?;
        Self::from_json(BufReader::new(file))
    }

    /// Return the configuration for the given skill level.
    pub fn row(&self, level: u8) -> Result<SkillRow, ConfigurationError> {
        self.rows
            .get(usize::from(level))
            .copied()
            .ok_or(ConfigurationError::UnknownSkillLevel {
                level,
                max: self.max_level(),
            })
    }

    /// Highest skill level in the table.
    pub fn max_level(&self) -> u8 {
        // The table has between 1 and 256 rows
        u8::try_from(self.rows.len() - 1).unwrap_or(u8::MAX)
    }

    pub fn rows(&self) -> &[SkillRow] {
        &self.rows
    }
}
