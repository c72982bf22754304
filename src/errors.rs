/*
errors.rs

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

//! Error types.
//!
//! Configuration errors are returned to the caller when an order is submitted.
//! Invariant violations indicate a defect in a maze builder: the build is aborted, and the order
//! receives the error instead of a maze.

use std::error::Error;
use std::fmt;

/// The order or the skill table cannot be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The order does not specify a builder algorithm.
    MissingBuilder,

    /// The order does not specify a skill level.
    MissingSkillLevel,

    /// The skill level is not in the skill table.
    UnknownSkillLevel { level: u8, max: u8 },

    /// The order has already been submitted. Orders are single use.
    AlreadySubmitted,

    /// The order has not been submitted, so nothing will be delivered.
    NotSubmitted,

    /// A non-perfect maze was requested at a skill level without rooms.
    NoRooms { level: u8 },

    /// The skill table is not usable.
    InvalidTable(String),

    /// The factory worker is not running anymore.
    FactoryStopped,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBuilder => write!(f, "the order does not specify a builder"),
            Self::MissingSkillLevel => write!(f, "the order does not specify a skill level"),
            Self::UnknownSkillLevel { level, max } => {
                write!(f, "skill level {level} is not in the table (0 to {max})")
            }
            Self::AlreadySubmitted => write!(f, "the order has already been submitted"),
            Self::NotSubmitted => write!(f, "the order has not been submitted"),
            Self::NoRooms { level } => {
                write!(f, "skill level {level} has no rooms, only perfect mazes are possible")
            }
            Self::InvalidTable(reason) => write!(f, "invalid skill table: {reason}"),
            Self::FactoryStopped => write!(f, "the maze factory is not running"),
        }
    }
}

impl Error for ConfigurationError {}

/// A finished floorplan breaks one of the maze invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The cell cannot reach the exit.
    UnreachableCell { x: usize, y: usize },

    /// Several cells share the maximum distance to the exit.
    TiedEntrance { distance: usize, count: usize },

    /// The exit must have exactly one open neighbor.
    ExitAccess { open_neighbors: usize },

    /// The floorplan has no exit.
    MissingExit,

    /// A non-perfect maze ended up without any room.
    MissingRoom,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreachableCell { x, y } => {
                write!(f, "cell ({x}, {y}) cannot reach the exit")
            }
            Self::TiedEntrance { distance, count } => {
                write!(f, "{count} cells share the maximum distance {distance}")
            }
            Self::ExitAccess { open_neighbors } => {
                write!(f, "the exit has {open_neighbors} open neighbors instead of 1")
            }
            Self::MissingExit => write!(f, "the floorplan has no exit"),
            Self::MissingRoom => write!(f, "the non-perfect maze has no room"),
        }
    }
}

impl Error for InvariantViolation {}

/// Errors returned when requesting a maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MazeError {
    /// The order was rejected before any work started.
    Configuration(ConfigurationError),

    /// The build was aborted because the produced floorplan is invalid.
    Invariant(InvariantViolation),

    /// The worker stopped without delivering the maze.
    WorkerLost,
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "configuration error: {e}"),
            Self::Invariant(e) => write!(f, "invariant violation: {e}"),
            Self::WorkerLost => write!(f, "the worker stopped before delivering the maze"),
        }
    }
}

impl Error for MazeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Invariant(e) => Some(e),
            Self::WorkerLost => None,
        }
    }
}

impl From<ConfigurationError> for MazeError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl From<InvariantViolation> for MazeError {
    fn from(e: InvariantViolation) -> Self {
        Self::Invariant(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_and_sources() {
        let e = MazeError::from(ConfigurationError::UnknownSkillLevel { level: 20, max: 15 });
        assert_eq!(
            e.to_string(),
            "configuration error: skill level 20 is not in the table (0 to 15)"
        );
        assert!(e.source().is_some());

        let e = MazeError::from(InvariantViolation::ExitAccess { open_neighbors: 2 });
        assert_eq!(
            e.to_string(),
            "invariant violation: the exit has 2 open neighbors instead of 1"
        );
        assert!(MazeError::WorkerLost.source().is_none());
    }
}
