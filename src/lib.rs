/*
lib.rs

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

//! Maze generation engine.
//!
//! A caller describes the maze it wants with an [`order::Order`] (skill level, builder
//! algorithm, perfect or not, optional seed) and submits it to a [`factory::Factory`]. The
//! factory builds the maze on a worker thread and delivers an immutable [`maze::Maze`], which
//! can be shared with any number of readers.
//!
//! Every delivered maze satisfies these properties:
//!
//! * every cell can reach the exit
//! * the exit has exactly one open neighbor
//! * exactly one cell, the starting position, is the farthest from the exit
//! * a perfect maze is a spanning tree and has no rooms
//!
//! The same order parameters and seed always produce the same maze.

pub mod config;
pub mod errors;
pub mod factory;
pub mod generator;
pub mod maze;
pub mod order;

pub use config::{SkillRow, SkillTable};
pub use errors::{ConfigurationError, InvariantViolation, MazeError};
pub use factory::Factory;
pub use generator::builder::BuilderKind;
pub use generator::direction::Direction;
pub use maze::Maze;
pub use order::{Order, OrderState};
