/*
generator.rs

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

//! Carve mazes.
//!
//! A maze starts as a [`floorplan::Floorplan`] with every wall in place. The
//! [`maze_builder::MazeBuilder`] object drives the construction:
//!
//! * The exit is placed on the border, as a dead end with a single point of access.
//! * A [`builder::SpanningBuilder`] removes walls until every cell is connected. Three builders
//!   are available, selected by [`builder::BuilderKind`]: [`prim::Prim`], [`kruskal::Kruskal`],
//!   and [`depth_first::DepthFirst`].
//! * For non-perfect mazes, a [`rooms::RoomCarver`] object clears rectangular rooms.
//! * The [`distance::DistanceField`] object computes the distance from every cell to the exit,
//!   and verifies that the floorplan is a valid maze.
//!
//! All the random decisions come from a single generator seeded from the order, so the same
//! parameters always produce the same maze.

pub mod builder;
pub mod depth_first;
pub mod direction;
pub mod distance;
pub mod floorplan;
pub mod kruskal;
pub mod maze_builder;
pub mod prim;
pub mod rooms;
