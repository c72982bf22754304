/*
maze.rs

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

//! Finished maze.
//!
//! A [`Maze`] is immutable. It is shared between the factory and the caller through an
//! [`std::sync::Arc`], and all its queries are read-only.

use std::fmt;

use crate::generator::builder::BuilderKind;
use crate::generator::direction::Direction;
use crate::generator::distance::DistanceField;
use crate::generator::floorplan::{Cell, Floorplan};

/// A finished maze, with the distance from each cell to the exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    floorplan: Floorplan,
    distances: DistanceField,
    skill_level: u8,
    builder: BuilderKind,
    perfect: bool,
    seed: u64,
}

impl Maze {
    pub(crate) fn new(
        floorplan: Floorplan,
        distances: DistanceField,
        skill_level: u8,
        builder: BuilderKind,
        perfect: bool,
        seed: u64,
    ) -> Self {
        Self {
            floorplan,
            distances,
            skill_level,
            builder,
            perfect,
            seed,
        }
    }

    pub fn width(&self) -> usize {
        self.floorplan.width()
    }

    pub fn height(&self) -> usize {
        self.floorplan.height()
    }

    /// Whether a wall blocks the given side of the cell.
    ///
    /// Positions outside the grid report a wall on every side. The outward side of the exit has
    /// no wall.
    pub fn has_wall(&self, x: usize, y: usize, direction: Direction) -> bool {
        self.floorplan.has_wall(x, y, direction)
    }

    pub fn is_in_room(&self, x: usize, y: usize) -> bool {
        self.floorplan.is_in_room(x, y)
    }

    pub fn is_exit_position(&self, x: usize, y: usize) -> bool {
        self.floorplan.is_exit_position(x, y)
    }

    pub fn is_valid_position(&self, x: usize, y: usize) -> bool {
        self.floorplan.is_in_bounds(x, y)
    }

    /// Number of steps from the cell to the exit, or `None` outside the grid.
    pub fn distance_to_exit(&self, x: usize, y: usize) -> Option<usize> {
        self.distances.distance(x, y)
    }

    /// The cell the farthest from the exit.
    pub fn starting_position(&self) -> Cell {
        self.distances.starting_position()
    }

    pub fn exit_position(&self) -> Cell {
        self.distances.exit()
    }

    /// Side of the exit cell that opens onto the outside.
    pub fn exit_side(&self) -> Option<Direction> {
        self.floorplan.exit_side()
    }

    /// Distance from the starting position to the exit.
    pub fn max_distance(&self) -> usize {
        self.distances.max_distance()
    }

    /// Return an open neighbor one step closer to the exit.
    ///
    /// Following the returned cells from any position leads to the exit along a shortest path.
    /// The exit itself, and positions outside the grid, return `None`.
    pub fn neighbor_closer_to_exit(&self, x: usize, y: usize) -> Option<Cell> {
        let closer: usize = self.distance_to_exit(x, y)?.checked_sub(1)?;
        self.floorplan
            .open_neighbors((x, y))
            .into_iter()
            .find(|&(nx, ny)| self.distance_to_exit(nx, ny) == Some(closer))
    }

    /// Number of cells that can be walked through from the given position before hitting a wall.
    ///
    /// Return `None` when the walk leaves the maze through the exit, or when the position is
    /// outside the grid.
    pub fn distance_to_obstacle(&self, x: usize, y: usize, direction: Direction) -> Option<usize> {
        if !self.is_valid_position(x, y) {
            return None;
        }
        let mut cell: Cell = (x, y);
        let mut steps: usize = 0;
        while !self.has_wall(cell.0, cell.1, direction) {
            cell = self.floorplan.neighbor(cell, direction)?;
            steps += 1;
        }
        Some(steps)
    }

    pub fn skill_level(&self) -> u8 {
        self.skill_level
    }

    pub fn builder(&self) -> BuilderKind {
        self.builder
    }

    pub fn is_perfect(&self) -> bool {
        self.perfect
    }

    /// Seed that reproduces this maze with the same builder, skill level, and perfect flag.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn floorplan(&self) -> &Floorplan {
        &self.floorplan
    }

    pub fn distance_field(&self) -> &DistanceField {
        &self.distances
    }
}

/// Draw the maze in ASCII, with `SS` at the starting position.
impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (sx, sy) = self.starting_position();
        for (i, line) in self.floorplan.to_string().lines().enumerate() {
            if i == 2 * sy + 1 {
                let column: usize = 3 * sx + 1;
                writeln!(f, "{}SS{}", &line[..column], &line[column + 2..])?;
            } else {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x2 maze, exit at the west end of the top row:
    ///
    ///   X  1  2
    ///         |
    ///   5  4  3
    fn snake() -> Maze {
        let mut fp = Floorplan::new(3, 2);
        fp.remove_wall((0, 0), Direction::East);
        fp.remove_wall((1, 0), Direction::East);
        fp.remove_wall((2, 0), Direction::South);
        fp.remove_wall((2, 1), Direction::West);
        fp.remove_wall((1, 1), Direction::West);
        fp.place_exit((0, 0), Direction::West);
        let distances = DistanceField::compute(&fp).expect("valid floorplan");
        Maze::new(fp, distances, 0, BuilderKind::Prim, true, 3)
    }

    #[test]
    fn queries() {
        let maze = snake();
        assert_eq!((maze.width(), maze.height()), (3, 2));
        assert_eq!(maze.exit_position(), (0, 0));
        assert_eq!(maze.starting_position(), (0, 1));
        assert_eq!(maze.distance_to_exit(0, 1), Some(5));
        assert_eq!(maze.distance_to_exit(3, 0), None);
        assert!(maze.is_exit_position(0, 0));
        assert!(!maze.has_wall(0, 0, Direction::West));
        assert!(maze.has_wall(0, 0, Direction::South));
        assert!(maze.is_valid_position(2, 1));
        assert!(!maze.is_valid_position(0, 2));
        assert_eq!(maze.seed(), 3);
    }

    #[test]
    fn closer_neighbors_lead_to_the_exit() {
        let maze = snake();
        let mut cell: Cell = maze.starting_position();
        let mut steps: usize = 0;
        while let Some(next) = maze.neighbor_closer_to_exit(cell.0, cell.1) {
            cell = next;
            steps += 1;
        }
        assert_eq!(cell, maze.exit_position());
        assert_eq!(steps, maze.max_distance());
    }

    #[test]
    fn obstacles() {
        let maze = snake();
        assert_eq!(maze.distance_to_obstacle(0, 1, Direction::East), Some(2));
        assert_eq!(maze.distance_to_obstacle(0, 1, Direction::North), Some(0));
        assert_eq!(maze.distance_to_obstacle(2, 0, Direction::West), None);
        assert_eq!(maze.distance_to_obstacle(5, 5, Direction::West), None);
    }

    #[test]
    fn display_marks_start_and_exit() {
        let expected: &str = "\
+--+--+--+
 XX      |
+--+--+  +
|SS      |
+--+--+--+
";
        assert_eq!(snake().to_string(), expected);
    }
}
