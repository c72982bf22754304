/*
floorplan.rs

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

//! Grid of cells with their walls, rooms, and exit.
//!
//! Each cell stores the walls on its four sides as a bit set (see [`Direction::bit`]).
//! The wall between two adjacent cells is stored twice, once in each cell, and every mutation
//! updates both copies so that the two records never disagree.
//!
//! A second bit set marks the sealed walls: the walls that a builder is not allowed to remove.
//! The outer border is sealed from the start, and the walls around the exit are sealed once the
//! exit is placed.

use log::{Level, debug, log_enabled};
use std::fmt;

use super::direction::Direction;

/// Cell coordinates `(x, y)`.
pub type Cell = (usize, usize);

/// Wall set with the four walls present.
const ALL_WALLS: u8 = 0b1111;

/// Rectangular area, in cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    /// Whether the cell is inside the rectangle.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Iterate over the cells of the rectangle, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }

    /// Whether the two rectangles share a cell or touch each other, diagonals included.
    pub fn touches(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }
}

/// Maze floorplan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floorplan {
    width: usize,
    height: usize,

    /// Walls present around each cell.
    walls: Vec<u8>,

    /// Walls that builders cannot remove.
    sealed: Vec<u8>,

    /// Whether the cell is part of a room.
    rooms: Vec<bool>,

    /// Exit cell and the side of that cell that opens onto the outside.
    exit: Option<(Cell, Direction)>,
}

impl Floorplan {
    /// Create a floorplan where every wall is present.
    pub fn new(width: usize, height: usize) -> Self {
        let mut floorplan = Self {
            width,
            height,
            walls: vec![ALL_WALLS; width * height],
            sealed: vec![0; width * height],
            rooms: vec![false; width * height],
            exit: None,
        };

        for y in 0..height {
            for x in 0..width {
                let i: usize = floorplan.index(x, y);
                for d in Direction::ALL {
                    if floorplan.neighbor((x, y), d).is_none() {
                        floorplan.sealed[i] |= d.bit();
                    }
                }
            }
        }
        floorplan
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Whether the coordinates are inside the grid.
    pub fn is_in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Return the adjacent cell in the given direction, or [`None`] at the border.
    pub fn neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dx, dy) = direction.delta();
        let x: usize = cell.0.checked_add_signed(dx)?;
        let y: usize = cell.1.checked_add_signed(dy)?;
        if self.is_in_bounds(x, y) {
            Some((x, y))
        } else {
            None
        }
    }

    /// Whether there is a wall on the given side of the cell.
    ///
    /// Coordinates outside the grid are reported as walled in.
    pub fn has_wall(&self, x: usize, y: usize, direction: Direction) -> bool {
        if !self.is_in_bounds(x, y) {
            return true;
        }
        self.walls[self.index(x, y)] & direction.bit() != 0
    }

    /// Whether the wall on the given side of the cell is sealed.
    pub fn is_sealed(&self, x: usize, y: usize, direction: Direction) -> bool {
        if !self.is_in_bounds(x, y) {
            return true;
        }
        self.sealed[self.index(x, y)] & direction.bit() != 0
    }

    /// Whether a builder can remove the wall on the given side of the cell.
    pub fn can_carve(&self, cell: Cell, direction: Direction) -> bool {
        self.neighbor(cell, direction).is_some()
            && self.has_wall(cell.0, cell.1, direction)
            && !self.is_sealed(cell.0, cell.1, direction)
    }

    /// Remove the wall between the cell and its neighbor, on both sides.
    ///
    /// Return `false` and leave the floorplan unchanged if the wall cannot be removed.
    pub fn remove_wall(&mut self, cell: Cell, direction: Direction) -> bool {
        if !self.can_carve(cell, direction) {
            return false;
        }
        let Some(other) = self.neighbor(cell, direction) else {
            return false;
        };
        let i: usize = self.index(cell.0, cell.1);
        let j: usize = self.index(other.0, other.1);
        self.walls[i] &= !direction.bit();
        self.walls[j] &= !direction.opposite().bit();
        true
    }

    /// Put back the wall between the cell and its neighbor, on both sides.
    ///
    /// Return `false` if there is already a wall, or if the side is the outer border.
    pub fn add_wall(&mut self, cell: Cell, direction: Direction) -> bool {
        let Some(other) = self.neighbor(cell, direction) else {
            return false;
        };
        if self.has_wall(cell.0, cell.1, direction) || self.is_sealed(cell.0, cell.1, direction) {
            return false;
        }
        let i: usize = self.index(cell.0, cell.1);
        let j: usize = self.index(other.0, other.1);
        self.walls[i] |= direction.bit();
        self.walls[j] |= direction.opposite().bit();
        true
    }

    /// Directions from the cell that lead to an adjacent cell without crossing a wall.
    ///
    /// The exit opening onto the outside is not included.
    pub fn open_sides(&self, cell: Cell) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| {
                self.neighbor(cell, d).is_some() && !self.has_wall(cell.0, cell.1, d)
            })
            .collect()
    }

    /// Cells reachable from the given cell in one step.
    pub fn open_neighbors(&self, cell: Cell) -> Vec<Cell> {
        self.open_sides(cell)
            .into_iter()
            .filter_map(|d| self.neighbor(cell, d))
            .collect()
    }

    /// Whether the cell has exactly one open side.
    pub fn is_dead_end(&self, cell: Cell) -> bool {
        self.open_sides(cell).len() == 1
    }

    /// Number of interior walls that have been removed.
    pub fn open_passages(&self) -> usize {
        let mut count: usize = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                for d in [Direction::East, Direction::South] {
                    if self.neighbor((x, y), d).is_some() && !self.has_wall(x, y, d) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Cells along the outer border, row by row.
    pub fn border_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// Make the given border cell the exit.
    ///
    /// The `outward` side must face the outside of the grid: its wall is removed. All the walls
    /// still standing around the exit are then sealed, so the passages already opened from the
    /// exit are its only points of access.
    ///
    /// Return `false` and leave the floorplan unchanged if `outward` does not face the outside.
    pub fn place_exit(&mut self, cell: Cell, outward: Direction) -> bool {
        if !self.is_in_bounds(cell.0, cell.1) || self.neighbor(cell, outward).is_some() {
            return false;
        }
        let i: usize = self.index(cell.0, cell.1);
        self.walls[i] &= !outward.bit();
        for d in Direction::ALL {
            if let Some(other) = self.neighbor(cell, d)
                && self.has_wall(cell.0, cell.1, d)
            {
                let j: usize = self.index(other.0, other.1);
                self.sealed[i] |= d.bit();
                self.sealed[j] |= d.opposite().bit();
            }
        }
        self.exit = Some((cell, outward));
        debug!("Exit at {cell:?}, opening to the {outward}");
        true
    }

    /// Exit cell, once placed.
    pub fn exit(&self) -> Option<Cell> {
        self.exit.map(|(cell, _)| cell)
    }

    /// Side of the exit cell that opens onto the outside.
    pub fn exit_side(&self) -> Option<Direction> {
        self.exit.map(|(_, side)| side)
    }

    /// Whether the cell is the exit.
    pub fn is_exit_position(&self, x: usize, y: usize) -> bool {
        self.exit() == Some((x, y))
    }

    /// Mark the cells in the area as room cells.
    pub fn mark_room(&mut self, area: &Rect) {
        for (x, y) in area.cells() {
            if self.is_in_bounds(x, y) {
                let i: usize = self.index(x, y);
                self.rooms[i] = true;
            }
        }
    }

    /// Whether the cell is part of a room.
    pub fn is_in_room(&self, x: usize, y: usize) -> bool {
        self.is_in_bounds(x, y) && self.rooms[self.index(x, y)]
    }

    /// Number of room cells.
    pub fn room_cell_count(&self) -> usize {
        self.rooms.iter().filter(|&&r| r).count()
    }

    /// Print the floorplan in the debug log.
    pub fn debug(&self) {
        if log_enabled!(Level::Debug) {
            for line in self.to_string().lines() {
                debug!("{line}");
            }
        }
    }
}

/// ASCII rendering: `XX` is the exit and `..` a room cell.
impl fmt::Display for Floorplan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height {
            let mut top: String = String::new();
            let mut middle: String = String::new();
            for x in 0..self.width {
                top.push('+');
                top.push_str(if self.has_wall(x, y, Direction::North) {
                    "--"
                } else {
                    "  "
                });
                middle.push(if self.has_wall(x, y, Direction::West) {
                    '|'
                } else {
                    ' '
                });
                middle.push_str(if self.is_exit_position(x, y) {
                    "XX"
                } else if self.is_in_room(x, y) {
                    ".."
                } else {
                    "  "
                });
            }
            top.push('+');
            middle.push(if self.has_wall(self.width - 1, y, Direction::East) {
                '|'
            } else {
                ' '
            });
            writeln!(f, "{top}")?;
            writeln!(f, "{middle}")?;
        }
        let mut bottom: String = String::new();
        for x in 0..self.width {
            bottom.push('+');
            bottom.push_str(if self.has_wall(x, self.height - 1, Direction::South) {
                "--"
            } else {
                "  "
            });
        }
        bottom.push('+');
        writeln!(f, "{bottom}")
    }
}
