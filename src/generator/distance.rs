/*
distance.rs

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

//! Distance from every cell to the exit.
//!
//! The distances are computed with a breadth-first traversal that starts at the exit and only
//! follows open passages. The exit is at distance 0, and the cell with the largest distance
//! becomes the starting position.

use log::debug;
use std::collections::VecDeque;

use super::floorplan::{Cell, Floorplan};
use crate::errors::InvariantViolation;

/// Distance to the exit for each cell of a finished floorplan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    width: usize,

    /// Distances, row by row.
    distances: Vec<usize>,

    exit: Cell,

    /// The unique cell with the maximum distance.
    start: Cell,

    max_distance: usize,
}

impl DistanceField {
    /// Compute the distances for the given floorplan and verify the structural invariants.
    ///
    /// # Errors
    ///
    /// Any of these conditions is a builder defect and returns an [`InvariantViolation`]:
    ///
    /// * the floorplan has no exit
    /// * the exit does not have exactly one open neighbor
    /// * a cell cannot reach the exit
    /// * several cells share the maximum distance
    pub fn compute(floorplan: &Floorplan) -> Result<Self, InvariantViolation> {
        let exit: Cell = floorplan.exit().ok_or(InvariantViolation::MissingExit)?;

        let open_neighbors: usize = floorplan.open_sides(exit).len();
        if open_neighbors != 1 {
            return Err(InvariantViolation::ExitAccess { open_neighbors });
        }

        let explored: Vec<Option<usize>> = explore(floorplan, exit);
        let mut distances: Vec<usize> = Vec::with_capacity(explored.len());
        for (i, d) in explored.iter().enumerate() {
            match d {
                Some(d) => distances.push(*d),
                None => {
                    return Err(InvariantViolation::UnreachableCell {
                        x: i % floorplan.width(),
                        y: i / floorplan.width(),
                    });
                }
            }
        }

        let (max_distance, farthest) = farthest_cells(floorplan.width(), &explored);
        if farthest.len() != 1 {
            return Err(InvariantViolation::TiedEntrance {
                distance: max_distance,
                count: farthest.len(),
            });
        }
        let start: Cell = farthest[0];
        debug!("Starting position {start:?} at distance {max_distance}");

        Ok(Self {
            width: floorplan.width(),
            distances,
            exit,
            start,
            max_distance,
        })
    }

    /// Distance from the cell to the exit.
    ///
    /// Coordinates outside the grid return [`None`].
    pub fn distance(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width {
            return None;
        }
        self.distances.get(y * self.width + x).copied()
    }

    /// The exit cell, at distance 0.
    pub fn exit(&self) -> Cell {
        self.exit
    }

    /// The cell the farthest from the exit.
    pub fn starting_position(&self) -> Cell {
        self.start
    }

    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    /// All the distances, row by row.
    pub fn as_slice(&self) -> &[usize] {
        &self.distances
    }
}

/// Breadth-first traversal from the given cell.
///
/// Return the distance of each cell, row by row, or [`None`] for unreachable cells.
pub(crate) fn explore(floorplan: &Floorplan, from: Cell) -> Vec<Option<usize>> {
    let width: usize = floorplan.width();
    let mut distances: Vec<Option<usize>> = vec![None; floorplan.cell_count()];
    let mut queue: VecDeque<Cell> = VecDeque::with_capacity(floorplan.cell_count());

    distances[from.1 * width + from.0] = Some(0);
    queue.push_back(from);
    while let Some(cell) = queue.pop_front() {
        let d: usize = distances[cell.1 * width + cell.0].unwrap_or(0);
        for (x, y) in floorplan.open_neighbors(cell) {
            let slot: &mut Option<usize> = &mut distances[y * width + x];
            if slot.is_none() {
                *slot = Some(d + 1);
                queue.push_back((x, y));
            }
        }
    }
    distances
}

/// Return the largest distance and the cells that reach it, row by row.
pub(crate) fn farthest_cells(width: usize, distances: &[Option<usize>]) -> (usize, Vec<Cell>) {
    let max: usize = distances.iter().flatten().copied().max().unwrap_or(0);
    let cells: Vec<Cell> = distances
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == Some(max))
        .map(|(i, _)| (i % width, i / width))
        .collect();
    (max, cells)
}
