/*
depth_first.rs

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

//! Depth-first backtracking.
//!
//! The carving walks from cell to cell, removing the wall to a random unvisited neighbor. When
//! the current cell has no unvisited neighbor, the walk backtracks. The walk keeps its own stack
//! instead of recursing, so large grids do not exhaust the thread stack.

use log::debug;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;

use super::builder::{Progress, SpanningBuilder, joined_region};
use super::direction::Direction;
use super::floorplan::{Cell, Floorplan};

/// Depth-first builder.
pub struct DepthFirst {
    visited: Vec<bool>,
    stack: Vec<Cell>,
}

impl Default for DepthFirst {
    fn default() -> Self {
        Self::new()
    }
}

impl DepthFirst {
    /// Create a [`DepthFirst`] object.
    pub fn new() -> Self {
        Self {
            visited: Vec::new(),
            stack: Vec::new(),
        }
    }
}

impl SpanningBuilder for DepthFirst {
    fn carve(
        &mut self,
        floorplan: &mut Floorplan,
        start: Cell,
        rng: &mut ChaCha8Rng,
        progress: &mut Progress,
    ) {
        let width: usize = floorplan.width();
        self.visited = vec![false; floorplan.cell_count()];
        self.stack.clear();
        for cell in joined_region(floorplan, start) {
            self.visited[cell.1 * width + cell.0] = true;
            self.stack.push(cell);
        }

        let mut max_depth: usize = self.stack.len();
        while let Some(&cell) = self.stack.last() {
            let candidates: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|&d| {
                    floorplan.can_carve(cell, d)
                        && floorplan
                            .neighbor(cell, d)
                            .is_some_and(|(x, y)| !self.visited[y * width + x])
                })
                .collect();

            let Some(&direction) = candidates.choose(rng) else {
                self.stack.pop();
                continue;
            };
            let Some(next) = floorplan.neighbor(cell, direction) else {
                self.stack.pop();
                continue;
            };
            floorplan.remove_wall(cell, direction);
            self.visited[next.1 * width + next.0] = true;
            self.stack.push(next);
            max_depth = max_depth.max(self.stack.len());
            progress.advance();
        }
        debug!("Depth-first: maximum stack depth {max_depth}");
    }
}
