/*
prim.rs

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

//! Randomized Prim algorithm.

use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::builder::{Progress, SpanningBuilder, joined_region};
use super::direction::Direction;
use super::floorplan::{Cell, Floorplan};

/// Grow a tree from the start cell by removing random walls along its frontier.
pub struct Prim {
    /// Whether the cell is part of the tree.
    in_tree: Vec<bool>,

    /// Walls between a tree cell and a neighbor, not yet processed.
    frontier: Vec<(Cell, Direction)>,
}

impl Default for Prim {
    fn default() -> Self {
        Self::new()
    }
}

impl Prim {
    /// Create a [`Prim`] object.
    pub fn new() -> Self {
        Self {
            in_tree: Vec::new(),
            frontier: Vec::new(),
        }
    }

    /// Add the cell to the tree, and its walls to the frontier.
    fn join(&mut self, floorplan: &Floorplan, cell: Cell) {
        self.in_tree[cell.1 * floorplan.width() + cell.0] = true;
        for d in Direction::ALL {
            if floorplan.can_carve(cell, d) {
                self.frontier.push((cell, d));
            }
        }
    }
}

impl SpanningBuilder for Prim {
    fn carve(
        &mut self,
        floorplan: &mut Floorplan,
        start: Cell,
        rng: &mut ChaCha8Rng,
        progress: &mut Progress,
    ) {
        self.in_tree = vec![false; floorplan.cell_count()];
        self.frontier.clear();
        for cell in joined_region(floorplan, start) {
            self.join(floorplan, cell);
        }

        let mut iteration: usize = 0;
        while !self.frontier.is_empty() {
            iteration += 1;
            let i: usize = rng.random_range(0..self.frontier.len());
            let (cell, direction) = self.frontier.swap_remove(i);
            let Some(next) = floorplan.neighbor(cell, direction) else {
                continue;
            };
            if self.in_tree[next.1 * floorplan.width() + next.0] {
                // Both sides already in the tree: the wall stays
                continue;
            }
            if floorplan.remove_wall(cell, direction) {
                self.join(floorplan, next);
                progress.advance();
            }
        }
        debug!("Prim: {iteration} frontier walls processed");
    }
}
