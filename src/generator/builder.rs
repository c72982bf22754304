/*
builder.rs

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

//! Spanning algorithms that carve the passages of a maze.
//!
//! All the algorithms implement the [`SpanningBuilder`] trait. They receive a floorplan where
//! the only open passages are the ones around the exit, and they remove walls until every cell
//! is joined to the exit by exactly one path.
//!
//! The algorithms only use the provided random generator, so that the same seed always produces
//! the same passages.

use clap::ValueEnum;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::fmt;

use super::depth_first::DepthFirst;
use super::floorplan::{Cell, Floorplan};
use super::kruskal::Kruskal;
use super::prim::Prim;

/// Available maze builders.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum BuilderKind {
    /// Randomized Prim: grow a tree by picking random walls along its frontier.
    Prim,

    /// Randomized Kruskal: remove shuffled walls between disjoint trees.
    Kruskal,

    /// Depth-first backtracking with an explicit stack.
    #[value(name = "dfs")]
    DepthFirstSearch,
}

impl BuilderKind {
    /// Create the spanning algorithm for this kind of builder.
    pub fn spanning_builder(self) -> Box<dyn SpanningBuilder> {
        match self {
            BuilderKind::Prim => Box::new(Prim::new()),
            BuilderKind::Kruskal => Box::new(Kruskal::new()),
            BuilderKind::DepthFirstSearch => Box::new(DepthFirst::new()),
        }
    }
}

impl fmt::Display for BuilderKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuilderKind::Prim => write!(f, "Prim"),
            BuilderKind::Kruskal => write!(f, "Kruskal"),
            BuilderKind::DepthFirstSearch => write!(f, "DepthFirstSearch"),
        }
    }
}

/// Common interface of the spanning algorithms.
///
/// The algorithm state (frontier, disjoint sets, or stack) lives in the implementing object and
/// is discarded after the call.
pub trait SpanningBuilder {
    /// Remove walls until every cell is connected to `start`.
    ///
    /// Passages that are already open are kept, and sealed walls are never removed. Each time a
    /// cell joins the tree, `progress` is advanced by one.
    fn carve(
        &mut self,
        floorplan: &mut Floorplan,
        start: Cell,
        rng: &mut ChaCha8Rng,
        progress: &mut Progress,
    );
}

/// Cells connected to the given cell through the passages that are already open.
pub(crate) fn joined_region(floorplan: &Floorplan, start: Cell) -> Vec<Cell> {
    let mut seen: Vec<bool> = vec![false; floorplan.cell_count()];
    let mut region: Vec<Cell> = Vec::new();
    let mut queue: VecDeque<Cell> = VecDeque::new();

    seen[start.1 * floorplan.width() + start.0] = true;
    queue.push_back(start);
    while let Some(cell) = queue.pop_front() {
        region.push(cell);
        for (x, y) in floorplan.open_neighbors(cell) {
            let i: usize = y * floorplan.width() + x;
            if !seen[i] {
                seen[i] = true;
                queue.push_back((x, y));
            }
        }
    }
    region
}

/// Report the build progress as a percentage.
///
/// The work is counted in steps. The percentage moves from `low` to `high` as the steps are
/// completed, and the callback is only called when the percentage changes.
pub struct Progress<'a> {
    total: usize,
    done: usize,
    low: u8,
    high: u8,
    last: u8,
    report: &'a dyn Fn(u8),
}

impl<'a> Progress<'a> {
    /// Create a [`Progress`] object for `total` steps.
    pub fn new(total: usize, low: u8, high: u8, report: &'a dyn Fn(u8)) -> Self {
        Self {
            total: total.max(1),
            done: 0,
            low,
            high: high.max(low),
            last: low,
            report,
        }
    }

    /// Mark one more step as done.
    pub fn advance(&mut self) {
        self.done = (self.done + 1).min(self.total);
        let span: usize = usize::from(self.high - self.low);
        let percent: u8 = self.low + (span * self.done / self.total) as u8;
        if percent > self.last {
            self.last = percent;
            (self.report)(percent);
        }
    }
}
