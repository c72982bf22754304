/*
kruskal.rs

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

//! Randomized Kruskal algorithm.
//!
//! Every cell starts in its own tree. The interior walls are shuffled and processed in that
//! order: a wall between two different trees is removed and the trees are merged. The process
//! stops when only one tree is left.

use log::debug;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::builder::{Progress, SpanningBuilder};
use super::direction::Direction;
use super::floorplan::{Cell, Floorplan};

/// Disjoint sets of cells, with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,

    /// Number of disjoint sets.
    sets: usize,
}

impl DisjointSet {
    /// Create `size` singleton sets.
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
            sets: size,
        }
    }

    /// Return the representative of the set that contains `item`.
    pub fn find(&mut self, item: usize) -> usize {
        let mut root: usize = item;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut i: usize = item;
        while self.parent[i] != root {
            let next: usize = self.parent[i];
            self.parent[i] = root;
            i = next;
        }
        root
    }

    /// Merge the sets of the two items.
    ///
    /// Return `false` if the items were already in the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra: usize = self.find(a);
        let rb: usize = self.find(b);
        if ra == rb {
            return false;
        }
        if self.rank[ra] < self.rank[rb] {
            self.parent[ra] = rb;
        } else if self.rank[ra] > self.rank[rb] {
            self.parent[rb] = ra;
        } else {
            self.parent[rb] = ra;
            self.rank[ra] += 1;
        }
        self.sets -= 1;
        true
    }

    /// Number of disjoint sets.
    pub fn sets(&self) -> usize {
        self.sets
    }
}

/// Kruskal builder.
pub struct Kruskal {
    trees: DisjointSet,

    /// Candidate walls, each stored once from its west or north cell.
    walls: Vec<(Cell, Direction)>,
}

impl Default for Kruskal {
    fn default() -> Self {
        Self::new()
    }
}

impl Kruskal {
    /// Create a [`Kruskal`] object.
    pub fn new() -> Self {
        Self {
            trees: DisjointSet::new(0),
            walls: Vec::new(),
        }
    }
}

impl SpanningBuilder for Kruskal {
    fn carve(
        &mut self,
        floorplan: &mut Floorplan,
        _start: Cell,
        rng: &mut ChaCha8Rng,
        progress: &mut Progress,
    ) {
        let width: usize = floorplan.width();
        self.trees = DisjointSet::new(floorplan.cell_count());
        self.walls.clear();

        // Cells already joined by an open passage share a tree. Other walls are candidates.
        for y in 0..floorplan.height() {
            for x in 0..width {
                for d in [Direction::East, Direction::South] {
                    let Some((nx, ny)) = floorplan.neighbor((x, y), d) else {
                        continue;
                    };
                    if !floorplan.has_wall(x, y, d) {
                        self.trees.union(y * width + x, ny * width + nx);
                    } else if floorplan.can_carve((x, y), d) {
                        self.walls.push(((x, y), d));
                    }
                }
            }
        }
        self.walls.shuffle(rng);
        debug!(
            "Kruskal: {} trees, {} candidate walls",
            self.trees.sets(),
            self.walls.len()
        );

        for &(cell, direction) in &self.walls {
            if self.trees.sets() == 1 {
                break;
            }
            let Some(other) = floorplan.neighbor(cell, direction) else {
                continue;
            };
            let a: usize = cell.1 * width + cell.0;
            let b: usize = other.1 * width + other.0;
            if self.trees.find(a) != self.trees.find(b) && floorplan.remove_wall(cell, direction)
            {
                self.trees.union(a, b);
                progress.advance();
            }
        }
        debug!("Kruskal: {} trees left", self.trees.sets());
    }
}
