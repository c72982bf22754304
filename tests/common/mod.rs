/*
mod.rs

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

#![allow(dead_code)]

use mazegen::{BuilderKind, Direction, Factory, Maze, Order};
use std::sync::Arc;

/// Submit an order and wait for the maze.
pub fn order_maze(
    factory: &Factory,
    level: u8,
    builder: BuilderKind,
    perfect: bool,
    seed: u64,
) -> Arc<Maze> {
    let mut order = Order::new();
    order.set_skill_level(level);
    order.set_builder(builder);
    order.set_perfect(perfect);
    order.set_seed(seed);
    factory.submit(&mut order).expect("valid order");
    factory.wait_till_delivered(&mut order).expect("maze")
}

/// Check the structural properties every delivered maze must have.
pub fn assert_valid_maze(maze: &Maze) {
    let (width, height) = (maze.width(), maze.height());
    let (ex, ey) = maze.exit_position();
    assert!(maze.is_exit_position(ex, ey));
    assert!(ex == 0 || ey == 0 || ex == width - 1 || ey == height - 1);
    let side: Direction = maze.exit_side().expect("exit side");
    assert!(!maze.has_wall(ex, ey, side));

    let mut max: usize = 0;
    let mut at_max: usize = 0;
    let mut at_one: usize = 0;
    for y in 0..height {
        for x in 0..width {
            let d: usize = maze.distance_to_exit(x, y).expect("reachable cell");
            if (x, y) == (ex, ey) {
                assert_eq!(d, 0);
            } else {
                assert!(d > 0, "cell ({x}, {y}) has distance 0");
            }
            if d == 1 {
                at_one += 1;
            }
            if d > max {
                max = d;
                at_max = 1;
            } else if d == max {
                at_max += 1;
            }

            // A wall is shared by both cells
            if x + 1 < width {
                assert_eq!(
                    maze.has_wall(x, y, Direction::East),
                    maze.has_wall(x + 1, y, Direction::West)
                );
            }
            if y + 1 < height {
                assert_eq!(
                    maze.has_wall(x, y, Direction::South),
                    maze.has_wall(x, y + 1, Direction::North)
                );
            }
        }
    }
    assert_eq!(at_max, 1, "{at_max} cells at the maximum distance {max}");
    assert_eq!(at_one, 1, "{at_one} cells next to the exit");
    let (sx, sy) = maze.starting_position();
    assert_eq!(maze.distance_to_exit(sx, sy), Some(max));

    if maze.is_perfect() {
        assert_eq!(room_cells(maze), 0);
        assert_eq!(maze.floorplan().open_passages(), width * height - 1);
    } else {
        assert!(room_cells(maze) > 0, "non-perfect maze without rooms");
    }
}

/// Number of cells in rooms.
pub fn room_cells(maze: &Maze) -> usize {
    (0..maze.height())
        .flat_map(|y| (0..maze.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| maze.is_in_room(x, y))
        .count()
}
