/*
maze_builder.rs

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

//! Build a complete maze from a request.
//!
//! The construction goes through these steps:
//!
//! 1. Place the exit on a random border cell, attached to one random neighbor, and seal its
//!    other walls. The exit is therefore a dead end with a single point of access.
//! 2. Carve a spanning tree around the exit with the requested [`BuilderKind`].
//! 3. For non-perfect mazes, carve rooms (see [`super::rooms`]).
//! 4. Make the starting position unique: when several cells share the maximum distance to the
//!    exit, the tied dead ends are moved closer to the exit (see [`settle_entrance`]).
//! 5. Compute the [`DistanceField`], which verifies all the invariants.
//!
//! If step 4 cannot break the tie, the layout is discarded and the steps are repeated with the
//! same random generator, up to [`MAX_BUILD_ATTEMPTS`] times.

use log::{debug, info};
use rand::Rng;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

use super::builder::{BuilderKind, Progress};
use super::direction::Direction;
use super::distance::{DistanceField, explore, farthest_cells};
use super::floorplan::{Cell, Floorplan};
use super::rooms::RoomCarver;
use crate::config::SkillRow;
use crate::errors::InvariantViolation;
use crate::maze::Maze;

/// Number of layouts tried before giving up on a unique starting position.
pub const MAX_BUILD_ATTEMPTS: usize = 16;

/// Share of the progress percentage used by the carving step.
const CARVING_PROGRESS: u8 = 90;

/// Everything needed to build a maze.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub skill_level: u8,
    pub row: SkillRow,
    pub builder: BuilderKind,
    pub perfect: bool,
    pub seed: u64,
}

/// Maze construction object.
pub struct MazeBuilder<'a> {
    request: BuildRequest,

    /// Progress callback, called with a percentage.
    report: &'a dyn Fn(u8),

    /// Number of layouts generated by the last build.
    pub attempts: usize,

    /// Number of rooms in the last layout.
    pub rooms: usize,

    /// Duration in seconds of the last build.
    pub duration: f32,
}

impl<'a> MazeBuilder<'a> {
    /// Create the object.
    pub fn new(request: BuildRequest, report: &'a dyn Fn(u8)) -> Self {
        Self {
            request,
            report,
            attempts: 0,
            rooms: 0,
            duration: 0.0,
        }
    }

    /// Build and return the maze.
    ///
    /// # Errors
    ///
    /// The method returns an [`InvariantViolation`] if the finished floorplan breaks one of the
    /// maze invariants, which indicates a builder defect.
    pub fn build(&mut self) -> Result<Maze, InvariantViolation> {
        let start: Instant = Instant::now();
        let r: BuildRequest = self.request;
        info!(
            "Building a {}x{} maze: builder {}, perfect {}, seed {}",
            r.row.width, r.row.height, r.builder, r.perfect, r.seed
        );

        let mut rng: ChaCha8Rng = ChaCha8Rng::seed_from_u64(r.seed);
        let mut last_error: InvariantViolation = InvariantViolation::MissingExit;
        self.attempts = 0;
        while self.attempts < MAX_BUILD_ATTEMPTS {
            self.attempts += 1;
            let mut floorplan: Floorplan = self.layout(&mut rng);
            if !r.perfect && self.rooms == 0 {
                debug!("Attempt {} discarded: no room could be placed", self.attempts);
                last_error = InvariantViolation::MissingRoom;
                continue;
            }
            match settle_entrance(&mut floorplan) {
                Ok(()) => {
                    floorplan.debug();
                    let distances: DistanceField = DistanceField::compute(&floorplan)?;
                    (self.report)(100);
                    self.duration = start.elapsed().as_secs_f32();
                    debug!(
                        "Attempts = {}  Duration = {}",
                        self.attempts, self.duration
                    );
                    return Ok(Maze::new(
                        floorplan,
                        distances,
                        r.skill_level,
                        r.builder,
                        r.perfect,
                        r.seed,
                    ));
                }
                Err(e) => {
                    debug!("Attempt {} discarded: {e}", self.attempts);
                    last_error = e;
                }
            }
        }
        self.duration = start.elapsed().as_secs_f32();
        Err(last_error)
    }

    /// Generate one layout: exit, passages, and rooms.
    fn layout(&mut self, rng: &mut ChaCha8Rng) -> Floorplan {
        let r: BuildRequest = self.request;
        let mut floorplan: Floorplan = Floorplan::new(r.row.width, r.row.height);
        let exit: Cell = place_exit(&mut floorplan, rng);

        let steps: usize = floorplan.cell_count().saturating_sub(2);
        let mut progress: Progress = Progress::new(steps, 0, CARVING_PROGRESS, self.report);
        r.builder
            .spanning_builder()
            .carve(&mut floorplan, exit, rng, &mut progress);
        debug!("{} passages carved", floorplan.open_passages());

        self.rooms = 0;
        if !r.perfect {
            let mut carver: RoomCarver = RoomCarver::new(r.row.width, r.row.height);
            self.rooms = carver.carve(&mut floorplan, r.row.max_rooms, rng);
            debug!(
                "{} rooms carved out of {} ({} placements rejected)",
                self.rooms, r.row.max_rooms, carver.conflicts
            );
        }
        floorplan
    }
}

/// Place the exit on a random border cell and return it.
///
/// The exit is attached to one random neighbor and opened to the outside. Its other walls are
/// sealed so that the builders cannot give it a second point of access.
fn place_exit(floorplan: &mut Floorplan, rng: &mut ChaCha8Rng) -> Cell {
    let border: Vec<Cell> = floorplan.border_cells();
    let exit: Cell = border[rng.random_range(0..border.len())];

    let outward: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&d| floorplan.neighbor(exit, d).is_none())
        .collect();
    let inward: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&d| floorplan.neighbor(exit, d).is_some())
        .collect();

    if let Some(&attach) = inward.choose(rng) {
        floorplan.remove_wall(exit, attach);
    }
    if let Some(&side) = outward.choose(rng) {
        floorplan.place_exit(exit, side);
    }
    exit
}

/// Make sure that only one cell has the maximum distance to the exit.
///
/// A dead end at the maximum distance can be detached and re-attached to another neighbor at
/// least three steps closer to the exit. No shortest path goes through a dead end, so the other
/// distances do not change, and a spanning tree stays a spanning tree.
///
/// One tied cell is kept as the starting position, and the others are moved.
///
/// # Errors
///
/// The function returns [`InvariantViolation::TiedEntrance`] if more than one tied cell cannot
/// be moved. In that case the floorplan is left unchanged.
pub fn settle_entrance(floorplan: &mut Floorplan) -> Result<(), InvariantViolation> {
    let exit: Cell = floorplan.exit().ok_or(InvariantViolation::MissingExit)?;
    let distances: Vec<Option<usize>> = explore(floorplan, exit);
    let (max, tied) = farthest_cells(floorplan.width(), &distances);
    if tied.len() < 2 {
        return Ok(());
    }

    let mut stuck: Vec<Cell> = Vec::new();
    let mut moves: Vec<(Cell, Direction, Direction)> = Vec::new();
    for &cell in &tied {
        match rehang_target(floorplan, &distances, cell, max) {
            Some((from, to)) => moves.push((cell, from, to)),
            None => stuck.push(cell),
        }
    }
    if stuck.len() > 1 {
        return Err(InvariantViolation::TiedEntrance {
            distance: max,
            count: stuck.len(),
        });
    }

    let keeper: Cell = stuck.first().copied().unwrap_or(tied[0]);
    for (cell, from, to) in moves {
        if cell == keeper {
            continue;
        }
        floorplan.add_wall(cell, from);
        floorplan.remove_wall(cell, to);
        debug!("Moved dead end {cell:?} from the {from} to the {to}");
    }
    debug!(
        "{} cells were tied at distance {max}, keeping {keeper:?}",
        tied.len()
    );
    Ok(())
}

/// Return the current side and the new side for moving the dead end closer to the exit.
fn rehang_target(
    floorplan: &Floorplan,
    distances: &[Option<usize>],
    cell: Cell,
    max: usize,
) -> Option<(Direction, Direction)> {
    if floorplan.is_exit_position(cell.0, cell.1) || floorplan.is_in_room(cell.0, cell.1) {
        return None;
    }
    let open: Vec<Direction> = floorplan.open_sides(cell);
    let [from] = open.as_slice() else {
        return None;
    };

    let width: usize = floorplan.width();
    Direction::ALL
        .into_iter()
        .filter(|&d| floorplan.can_carve(cell, d))
        .filter_map(|d| {
            let (x, y) = floorplan.neighbor(cell, d)?;
            if floorplan.is_in_room(x, y) {
                return None;
            }
            let distance: usize = distances[y * width + x]?;
            (distance + 3 <= max).then_some((distance, d))
        })
        .min_by_key(|&(distance, _)| distance)
        .map(|(_, to)| (*from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(builder: BuilderKind, perfect: bool, seed: u64) -> BuildRequest {
        BuildRequest {
            skill_level: 3,
            row: SkillRow {
                width: 20,
                height: 15,
                max_rooms: 3,
            },
            builder,
            perfect,
            seed,
        }
    }

    #[test]
    fn perfect_maze_is_a_spanning_tree() {
        let report = |_: u8| {};
        for builder in [
            BuilderKind::Prim,
            BuilderKind::Kruskal,
            BuilderKind::DepthFirstSearch,
        ] {
            let maze: Maze = MazeBuilder::new(request(builder, true, 99), &report)
                .build()
                .expect("valid maze");
            assert_eq!(maze.floorplan().open_passages(), 20 * 15 - 1);
            assert_eq!(maze.floorplan().room_cell_count(), 0);
        }
    }

    #[test]
    fn exit_is_on_the_border_and_open_to_the_outside() {
        let report = |_: u8| {};
        let maze: Maze = MazeBuilder::new(request(BuilderKind::Prim, false, 5), &report)
            .build()
            .expect("valid maze");
        let (x, y) = maze.exit_position();
        assert!(x == 0 || y == 0 || x == 19 || y == 14);
        let side: Direction = maze.floorplan().exit_side().expect("exit side");
        assert!(!maze.has_wall(x, y, side));
        assert_eq!(maze.distance_to_exit(x, y), Some(0));
    }

    #[test]
    fn progress_ends_at_100() {
        let last = std::cell::Cell::new(0u8);
        let report = |p: u8| {
            assert!(p >= last.get());
            last.set(p);
        };
        let mut builder = MazeBuilder::new(request(BuilderKind::Kruskal, true, 1), &report);
        builder.build().expect("valid maze");
        assert_eq!(last.get(), 100);
        assert!(builder.attempts >= 1 && builder.attempts <= MAX_BUILD_ATTEMPTS);
    }

    fn small_request(builder: BuilderKind, max_rooms: usize, seed: u64) -> BuildRequest {
        BuildRequest {
            skill_level: 0,
            row: SkillRow {
                width: 5,
                height: 5,
                max_rooms,
            },
            builder,
            perfect: false,
            seed,
        }
    }

    #[test]
    fn non_perfect_maze_always_has_a_room() {
        let report = |_: u8| {};
        for builder in [
            BuilderKind::Prim,
            BuilderKind::Kruskal,
            BuilderKind::DepthFirstSearch,
        ] {
            for seed in 0..40 {
                let mut maze_builder = MazeBuilder::new(small_request(builder, 1, seed), &report);
                let maze: Maze = maze_builder.build().expect("valid maze");
                assert!(maze.floorplan().room_cell_count() > 0, "{builder}, seed {seed}");
                assert_eq!(maze_builder.rooms, 1);
            }
        }
    }

    #[test]
    fn non_perfect_maze_without_room_capacity_fails() {
        let report = |_: u8| {};
        let mut maze_builder = MazeBuilder::new(small_request(BuilderKind::Prim, 0, 1), &report);
        assert_eq!(maze_builder.build(), Err(InvariantViolation::MissingRoom));
        assert_eq!(maze_builder.attempts, MAX_BUILD_ATTEMPTS);
    }

    #[test]
    fn stuck_tie_is_reported() {
        // 3x3 grid, exit X in the north-west corner:
        //
        //   X--a--b
        //      |  |
        //   g--e  c
        //      |
        //   d--f--h
        //
        // d and h are tied at distance 4, and none of their neighbors is close enough to the exit.
        let mut fp = Floorplan::new(3, 3);
        fp.remove_wall((0, 0), Direction::East);
        fp.remove_wall((1, 0), Direction::East);
        fp.remove_wall((2, 0), Direction::South);
        fp.remove_wall((1, 0), Direction::South);
        fp.remove_wall((1, 1), Direction::West);
        fp.remove_wall((1, 1), Direction::South);
        fp.remove_wall((1, 2), Direction::West);
        fp.remove_wall((1, 2), Direction::East);
        fp.place_exit((0, 0), Direction::North);
        let before: Floorplan = fp.clone();
        assert_eq!(
            settle_entrance(&mut fp),
            Err(InvariantViolation::TiedEntrance {
                distance: 4,
                count: 2
            })
        );
        assert_eq!(fp, before);
    }

    #[test]
    fn tied_dead_end_is_moved() {
        // 4x3 grid, exit X in the north-west corner, distances in the cells:
        //
        //   X  9--8--7
        //   |     |  |
        //   1--2  9  6
        //   |        |
        //   2--3--4--5
        //
        // (1, 0) and (2, 1) are tied at distance 9. (1, 0) is kept and (2, 1) is moved next to
        // the cell at distance 2.
        let mut fp = Floorplan::new(4, 3);
        fp.remove_wall((0, 0), Direction::South);
        fp.remove_wall((0, 1), Direction::South);
        fp.remove_wall((0, 1), Direction::East);
        for x in 0..3 {
            fp.remove_wall((x, 2), Direction::East);
        }
        fp.remove_wall((3, 2), Direction::North);
        fp.remove_wall((3, 1), Direction::North);
        fp.remove_wall((3, 0), Direction::West);
        fp.remove_wall((2, 0), Direction::West);
        fp.remove_wall((2, 0), Direction::South);
        fp.place_exit((0, 0), Direction::North);
        assert_eq!(fp.open_passages(), 11);

        assert_eq!(settle_entrance(&mut fp), Ok(()));
        assert_eq!(fp.open_passages(), 11);
        assert_eq!(fp.open_sides((2, 1)), vec![Direction::West]);
        let field = DistanceField::compute(&fp).expect("single entrance");
        assert_eq!(field.starting_position(), (1, 0));
        assert_eq!(field.max_distance(), 9);
        assert_eq!(field.distance(2, 1), Some(3));
    }
}
