/*
rooms.rs

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

//! Carve rooms into a finished maze.
//!
//! A room is a rectangular area without interior walls. Its perimeter keeps its walls, except
//! for a few doorways:
//!
//! * Clearing the interior and resealing the perimeter can cut off parts of the maze that were
//!   reached through the room. One doorway is opened towards each of those parts, so every cell
//!   stays reachable.
//! * If the room ends up with less than [`MIN_DOORWAYS`] doorways, random doorways are added.
//!
//! Rooms keep a one-cell margin from the outer border and from other rooms, and stay away from
//! the exit, so they never change how the exit is accessed.
//!
//! A placement that would need too many doorways is abandoned: the floorplan is restored and
//! another placement is tried. After [`MAX_PLACEMENT_ATTEMPTS`] attempts, the room is skipped.

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;

use super::builder::joined_region;
use super::direction::Direction;
use super::floorplan::{Cell, Floorplan, Rect};

/// Number of placements tried for a room before giving up on it.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10;

/// Minimum number of doorways for a room.
pub const MIN_DOORWAYS: usize = 2;

/// Smallest room side, in cells.
const MIN_ROOM_SIDE: usize = 2;

/// Reasons for rejecting a room placement.
#[derive(Debug, PartialEq)]
enum RoomPlacementConflict {
    /// The room overlaps or touches another room.
    Overlap,

    /// The room is too close to the exit.
    NearExit,

    /// Reconnecting the maze would need more doorways than allowed.
    TooManyDoorways { needed: usize, allowed: usize },

    /// A part of the maze cut off by the room cannot be reconnected.
    Unreachable,
}

/// Room carving object.
pub struct RoomCarver {
    /// Rooms placed so far.
    rooms: Vec<Rect>,

    /// Largest room side.
    max_side: usize,

    /// Number of placements rejected while carving.
    pub conflicts: usize,
}

impl RoomCarver {
    /// Create a [`RoomCarver`] object for the given floorplan dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        let max_side: usize = (width.min(height) / 5)
            .max(MIN_ROOM_SIDE)
            .min(width.saturating_sub(2))
            .min(height.saturating_sub(2));
        Self {
            rooms: Vec::new(),
            max_side,
            conflicts: 0,
        }
    }

    /// Rooms placed so far.
    pub fn rooms(&self) -> &[Rect] {
        &self.rooms
    }

    /// Carve up to `max_rooms` rooms and return the number of rooms carved.
    pub fn carve(
        &mut self,
        floorplan: &mut Floorplan,
        max_rooms: usize,
        rng: &mut ChaCha8Rng,
    ) -> usize {
        if self.max_side < MIN_ROOM_SIDE {
            debug!(
                "Rooms: {}x{} is too small for rooms",
                floorplan.width(),
                floorplan.height()
            );
            return 0;
        }

        let mut carved: usize = 0;
        for room in 0..max_rooms {
            let mut attempt: usize = 0;
            loop {
                if attempt == MAX_PLACEMENT_ATTEMPTS {
                    debug!("Rooms: skipping room {room} after {attempt} attempts");
                    break;
                }
                attempt += 1;

                let area: Rect = self.random_area(floorplan, rng);
                match self.try_place(floorplan, &area, rng) {
                    Ok(doorways) => {
                        debug!("Rooms: room {room} at {area:?} with {doorways} doorways");
                        self.rooms.push(area);
                        carved += 1;
                        break;
                    }
                    Err(e) => {
                        debug!("Rooms: placement {area:?} rejected: {e:?}");
                        self.conflicts += 1;
                    }
                }
            }
        }
        carved
    }

    /// Pick a random area that keeps a one-cell margin from the border.
    fn random_area(&self, floorplan: &Floorplan, rng: &mut ChaCha8Rng) -> Rect {
        let width: usize = rng.random_range(MIN_ROOM_SIDE..=self.max_side);
        let height: usize = rng.random_range(MIN_ROOM_SIDE..=self.max_side);
        Rect {
            x: rng.random_range(1..=floorplan.width() - 1 - width),
            y: rng.random_range(1..=floorplan.height() - 1 - height),
            width,
            height,
        }
    }

    /// Turn the area into a room.
    ///
    /// Return the number of doorways, or the conflict that prevented the placement. On conflict,
    /// the floorplan is left unchanged.
    fn try_place(
        &self,
        floorplan: &mut Floorplan,
        area: &Rect,
        rng: &mut ChaCha8Rng,
    ) -> Result<usize, RoomPlacementConflict> {
        if self.rooms.iter().any(|r| r.touches(area)) {
            return Err(RoomPlacementConflict::Overlap);
        }
        if let Some((ex, ey)) = floorplan.exit()
            && area
                .cells()
                .any(|(x, y)| x.abs_diff(ex) + y.abs_diff(ey) <= 1)
        {
            return Err(RoomPlacementConflict::NearExit);
        }

        let snapshot: Floorplan = floorplan.clone();
        let result = place(floorplan, area, rng);
        if result.is_err() {
            *floorplan = snapshot;
        }
        result
    }
}

/// Clear the room, reseal its perimeter, and open the doorways.
fn place(
    floorplan: &mut Floorplan,
    area: &Rect,
    rng: &mut ChaCha8Rng,
) -> Result<usize, RoomPlacementConflict> {
    for cell in area.cells() {
        for d in [Direction::East, Direction::South] {
            if floorplan
                .neighbor(cell, d)
                .is_some_and(|(x, y)| area.contains(x, y))
            {
                floorplan.remove_wall(cell, d);
            }
        }
    }

    let walls: Vec<(Cell, Direction)> = perimeter(floorplan, area);
    for &(cell, d) in &walls {
        floorplan.add_wall(cell, d);
    }
    floorplan.mark_room(area);

    // Label the cells by connected part. The room itself is part 0.
    let width: usize = floorplan.width();
    let mut part_of: Vec<Option<usize>> = vec![None; floorplan.cell_count()];
    for (x, y) in joined_region(floorplan, (area.x, area.y)) {
        part_of[y * width + x] = Some(0);
    }

    // One doorway to each part that has been cut off
    let mut doorways: Vec<(Cell, Direction)> = Vec::new();
    let mut part: usize = 0;
    for y in 0..floorplan.height() {
        for x in 0..width {
            if part_of[y * width + x].is_some() {
                continue;
            }
            part += 1;
            for (px, py) in joined_region(floorplan, (x, y)) {
                part_of[py * width + px] = Some(part);
            }
            let candidates: Vec<(Cell, Direction)> = walls
                .iter()
                .filter(|&&(cell, d)| {
                    floorplan.can_carve(cell, d)
                        && floorplan
                            .neighbor(cell, d)
                            .is_some_and(|(nx, ny)| part_of[ny * width + nx] == Some(part))
                })
                .copied()
                .collect();
            match candidates.choose(rng) {
                Some(&doorway) => doorways.push(doorway),
                None => return Err(RoomPlacementConflict::Unreachable),
            }
        }
    }

    let allowed: usize = (walls.len() / 2).max(MIN_DOORWAYS);
    if doorways.len() > allowed {
        return Err(RoomPlacementConflict::TooManyDoorways {
            needed: doorways.len(),
            allowed,
        });
    }
    for &(cell, d) in &doorways {
        floorplan.remove_wall(cell, d);
    }

    // Extra doorways
    let mut count: usize = doorways.len();
    while count < MIN_DOORWAYS {
        let candidates: Vec<(Cell, Direction)> = walls
            .iter()
            .filter(|&&(cell, d)| floorplan.can_carve(cell, d))
            .copied()
            .collect();
        let Some(&(cell, d)) = candidates.choose(rng) else {
            break;
        };
        floorplan.remove_wall(cell, d);
        count += 1;
    }
    Ok(count)
}

/// Walls between the room and the cells around it.
fn perimeter(floorplan: &Floorplan, area: &Rect) -> Vec<(Cell, Direction)> {
    let mut walls: Vec<(Cell, Direction)> = Vec::new();
    for cell in area.cells() {
        for d in Direction::ALL {
            if let Some((x, y)) = floorplan.neighbor(cell, d)
                && !area.contains(x, y)
            {
                walls.push((cell, d));
            }
        }
    }
    walls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::builder::BuilderKind;
    use crate::generator::builder::tests::carve_with;
    use crate::generator::distance::explore;
    use rand::SeedableRng;

    /// Count the open walls on the room perimeter.
    fn doorway_count(fp: &Floorplan, area: &Rect) -> usize {
        perimeter(fp, area)
            .iter()
            .filter(|&&((x, y), d)| !fp.has_wall(x, y, d))
            .count()
    }

    #[test]
    fn room_keeps_everything_reachable() {
        let mut fp = carve_with(BuilderKind::DepthFirstSearch, 20, 15, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut carver = RoomCarver::new(20, 15);
        let carved: usize = carver.carve(&mut fp, 3, &mut rng);
        assert!(carved > 0);
        assert_eq!(carver.rooms().len(), carved);

        assert!(explore(&fp, (0, 0)).iter().all(|d| d.is_some()));
        assert_eq!(fp.open_sides((0, 0)).len(), 1);

        for area in carver.rooms() {
            assert!(area.x >= 1 && area.y >= 1);
            assert!(area.x + area.width < 20 && area.y + area.height < 15);
            for (x, y) in area.cells() {
                assert!(fp.is_in_room(x, y));
                if x + 1 < area.x + area.width {
                    assert!(!fp.has_wall(x, y, Direction::East));
                }
                if y + 1 < area.y + area.height {
                    assert!(!fp.has_wall(x, y, Direction::South));
                }
            }
            let doorways: usize = doorway_count(&fp, area);
            assert!(doorways >= MIN_DOORWAYS);
            assert!(doorways <= perimeter(&fp, area).len() / 2);
        }
        for (i, a) in carver.rooms().iter().enumerate() {
            for b in &carver.rooms()[i + 1..] {
                assert!(!a.touches(b));
            }
        }
    }

    #[test]
    fn conflicting_placements_leave_the_floorplan_unchanged() {
        let mut fp = carve_with(BuilderKind::Prim, 6, 6, 1);
        let before: Floorplan = fp.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut carver = RoomCarver::new(6, 6);

        // The exit is at (0, 0) and (1, 0) is one of its neighbors
        let near_exit = Rect {
            x: 1,
            y: 0,
            width: 2,
            height: 2,
        };
        assert_eq!(
            carver.try_place(&mut fp, &near_exit, &mut rng),
            Err(RoomPlacementConflict::NearExit)
        );

        carver.rooms.push(Rect {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
        });
        let touching = Rect {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        };
        assert_eq!(
            carver.try_place(&mut fp, &touching, &mut rng),
            Err(RoomPlacementConflict::Overlap)
        );
        assert_eq!(fp, before);
    }

    #[test]
    fn tiny_grid_has_no_rooms() {
        let mut fp = carve_with(BuilderKind::Kruskal, 3, 3, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut carver = RoomCarver::new(3, 3);
        assert_eq!(carver.carve(&mut fp, 4, &mut rng), 0);
        assert_eq!(fp.room_cell_count(), 0);
    }
}
