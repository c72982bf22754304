/*
cli_options.rs

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

//! Process command-line options.
//!
//! These options are intended for developers tuning the skill table or the builders.
//! In command-line mode, Mazegen builds mazes and prints them in ASCII.
//!
//! # Examples
//!
//! List the skill levels:
//!
//! ```
//! $ mazegen --ls
//! level  0:    5 x 5    rooms   1
//! level  1:   12 x 12   rooms   2
//! ...
//! ```
//!
//! Build two perfect mazes at level 1 with the Prim algorithm, starting from seed 7:
//!
//! ```
//! $ mazegen -l 1 -b prim -s 7 -c 2 --perfect --summary
//! ```

use clap::Parser;
use log::debug;
use std::env;
use std::path::PathBuf;

use mazegen::config::{SkillRow, SkillTable};
use mazegen::generator::builder::BuilderKind;
use mazegen::generator::maze_builder::{BuildRequest, MazeBuilder};
use mazegen::maze::Maze;

const COPYRIGHT_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nCopyright 2025 Hervé Quatremain\nLicense GPL-3.0-or-later"
);

/// Build random mazes for developers.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// List the skill levels
    #[arg(long, default_value_t = false)]
    ls: bool,

    /// Skill level of the mazes to build
    #[arg(short, long, group = "generate")]
    level: Option<u8>,

    /// Algorithm that carves the passages
    #[arg(value_enum, short, long, default_value_t = BuilderKind::Kruskal, requires = "generate")]
    builder: BuilderKind,

    /// Seed of the first maze. The following mazes use the next seeds
    #[arg(short, long, requires = "generate")]
    seed: Option<u64>,

    /// Build perfect mazes, without rooms
    #[arg(long, default_value_t = false, requires = "generate")]
    perfect: bool,

    /// Number of mazes to build
    #[arg(short, long, default_value_t = 1, requires = "generate")]
    count: usize,

    /// Print some statistics after building the mazes
    #[arg(long, default_value_t = false, requires = "generate")]
    summary: bool,

    /// JSON file with the skill table to use instead of the built-in one
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Parse and process command-line options, and return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let table: SkillTable = match &args.table {
        Some(path) => match SkillTable::load(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Cannot load the skill table from {}: {e}", path.display());
                return 1;
            }
        },
        None => SkillTable::default(),
    };

    //
    // List the skill levels
    //
    if args.ls {
        for (level, row) in table.rows().iter().enumerate() {
            println!(
                "level {level:2}: {:4} x {:<4} rooms {:3}",
                row.width, row.height, row.max_rooms
            );
        }
        return 0;
    }

    let Some(level) = args.level else {
        eprintln!("Nothing to do. Use --ls to list the skill levels, or --level to build mazes.");
        return 2;
    };
    let row: SkillRow = match table.row(level) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}. Use --ls to list the skill levels.");
            return 1;
        }
    };

    if !args.perfect && row.max_rooms == 0 {
        eprintln!("Level {level} has no rooms. Use --perfect.");
        return 1;
    }

    let first_seed: u64 = args.seed.unwrap_or_else(rand::random::<u64>);
    let report = |_: u8| {};
    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    let mut attempts: usize = 0;
    let mut rooms: usize = 0;
    let mut errors: usize = 0;
    for i in 0..args.count {
        let seed: u64 = first_seed.wrapping_add(i as u64);
        debug!("Maze {i}, seed {seed}");

        let request = BuildRequest {
            skill_level: level,
            row,
            builder: args.builder,
            perfect: args.perfect,
            seed,
        };
        let mut builder: MazeBuilder = MazeBuilder::new(request, &report);
        let maze: Maze = match builder.build() {
            Ok(m) => m,
            Err(e) => {
                errors += 1;
                eprintln!("Seed {seed}: {e}");
                continue;
            }
        };
        total += builder.duration;
        if builder.duration > max {
            max = builder.duration;
        }
        attempts += builder.attempts;
        rooms += builder.rooms;

        // Verify that a perfect maze is a spanning tree
        let passages: usize = maze.floorplan().open_passages();
        if args.perfect && passages != maze.width() * maze.height() - 1 {
            errors += 1;
            eprintln!("Seed {seed}: {passages} passages in a perfect maze");
        }

        let (sx, sy) = maze.starting_position();
        let (ex, ey) = maze.exit_position();
        println!(
            "level {level}, {}x{}, builder {}, seed {seed}, start ({sx}, {sy}), exit ({ex}, {ey}), distance {}",
            maze.width(),
            maze.height(),
            maze.builder(),
            maze.max_distance()
        );
        println!("{maze}");
    }

    // Print some stats
    if args.summary && args.count > 0 {
        println!(
            "
        total time = {}s
      average time = {}s
          max time = {}s
  average attempts = {}
     average rooms = {}
            errors = {}",
            total,
            total / args.count as f32,
            max,
            attempts as f32 / args.count as f32,
            rooms as f32 / args.count as f32,
            errors
        );
    }
    if errors > 0 { 1 } else { 0 }
}
