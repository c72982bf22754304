/*
factory.rs

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

//! Build mazes in the background.
//!
//! The [`Factory`] owns one worker thread. Submitted orders go through a job channel with a
//! single slot: one maze is built while at most one more order waits in the slot. A further
//! submission blocks until the slot is free.
//!
//! # Examples
//!
//! ```no_run
//! use mazegen::factory::Factory;
//! use mazegen::generator::builder::BuilderKind;
//! use mazegen::order::Order;
//!
//! let factory = Factory::new();
//! let mut order = Order::new();
//! order.set_skill_level(5);
//! order.set_builder(BuilderKind::Kruskal);
//! order.set_seed(7);
//! factory.submit(&mut order).expect("valid order");
//! let maze = factory.wait_till_delivered(&mut order).expect("maze");
//! println!("{maze}");
//! ```

use async_channel::{Receiver, Sender};
use log::{debug, info, warn};
use rand::Rng;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::{SkillRow, SkillTable};
use crate::errors::{ConfigurationError, MazeError};
use crate::generator::builder::BuilderKind;
use crate::generator::maze_builder::{BuildRequest, MazeBuilder};
use crate::maze::Maze;
use crate::order::{Delivery, Order, OrderState};

/// A build waiting for the worker.
struct Job {
    request: BuildRequest,
    delivery: Delivery,
}

/// Maze factory.
pub struct Factory {
    table: SkillTable,

    /// Sending side of the job channel. Closed when the factory is dropped.
    jobs: Option<Sender<Job>>,

    worker: Option<JoinHandle<()>>,
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

impl Factory {
    /// Create a factory that uses the built-in skill table.
    pub fn new() -> Self {
        Self::with_table(SkillTable::default())
    }

    /// Create a factory that uses the given skill table.
    pub fn with_table(table: SkillTable) -> Self {
        let (sender, receiver) = async_channel::bounded::<Job>(1);
        let worker: Option<JoinHandle<()>> = match thread::Builder::new()
            .name("maze-factory".to_string())
            .spawn(move || work(receiver))
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Cannot start the maze factory worker: {e}");
                None
            }
        };
        Self {
            table,
            jobs: worker.as_ref().map(|_| sender),
            worker,
        }
    }

    pub fn table(&self) -> &SkillTable {
        &self.table
    }

    /// Validate the order and queue it for the worker.
    ///
    /// If the order has no fixed seed, a fresh seed is drawn here. The seed actually used is
    /// available from the delivered [`Maze`].
    ///
    /// # Errors
    ///
    /// The method returns a [`ConfigurationError`] if the order has already been submitted,
    /// if its builder or skill level is missing, if the skill level is not in the table, if a
    /// non-perfect maze is requested at a level without rooms, or if the worker is not
    /// running. In all these cases, no background work is started.
    pub fn submit(&self, order: &mut Order) -> Result<(), ConfigurationError> {
        if order.state() != OrderState::Created {
            return Err(ConfigurationError::AlreadySubmitted);
        }
        let builder: BuilderKind = order.builder().ok_or(ConfigurationError::MissingBuilder)?;
        let skill_level: u8 = order
            .skill_level()
            .ok_or(ConfigurationError::MissingSkillLevel)?;
        let row: SkillRow = self.table.row(skill_level)?;
        if !order.is_perfect() && row.max_rooms == 0 {
            return Err(ConfigurationError::NoRooms { level: skill_level });
        }
        let Some(jobs) = &self.jobs else {
            return Err(ConfigurationError::FactoryStopped);
        };

        let seed: u64 = order.seed().unwrap_or_else(|| rand::rng().random::<u64>());
        let request = BuildRequest {
            skill_level,
            row,
            builder,
            perfect: order.is_perfect(),
            seed,
        };
        let delivery: Delivery = order.accept()?;
        info!(
            "Order submitted: level {skill_level} ({}x{}), builder {builder}, seed {seed}",
            row.width, row.height
        );
        jobs.send_blocking(Job { request, delivery })
            .map_err(|_| ConfigurationError::FactoryStopped)
    }

    /// Block until the order is delivered, and return the maze.
    ///
    /// # Errors
    ///
    /// See [`Order::wait_till_delivered`].
    pub fn wait_till_delivered(&self, order: &mut Order) -> Result<Arc<Maze>, MazeError> {
        order.wait_till_delivered()
    }
}

impl Drop for Factory {
    fn drop(&mut self) {
        // Closing the channel stops the worker once the queued jobs are done
        self.jobs.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!("The maze factory worker panicked");
        }
    }
}

/// Worker loop: build the queued orders one at a time.
fn work(jobs: Receiver<Job>) {
    debug!("Factory worker started");
    while let Ok(job) = jobs.recv_blocking() {
        job.delivery.start();
        let result: Result<Maze, MazeError> = {
            let report = |percent: u8| job.delivery.update_progress(percent);
            MazeBuilder::new(job.request, &report)
                .build()
                .map_err(MazeError::from)
        };
        if let Err(e) = &result {
            warn!("Build aborted: {e}");
        }
        job.delivery.deliver(result);
    }
    debug!("Factory worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameters_are_rejected() {
        let factory = Factory::new();

        let mut order = Order::new();
        order.set_skill_level(1);
        assert_eq!(
            factory.submit(&mut order),
            Err(ConfigurationError::MissingBuilder)
        );
        assert_eq!(order.state(), OrderState::Created);

        let mut order = Order::new();
        order.set_builder(BuilderKind::Prim);
        assert_eq!(
            factory.submit(&mut order),
            Err(ConfigurationError::MissingSkillLevel)
        );

        order.set_skill_level(200);
        assert_eq!(
            factory.submit(&mut order),
            Err(ConfigurationError::UnknownSkillLevel { level: 200, max: 15 })
        );
        assert_eq!(order.state(), OrderState::Created);
    }

    #[test]
    fn rooms_are_required_for_non_perfect_mazes() {
        let table = SkillTable::new(vec![SkillRow {
            width: 4,
            height: 4,
            max_rooms: 0,
        }])
        .expect("valid table");
        let factory = Factory::with_table(table);

        let mut order = Order::new();
        order.set_skill_level(0);
        order.set_builder(BuilderKind::Prim);
        assert_eq!(
            factory.submit(&mut order),
            Err(ConfigurationError::NoRooms { level: 0 })
        );
        assert_eq!(order.state(), OrderState::Created);

        order.set_perfect(true);
        factory.submit(&mut order).expect("valid order");
        let maze = factory.wait_till_delivered(&mut order).expect("maze");
        assert!(maze.is_perfect());
    }

    #[test]
    fn random_seed_is_recorded() {
        let factory = Factory::new();
        let mut order = Order::new();
        order.set_skill_level(0);
        order.set_builder(BuilderKind::DepthFirstSearch);
        factory.submit(&mut order).expect("valid order");
        let maze = factory.wait_till_delivered(&mut order).expect("maze");
        assert_eq!(order.state(), OrderState::Delivered);
        assert_eq!(order.progress(), 100);

        let mut again = Order::new();
        again.set_skill_level(0);
        again.set_builder(BuilderKind::DepthFirstSearch);
        again.set_seed(maze.seed());
        factory.submit(&mut again).expect("valid order");
        let copy = factory.wait_till_delivered(&mut again).expect("maze");
        assert_eq!(maze.floorplan(), copy.floorplan());
    }
}
