/*
order.rs

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

//! Maze requests.
//!
//! The caller creates an [`Order`], sets its parameters, and submits it to a
//! [`crate::factory::Factory`]. The factory worker reports progress and delivers the result
//! through a [`Delivery`] handle, which is the worker side of the order:
//!
//! * the state and progress are shared atomics, readable by the caller at any time
//! * the result goes through a single-use channel, so the waiter is released exactly once
//!
//! An order goes through `Created`, `Submitted`, `Building`, and then `Delivered` or `Failed`.
//! It cannot be submitted again.

use async_channel::{Receiver, Sender};
use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use strum_macros::FromRepr;

use crate::errors::{ConfigurationError, MazeError};
use crate::generator::builder::BuilderKind;
use crate::maze::Maze;

/// Order life cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum OrderState {
    Created,
    Submitted,
    Building,
    Delivered,

    /// The build was aborted, or the worker stopped.
    Failed,
}

/// State and progress shared between the order and the factory worker.
#[derive(Debug)]
struct OrderStatus {
    state: AtomicU8,
    progress: AtomicU8,
}

impl OrderStatus {
    fn new() -> Self {
        Self {
            state: AtomicU8::new(OrderState::Created as u8),
            progress: AtomicU8::new(0),
        }
    }

    fn state(&self) -> OrderState {
        OrderState::from_repr(self.state.load(Ordering::Acquire)).unwrap_or(OrderState::Failed)
    }

    fn set_state(&self, state: OrderState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn progress(&self) -> u8 {
        self.progress.load(Ordering::Relaxed)
    }

    fn update_progress(&self, percent: u8) {
        self.progress.fetch_max(percent.min(100), Ordering::Relaxed);
    }
}

type Outcome = Result<Maze, MazeError>;

/// A request for a maze.
#[derive(Debug)]
pub struct Order {
    skill_level: Option<u8>,
    builder: Option<BuilderKind>,
    perfect: bool,

    /// Fixed seed. Without it, the factory draws a fresh seed.
    seed: Option<u64>,

    status: Arc<OrderStatus>,

    /// Receiving side of the delivery channel, set on submission.
    delivery: Option<Receiver<Outcome>>,

    /// Result received by the first wait.
    outcome: Option<Result<Arc<Maze>, MazeError>>,
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

impl Order {
    /// Create an empty order: no skill level, no builder, non-perfect maze, random seed.
    pub fn new() -> Self {
        Self {
            skill_level: None,
            builder: None,
            perfect: false,
            seed: None,
            status: Arc::new(OrderStatus::new()),
            delivery: None,
            outcome: None,
        }
    }

    pub fn set_skill_level(&mut self, level: u8) {
        self.skill_level = Some(level);
    }

    pub fn set_builder(&mut self, builder: BuilderKind) {
        self.builder = Some(builder);
    }

    /// A perfect maze has no rooms and exactly one path between any two cells.
    pub fn set_perfect(&mut self, perfect: bool) {
        self.perfect = perfect;
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    pub fn skill_level(&self) -> Option<u8> {
        self.skill_level
    }

    pub fn builder(&self) -> Option<BuilderKind> {
        self.builder
    }

    pub fn is_perfect(&self) -> bool {
        self.perfect
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Current state.
    ///
    /// The worker sets `Delivered` or `Failed` just before it hands the result over, so the
    /// state can change before [`Order::maze`] returns anything. The maze itself is only
    /// attached to the order by [`Order::wait_till_delivered`].
    pub fn state(&self) -> OrderState {
        self.status.state()
    }

    /// Build progress, from 0 to 100. Advisory only.
    pub fn progress(&self) -> u8 {
        self.status.progress()
    }

    /// Delivered maze, once [`Order::wait_till_delivered`] has returned it.
    pub fn maze(&self) -> Option<Arc<Maze>> {
        match &self.outcome {
            Some(Ok(maze)) => Some(Arc::clone(maze)),
            _ => None,
        }
    }

    /// Mark the order as submitted and return the worker side of it.
    pub(crate) fn accept(&mut self) -> Result<Delivery, ConfigurationError> {
        if self.state() != OrderState::Created {
            return Err(ConfigurationError::AlreadySubmitted);
        }
        let (sender, receiver) = async_channel::bounded::<Outcome>(1);
        self.delivery = Some(receiver);
        self.status.set_state(OrderState::Submitted);
        Ok(Delivery {
            status: Arc::clone(&self.status),
            sender,
        })
    }

    /// Block until the maze is delivered, and return it.
    ///
    /// Waiting again returns the same result without blocking.
    ///
    /// # Errors
    ///
    /// The method returns [`MazeError::Invariant`] if the build was aborted,
    /// [`MazeError::WorkerLost`] if the worker stopped without delivering, and
    /// [`ConfigurationError::NotSubmitted`] if the order was never submitted.
    pub fn wait_till_delivered(&mut self) -> Result<Arc<Maze>, MazeError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        let Some(receiver) = self.delivery.take() else {
            return Err(ConfigurationError::NotSubmitted.into());
        };

        let outcome: Result<Arc<Maze>, MazeError> = match receiver.recv_blocking() {
            Ok(result) => result.map(Arc::new),
            Err(_) => {
                self.status.set_state(OrderState::Failed);
                Err(MazeError::WorkerLost)
            }
        };
        self.outcome = Some(outcome.clone());
        outcome
    }
}

/// Worker side of a submitted order.
#[derive(Debug)]
pub(crate) struct Delivery {
    status: Arc<OrderStatus>,
    sender: Sender<Outcome>,
}

impl Delivery {
    pub(crate) fn start(&self) {
        self.status.set_state(OrderState::Building);
    }

    pub(crate) fn update_progress(&self, percent: u8) {
        self.status.update_progress(percent);
    }

    /// Set the final state, then hand the result over and release the waiter.
    ///
    /// The state is set first so that a returned wait always sees `Delivered` or `Failed`.
    pub(crate) fn deliver(self, result: Outcome) {
        match &result {
            Ok(_) => {
                self.status.update_progress(100);
                self.status.set_state(OrderState::Delivered);
            }
            Err(_) => self.status.set_state(OrderState::Failed),
        }
        if self.sender.send_blocking(result).is_err() {
            debug!("Order dropped before delivery");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let order = Order::default();
        assert_eq!(order.state(), OrderState::Created);
        assert_eq!(order.progress(), 0);
        assert!(!order.is_perfect());
        assert!(order.seed().is_none());
        assert!(order.maze().is_none());
    }

    #[test]
    fn single_use() {
        let mut order = Order::new();
        let delivery = order.accept().expect("first submission");
        assert_eq!(order.state(), OrderState::Submitted);
        assert_eq!(order.accept().err(), Some(ConfigurationError::AlreadySubmitted));
        drop(delivery);
    }

    #[test]
    fn progress_never_decreases() {
        let mut order = Order::new();
        let delivery = order.accept().expect("submission");
        delivery.start();
        assert_eq!(order.state(), OrderState::Building);
        delivery.update_progress(40);
        delivery.update_progress(20);
        assert_eq!(order.progress(), 40);
        delivery.update_progress(250);
        assert_eq!(order.progress(), 100);
    }

    #[test]
    fn waiting_without_submission_fails() {
        let mut order = Order::new();
        assert_eq!(
            order.wait_till_delivered().err(),
            Some(MazeError::Configuration(ConfigurationError::NotSubmitted))
        );
    }

    #[test]
    fn lost_worker_releases_the_waiter() {
        let mut order = Order::new();
        let delivery = order.accept().expect("submission");
        drop(delivery);
        assert_eq!(order.wait_till_delivered().err(), Some(MazeError::WorkerLost));
        assert_eq!(order.state(), OrderState::Failed);
    }

    #[test]
    fn maze_is_attached_by_the_wait() {
        use crate::config::SkillRow;
        use crate::generator::maze_builder::{BuildRequest, MazeBuilder};

        let report = |_: u8| {};
        let request = BuildRequest {
            skill_level: 0,
            row: SkillRow {
                width: 5,
                height: 5,
                max_rooms: 0,
            },
            builder: BuilderKind::Prim,
            perfect: true,
            seed: 1,
        };
        let maze: Maze = MazeBuilder::new(request, &report)
            .build()
            .expect("perfect maze");

        let mut order = Order::new();
        let delivery = order.accept().expect("submission");
        delivery.deliver(Ok(maze.clone()));
        assert_eq!(order.state(), OrderState::Delivered);
        assert_eq!(order.progress(), 100);
        assert!(order.maze().is_none());

        let delivered = order.wait_till_delivered().expect("maze");
        assert_eq!(*delivered, maze);
        assert!(order.maze().is_some_and(|m| Arc::ptr_eq(&m, &delivered)));
    }

    #[test]
    fn failed_build_is_reported() {
        let mut order = Order::new();
        let delivery = order.accept().expect("submission");
        delivery.deliver(Err(MazeError::Invariant(
            crate::errors::InvariantViolation::MissingExit,
        )));
        assert_eq!(order.state(), OrderState::Failed);
        assert!(matches!(
            order.wait_till_delivered(),
            Err(MazeError::Invariant(_))
        ));
        assert!(order.maze().is_none());
    }
}
