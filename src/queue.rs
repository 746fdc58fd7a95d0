// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coalescing queue of pending light operations.
//!
//! A fader sweep can emit far more controller events per second than the
//! bridge should receive requests. The queue holds at most one operation
//! per light: a new operation for a light that is already waiting is merged
//! field by field into the waiting one, which keeps its position. Only the
//! most recent value of each field is ever delivered.
//!
//! # Examples
//!
//! ```
//! use humid::queue::{CoalescingQueue, Enqueued, LightOperation};
//! use humid::types::LightUpdate;
//!
//! let mut queue = CoalescingQueue::new();
//! queue.enqueue(LightOperation::new("1", LightUpdate::new().with_power(true)));
//! queue.enqueue(LightOperation::new("2", LightUpdate::new().with_power(true)));
//! let outcome = queue.enqueue(LightOperation::new("1", LightUpdate::new().with_brightness(50)));
//!
//! assert_eq!(outcome, Enqueued::Merged);
//! assert_eq!(queue.len(), 2);
//!
//! let head = queue.dequeue_front().unwrap();
//! assert_eq!(head.light.as_str(), "1");
//! assert_eq!(head.update, LightUpdate::new().with_power(true).with_brightness(50));
//! ```

use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::types::{LightId, LightUpdate};

/// A pending update for one light.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightOperation {
    /// Target light.
    pub light: LightId,
    /// Fields to change.
    pub update: LightUpdate,
}

impl LightOperation {
    /// Creates an operation.
    #[must_use]
    pub fn new(light: impl Into<LightId>, update: LightUpdate) -> Self {
        Self {
            light: light.into(),
            update,
        }
    }
}

impl fmt::Display for LightOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "light {} <- {}", self.light, self.update)
    }
}

/// How [`CoalescingQueue::enqueue`] stored an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// The light had no pending operation; appended at the tail.
    Appended,
    /// Merged into the light's pending operation.
    Merged,
}

/// Ordered queue with at most one operation per light.
///
/// Entries live in a `VecDeque` in first-enqueued order. A side index maps
/// each light to the absolute sequence number of its entry, so lookups do
/// not scan. Sequence numbers only grow; the entry position is its sequence
/// number minus the number of entries popped so far.
#[derive(Debug, Default)]
pub struct CoalescingQueue {
    entries: VecDeque<LightOperation>,
    index: HashMap<LightId, usize>,
    popped: usize,
}

impl CoalescingQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `op`, merging it into the pending operation for the same light.
    ///
    /// Fields present in `op.update` overwrite the pending ones, absent
    /// fields keep their pending value. A merged entry keeps its position.
    pub fn enqueue(&mut self, op: LightOperation) -> Enqueued {
        if let Some(&seq) = self.index.get(&op.light) {
            let pending = &mut self.entries[seq - self.popped];
            tracing::debug!(pending = %pending, newer = %op.update, "Merging into pending operation");
            pending.update.merge(&op.update);
            tracing::debug!(result = %pending, "Merged");
            return Enqueued::Merged;
        }

        tracing::debug!(op = %op, "Enqueuing operation");
        self.index
            .insert(op.light.clone(), self.popped + self.entries.len());
        self.entries.push_back(op);
        Enqueued::Appended
    }

    /// Removes and returns the oldest pending operation.
    ///
    /// Returns `None` when the queue is empty.
    pub fn dequeue_front(&mut self) -> Option<LightOperation> {
        let op = self.entries.pop_front()?;
        self.index.remove(&op.light);
        self.popped += 1;
        Some(op)
    }

    /// Returns the oldest pending operation without removing it.
    #[must_use]
    pub fn front(&self) -> Option<&LightOperation> {
        self.entries.front()
    }

    /// Returns the pending update for `light`, if any.
    #[must_use]
    pub fn get(&self, light: &str) -> Option<&LightUpdate> {
        self.index
            .get(light)
            .map(|&seq| &self.entries[seq - self.popped].update)
    }

    /// Returns the number of pending operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates pending operations from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LightOperation> {
        self.entries.iter()
    }
}
