// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rendezvous handoff of one value at a time from producer to consumer.
//!
//! Unlike a bounded channel, nothing is buffered: the consumer announces
//! that it is waiting by sending a one-shot reply slot, and the producer only
//! commits to a value once it holds such a slot. Until then the value stays
//! with the producer, where it can still be changed.

use tokio::sync::{mpsc, oneshot};

/// Creates a connected producer/consumer pair.
#[must_use]
pub fn channel<T>() -> (Offer<T>, Accept<T>) {
    let (tx, rx) = mpsc::channel(1);
    (Offer { requests: rx }, Accept { requests: tx })
}

/// Producer side of the handoff.
#[derive(Debug)]
pub struct Offer<T> {
    requests: mpsc::Receiver<oneshot::Sender<T>>,
}

/// Consumer side of the handoff.
#[derive(Debug)]
pub struct Accept<T> {
    requests: mpsc::Sender<oneshot::Sender<T>>,
}

/// Permission to hand exactly one value to a waiting consumer.
#[derive(Debug)]
pub struct Slot<T>(oneshot::Sender<T>);

impl<T> Offer<T> {
    /// Waits until the consumer is ready to take a value.
    ///
    /// Returns `None` once the consumer is gone. Cancel safe: dropping the
    /// future before it completes loses nothing, which makes it usable as a
    /// `tokio::select!` branch.
    pub async fn ready(&mut self) -> Option<Slot<T>> {
        self.requests.recv().await.map(Slot)
    }
}

impl<T> Slot<T> {
    /// Hands `value` to the consumer.
    ///
    /// # Errors
    ///
    /// Gives the value back if the consumer stopped waiting in the meantime.
    pub fn fill(self, value: T) -> Result<(), T> {
        self.0.send(value)
    }
}

impl<T> Accept<T> {
    /// Waits for the producer to hand over the next value.
    ///
    /// Returns `None` once the producer is gone.
    pub async fn accept(&self) -> Option<T> {
        let (tx, rx) = oneshot::channel();
        self.requests.send(tx).await.ok()?;
        rx.await.ok()
    }
}
