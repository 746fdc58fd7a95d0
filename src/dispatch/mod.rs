// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The dispatch loop.
//!
//! Two actors cooperate:
//!
//! - [`Coordinator`]: owns the [`CoalescingQueue`](crate::queue::CoalescingQueue),
//!   resolves input events into it and offers its head to the worker.
//! - [`DeliveryWorker`]: applies one operation at a time to a
//!   [`LightSink`].
//!
//! They are connected by a rendezvous [`handoff`]: an operation leaves the
//! queue only when the worker is idle and asking for it, which is the only
//! backpressure in the system. A slow bridge therefore makes updates merge
//! in the queue instead of piling up.

pub mod handoff;

mod coordinator;
mod worker;

pub use coordinator::Coordinator;
pub use worker::{DeliveryStats, DeliveryWorker};

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::event::InputEvent;
use crate::preset::PresetTable;
use crate::protocol::LightSink;

/// Capacity of the input event channel.
///
/// Kept at one so that producers hand events over one by one, as close to a
/// rendezvous as a tokio `mpsc` channel gets.
pub const EVENT_CHANNEL_CAPACITY: usize = 1;

/// Creates the channel input sources send events on.
#[must_use]
pub fn event_channel() -> (mpsc::Sender<InputEvent>, mpsc::Receiver<InputEvent>) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}

/// Wires a coordinator and a delivery worker together.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use humid::dispatch::{Dispatcher, event_channel};
/// use humid::preset::PresetTable;
/// use humid::protocol::BridgeConfig;
///
/// # async fn example() -> humid::Result<()> {
/// let presets = Arc::new(PresetTable::load("presets.json")?);
/// let client = BridgeConfig::new("192.168.1.3").into_client()?;
/// let (events_tx, events_rx) = event_channel();
///
/// let _input = humid::event::source::spawn_stdin_source(events_tx);
/// Dispatcher::new(presets, client).run(events_rx).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Dispatcher<S> {
    presets: Arc<PresetTable>,
    sink: S,
}

impl<S: LightSink> Dispatcher<S> {
    /// Creates a dispatcher resolving against `presets` and delivering to
    /// `sink`.
    #[must_use]
    pub fn new(presets: Arc<PresetTable>, sink: S) -> Self {
        Self { presets, sink }
    }

    /// Runs both actors concurrently until `events` is closed and every
    /// pending operation has been handed to the worker.
    pub async fn run(self, events: mpsc::Receiver<InputEvent>) -> DeliveryStats {
        let (offer, accept) = handoff::channel();
        let coordinator = Coordinator::new(self.presets);
        let worker = DeliveryWorker::new(self.sink);

        let ((), stats) = tokio::join!(coordinator.run(events, offer), worker.run(accept));
        stats
    }
}
