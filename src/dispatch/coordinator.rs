// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The coordinator: sole owner of the coalescing queue.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::event::InputEvent;
use crate::preset::{PresetTable, resolve};
use crate::queue::{CoalescingQueue, LightOperation};

use super::handoff::{Offer, Slot};

/// Resolves input events into the queue and feeds the delivery worker.
///
/// While the queue is empty the coordinator only waits for input. Once
/// something is pending it waits for input and for the worker at the same
/// time, and takes whichever is ready first. The head of the queue only
/// leaves the queue when the worker is actually waiting for it, so updates
/// arriving while a request is in flight still merge into it.
#[derive(Debug)]
pub struct Coordinator {
    presets: Arc<PresetTable>,
    queue: CoalescingQueue,
}

impl Coordinator {
    /// Creates a coordinator with an empty queue.
    #[must_use]
    pub fn new(presets: Arc<PresetTable>) -> Self {
        Self {
            presets,
            queue: CoalescingQueue::new(),
        }
    }

    /// Returns the pending operations.
    #[must_use]
    pub fn queue(&self) -> &CoalescingQueue {
        &self.queue
    }

    /// Resolves `event` and enqueues the resulting operations.
    ///
    /// Returns how many operations the event produced.
    pub fn handle_event(&mut self, event: InputEvent) -> usize {
        match event {
            InputEvent::NoteOn { note } => tracing::debug!(note, "Note on"),
            InputEvent::NoteOff { note } => tracing::debug!(note, "Note off"),
            InputEvent::Controller { param, value } => {
                tracing::debug!(param, value, "Controller event");
            }
        }

        let ops = resolve(&self.presets, event);
        let count = ops.len();
        for op in ops {
            self.queue.enqueue(op);
        }
        count
    }

    /// Runs until `events` is closed.
    ///
    /// Pending operations are then handed to the worker in order before
    /// returning. Returns early, dropping whatever is pending, if the worker
    /// goes away.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<InputEvent>,
        mut offer: Offer<LightOperation>,
    ) {
        loop {
            if self.queue.is_empty() {
                match events.recv().await {
                    Some(event) => {
                        self.handle_event(event);
                    }
                    None => break,
                }
                continue;
            }

            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle_event(event);
                    }
                    None => break,
                },
                slot = offer.ready() => {
                    if !self.hand_off_front(slot) {
                        return;
                    }
                }
            }
        }

        tracing::debug!(pending = self.queue.len(), "Input closed, flushing queue");
        while !self.queue.is_empty() {
            let slot = offer.ready().await;
            if !self.hand_off_front(slot) {
                return;
            }
        }
    }

    /// Moves the head of the queue into `slot`.
    ///
    /// Returns false when the worker is gone.
    fn hand_off_front(&mut self, slot: Option<Slot<LightOperation>>) -> bool {
        let Some(slot) = slot else {
            tracing::warn!(
                dropped = self.queue.len(),
                "Delivery worker stopped, dropping pending operations"
            );
            return false;
        };
        let Some(op) = self.queue.dequeue_front() else {
            return true;
        };
        if let Err(op) = slot.fill(op) {
            tracing::warn!(op = %op, "Delivery worker stopped before accepting operation");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handoff;
    use crate::types::LightUpdate;

    fn presets() -> Arc<PresetTable> {
        Arc::new(
            PresetTable::from_json(
                r#"{
                    "Controls": { "7": { "kitchen": ["bri"], "hall": ["sat"] } },
                    "notes": { "60": { "kitchen": { "on": true } } }
                }"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn handle_event_enqueues_resolved_operations() {
        let mut coordinator = Coordinator::new(presets());

        assert_eq!(coordinator.handle_event(InputEvent::NoteOn { note: 60 }), 1);
        assert_eq!(
            coordinator.handle_event(InputEvent::Controller {
                param: 7,
                value: 0
            }),
            2
        );

        let queue = coordinator.queue();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.front().unwrap().light.as_str(), "kitchen");
        assert_eq!(queue.get("kitchen"), Some(&LightUpdate::new().with_power(false)));
        assert_eq!(queue.get("hall"), Some(&LightUpdate::new().with_saturation(0)));
    }

    #[test]
    fn unmapped_events_leave_queue_untouched() {
        let mut coordinator = Coordinator::new(presets());

        assert_eq!(coordinator.handle_event(InputEvent::NoteOn { note: 1 }), 0);
        assert_eq!(coordinator.handle_event(InputEvent::NoteOff { note: 60 }), 0);
        assert!(coordinator.queue().is_empty());
    }

    #[tokio::test]
    async fn flushes_pending_operations_after_input_closes() {
        let (offer, accept) = handoff::channel();
        let (events_tx, events_rx) = mpsc::channel(4);
        events_tx.send(InputEvent::NoteOn { note: 60 }).await.unwrap();
        events_tx
            .send(InputEvent::Controller {
                param: 7,
                value: 64,
            })
            .await
            .unwrap();
        drop(events_tx);

        let coordinator = Coordinator::new(presets());
        let ((), delivered) = tokio::join!(coordinator.run(events_rx, offer), async {
            let mut delivered = Vec::new();
            while let Some(op) = accept.accept().await {
                delivered.push(op);
            }
            delivered
        });

        // The worker may or may not take the note before the controller
        // event is resolved, so kitchen is delivered once or twice.
        assert!(matches!(delivered.len(), 2 | 3));
        assert_eq!(delivered[0].light.as_str(), "kitchen");

        let last_kitchen = delivered
            .iter()
            .rev()
            .find(|op| op.light.as_str() == "kitchen")
            .unwrap();
        assert_eq!(
            last_kitchen.update,
            LightUpdate::new().with_power(true).with_brightness(128)
        );

        let hall = delivered.last().unwrap();
        assert_eq!(hall.light.as_str(), "hall");
        assert_eq!(hall.update, LightUpdate::new().with_saturation(128));
    }

    #[tokio::test]
    async fn stops_when_worker_is_gone() {
        let (offer, accept) = handoff::channel();
        drop(accept);
        let (events_tx, events_rx) = mpsc::channel(1);

        let coordinator = Coordinator::new(presets());
        let ((), ()) = tokio::join!(coordinator.run(events_rx, offer), async move {
            events_tx.send(InputEvent::NoteOn { note: 60 }).await.unwrap();
        });
    }
}
