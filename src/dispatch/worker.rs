// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The delivery worker: one bridge request at a time.

use crate::protocol::LightSink;
use crate::queue::LightOperation;

use super::handoff::Accept;

/// Counts of what the worker did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// Operations the sink applied.
    pub delivered: usize,
    /// Operations the sink rejected.
    pub failed: usize,
}

/// Takes operations from the handoff and applies them to a [`LightSink`].
///
/// Failures are logged and forgotten: there is no retry, and the next
/// operation is accepted right away.
#[derive(Debug)]
pub struct DeliveryWorker<S> {
    sink: S,
}

impl<S: LightSink> DeliveryWorker<S> {
    /// Creates a worker delivering to `sink`.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Applies one operation. Returns true on success.
    pub async fn deliver(&self, op: &LightOperation) -> bool {
        tracing::info!(light = %op.light, update = %op.update, "Updating light");

        match self.sink.apply(&op.light, &op.update).await {
            Ok(()) => {
                tracing::debug!(light = %op.light, "Light updated");
                true
            }
            Err(e) => {
                tracing::warn!(light = %op.light, error = %e, "Light update failed");
                false
            }
        }
    }

    /// Runs until the producer side of the handoff is dropped.
    pub async fn run(self, accept: Accept<LightOperation>) -> DeliveryStats {
        let mut stats = DeliveryStats::default();

        while let Some(op) = accept.accept().await {
            if self.deliver(&op).await {
                stats.delivered += 1;
            } else {
                stats.failed += 1;
            }
        }

        tracing::debug!(
            delivered = stats.delivered,
            failed = stats.failed,
            "Delivery worker stopped"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::dispatch::handoff;
    use crate::error::ProtocolError;
    use crate::types::{LightId, LightUpdate};

    /// Fails every call for lights listed in `failing`.
    #[derive(Default)]
    struct FlakySink {
        failing: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl LightSink for FlakySink {
        async fn apply(&self, light: &LightId, _update: &LightUpdate) -> Result<(), ProtocolError> {
            self.calls.lock().unwrap().push(light.to_string());
            if self.failing.iter().any(|failing| *failing == light.as_str()) {
                return Err(ProtocolError::Status(503, "Service Unavailable".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn deliver_reports_sink_result() {
        let sink = FlakySink {
            failing: vec!["2"],
            ..FlakySink::default()
        };
        let worker = DeliveryWorker::new(&sink);
        let update = LightUpdate::new().with_power(true);

        assert!(worker.deliver(&LightOperation::new("1", update)).await);
        assert!(!worker.deliver(&LightOperation::new("2", update)).await);
    }

    #[tokio::test]
    async fn keeps_going_after_failures() {
        let sink = FlakySink {
            failing: vec!["1"],
            ..FlakySink::default()
        };
        let (mut offer, accept) = handoff::channel();

        let producer = async move {
            for light in ["1", "2", "1", "3"] {
                let slot = offer.ready().await.unwrap();
                slot.fill(LightOperation::new(light, LightUpdate::new().with_brightness(10)))
                    .unwrap();
            }
        };

        let ((), stats) = tokio::join!(producer, DeliveryWorker::new(&sink).run(accept));

        assert_eq!(stats, DeliveryStats { delivered: 2, failed: 2 });
        assert_eq!(*sink.calls.lock().unwrap(), ["1", "2", "1", "3"]);
    }

    #[tokio::test]
    async fn stops_when_offer_is_dropped() {
        let sink = FlakySink::default();
        let (offer, accept) = handoff::channel::<LightOperation>();
        drop(offer);

        let stats = DeliveryWorker::new(&sink).run(accept).await;
        assert_eq!(stats, DeliveryStats::default());
    }
}
