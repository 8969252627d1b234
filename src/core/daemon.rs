//! Worker that drives the beacon from a periodic tick.
//!
//! The worker owns the beacon, so the stage machine can never be
//! re-entered. Protocol failures are logged and survive to the next tick;
//! the worker itself only stops on request.

use super::beacon::RandomBeacon;
use crate::chain::{ChainView, Stage};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, warn};

pub struct Daemon {
    beacon: RandomBeacon,
    chain: Arc<dyn ChainView + Send + Sync>,
    period: Duration,
}

impl Daemon {
    pub fn new(
        beacon: RandomBeacon,
        chain: Arc<dyn ChainView + Send + Sync>,
        period: Duration,
    ) -> Self {
        Self {
            beacon,
            chain,
            period,
        }
    }

    pub fn start(self) -> DaemonHandle {
        let (stop, stop_rx) = broadcast::channel(1);
        let task = tokio::spawn(self.run(stop_rx));
        DaemonHandle { stop, task }
    }

    async fn run(mut self, mut stop: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.period);
        loop {
            tokio::select! {
                _ = stop.recv() => break,
                _ = ticker.tick() => self.tick_once(),
            }
        }
    }

    fn tick_once(&mut self) {
        let (epoch_id, slot_id) = match self.chain.epoch_and_slot() {
            Ok(pair) => pair,
            Err(err) => {
                warn!(%err, "failed to read epoch and slot");
                return;
            }
        };

        if let Err(err) = self.beacon.tick(epoch_id, slot_id, self.chain.as_ref()) {
            if err.is_fatal() {
                error!(epoch_id, slot_id, %err, "beacon tick failed");
            } else {
                warn!(epoch_id, slot_id, %err, "beacon tick failed");
            }
        }

        // Aggregation is everyone's job once the signing window closed.
        if self.chain.stage_of(slot_id) == Stage::AfterSign {
            if let Err(err) = self.beacon.compute_random(epoch_id, self.chain.as_ref()) {
                warn!(epoch_id, %err, "compute random failed");
            }
        }
    }
}

pub struct DaemonHandle {
    stop: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl DaemonHandle {
    pub async fn stop(self) {
        let _ = self.stop.send(());
        let _ = self.task.await;
    }
}
