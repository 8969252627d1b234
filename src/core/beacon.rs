//! The beacon handle and its per-epoch stage machine.

use super::config::BeaconConfig;
use super::{aggregate, dealer, signer, BeaconError};
use crate::chain::{ChainView, Stage, Submitter};
use crate::key::Pair;
use crate::transport::BeaconMsg;

use std::sync::Arc;
use tracing::{debug, info};

/// A node's random-beacon instance.
///
/// Constructed once by the host and driven by an external ticker; there is
/// no process-wide instance. The chain view is handed in per call, the
/// submit hook is held for the lifetime of the handle. `tick` must not be
/// re-entered; owning the handle mutably is what enforces that.
pub struct RandomBeacon {
    pair: Pair,
    cfg: BeaconConfig,
    submit: Arc<dyn Submitter + Send + Sync>,
    epoch: Option<u64>,
    stage: Stage,
}

impl RandomBeacon {
    pub fn new(
        pair: Pair,
        cfg: BeaconConfig,
        submit: Arc<dyn Submitter + Send + Sync>,
    ) -> Result<Self, BeaconError> {
        Ok(Self {
            pair,
            cfg: cfg.validated()?,
            submit,
            epoch: None,
            stage: Stage::Dkg,
        })
    }

    pub fn epoch(&self) -> Option<u64> {
        self.epoch
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// One blocking pass of the stage machine for the observed
    /// `(epoch_id, slot_id)`.
    ///
    /// A new epoch resets the machine to the DKG stage; a backwards epoch
    /// is a rollback and leaves the state untouched. Within the epoch the
    /// machine advances `DKG → SIGN → AFTER_SIGN`, dealing and signing for
    /// every committee slot this node owns, in ascending slot order. A
    /// missed DKG window still advances (the deal opportunity is gone); a
    /// missed SIGN window advances without signing.
    pub fn tick(
        &mut self,
        epoch_id: u64,
        slot_id: u64,
        chain: &dyn ChainView,
    ) -> Result<(), BeaconError> {
        match self.epoch {
            Some(current) if epoch_id < current => {
                return Err(BeaconError::Rollback {
                    tick: epoch_id,
                    current,
                });
            }
            Some(current) if epoch_id > current => {
                info!(epoch_id, "new epoch observed");
                self.epoch = Some(epoch_id);
                self.stage = Stage::Dkg;
            }
            None => {
                info!(epoch_id, "first epoch observed");
                self.epoch = Some(epoch_id);
                self.stage = Stage::Dkg;
            }
            _ => {}
        }

        let owned = self.owned_proposer_ids(epoch_id, chain)?;
        if owned.is_empty() {
            debug!(epoch_id, "not in the proposer committee");
            return Ok(());
        }

        let slot_stage = chain.stage_of(slot_id);
        debug!(epoch_id, slot_id, %slot_stage, owned = owned.len(), "tick");

        loop {
            match self.stage {
                Stage::Dkg => {
                    if slot_stage == Stage::Dkg {
                        self.do_dkgs(epoch_id, &owned, chain)?;
                    }
                    self.stage = Stage::Sign;
                }
                Stage::Sign => {
                    if slot_stage < Stage::Sign {
                        return Ok(());
                    }
                    if slot_stage == Stage::Sign {
                        self.do_sigs(epoch_id, &owned, chain)?;
                    }
                    self.stage = Stage::AfterSign;
                }
                Stage::AfterSign => return Ok(()),
            }
        }
    }

    /// Aggregates and publishes the random for `epoch_id`; any node may
    /// call this once enough signatures are on chain. Idempotent.
    pub fn compute_random(
        &self,
        epoch_id: u64,
        chain: &dyn ChainView,
    ) -> Result<(), BeaconError> {
        aggregate::compute_random(&self.cfg, epoch_id, chain, self.submit.as_ref())
    }

    /// Committee positions whose key equals this node's key. A node may
    /// own zero, one or several slots.
    fn owned_proposer_ids(
        &self,
        epoch_id: u64,
        chain: &dyn ChainView,
    ) -> Result<Vec<u32>, BeaconError> {
        let pks = chain.committee(epoch_id)?;
        Ok(pks
            .iter()
            .enumerate()
            .filter(|(_, pk)| *pk == self.pair.public())
            .map(|(i, _)| i as u32)
            .collect())
    }

    fn do_dkgs(
        &self,
        epoch_id: u64,
        owned: &[u32],
        chain: &dyn ChainView,
    ) -> Result<(), BeaconError> {
        for &proposer_id in owned {
            let payload = dealer::generate_dkg(&self.cfg, epoch_id, proposer_id, chain)?;
            let len = self.submit_msg(BeaconMsg::Dkg(payload))?;
            info!(epoch_id, proposer_id, len, "dkg deal submitted");
        }
        Ok(())
    }

    fn do_sigs(
        &self,
        epoch_id: u64,
        owned: &[u32],
        chain: &dyn ChainView,
    ) -> Result<(), BeaconError> {
        for &proposer_id in owned {
            let payload = signer::do_sig(&self.pair, &self.cfg, epoch_id, proposer_id, chain)?;
            let len = self.submit_msg(BeaconMsg::Sig(payload))?;
            info!(epoch_id, proposer_id, len, "partial signature submitted");
        }
        Ok(())
    }

    /// Returns the submitted byte length for the caller's log record.
    fn submit_msg(&self, msg: BeaconMsg) -> Result<usize, BeaconError> {
        let bytes = msg.encode();
        self.submit.submit(&bytes)?;
        Ok(bytes.len())
    }
}
