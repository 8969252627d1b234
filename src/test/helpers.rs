//! In-memory chain for protocol tests.
//!
//! The mock plays both capabilities: the read side serves committees,
//! payloads and the random register, and the submit side decodes every
//! submission and stores it back into chain state, closing the same loop
//! block inclusion would.

use crate::chain::{ChainView, ChainViewError, Stage, SubmitError, Submitter};
use crate::core::beacon::RandomBeacon;
use crate::core::config::BeaconConfig;
use crate::curve::G1Affine;
use crate::key::Pair;
use crate::transport::{BeaconMsg, DkgPayload, SigPayload, TAG_RANDOM};

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const DKG_SLOT: u64 = 0;
pub const SIGN_SLOT: u64 = 10;
pub const AFTER_SIGN_SLOT: u64 = 20;

#[derive(Default)]
struct ChainState {
    committees: HashMap<u64, Vec<G1Affine>>,
    dkgs: HashMap<(u64, u32), DkgPayload>,
    sigs: HashMap<(u64, u32), SigPayload>,
    randoms: HashMap<u64, [u8; 32]>,
    epoch: u64,
    slot: u64,
    submissions: Vec<Vec<u8>>,
}

#[derive(Default)]
pub struct MockChain {
    state: Mutex<ChainState>,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_committee(&self, epoch: u64, pks: Vec<G1Affine>) {
        self.state.lock().unwrap().committees.insert(epoch, pks);
    }

    pub fn seed_random(&self, epoch: u64, random: [u8; 32]) {
        self.state.lock().unwrap().randoms.insert(epoch, random);
    }

    pub fn set_epoch_slot(&self, epoch: u64, slot: u64) {
        let mut state = self.state.lock().unwrap();
        state.epoch = epoch;
        state.slot = slot;
    }

    pub fn tamper_dkg(&self, epoch: u64, dealer: u32, f: impl FnOnce(&mut DkgPayload)) {
        let mut state = self.state.lock().unwrap();
        f(state
            .dkgs
            .get_mut(&(epoch, dealer))
            .expect("dkg payload to tamper"))
    }

    pub fn dkg_count(&self, epoch: u64) -> usize {
        let state = self.state.lock().unwrap();
        state.dkgs.keys().filter(|(e, _)| *e == epoch).count()
    }

    pub fn sig_count(&self, epoch: u64) -> usize {
        let state = self.state.lock().unwrap();
        state.sigs.keys().filter(|(e, _)| *e == epoch).count()
    }

    pub fn random_submission_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state
            .submissions
            .iter()
            .filter(|bytes| bytes.first() == Some(&TAG_RANDOM))
            .count()
    }
}

impl ChainView for MockChain {
    fn committee(&self, epoch: u64) -> Result<Vec<G1Affine>, ChainViewError> {
        let state = self.state.lock().unwrap();
        Ok(state.committees.get(&epoch).cloned().unwrap_or_default())
    }

    fn epoch_and_slot(&self) -> Result<(u64, u64), ChainViewError> {
        let state = self.state.lock().unwrap();
        Ok((state.epoch, state.slot))
    }

    fn stage_of(&self, slot: u64) -> Stage {
        if slot < SIGN_SLOT {
            Stage::Dkg
        } else if slot < AFTER_SIGN_SLOT {
            Stage::Sign
        } else {
            Stage::AfterSign
        }
    }

    fn dkg(&self, epoch: u64, proposer: u32) -> Option<DkgPayload> {
        let state = self.state.lock().unwrap();
        state.dkgs.get(&(epoch, proposer)).cloned()
    }

    fn sig(&self, epoch: u64, proposer: u32) -> Option<SigPayload> {
        let state = self.state.lock().unwrap();
        state.sigs.get(&(epoch, proposer)).copied()
    }

    fn message(&self, epoch: u64) -> Result<Vec<u8>, ChainViewError> {
        let mut hasher = Sha256::new();
        hasher.update(b"epoch message");
        hasher.update(epoch.to_be_bytes());
        Ok(hasher.finalize().to_vec())
    }

    fn random(&self, epoch: u64) -> Option<[u8; 32]> {
        let state = self.state.lock().unwrap();
        state.randoms.get(&epoch).copied()
    }
}

impl Submitter for MockChain {
    fn submit(&self, payload: &[u8]) -> Result<(), SubmitError> {
        let msg = BeaconMsg::decode(payload)
            .map_err(|e| SubmitError::Rejected(e.to_string()))?;
        let mut state = self.state.lock().unwrap();
        state.submissions.push(payload.to_vec());
        match msg {
            BeaconMsg::Dkg(dkg) => {
                state.dkgs.insert((dkg.epoch_id, dkg.proposer_id), dkg);
            }
            BeaconMsg::Sig(sig) => {
                state.sigs.insert((sig.epoch_id, sig.proposer_id), sig);
            }
            BeaconMsg::Random(r) => {
                state.randoms.insert(r.epoch_id, r.random);
            }
        }
        Ok(())
    }
}

pub struct TestNet {
    pub chain: Arc<MockChain>,
    pub nodes: Vec<RandomBeacon>,
    pub pairs: Vec<Pair>,
}

/// Spins up `n` nodes sharing one mock chain, with the committee for
/// `epoch` being the nodes in order and `R[epoch]` pre-seeded.
pub fn testnet(n: usize, poly_degree: u32, min_proposers: u32, epoch: u64) -> TestNet {
    let cfg = BeaconConfig::new(poly_degree, min_proposers).unwrap();
    let chain = MockChain::new();

    let pairs: Vec<Pair> = (0..n).map(|_| Pair::generate().unwrap()).collect();
    let committee: Vec<G1Affine> = pairs.iter().map(|p| *p.public()).collect();
    chain.set_committee(epoch, committee);
    chain.seed_random(epoch, [1u8; 32]);

    let nodes = pairs
        .iter()
        .map(|pair| {
            RandomBeacon::new(
                pair.clone(),
                cfg,
                Arc::clone(&chain) as Arc<dyn Submitter + Send + Sync>,
            )
            .unwrap()
        })
        .collect();

    TestNet {
        chain,
        nodes,
        pairs,
    }
}

impl TestNet {
    /// Ticks every node through the DKG window of `epoch`.
    pub fn run_dkg(&mut self, epoch: u64) {
        for node in &mut self.nodes {
            node.tick(epoch, DKG_SLOT, self.chain.as_ref()).unwrap();
        }
    }

    /// Ticks the first `count` nodes through the SIGN window of `epoch`.
    pub fn run_sign(&mut self, epoch: u64, count: usize) {
        for node in self.nodes[..count].iter_mut() {
            node.tick(epoch, SIGN_SLOT, self.chain.as_ref()).unwrap();
        }
    }
}
