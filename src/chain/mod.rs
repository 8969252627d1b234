//! Capability interfaces the beacon core runs against.
//!
//! The chain is the database: committees, published payloads, the
//! per-epoch message and the random register are all read through
//! [`ChainView`], and everything the beacon emits goes out through
//! [`Submitter`] to reach chain state via block inclusion. The core never
//! writes chain state directly.

use crate::curve::G1Affine;
use crate::transport::{DkgPayload, SigPayload};

/// Protocol stage of a slot within an epoch. Ordered: stages only advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Dkg,
    Sign,
    AfterSign,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Stage::Dkg => f.write_str("dkg"),
            Stage::Sign => f.write_str("sign"),
            Stage::AfterSign => f.write_str("after_sign"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ChainViewError {
    #[error("chain view unavailable: {0}")]
    Unavailable(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// Read-only view of chain state, provided by the host.
pub trait ChainView {
    /// Ordered proposer committee for the epoch. May be empty.
    fn committee(&self, epoch: u64) -> Result<Vec<G1Affine>, ChainViewError>;

    /// Current epoch and slot numbers.
    fn epoch_and_slot(&self) -> Result<(u64, u64), ChainViewError>;

    /// Stage the given slot falls into.
    fn stage_of(&self, slot: u64) -> Stage;

    /// Published DKG payload of proposer `proposer` in `epoch`, if any.
    fn dkg(&self, epoch: u64, proposer: u32) -> Option<DkgPayload>;

    /// Published signature payload of proposer `proposer` in `epoch`, if any.
    fn sig(&self, epoch: u64, proposer: u32) -> Option<SigPayload>;

    /// The message all signers of `epoch` sign.
    fn message(&self, epoch: u64) -> Result<Vec<u8>, ChainViewError>;

    /// Random register value for `epoch`, if set.
    fn random(&self, epoch: u64) -> Option<[u8; 32]>;
}

/// Outbound submission hook. Blocking; retries are the caller's business.
pub trait Submitter {
    fn submit(&self, payload: &[u8]) -> Result<(), SubmitError>;
}
