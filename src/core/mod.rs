pub mod aggregate;
pub mod beacon;
pub mod config;
pub mod daemon;
pub mod dealer;
pub mod signer;

use crate::chain::{ChainViewError, SubmitError};
use crate::core::config::ConfigError;
use crate::curve::poly::PolyError;
use crate::transport::WireError;

/// Everything a tick or a compute-random call can fail with.
///
/// Only quorum-miss on the signing side is not represented here: the
/// aggregator answers it with the fallback random and succeeds.
#[derive(thiserror::Error, Debug)]
pub enum BeaconError {
    #[error("chain rollback: tick epoch {tick} behind current epoch {current}")]
    Rollback { tick: u64, current: u64 },
    #[error("empty proposer committee for epoch {0}")]
    EmptyCommittee(u64),
    #[error("committee of {committee} cannot satisfy threshold {threshold}")]
    CommitteeBelowThreshold { committee: usize, threshold: usize },
    #[error("system rng failure: {0}")]
    Rng(#[from] rand::Error),
    #[error("collected {collected} dkg payloads, minimum is {minimum}")]
    InsufficientDkg { collected: usize, minimum: usize },
    #[error("node private key is not invertible")]
    InvalidKey,
    #[error("aggregate signature failed the pairing check for epoch {0}")]
    PairingCheckFailed(u64),
    #[error("previous random missing for epoch {0}")]
    MissingPreviousRandom(u64),
    #[error("chain view: {0}")]
    ChainView(#[from] ChainViewError),
    #[error("submit: {0}")]
    Submit(#[from] SubmitError),
    #[error("wire encoding: {0}")]
    Encoding(#[from] WireError),
    #[error("interpolation: {0}")]
    Poly(#[from] PolyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BeaconError {
    /// Rollback means the chain view went backwards underneath us; every
    /// other kind is retryable on a later tick.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BeaconError::Rollback { .. })
    }
}
