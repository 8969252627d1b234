//! Threshold signing: reconstruct the group secret share, sign the epoch
//! message.

use super::config::BeaconConfig;
use super::BeaconError;
use crate::chain::ChainView;
use crate::curve::{scalar_from_be_bytes, G1Projective, Scalar};
use crate::key::Pair;
use crate::transport::SigPayload;

use tracing::{debug, warn};

/// Produces the partial signature of proposer `proposer_id` for `epoch_id`.
///
/// The node's group secret share is `sk⁻¹ · Σ_i enshare_i[proposer_id]`
/// over every dealer published so far; each summand decrypts to
/// `s_i(x_d)·g1` because the share was encrypted to this node's key. Deals
/// are consumed as published, tampering is caught downstream by the
/// aggregate pairing check.
pub fn do_sig(
    pair: &Pair,
    cfg: &BeaconConfig,
    epoch_id: u64,
    proposer_id: u32,
    chain: &dyn ChainView,
) -> Result<SigPayload, BeaconError> {
    let pks = chain.committee(epoch_id)?;
    if pks.is_empty() {
        return Err(BeaconError::EmptyCommittee(epoch_id));
    }

    let mut collected: Vec<G1Projective> = Vec::with_capacity(pks.len());
    for id in 0..pks.len() as u32 {
        match chain.dkg(epoch_id, id) {
            Some(deal) if deal.enshare.len() == pks.len() => {
                collected.push(deal.enshare[proposer_id as usize]);
            }
            Some(_) => warn!(epoch_id, dealer = id, "skipping malformed dkg payload"),
            None => debug!(epoch_id, dealer = id, "no dkg payload"),
        }
    }

    if collected.len() < cfg.min_proposers as usize {
        return Err(BeaconError::InsufficientDkg {
            collected: collected.len(),
            minimum: cfg.min_proposers as usize,
        });
    }

    let sk_inv: Scalar =
        Option::from(pair.private().invert()).ok_or(BeaconError::InvalidKey)?;
    let gskshare = collected
        .iter()
        .fold(G1Projective::identity(), |acc, enc| acc + enc)
        * sk_inv;

    let m = scalar_from_be_bytes(&chain.message(epoch_id)?);
    let gsigshare = gskshare * m;

    debug!(
        epoch_id,
        proposer_id,
        dealers = collected.len(),
        "partial signature built"
    );
    Ok(SigPayload {
        epoch_id,
        proposer_id,
        gsigshare,
    })
}
