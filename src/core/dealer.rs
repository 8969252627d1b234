//! PVSS dealing: one deal per owned proposer slot, per epoch.

use super::config::BeaconConfig;
use super::BeaconError;
use crate::chain::ChainView;
use crate::curve::{dleq, evaluation_point, poly::Poly, try_random_nonzero_scalar, Scalar};
use crate::transport::DkgPayload;

use rand::rngs::OsRng;
use tracing::debug;

/// Builds the deal of proposer `proposer_id` for `epoch_id`: a fresh
/// degree-`t` polynomial evaluated at every committee abscissa, each share
/// encrypted to its receiver, committed in G2 and proven well-formed.
pub fn generate_dkg(
    cfg: &BeaconConfig,
    epoch_id: u64,
    proposer_id: u32,
    chain: &dyn ChainView,
) -> Result<DkgPayload, BeaconError> {
    let pks = chain.committee(epoch_id)?;
    if pks.is_empty() {
        return Err(BeaconError::EmptyCommittee(epoch_id));
    }
    if pks.len() < cfg.threshold() {
        return Err(BeaconError::CommitteeBelowThreshold {
            committee: pks.len(),
            threshold: cfg.threshold(),
        });
    }

    let xs: Vec<Scalar> = pks
        .iter()
        .enumerate()
        .map(|(i, pk)| evaluation_point(pk, i as u32))
        .collect();

    let secret = try_random_nonzero_scalar(&mut OsRng)?;
    let poly = Poly::random(cfg.poly_degree, secret, &mut OsRng)?;

    let mut enshare = Vec::with_capacity(pks.len());
    let mut commit = Vec::with_capacity(pks.len());
    let mut proof = Vec::with_capacity(pks.len());
    for (pk, x) in pks.iter().zip(&xs) {
        let share = poly.eval(x);
        enshare.push(pk * share);
        commit.push(crate::curve::G2Projective::generator() * share);
        proof.push(dleq::prove(pk, &share, &mut OsRng)?);
    }

    debug!(epoch_id, proposer_id, committee = pks.len(), "dkg deal built");
    Ok(DkgPayload {
        epoch_id,
        proposer_id,
        enshare,
        commit,
        proof,
    })
}
