// Copyright (C) 2023-2024 StorSwift Inc.
// This file is part of the Randbeacon library.

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at:
// http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Aggregation, pairing verification and publication of the epoch random.

use super::config::BeaconConfig;
use super::BeaconError;
use crate::chain::{ChainView, Submitter};
use crate::curve::poly::{lagrange_g1, lagrange_g2};
use crate::curve::{
    dleq, evaluation_point, pairing, scalar_from_be_bytes, G1Projective, G2Affine, G2Projective,
    Scalar,
};
use crate::transport::{BeaconMsg, DkgPayload, RandomPayload, SigPayload};

use group::Curve;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// Tag prefixes keep a genuine beacon output and a fallback hash chain in
/// disjoint hash domains.
const OUTPUT_TAG: u8 = 0x01;
const FALLBACK_TAG: u8 = 0x00;

/// `R[e+1]` from a verified aggregate signature.
pub fn beacon_output(gsig: &G1Projective) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([OUTPUT_TAG]);
    hasher.update(gsig.to_affine().to_compressed());
    hasher.finalize().into()
}

/// `R[e+1]` when the signing quorum was missed: hash of the previous random.
pub fn fallback_output(prev: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([FALLBACK_TAG]);
    hasher.update(prev);
    hasher.finalize().into()
}

/// Aggregates published partial signatures for `epoch_id`, verifies the
/// result against the dealers' commitments via the pairing equation, and
/// publishes `R[e+1]`. Idempotent: once the register is set the call is a
/// no-op. Below `min_proposers` signatures the deterministic fallback is
/// published instead.
pub fn compute_random(
    cfg: &BeaconConfig,
    epoch_id: u64,
    chain: &dyn ChainView,
    submit: &dyn Submitter,
) -> Result<(), BeaconError> {
    if let Some(existing) = chain.random(epoch_id + 1) {
        if existing != [0u8; 32] {
            debug!(epoch_id, "random already published");
            return Ok(());
        }
    }

    let pks = chain.committee(epoch_id)?;
    if pks.is_empty() {
        return Err(BeaconError::EmptyCommittee(epoch_id));
    }
    let n = pks.len();

    // Dealers count only with a fully well-formed deal: right shape and
    // every share proven consistent with its commitment.
    let mut deals: Vec<DkgPayload> = Vec::with_capacity(n);
    for id in 0..n as u32 {
        let Some(deal) = chain.dkg(epoch_id, id) else {
            continue;
        };
        if deal.epoch_id != epoch_id
            || deal.proposer_id != id
            || deal.enshare.len() != n
            || deal.commit.len() != n
            || deal.proof.len() != n
        {
            warn!(epoch_id, dealer = id, "skipping malformed dkg payload");
            continue;
        }
        let proven = pks
            .iter()
            .enumerate()
            .all(|(j, pk)| dleq::verify(pk, &deal.enshare[j], &deal.commit[j], &deal.proof[j]));
        if !proven {
            warn!(epoch_id, dealer = id, "skipping dkg payload with bad dleq proof");
            continue;
        }
        deals.push(deal);
    }

    let mut sigs: Vec<(SigPayload, u32)> = Vec::with_capacity(n);
    for id in 0..n as u32 {
        if let Some(sig) = chain.sig(epoch_id, id) {
            if sig.epoch_id != epoch_id || sig.proposer_id != id {
                warn!(epoch_id, signer = id, "skipping malformed sig payload");
                continue;
            }
            sigs.push((sig, id));
        }
    }
    debug!(
        epoch_id,
        dkg_count = deals.len(),
        sig_count = sigs.len(),
        "collected beacon payloads"
    );

    if sigs.len() < cfg.min_proposers as usize {
        warn!(
            epoch_id,
            collected = sigs.len(),
            minimum = cfg.min_proposers,
            "signing quorum missed, falling back"
        );
        let prev = chain
            .random(epoch_id)
            .ok_or(BeaconError::MissingPreviousRandom(epoch_id))?;
        let random = fallback_output(&prev);
        publish(epoch_id, random, submit)?;
        return Ok(());
    }

    // First t+1 signatures in ascending proposer order; the tie-break is
    // protocol, every node must reconstruct from the same subset.
    let threshold = cfg.threshold();
    let shares: Vec<G1Projective> = sigs[..threshold]
        .iter()
        .map(|(sig, _)| sig.gsigshare)
        .collect();
    let x_sig: Vec<Scalar> = sigs[..threshold]
        .iter()
        .map(|(_, id)| evaluation_point(&pks[*id as usize], *id))
        .collect();
    let gsig = lagrange_g1(&shares, &x_sig)?;
    let random = beacon_output(&gsig);

    // Group public key: per-index commitment sums interpolated in G2.
    let commit_sums: Vec<G2Projective> = (0..n)
        .map(|i| {
            deals
                .iter()
                .fold(G2Projective::identity(), |acc, deal| acc + deal.commit[i])
        })
        .collect();
    let x_all: Vec<Scalar> = pks
        .iter()
        .enumerate()
        .map(|(i, pk)| evaluation_point(pk, i as u32))
        .collect();
    let gpub = lagrange_g2(&commit_sums[..threshold], &x_all[..threshold])?;

    let m = scalar_from_be_bytes(&chain.message(epoch_id)?);
    let mg = G1Projective::generator() * m;

    let lhs = pairing(&gsig.to_affine(), &G2Affine::generator());
    let rhs = pairing(&mg.to_affine(), &gpub.to_affine());
    if lhs != rhs {
        return Err(BeaconError::PairingCheckFailed(epoch_id));
    }

    publish(epoch_id, random, submit)?;
    Ok(())
}

fn publish(epoch_id: u64, random: [u8; 32], submit: &dyn Submitter) -> Result<(), BeaconError> {
    let msg = BeaconMsg::Random(RandomPayload {
        epoch_id: epoch_id + 1,
        random,
    });
    let bytes = msg.encode();
    submit.submit(&bytes)?;
    info!(
        epoch_id = epoch_id + 1,
        random = %hex::encode(random),
        len = bytes.len(),
        "epoch random published"
    );
    Ok(())
}
