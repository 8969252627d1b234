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

//! Non-interactive Chaum-Pedersen proof of discrete-log equality.
//!
//! A dealer proves that an encrypted share `enshare = s·A` (base `A`, the
//! receiver key) and the commitment `commit = s·g2` embed the same scalar
//! `s`, without revealing it. The proof commits to `s` under the binding
//! base [`h`](super::h_base) in G1; since `s·h` itself is never published,
//! the verifier lifts the second relation into Gt through the pairing and
//! checks it against `commit` directly.

use super::{
    h_base, pairing, scalar_from_hash, try_random_scalar, G1Affine, G1Projective, G2Affine,
    G2Projective, Scalar,
};
use group::Curve;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Proof transcript `(a1, a2, z)` with `a1 = r·A`, `a2 = r·h`, `z = r + c·s`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DleqProof {
    pub a1: G1Projective,
    pub a2: G1Projective,
    pub z: Scalar,
}

/// Fiat-Shamir challenge `c = SHA-256(A || h || a1 || a2) mod q`.
fn challenge(base: &G1Affine, a1: &G1Projective, a2: &G1Projective) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(base.to_compressed());
    hasher.update(h_base().to_affine().to_compressed());
    hasher.update(a1.to_affine().to_compressed());
    hasher.update(a2.to_affine().to_compressed());
    scalar_from_hash(hasher.finalize().into())
}

/// Proves that the discrete logs of `s·base` and `s·h` are equal to `s`.
pub fn prove<R: RngCore>(
    base: &G1Affine,
    secret: &Scalar,
    rng: &mut R,
) -> Result<DleqProof, rand::Error> {
    let r = try_random_scalar(rng)?;
    let a1 = base * r;
    let a2 = h_base() * r;
    let c = challenge(base, &a1, &a2);
    Ok(DleqProof {
        a1,
        a2,
        z: r + c * secret,
    })
}

/// Verifies a dealer's proof against its published share and commitment.
///
/// Checks `z·A == a1 + c·enshare` in G1 and the pairing image of
/// `z·h == a2 + c·(s·h)` in Gt, with `s·h` substituted by `commit` through
/// `e(h, commit) = e(s·h, g2)`.
pub fn verify(
    base: &G1Affine,
    enshare: &G1Projective,
    commit: &G2Projective,
    proof: &DleqProof,
) -> bool {
    let c = challenge(base, &proof.a1, &proof.a2);

    if base * proof.z != proof.a1 + enshare * c {
        return false;
    }

    let h = h_base().to_affine();
    let g2 = G2Affine::generator();
    let lhs = pairing(&(h_base() * proof.z).to_affine(), &g2);
    let rhs = pairing(&proof.a2.to_affine(), &g2) + pairing(&h, &commit.to_affine()) * c;
    lhs == rhs
}
