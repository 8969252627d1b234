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

use crate::curve::{try_random_nonzero_scalar, G1Affine, G1Projective, Scalar};
use group::Curve;
use rand::rngs::OsRng;

/// Long-lived node keypair: a nonzero scalar and its G1 public point.
///
/// The private scalar never leaves process memory except through the
/// file store; the public point is what committees are made of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pair {
    private: Scalar,
    public: G1Affine,
}

impl Pair {
    pub fn generate() -> Result<Self, rand::Error> {
        let private = try_random_nonzero_scalar(&mut OsRng)?;
        Ok(Self::from_private(private))
    }

    pub fn from_private(private: Scalar) -> Self {
        let public = (G1Projective::generator() * private).to_affine();
        Self { private, public }
    }

    pub fn private(&self) -> &Scalar {
        &self.private
    }

    pub fn public(&self) -> &G1Affine {
        &self.public
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Public key: {}", hex::encode(self.public.to_compressed()))
    }
}
