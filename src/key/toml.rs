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

//! TOML documents for the two key files, points and scalars hex-encoded.

use super::keys::Pair;
use crate::curve::{scalar_from_canonical_be, scalar_to_be_bytes, G1Affine};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum KeyTomlError {
    #[error("malformed key document: {0}")]
    Document(#[from] toml::de::Error),
    #[error("malformed hex field: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("field has wrong length")]
    FieldLength,
    #[error("value is not a canonical scalar")]
    InvalidScalar,
    #[error("value is not a canonical G1 point")]
    InvalidPoint,
    #[error("public point does not match the secret")]
    PairMismatch,
}

#[derive(Serialize, Deserialize)]
struct PrivateToml {
    secret: String,
}

#[derive(Serialize, Deserialize)]
struct PublicToml {
    public: String,
}

pub fn encode_private(pair: &Pair) -> String {
    let doc = PrivateToml {
        secret: hex::encode(scalar_to_be_bytes(pair.private())),
    };
    toml::to_string(&doc).expect("flat document")
}

pub fn encode_public(pair: &Pair) -> String {
    let doc = PublicToml {
        public: hex::encode(pair.public().to_compressed()),
    };
    toml::to_string(&doc).expect("flat document")
}

/// Rebuilds a pair from the two stored documents, cross-checking that the
/// public file belongs to the secret.
pub fn decode_pair(private_doc: &str, public_doc: &str) -> Result<Pair, KeyTomlError> {
    let private: PrivateToml = toml::from_str(private_doc)?;
    let public: PublicToml = toml::from_str(public_doc)?;

    let secret_raw: [u8; 32] = hex::decode(private.secret)?
        .try_into()
        .map_err(|_| KeyTomlError::FieldLength)?;
    let secret = scalar_from_canonical_be(&secret_raw).ok_or(KeyTomlError::InvalidScalar)?;

    let public_raw: [u8; 48] = hex::decode(public.public)?
        .try_into()
        .map_err(|_| KeyTomlError::FieldLength)?;
    let public = Option::<G1Affine>::from(G1Affine::from_compressed(&public_raw))
        .ok_or(KeyTomlError::InvalidPoint)?;

    let pair = Pair::from_private(secret);
    if *pair.public() != public {
        return Err(KeyTomlError::PairMismatch);
    }
    Ok(pair)
}
