//! Wire payloads and the tagged byte codec.
//!
//! Three message kinds exist on the wire, each a 1-byte tag followed by
//! big-endian fields: DKG deals (`0x01`), partial signatures (`0x02`) and
//! epoch randoms (`0x03`). Group elements travel in canonical compressed
//! form, scalars as 32 big-endian bytes, and the three parallel vectors of
//! a deal share one `u32` big-endian count. Decoding is strict: unknown
//! tags, non-canonical points or scalars, truncation and trailing bytes
//! are all rejected.

use crate::curve::dleq::DleqProof;
use crate::curve::{
    scalar_from_canonical_be, scalar_to_be_bytes, G1Affine, G1Projective, G2Affine, G2Projective,
};
use group::Curve;

pub const TAG_DKG: u8 = 0x01;
pub const TAG_SIG: u8 = 0x02;
pub const TAG_RANDOM: u8 = 0x03;

const G1_LEN: usize = 48;
const G2_LEN: usize = 96;
const SCALAR_LEN: usize = 32;
const PROOF_LEN: usize = 2 * G1_LEN + SCALAR_LEN;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum WireError {
    #[error("empty message")]
    Empty,
    #[error("unknown message tag {0:#04x}")]
    UnknownTag(u8),
    #[error("message length {got} does not match {expected} for its tag")]
    Length { expected: usize, got: usize },
    #[error("non-canonical G1 point")]
    InvalidG1,
    #[error("non-canonical G2 point")]
    InvalidG2,
    #[error("non-canonical scalar")]
    InvalidScalar,
}

/// One dealer's deal for an epoch: encrypted shares, commitments and
/// share-wellformedness proofs, all indexed by committee position.
#[derive(Clone, Debug)]
pub struct DkgPayload {
    pub epoch_id: u64,
    pub proposer_id: u32,
    pub enshare: Vec<G1Projective>,
    pub commit: Vec<G2Projective>,
    pub proof: Vec<DleqProof>,
}

/// One signer's partial signature on the epoch message.
#[derive(Clone, Copy)]
pub struct SigPayload {
    pub epoch_id: u64,
    pub proposer_id: u32,
    pub gsigshare: G1Projective,
}

/// The epoch random register value, published for `epoch_id`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RandomPayload {
    pub epoch_id: u64,
    pub random: [u8; 32],
}

pub enum BeaconMsg {
    Dkg(DkgPayload),
    Sig(SigPayload),
    Random(RandomPayload),
}

impl BeaconMsg {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            BeaconMsg::Dkg(dkg) => {
                let n = dkg.enshare.len();
                let mut out = Vec::with_capacity(17 + n * (G1_LEN + G2_LEN + PROOF_LEN));
                out.push(TAG_DKG);
                out.extend_from_slice(&dkg.epoch_id.to_be_bytes());
                out.extend_from_slice(&dkg.proposer_id.to_be_bytes());
                out.extend_from_slice(&(n as u32).to_be_bytes());
                for p in &dkg.enshare {
                    out.extend_from_slice(&p.to_affine().to_compressed());
                }
                for p in &dkg.commit {
                    out.extend_from_slice(&p.to_affine().to_compressed());
                }
                for p in &dkg.proof {
                    out.extend_from_slice(&p.a1.to_affine().to_compressed());
                    out.extend_from_slice(&p.a2.to_affine().to_compressed());
                    out.extend_from_slice(&scalar_to_be_bytes(&p.z));
                }
                out
            }
            BeaconMsg::Sig(sig) => {
                let mut out = Vec::with_capacity(13 + G1_LEN);
                out.push(TAG_SIG);
                out.extend_from_slice(&sig.epoch_id.to_be_bytes());
                out.extend_from_slice(&sig.proposer_id.to_be_bytes());
                out.extend_from_slice(&sig.gsigshare.to_affine().to_compressed());
                out
            }
            BeaconMsg::Random(r) => {
                let mut out = Vec::with_capacity(41);
                out.push(TAG_RANDOM);
                out.extend_from_slice(&r.epoch_id.to_be_bytes());
                out.extend_from_slice(&r.random);
                out
            }
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let (&tag, body) = bytes.split_first().ok_or(WireError::Empty)?;
        match tag {
            TAG_DKG => decode_dkg(body).map(BeaconMsg::Dkg),
            TAG_SIG => decode_sig(body).map(BeaconMsg::Sig),
            TAG_RANDOM => decode_random(body).map(BeaconMsg::Random),
            other => Err(WireError::UnknownTag(other)),
        }
    }
}

fn decode_dkg(body: &[u8]) -> Result<DkgPayload, WireError> {
    if body.len() < 16 {
        return Err(WireError::Length {
            expected: 16,
            got: body.len(),
        });
    }
    let epoch_id = u64::from_be_bytes(body[0..8].try_into().unwrap());
    let proposer_id = u32::from_be_bytes(body[8..12].try_into().unwrap());
    let n = u32::from_be_bytes(body[12..16].try_into().unwrap()) as usize;

    let expected = 16 + n * (G1_LEN + G2_LEN + PROOF_LEN);
    if body.len() != expected {
        return Err(WireError::Length {
            expected,
            got: body.len(),
        });
    }

    let mut at = 16;
    let mut enshare = Vec::with_capacity(n);
    for _ in 0..n {
        enshare.push(read_g1(body, &mut at)?);
    }
    let mut commit = Vec::with_capacity(n);
    for _ in 0..n {
        commit.push(read_g2(body, &mut at)?);
    }
    let mut proof = Vec::with_capacity(n);
    for _ in 0..n {
        let a1 = read_g1(body, &mut at)?;
        let a2 = read_g1(body, &mut at)?;
        let z = read_scalar(body, &mut at)?;
        proof.push(DleqProof { a1, a2, z });
    }

    Ok(DkgPayload {
        epoch_id,
        proposer_id,
        enshare,
        commit,
        proof,
    })
}

fn decode_sig(body: &[u8]) -> Result<SigPayload, WireError> {
    let expected = 12 + G1_LEN;
    if body.len() != expected {
        return Err(WireError::Length {
            expected,
            got: body.len(),
        });
    }
    let epoch_id = u64::from_be_bytes(body[0..8].try_into().unwrap());
    let proposer_id = u32::from_be_bytes(body[8..12].try_into().unwrap());
    let mut at = 12;
    let gsigshare = read_g1(body, &mut at)?;
    Ok(SigPayload {
        epoch_id,
        proposer_id,
        gsigshare,
    })
}

fn decode_random(body: &[u8]) -> Result<RandomPayload, WireError> {
    if body.len() != 40 {
        return Err(WireError::Length {
            expected: 40,
            got: body.len(),
        });
    }
    let epoch_id = u64::from_be_bytes(body[0..8].try_into().unwrap());
    let random: [u8; 32] = body[8..40].try_into().unwrap();
    Ok(RandomPayload { epoch_id, random })
}

fn read_g1(body: &[u8], at: &mut usize) -> Result<G1Projective, WireError> {
    let raw: [u8; G1_LEN] = body[*at..*at + G1_LEN].try_into().unwrap();
    *at += G1_LEN;
    Option::<G1Affine>::from(G1Affine::from_compressed(&raw))
        .map(G1Projective::from)
        .ok_or(WireError::InvalidG1)
}

fn read_g2(body: &[u8], at: &mut usize) -> Result<G2Projective, WireError> {
    let raw: [u8; G2_LEN] = body[*at..*at + G2_LEN].try_into().unwrap();
    *at += G2_LEN;
    Option::<G2Affine>::from(G2Affine::from_compressed(&raw))
        .map(G2Projective::from)
        .ok_or(WireError::InvalidG2)
}

fn read_scalar(body: &[u8], at: &mut usize) -> Result<crate::curve::Scalar, WireError> {
    let raw: [u8; SCALAR_LEN] = body[*at..*at + SCALAR_LEN].try_into().unwrap();
    *at += SCALAR_LEN;
    scalar_from_canonical_be(&raw).ok_or(WireError::InvalidScalar)
}
