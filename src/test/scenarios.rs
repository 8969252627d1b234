//! End-to-end protocol runs over the in-memory chain.

use super::helpers::{testnet, TestNet, AFTER_SIGN_SLOT, DKG_SLOT, SIGN_SLOT};
use crate::chain::ChainView;
use crate::core::aggregate::{beacon_output, fallback_output};
use crate::core::daemon::Daemon;
use crate::core::BeaconError;
use crate::curve::poly::lagrange_g1;
use crate::curve::{evaluation_point, G1Projective, Scalar};

use std::sync::Arc;
use std::time::Duration;

const EPOCH: u64 = 5;

/// Interpolates the aggregate signature from the published partials of the
/// given proposers, the way any observer can.
fn recover_gsig(net: &TestNet, epoch: u64, ids: &[u32]) -> G1Projective {
    let pks = net.chain.committee(epoch).unwrap();
    let shares: Vec<G1Projective> = ids
        .iter()
        .map(|id| net.chain.sig(epoch, *id).unwrap().gsigshare)
        .collect();
    let xs: Vec<Scalar> = ids
        .iter()
        .map(|id| evaluation_point(&pks[*id as usize], *id))
        .collect();
    lagrange_g1(&shares, &xs).unwrap()
}

#[test]
fn scenario_full_committee_produces_verified_random() {
    let mut net = testnet(4, 1, 2, EPOCH);
    net.run_dkg(EPOCH);
    assert_eq!(net.chain.dkg_count(EPOCH), 4);

    net.run_sign(EPOCH, 4);
    assert_eq!(net.chain.sig_count(EPOCH), 4);

    net.nodes[0]
        .compute_random(EPOCH, net.chain.as_ref())
        .unwrap();

    // The published random is the tagged hash of the protocol-defined
    // aggregate, reconstructed from the first t+1 signatures.
    let gsig = recover_gsig(&net, EPOCH, &[0, 1]);
    assert_eq!(net.chain.random(EPOCH + 1), Some(beacon_output(&gsig)));
}

#[test]
fn any_spanning_subset_recovers_the_same_aggregate() {
    let mut net = testnet(4, 1, 2, EPOCH);
    net.run_dkg(EPOCH);
    net.run_sign(EPOCH, 4);

    let first_two = recover_gsig(&net, EPOCH, &[0, 1]);
    let middle_two = recover_gsig(&net, EPOCH, &[1, 2]);
    let last_two = recover_gsig(&net, EPOCH, &[2, 3]);
    let first_three = recover_gsig(&net, EPOCH, &[0, 1, 2]);
    assert_eq!(first_two, middle_two);
    assert_eq!(first_two, last_two);
    assert_eq!(first_two, first_three);
}

#[test]
fn scenario_exact_min_signers_verifies() {
    let mut net = testnet(7, 2, 3, EPOCH);
    net.run_dkg(EPOCH);
    net.run_sign(EPOCH, 3);
    assert_eq!(net.chain.sig_count(EPOCH), 3);

    net.nodes[6]
        .compute_random(EPOCH, net.chain.as_ref())
        .unwrap();

    let gsig = recover_gsig(&net, EPOCH, &[0, 1, 2]);
    assert_eq!(net.chain.random(EPOCH + 1), Some(beacon_output(&gsig)));
}

#[test]
fn scenario_below_min_signers_falls_back() {
    let mut net = testnet(7, 2, 3, EPOCH);
    net.run_dkg(EPOCH);
    net.run_sign(EPOCH, 2);

    net.nodes[0]
        .compute_random(EPOCH, net.chain.as_ref())
        .unwrap();

    // Deterministic hash chain over the seeded R[e].
    assert_eq!(
        net.chain.random(EPOCH + 1),
        Some(fallback_output(&[1u8; 32]))
    );
    assert_eq!(net.chain.random_submission_count(), 1);
}

#[test]
fn scenario_tampered_deal_refuses_to_publish() {
    let mut net = testnet(5, 1, 2, EPOCH);
    net.run_dkg(EPOCH);

    // Corrupt one encrypted share of dealer 0 in chain state before the
    // signers read it.
    net.chain.tamper_dkg(EPOCH, 0, |deal| {
        deal.enshare[2] += G1Projective::generator();
    });

    net.run_sign(EPOCH, 5);
    let err = net.nodes[0]
        .compute_random(EPOCH, net.chain.as_ref())
        .unwrap_err();
    assert!(matches!(err, BeaconError::PairingCheckFailed(e) if e == EPOCH));
    assert_eq!(net.chain.random(EPOCH + 1), None);
    assert_eq!(net.chain.random_submission_count(), 0);
}

#[test]
fn scenario_rollback_tick_is_rejected() {
    let mut net = testnet(4, 1, 2, 10);
    net.nodes[0].tick(10, DKG_SLOT, net.chain.as_ref()).unwrap();
    let stage_before = net.nodes[0].stage();

    let err = net.nodes[0]
        .tick(9, SIGN_SLOT, net.chain.as_ref())
        .unwrap_err();
    assert!(matches!(err, BeaconError::Rollback { tick: 9, current: 10 }));
    assert_eq!(net.nodes[0].epoch(), Some(10));
    assert_eq!(net.nodes[0].stage(), stage_before);
}

#[test]
fn compute_random_is_idempotent() {
    let mut net = testnet(4, 1, 2, EPOCH);
    net.run_dkg(EPOCH);
    net.run_sign(EPOCH, 4);

    net.nodes[0]
        .compute_random(EPOCH, net.chain.as_ref())
        .unwrap();
    net.nodes[1]
        .compute_random(EPOCH, net.chain.as_ref())
        .unwrap();
    assert_eq!(net.chain.random_submission_count(), 1);
}

#[test]
fn exact_quorum_committee_verifies() {
    // Committee size equals the reconstruction threshold.
    let mut net = testnet(3, 2, 3, EPOCH);
    net.run_dkg(EPOCH);
    net.run_sign(EPOCH, 3);

    net.nodes[0]
        .compute_random(EPOCH, net.chain.as_ref())
        .unwrap();
    assert!(net.chain.random(EPOCH + 1).is_some());
    assert_ne!(
        net.chain.random(EPOCH + 1),
        Some(fallback_output(&[1u8; 32]))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn daemon_drives_an_epoch_end_to_end() {
    let TestNet { chain, nodes, .. } = testnet(4, 1, 2, EPOCH);
    chain.set_epoch_slot(EPOCH, DKG_SLOT);

    let handles: Vec<_> = nodes
        .into_iter()
        .map(|beacon| {
            let view = Arc::clone(&chain) as Arc<dyn ChainView + Send + Sync>;
            Daemon::new(beacon, view, Duration::from_millis(5)).start()
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(chain.dkg_count(EPOCH), 4);

    chain.set_epoch_slot(EPOCH, SIGN_SLOT);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(chain.sig_count(EPOCH), 4);

    chain.set_epoch_slot(EPOCH, AFTER_SIGN_SLOT);
    tokio::time::sleep(Duration::from_millis(100)).await;

    for handle in handles {
        handle.stop().await;
    }
    assert!(chain.random(EPOCH + 1).is_some());
}
