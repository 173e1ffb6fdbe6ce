use std::sync::Arc;

use bitcoin::Network;
use coffer_keystore::Chain;
use coffer_test_utils::MemoryStore;
use serde_json::json;

use super::*;

fn btc_driver(store: &Arc<MemoryStore>) -> BtcDriver {
    BtcDriver::new("btc", store.clone(), Network::Bitcoin)
}

#[tokio::test]
async fn deposit_addresses_issue_increasing_indices() {
    let store = Arc::new(MemoryStore::new());
    let driver = btc_driver(&store);
    driver.create_master_key().await.unwrap();

    let first = driver.create_deposit_address(12, "U1").await.unwrap();
    assert_eq!(first.details.ex_address_id, 0);
    assert_eq!(first.details.uid, "U1");

    let second = driver.create_deposit_address(12, "U2").await.unwrap();
    assert_eq!(second.details.ex_address_id, 1);
    assert_ne!(first.address, second.address);

    // One public address record per issued index.
    assert!(store.entry("public/btc/account/12/0/0/key").await.is_some());
    assert!(store.entry("public/btc/account/12/0/1/key").await.is_some());
    // Issuance never touches the private scope.
    assert!(store.entry("private/btc/account/12/0/0/key").await.is_none());
}

#[tokio::test]
async fn issued_address_matches_public_domain_derivation() {
    let store = Arc::new(MemoryStore::new());
    let driver = btc_driver(&store);
    let keystore = coffer_keystore::Keystore::new(store.clone(), Network::Bitcoin);
    driver.create_master_key().await.unwrap();

    let issued = driver.create_deposit_address(12, "U1").await.unwrap();

    let expected = keystore
        .get_master_key_public("btc")
        .await
        .unwrap()
        .derive_child(12)
        .unwrap()
        .derive_child(Chain::External.index())
        .unwrap()
        .derive_child(0)
        .unwrap();
    assert_eq!(
        issued.address,
        expected.p2pkh_address(Network::Bitcoin).to_string()
    );

    let stored = keystore
        .get_public_address("btc", 12, Chain::External, 0)
        .await
        .unwrap();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn accounts_and_chains_keep_separate_counters() {
    let store = Arc::new(MemoryStore::new());
    let driver = btc_driver(&store);
    driver.create_master_key().await.unwrap();

    let a = driver.create_deposit_address(12, "U1").await.unwrap();
    let b = driver.create_deposit_address(7, "U1").await.unwrap();
    assert_eq!(a.details.ex_address_id, 0);
    assert_eq!(b.details.ex_address_id, 0);
}

#[tokio::test]
async fn negative_account_is_rejected_before_any_write() {
    let store = Arc::new(MemoryStore::new());
    let driver = btc_driver(&store);

    let err = driver.create_deposit_address(-1, "U1").await.unwrap_err();
    assert!(matches!(err, DriverError::InvalidAccount(-1)));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn account_beyond_hardened_ceiling_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let driver = btc_driver(&store);

    let err = driver
        .create_deposit_address(1 << 31, "U1")
        .await
        .unwrap_err();
    assert!(matches!(err, DriverError::InvalidAccount(_)));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn operations_require_a_master_key() {
    let store = Arc::new(MemoryStore::new());
    let driver = btc_driver(&store);

    let err = driver.create_deposit_address(12, "U1").await.unwrap_err();
    assert!(matches!(err, DriverError::MasterKeyNotFound));

    let err = driver.recover_address_key(12, 0).await.unwrap_err();
    assert!(matches!(err, DriverError::MasterKeyNotFound));
}

#[tokio::test]
async fn recovered_signing_key_is_the_private_counterpart() {
    let store = Arc::new(MemoryStore::new());
    let driver = btc_driver(&store);
    let keystore = coffer_keystore::Keystore::new(store.clone(), Network::Bitcoin);
    driver.create_master_key().await.unwrap();

    let issued = driver.create_deposit_address(12, "U1").await.unwrap();
    let signing = driver.recover_address_key(12, 0).await.unwrap();

    assert!(signing.is_private());
    assert_eq!(
        signing.p2pkh_address(Network::Bitcoin).to_string(),
        issued.address
    );

    // Recovery materialized both scope records for the address.
    let private = keystore
        .get_private_address("btc", 12, Chain::External, 0)
        .await
        .unwrap();
    assert_eq!(private, signing);
    let public = keystore
        .get_public_address("btc", 12, Chain::External, 0)
        .await
        .unwrap();
    assert_eq!(public, signing.neuter());
}

#[tokio::test]
async fn failed_index_advance_reissues_the_same_index_on_retry() {
    let store = Arc::new(MemoryStore::new());
    let driver = btc_driver(&store);
    driver.create_master_key().await.unwrap();

    // Let the address record land, then fail the counter write.
    store.deny_writes_after(1);
    let err = driver.create_deposit_address(12, "U1").await.unwrap_err();
    assert!(matches!(err, DriverError::Allocator(_)));

    // The counter never advanced, so a retry hands out index 0 again.
    store.deny_writes_after(usize::MAX);
    let retried = driver.create_deposit_address(12, "U1").await.unwrap();
    assert_eq!(retried.details.ex_address_id, 0);
}

#[tokio::test]
async fn driver_dispatch_is_a_closed_set() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    assert!(Driver::from_code("btc", store.clone(), Network::Bitcoin).is_some());
    assert!(Driver::from_code("doge", store.clone(), Network::Bitcoin).is_none());

    let driver = Driver::from_code("btc", store, Network::Bitcoin).unwrap();
    driver.create_master_key().await.unwrap();
    let issued = driver.create_deposit_address(3, "U9").await.unwrap();
    assert_eq!(issued.details.ex_address_id, 0);
    let signing = driver.recover_address_key(3, 0).await.unwrap();
    assert!(signing.is_private());
}

#[test]
fn deposit_address_wire_shape() {
    let issued = DepositAddress {
        address: "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2".to_string(),
        details: DepositAddressDetails {
            uid: "U1".to_string(),
            ex_address_id: 7,
        },
    };
    assert_eq!(
        serde_json::to_value(&issued).unwrap(),
        json!({
            "address": "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2",
            "details": {"uid": "U1", "ex_address_id": 7}
        })
    );
}
