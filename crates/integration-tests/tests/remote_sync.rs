//! Several containers bound to one in-process remote.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use catch_of_the_day_integration_tests::{frozen_keys, open_store, store_id, trout};
use catch_of_the_day_storefront::StoreStateContainer;
use catch_of_the_day_storefront::cache::MemoryCache;
use catch_of_the_day_storefront::sync::{MemoryRemote, SyncStatus};

fn open_with_clock(remote: &MemoryRemote, millis: i64) -> StoreStateContainer {
    let mut store = StoreStateContainer::new(
        store_id("shop-1"),
        Arc::new(remote.clone()),
        Arc::new(MemoryCache::new()),
    )
    .with_key_generator(frozen_keys(millis));
    store.initialize();
    store.process_sync_events();
    store
}

#[test]
fn test_inventory_reaches_other_sessions() {
    let remote = MemoryRemote::new();
    let mut owner = open_store("shop-1", &remote, &MemoryCache::new());
    let mut customer = open_store("shop-1", &remote, &MemoryCache::new());

    owner.load_samples();
    assert!(customer.process_sync_events() >= 1);

    assert_eq!(customer.fishes(), owner.fishes());
    assert_eq!(customer.sync_status(), &SyncStatus::Live);
}

#[test]
fn test_other_stores_are_not_affected() {
    let remote = MemoryRemote::new();
    let mut shop = open_store("shop-1", &remote, &MemoryCache::new());
    let mut other = open_store("shop-2", &remote, &MemoryCache::new());

    shop.load_samples();
    assert_eq!(other.process_sync_events(), 0);
    assert!(other.fishes().is_empty());
}

#[test]
fn test_last_writer_wins() {
    let remote = MemoryRemote::new();
    let mut first = open_with_clock(&remote, 1_000);
    let mut second = open_with_clock(&remote, 2_000);

    let first_key = first.add_fish(trout());
    // `second` has not seen the first push yet; its inventory replaces it.
    let second_key = second.add_fish(trout());

    first.process_sync_events();
    second.process_sync_events();

    for store in [&first, &second] {
        assert!(!store.fishes().contains_key(&first_key));
        assert!(store.fishes().contains_key(&second_key));
    }
    assert_eq!(remote.value("shop-1/fishes").unwrap().len(), 1);
}

#[test]
fn test_every_snapshot_replaces_inventory() {
    let remote = MemoryRemote::new();
    let mut owner = open_store("shop-1", &remote, &MemoryCache::new());
    let mut customer = open_store("shop-1", &remote, &MemoryCache::new());

    owner.load_samples();
    customer.process_sync_events();
    let before = Arc::clone(customer.fishes());

    owner.load_samples();
    customer.process_sync_events();

    assert_eq!(before, *customer.fishes());
    assert!(!Arc::ptr_eq(&before, customer.fishes()));
}

#[test]
fn test_outage_and_recovery() {
    let remote = MemoryRemote::new();
    let mut owner = open_store("shop-1", &remote, &MemoryCache::new());
    owner.load_samples();
    owner.process_sync_events();

    remote.set_online(false);
    owner.process_sync_events();
    assert!(owner.sync_status().is_unavailable());
    // Last known inventory stays on screen.
    assert_eq!(owner.fishes().len(), 9);
    assert!(owner.view().sync.is_unavailable());

    remote.set_online(true);
    owner.process_sync_events();
    assert_eq!(owner.sync_status(), &SyncStatus::Live);
    assert_eq!(owner.fishes().len(), 9);
}

#[test]
fn test_offline_at_startup_keeps_working_locally() {
    let remote = MemoryRemote::new();
    remote.set_online(false);

    let mut store = open_store("shop-1", &remote, &MemoryCache::new());
    assert!(!store.is_bound());
    assert!(store.sync_status().is_unavailable());

    let key = store.add_fish(trout());
    assert_eq!(store.add_to_order(key.clone()).unwrap(), 1);
    assert!(store.fishes().contains_key(&key));
    assert!(remote.value("shop-1/fishes").is_none());
}

#[tokio::test]
async fn test_next_sync_event_waits_for_push() {
    let remote = MemoryRemote::new();
    let mut customer = open_store("shop-1", &remote, &MemoryCache::new());

    let owner_remote = remote.clone();
    let owner = tokio::spawn(async move {
        let mut owner = open_store("shop-1", &owner_remote, &MemoryCache::new());
        owner.load_samples();
        owner.dispose();
    });

    assert!(customer.next_sync_event().await);
    owner.await.unwrap();
    assert_eq!(customer.fishes().len(), 9);

    customer.dispose();
    assert!(!customer.next_sync_event().await);
}
