// [libs/infra/store/tests/liveness_and_address_repository.rs]
use onyx_domain_models::{BitcoinAddress, Liveness, SiteRecord, SiteStatus};
use onyx_infra_store::{AddressRepository, LivenessRepository, SiteRepository, Store};

#[tokio::test]
async fn recording_liveness_updates_the_site_status_in_the_same_transaction() {
    let store = Store::connect(":memory:").await.unwrap();
    let sites = SiteRepository::new(store.clone());
    let liveness = LivenessRepository::new(store.clone());

    let site = SiteRecord::new("http://beacon.onion/", "seed", "market");
    sites.upsert_site(&site).await.unwrap();

    let observation = Liveness::new(site.site_id.clone(), SiteStatus::Dead, Some(4.2));
    liveness.record(&observation).await.unwrap();

    let fetched = sites.get(&site.site_id).await.unwrap().unwrap();
    assert_eq!(fetched.current_status, SiteStatus::Dead);

    let history = liveness.history_for_site(&site.site_id, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].response_time, Some(4.2));
}

#[tokio::test]
async fn pending_for_analysis_excludes_invalid_and_already_analyzed_addresses() {
    let store = Store::connect(":memory:").await.unwrap();
    let addresses = AddressRepository::new(store);

    let valid_pending = BitcoinAddress::new("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", "s1", "p1", true);
    let invalid = BitcoinAddress::new("not-a-real-address", "s1", "p2", false);
    let already_analyzed = BitcoinAddress::new("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy", "s1", "p3", true);

    addresses.insert(&valid_pending).await.unwrap();
    addresses.insert(&invalid).await.unwrap();
    addresses.insert(&already_analyzed).await.unwrap();
    addresses.mark_tx_analyzed(&already_analyzed.address_id).await.unwrap();

    let pending = addresses.pending_for_analysis(10).await.unwrap();
    let pending_ids: Vec<_> = pending.iter().map(|a| a.address_id.clone()).collect();

    assert!(pending_ids.contains(&valid_pending.address_id));
    assert!(!pending_ids.contains(&invalid.address_id));
    assert!(!pending_ids.contains(&already_analyzed.address_id));
}

#[tokio::test]
async fn mark_tx_analyzed_is_idempotent() {
    let store = Store::connect(":memory:").await.unwrap();
    let addresses = AddressRepository::new(store);

    let address = BitcoinAddress::new("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", "s1", "p1", true);
    addresses.insert(&address).await.unwrap();

    assert!(addresses.mark_tx_analyzed(&address.address_id).await.unwrap());
    assert!(!addresses.mark_tx_analyzed(&address.address_id).await.unwrap());
}
