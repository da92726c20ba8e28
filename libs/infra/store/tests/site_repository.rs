// [libs/infra/store/tests/site_repository.rs]
use onyx_domain_models::{SiteRecord, SiteStatus};
use onyx_infra_store::{SiteRepository, Store};

async fn memory_repo() -> SiteRepository {
    let store = Store::connect(":memory:").await.expect("anchor must open");
    SiteRepository::new(store)
}

#[tokio::test]
async fn upsert_site_is_idempotent_on_conflict() {
    let repo = memory_repo().await;

    let site = SiteRecord::new("http://example.onion/", "seed", "market");
    let first = repo.upsert_site(&site).await.unwrap();
    let second = repo.upsert_site(&site).await.unwrap();

    assert!(first, "first insert should report a new row");
    assert!(!second, "conflicting insert should no-op, not duplicate");

    let fetched = repo.get(&site.site_id).await.unwrap().expect("site must exist");
    assert_eq!(fetched.url, site.url);
}

#[tokio::test]
async fn keyset_pagination_walks_every_site_without_repeats() {
    let repo = memory_repo().await;

    for i in 0..5 {
        let url = format!("http://site{i}.onion/");
        let site = SiteRecord::new(&url, "seed", "market");
        repo.upsert_site(&site).await.unwrap();
    }

    let mut seen = std::collections::HashSet::new();
    let mut cursor = None;
    loop {
        let page = repo.list_sites(None, None, cursor.clone(), 2).await.unwrap();
        if page.sites.is_empty() {
            break;
        }
        for s in &page.sites {
            assert!(seen.insert(s.site_id.clone()), "keyset pagination repeated a row");
        }
        if page.sites.len() < 2 {
            break;
        }
        cursor = page.next_cursor;
    }

    assert_eq!(seen.len(), 5, "pagination did not surface every site");
}

#[tokio::test]
async fn status_update_is_visible_on_reread() {
    let repo = memory_repo().await;
    let site = SiteRecord::new("http://flux.onion/", "seed", "forum");
    repo.upsert_site(&site).await.unwrap();

    let changed = repo.update_status(&site.site_id, SiteStatus::Alive).await.unwrap();
    assert!(changed);

    let fetched = repo.get(&site.site_id).await.unwrap().unwrap();
    assert_eq!(fetched.current_status, SiteStatus::Alive);
}

#[tokio::test]
async fn stale_sites_excludes_recently_seen_rows() {
    let repo = memory_repo().await;
    let site = SiteRecord::new("http://recent.onion/", "seed", "market");
    repo.upsert_site(&site).await.unwrap();

    let horizon = chrono::Utc::now() - chrono::Duration::hours(6);
    let stale = repo.stale_sites(horizon).await.unwrap();
    assert!(
        stale.iter().all(|s| s.site_id != site.site_id),
        "a freshly inserted site must not appear as stale"
    );
}
