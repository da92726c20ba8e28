// [libs/infra/store/tests/vendor_repository.rs]
use onyx_domain_models::{ArtifactType, Vendor, VendorArtifact};
use onyx_infra_store::{Store, VendorRepository};

async fn memory_repo() -> VendorRepository {
    let store = Store::connect(":memory:").await.expect("anchor must open");
    VendorRepository::new(store)
}

#[tokio::test]
async fn strong_identity_collision_is_found_across_vendors() {
    let repo = memory_repo().await;

    let vendor_a = Vendor::seed_from_address("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
    let vendor_b = Vendor::seed_from_address("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy");
    repo.upsert_vendor(&vendor_a).await.unwrap();
    repo.upsert_vendor(&vendor_b).await.unwrap();

    let shared_key = "-----BEGIN PGP PUBLIC KEY BLOCK-----shared-----END-----";
    let artifact_a = VendorArtifact::new(vendor_a.vendor_id.clone(), ArtifactType::Pgp, shared_key, "s1", "p1");
    let artifact_b = VendorArtifact::new(vendor_b.vendor_id.clone(), ArtifactType::Pgp, shared_key, "s2", "p2");
    repo.insert_artifact(&artifact_a).await.unwrap();
    repo.insert_artifact(&artifact_b).await.unwrap();

    let collisions = repo.strong_identity_collisions(&vendor_a.vendor_id).await.unwrap();
    assert_eq!(collisions, vec![vendor_b.vendor_id.clone()]);
}

#[tokio::test]
async fn reassign_artifacts_moves_every_row_to_the_canonical_vendor() {
    let repo = memory_repo().await;

    let loser = Vendor::seed_from_address("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
    let winner = Vendor::seed_from_address("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy");
    repo.upsert_vendor(&loser).await.unwrap();
    repo.upsert_vendor(&winner).await.unwrap();

    let artifact = VendorArtifact::new(loser.vendor_id.clone(), ArtifactType::Email, "vendor@example.onion", "s1", "p1");
    repo.insert_artifact(&artifact).await.unwrap();

    let moved = repo.reassign_artifacts(&loser.vendor_id, &winner.vendor_id).await.unwrap();
    assert_eq!(moved, 1);

    let winners_artifacts = repo.artifacts_for_vendor(&winner.vendor_id).await.unwrap();
    assert_eq!(winners_artifacts.len(), 1);
    assert_eq!(winners_artifacts[0].artifact_id, artifact.artifact_id);

    let losers_artifacts = repo.artifacts_for_vendor(&loser.vendor_id).await.unwrap();
    assert!(losers_artifacts.is_empty());
}

#[tokio::test]
async fn duplicate_artifact_insert_is_a_no_op() {
    let repo = memory_repo().await;
    let vendor = Vendor::seed_from_address("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
    repo.upsert_vendor(&vendor).await.unwrap();

    let artifact = VendorArtifact::new(vendor.vendor_id.clone(), ArtifactType::Btc, "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", "s1", "p1");
    assert!(repo.insert_artifact(&artifact).await.unwrap());
    assert!(!repo.insert_artifact(&artifact).await.unwrap());

    assert_eq!(repo.artifacts_for_vendor(&vendor.vendor_id).await.unwrap().len(), 1);
}
