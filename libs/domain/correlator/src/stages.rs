// [libs/domain/correlator/src/stages.rs]
/*!
 * =================================================================
 * APARATO: CORRELATION STAGES (ESTRATO L5)
 * RESPONSABILIDAD: LAS CUATRO PASADAS DEL CORRELACIONADOR
 *
 * `spec.md` §4.9, cada etapa es idempotente y opera únicamente sobre
 * lecturas/escrituras del Store — ver `DESIGN.md`.
 * =================================================================
 */

use onyx_domain_models::{ArtifactType, Vendor, VendorArtifact};
use onyx_infra_store::{AddressRepository, MetadataRepository, VendorRepository};
use tracing::instrument;

use crate::errors::CorrelatorResult;

/// Stage 1: one `btc` artifact (confidence 90) per valid address, vendor
/// seeded by `hash(address)`. Re-running over an already-seeded address
/// is a harmless conflict-free no-op on both the vendor and artifact rows.
#[instrument(skip(addresses, vendors))]
pub async fn seed_from_addresses(
    addresses: &AddressRepository,
    vendors: &VendorRepository,
) -> CorrelatorResult<usize> {
    let mut seeded = 0;
    for address in addresses.all_valid().await? {
        let vendor = Vendor::seed_from_address(&address.address);
        vendors.upsert_vendor(&vendor).await?;
        let artifact = VendorArtifact::new(
            vendor.vendor_id.clone(),
            ArtifactType::Btc,
            address.address.clone(),
            address.site_id.clone(),
            address.page_id.clone(),
        );
        if vendors.insert_artifact(&artifact).await? {
            seeded += 1;
        }
    }
    Ok(seeded)
}

/// Stage 2: for each `btc` artifact, pull the source page's metadata and
/// emit one artifact per co-located pgp/xmr/email/handle value, owned by
/// the same `vendor_id` as the seeding address.
#[instrument(skip(vendors, metadata))]
pub async fn attach_page_artifacts(
    vendors: &VendorRepository,
    metadata: &MetadataRepository,
) -> CorrelatorResult<usize> {
    let mut attached = 0;
    for vendor_id in vendors.all_vendor_ids().await? {
        for seed in vendors.artifacts_for_vendor(&vendor_id).await? {
            if seed.artifact_type != ArtifactType::Btc {
                continue;
            }
            let Some(page_metadata) = metadata.get_by_page(&seed.page_id).await? else {
                continue;
            };

            for (artifact_type, values) in [
                (ArtifactType::Pgp, &page_metadata.pgp_fingerprints),
                (ArtifactType::Xmr, &page_metadata.xmr_addresses),
                (ArtifactType::Email, &page_metadata.emails),
                (ArtifactType::Handle, &page_metadata.vendor_handles),
            ] {
                for value in values {
                    let artifact = VendorArtifact::new(
                        vendor_id.clone(),
                        artifact_type,
                        value.clone(),
                        seed.site_id.clone(),
                        seed.page_id.clone(),
                    );
                    if vendors.insert_artifact(&artifact).await? {
                        attached += 1;
                    }
                }
            }
        }
    }
    Ok(attached)
}

/// Stage 3: merges vendors that share a strong-identity artifact hash
/// (pgp, xmr — `spec.md` §4.9 explicitly excludes handles and emails from
/// driving merges). The canonical survivor is the lexicographically
/// smallest `vendor_id` among the colliding set; every other vendor's
/// artifacts are reassigned and the vendor row deleted.
#[instrument(skip(vendors))]
pub async fn merge_on_strong_identity(vendors: &VendorRepository) -> CorrelatorResult<usize> {
    let mut merged = 0;
    for vendor_id in vendors.all_vendor_ids().await? {
        let mut collisions = vendors.strong_identity_collisions(&vendor_id).await?;
        if collisions.is_empty() {
            continue;
        }
        collisions.push(vendor_id.clone());
        collisions.sort();
        let canonical = collisions[0].clone();

        for losing_id in collisions.into_iter().filter(|id| id != &canonical) {
            if vendors.get_vendor(&losing_id).await?.is_none() {
                continue;
            }
            vendors.reassign_artifacts(&losing_id, &canonical).await?;
            vendors.delete_vendor(&losing_id).await?;
            merged += 1;
        }
    }
    Ok(merged)
}

/// Stage 4: saturated sum of the fixed contribution table over each
/// vendor's surviving artifacts, per `spec.md` §4.9 point 4.
#[instrument(skip(vendors))]
pub async fn compute_risk_scores(vendors: &VendorRepository) -> CorrelatorResult<usize> {
    let mut updated = 0;
    for vendor_id in vendors.all_vendor_ids().await? {
        let artifacts = vendors.artifacts_for_vendor(&vendor_id).await?;
        let score = risk_score_for(&artifacts);
        if vendors.update_risk_score(&vendor_id, score).await? {
            updated += 1;
        }
    }
    Ok(updated)
}

/// Pure scoring function, isolated for direct unit testing.
fn risk_score_for(artifacts: &[VendorArtifact]) -> u8 {
    use std::collections::BTreeSet;

    let btc_addresses: BTreeSet<&str> = artifacts
        .iter()
        .filter(|a| a.artifact_type == ArtifactType::Btc)
        .map(|a| a.artifact_value.as_str())
        .collect();
    let has_pgp = artifacts.iter().any(|a| a.artifact_type == ArtifactType::Pgp);
    let has_xmr = artifacts.iter().any(|a| a.artifact_type == ArtifactType::Xmr);
    let site_ids: BTreeSet<&str> = artifacts.iter().map(|a| a.site_id.as_str()).collect();

    let mut score: u32 = 0;
    if btc_addresses.len() >= 2 {
        score += 30;
    }
    if has_pgp {
        score += 20;
    }
    if has_xmr {
        score += 20;
    }
    if site_ids.len() >= 2 {
        score += 25;
    }
    score.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(artifact_type: ArtifactType, value: &str, site_id: &str) -> VendorArtifact {
        VendorArtifact::new("v1", artifact_type, value, site_id, "p1")
    }

    #[test]
    fn score_saturates_at_one_hundred() {
        let artifacts = vec![
            artifact(ArtifactType::Btc, "addr1", "s1"),
            artifact(ArtifactType::Btc, "addr2", "s2"),
            artifact(ArtifactType::Pgp, "fp1", "s1"),
            artifact(ArtifactType::Xmr, "xmr1", "s1"),
        ];
        assert_eq!(risk_score_for(&artifacts), 100);
    }

    #[test]
    fn single_address_single_site_scores_zero() {
        let artifacts = vec![artifact(ArtifactType::Btc, "addr1", "s1")];
        assert_eq!(risk_score_for(&artifacts), 0);
    }

    #[test]
    fn two_addresses_alone_score_thirty() {
        let artifacts = vec![
            artifact(ArtifactType::Btc, "addr1", "s1"),
            artifact(ArtifactType::Btc, "addr2", "s1"),
        ];
        assert_eq!(risk_score_for(&artifacts), 30);
    }
}
