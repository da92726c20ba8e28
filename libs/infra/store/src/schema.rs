// [libs/infra/store/src/schema.rs]
/*!
 * =================================================================
 * APARATO: SOVEREIGN DATABASE SCHEMA (ESTRATO L3)
 * RESPONSABILIDAD: GOBERNANZA ESTRUCTURAL E IDEMPOTENCIA TOTAL
 *
 * Cada tabla se declara con `CREATE TABLE IF NOT EXISTS`; el aparato de
 * aplicación es seguro de re-ejecutar en cada arranque del proceso.
 * =================================================================
 */

use libsql::Connection;
use tracing::{debug, info};

use crate::errors::StoreResult;

const TABLES: &[(&str, &str)] = &[
    ("TABLE_ONION_SITES", r#"
        CREATE TABLE IF NOT EXISTS onion_sites (
            site_id TEXT PRIMARY KEY,
            url TEXT NOT NULL,
            source TEXT NOT NULL DEFAULT '',
            keyword TEXT NOT NULL DEFAULT '',
            current_status TEXT NOT NULL DEFAULT 'Unknown',
            first_seen TEXT NOT NULL,
            last_seen TEXT NOT NULL
        );
    "#),
    ("TABLE_PAGES", r#"
        CREATE TABLE IF NOT EXISTS pages (
            page_id TEXT PRIMARY KEY,
            site_id TEXT NOT NULL,
            url TEXT NOT NULL,
            html_hash TEXT NOT NULL,
            raw_html BLOB NOT NULL,
            crawl_date TEXT NOT NULL
        );
    "#),
    ("TABLE_METADATA", r#"
        CREATE TABLE IF NOT EXISTS metadata (
            metadata_id TEXT PRIMARY KEY,
            page_id TEXT NOT NULL UNIQUE,
            title TEXT,
            meta_tags TEXT NOT NULL DEFAULT '{}',
            emails TEXT NOT NULL DEFAULT '[]',
            pgp_keys TEXT NOT NULL DEFAULT '[]',
            pgp_fingerprints TEXT NOT NULL DEFAULT '[]',
            xmr_addresses TEXT NOT NULL DEFAULT '[]',
            vendor_handles TEXT NOT NULL DEFAULT '[]',
            language TEXT NOT NULL DEFAULT 'unknown'
        );
    "#),
    ("TABLE_BITCOIN_ADDRESSES", r#"
        CREATE TABLE IF NOT EXISTS bitcoin_addresses (
            address_id TEXT PRIMARY KEY,
            address TEXT NOT NULL,
            site_id TEXT NOT NULL,
            page_id TEXT NOT NULL,
            valid INTEGER NOT NULL DEFAULT 0,
            detected_at TEXT NOT NULL,
            tx_analyzed INTEGER NOT NULL DEFAULT 0
        );
    "#),
    ("TABLE_TRANSACTIONS", r#"
        CREATE TABLE IF NOT EXISTS transactions (
            tx_id TEXT NOT NULL,
            address_id TEXT NOT NULL,
            direction TEXT NOT NULL,
            amount REAL NOT NULL,
            timestamp TEXT,
            fan_in INTEGER NOT NULL,
            fan_out INTEGER NOT NULL,
            is_mixer INTEGER NOT NULL,
            PRIMARY KEY (tx_id, address_id, direction)
        );
    "#),
    ("TABLE_TRANSACTION_EDGES", r#"
        CREATE TABLE IF NOT EXISTS bitcoin_transaction_edges (
            tx_id TEXT NOT NULL,
            from_address TEXT NOT NULL,
            to_address TEXT NOT NULL,
            amount REAL NOT NULL,
            timestamp TEXT,
            PRIMARY KEY (tx_id, from_address, to_address)
        );
    "#),
    ("TABLE_VENDORS", r#"
        CREATE TABLE IF NOT EXISTS vendors (
            vendor_id TEXT PRIMARY KEY,
            vendor_name TEXT NOT NULL,
            risk_score INTEGER NOT NULL DEFAULT 0,
            first_seen TEXT NOT NULL,
            last_seen TEXT NOT NULL
        );
    "#),
    ("TABLE_VENDOR_ARTIFACTS", r#"
        CREATE TABLE IF NOT EXISTS vendor_artifacts (
            artifact_id TEXT PRIMARY KEY,
            vendor_id TEXT NOT NULL,
            artifact_type TEXT NOT NULL,
            artifact_value TEXT NOT NULL,
            artifact_hash TEXT NOT NULL,
            confidence INTEGER NOT NULL,
            site_id TEXT NOT NULL,
            page_id TEXT NOT NULL,
            first_seen TEXT NOT NULL,
            last_seen TEXT NOT NULL
        );
    "#),
    ("TABLE_SITE_LIVENESS", r#"
        CREATE TABLE IF NOT EXISTS site_liveness (
            liveness_id TEXT PRIMARY KEY,
            site_id TEXT NOT NULL,
            status TEXT NOT NULL,
            response_time REAL,
            check_time TEXT NOT NULL
        );
    "#),
    ("TABLE_SITE_CLASSIFICATION", r#"
        CREATE TABLE IF NOT EXISTS site_classification (
            site_id TEXT NOT NULL,
            model_name TEXT NOT NULL,
            model_version TEXT NOT NULL,
            predicted_keyword TEXT NOT NULL,
            confidence REAL NOT NULL,
            analysed_at TEXT NOT NULL,
            status TEXT NOT NULL,
            PRIMARY KEY (site_id, model_name, model_version)
        );
    "#),
];

const INDEXES: &[(&str, &str)] = &[
    ("IDX_PAGES_SITE", "CREATE INDEX IF NOT EXISTS idx_pages_site ON pages(site_id);"),
    ("IDX_SITES_LAST_SEEN", "CREATE INDEX IF NOT EXISTS idx_sites_last_seen ON onion_sites(last_seen DESC, site_id DESC);"),
    ("IDX_ADDRESSES_ANALYZED", "CREATE INDEX IF NOT EXISTS idx_addresses_pending ON bitcoin_addresses(valid, tx_analyzed);"),
    ("IDX_ARTIFACTS_VENDOR", "CREATE INDEX IF NOT EXISTS idx_artifacts_vendor ON vendor_artifacts(vendor_id);"),
    ("IDX_ARTIFACTS_VALUE", "CREATE INDEX IF NOT EXISTS idx_artifacts_value ON vendor_artifacts(artifact_type, artifact_value);"),
    ("IDX_LIVENESS_SITE", "CREATE INDEX IF NOT EXISTS idx_liveness_site ON site_liveness(site_id, check_time DESC);"),
];

/// Applies the full schema in order: base tables, then acceleration indexes.
/// Safe to call on every process start — every statement is idempotent.
pub async fn apply_schema(connection: &Connection) -> StoreResult<()> {
    info!("🏗️ [SCHEMA]: Synchronizing structural schema...");

    for (identifier, sql) in TABLES {
        debug!("  ↳ solidifying: {identifier}");
        connection.execute(sql, ()).await?;
    }

    for (identifier, sql) in INDEXES {
        debug!("  ↳ indexing: {identifier}");
        connection.execute(sql, ()).await?;
    }

    info!("✅ [SCHEMA]: Tables and indexes are level.");
    Ok(())
}
