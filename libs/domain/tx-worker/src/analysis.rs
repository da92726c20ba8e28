// [libs/domain/tx-worker/src/analysis.rs]
/*!
 * =================================================================
 * APARATO: TRANSACTION ANALYSIS (ESTRATO L5)
 * RESPONSABILIDAD: DERIVACIÓN PURA DE RESÚMENES Y ARISTAS
 *
 * Resuelve la Pregunta Abierta de `spec.md` §9 ("edge-set completeness"):
 * las aristas se derivan de `(from_address, to_address, amount, tx_id,
 * timestamp)`, emparejando cada dirección de entrada única con cada
 * dirección de salida única — ver `DESIGN.md` y `SPEC_FULL.md` §4.8.
 * =================================================================
 */

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use onyx_domain_models::{TransactionEdge, TransactionSummary, TxDirection};

use crate::explorer::ExplorerTransaction;

const SATS_PER_BTC: f64 = 100_000_000.0;

/// Everything derived from one explorer transaction for one watched
/// address: at most one `Inbound` summary, at most one `Outbound`
/// summary (an address can be on both sides of the same transaction —
/// self-payments, change — hence "at most one each", not "at most one
/// total"), and the transaction's edges (emitted once regardless of how
/// many watched addresses the caller analyzes, since edges are keyed by
/// the address pair, not the watched address).
pub struct TransactionAnalysis {
    pub summaries: Vec<TransactionSummary>,
    pub edges: Vec<TransactionEdge>,
}

/// Analyzes one explorer transaction against `watched_address`, per
/// `spec.md` §4.8: `fan_in = |vin|`, `fan_out = |vout|`, amount summed
/// in BTC (8-decimal satoshi scaling) across every relevant input/output.
pub fn analyze_transaction(tx: &ExplorerTransaction, watched_address: &str) -> TransactionAnalysis {
    let fan_in = tx.vin.len() as u32;
    let fan_out = tx.vout.len() as u32;
    let timestamp = block_timestamp(tx);

    let mut summaries = Vec::new();

    let inbound_sats: u64 = tx
        .vout
        .iter()
        .filter(|o| o.scriptpubkey_address.as_deref() == Some(watched_address))
        .map(|o| o.value)
        .sum();
    if inbound_sats > 0 {
        summaries.push(TransactionSummary::new(
            tx.txid.clone(),
            watched_address.to_string(),
            TxDirection::Inbound,
            inbound_sats as f64 / SATS_PER_BTC,
            timestamp,
            fan_in,
            fan_out,
        ));
    }

    let outbound_sats: u64 = tx
        .vin
        .iter()
        .filter_map(|i| i.prevout.as_ref())
        .filter(|p| p.scriptpubkey_address.as_deref() == Some(watched_address))
        .map(|p| p.value)
        .sum();
    if outbound_sats > 0 {
        summaries.push(TransactionSummary::new(
            tx.txid.clone(),
            watched_address.to_string(),
            TxDirection::Outbound,
            outbound_sats as f64 / SATS_PER_BTC,
            timestamp,
            fan_in,
            fan_out,
        ));
    }

    TransactionAnalysis {
        summaries,
        edges: extract_edges(tx, timestamp),
    }
}

/// Builds the transaction's flow edges once: every distinct input
/// address paired with every distinct output address, amount taken as
/// the summed value that output address actually received. Deduplicated
/// implicitly by `(tx_id, from_address, to_address)` at the Store layer.
fn extract_edges(tx: &ExplorerTransaction, timestamp: Option<DateTime<Utc>>) -> Vec<TransactionEdge> {
    let mut from_addresses: Vec<String> = tx
        .vin
        .iter()
        .filter_map(|i| i.prevout.as_ref())
        .filter_map(|p| p.scriptpubkey_address.clone())
        .collect();
    from_addresses.sort();
    from_addresses.dedup();

    let mut to_amounts: BTreeMap<String, u64> = BTreeMap::new();
    for out in &tx.vout {
        if let Some(address) = &out.scriptpubkey_address {
            *to_amounts.entry(address.clone()).or_insert(0) += out.value;
        }
    }

    let mut edges = Vec::new();
    for from in &from_addresses {
        for (to, sats) in &to_amounts {
            if from == to {
                continue;
            }
            edges.push(TransactionEdge {
                tx_id: tx.txid.clone(),
                from_address: from.clone(),
                to_address: to.clone(),
                amount: *sats as f64 / SATS_PER_BTC,
                timestamp,
            });
        }
    }
    edges
}

fn block_timestamp(tx: &ExplorerTransaction) -> Option<DateTime<Utc>> {
    tx.status
        .as_ref()
        .filter(|s| s.confirmed)
        .and_then(|s| s.block_time)
        .and_then(|epoch| Utc.timestamp_opt(epoch, 0).single())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::{ExplorerPrevout, ExplorerStatus, ExplorerVin, ExplorerVout};

    fn tx(vin_count: usize, vout_count: usize, watched: &str) -> ExplorerTransaction {
        let vin = (0..vin_count)
            .map(|i| ExplorerVin {
                prevout: Some(ExplorerPrevout {
                    scriptpubkey_address: Some(if i == 0 { "sender".to_string() } else { format!("other{i}") }),
                    value: 1_000,
                }),
            })
            .collect();
        let vout = (0..vout_count)
            .map(|i| ExplorerVout {
                scriptpubkey_address: Some(if i == 0 { watched.to_string() } else { format!("change{i}") }),
                value: 50_000_000,
            })
            .collect();
        ExplorerTransaction {
            txid: "tx1".to_string(),
            vin,
            vout,
            status: Some(ExplorerStatus { confirmed: true, block_time: Some(0) }),
        }
    }

    #[test]
    fn mixer_heuristic_fires_at_ten_and_ten() {
        let analysis = analyze_transaction(&tx(10, 10, "watched"), "watched");
        assert!(analysis.summaries.iter().all(|s| s.is_mixer));
    }

    #[test]
    fn below_threshold_is_not_a_mixer() {
        let analysis = analyze_transaction(&tx(3, 3, "watched"), "watched");
        assert!(analysis.summaries.iter().all(|s| !s.is_mixer));
    }

    #[test]
    fn inbound_amount_is_satoshi_scaled_to_btc() {
        let analysis = analyze_transaction(&tx(1, 1, "watched"), "watched");
        let inbound = analysis.summaries.iter().find(|s| s.direction == TxDirection::Inbound).unwrap();
        assert!((inbound.amount - 0.5).abs() < 1e-9);
    }

    #[test]
    fn edges_connect_every_input_to_every_distinct_output() {
        let analysis = analyze_transaction(&tx(2, 2, "watched"), "watched");
        assert_eq!(analysis.edges.len(), 4);
    }
}
