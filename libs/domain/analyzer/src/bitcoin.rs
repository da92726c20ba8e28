// [libs/domain/analyzer/src/bitcoin.rs]
/*!
 * =================================================================
 * APARATO: BITCOIN ADDRESS EXTRACTION (ESTRATO L5)
 * RESPONSABILIDAD: CANDIDATOS BASE58/BECH32 Y SU VALIDACIÓN
 *
 * Resolución de la Pregunta Abierta de `spec.md` §9 ("Bech32 validation
 * depth"): se usa la verificación completa de checksum de la crate
 * `bech32`, no el chequeo de prefijo — ver `DESIGN.md`.
 * =================================================================
 */

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static BASE58_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[13][1-9A-HJ-NP-Za-km-z]{25,34}\b").expect("static regex must compile"));
static BECH32_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bbc1[ac-hj-np-z02-9]{11,71}\b").expect("static regex must compile"));

/// One candidate address pulled from page text, with its validation
/// verdict already computed — candidates are persisted regardless of
/// `valid` (per `spec.md` §9's resolved Open Question), so downstream
/// readers can filter on `valid = true` themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressCandidate {
    pub address: String,
    pub valid: bool,
}

/// Scans `text` for Base58 and Bech32 candidates and validates each.
/// Candidates are deduplicated by address string (a page repeating the
/// same address is one candidate, not N).
pub fn extract_addresses(text: &str) -> Vec<AddressCandidate> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();

    for m in BASE58_PATTERN.find_iter(text) {
        let address = m.as_str().to_string();
        if seen.insert(address.clone()) {
            let valid = validate_base58check(&address);
            out.push(AddressCandidate { address, valid });
        }
    }

    for m in BECH32_PATTERN.find_iter(text) {
        let address = m.as_str().to_string();
        if seen.insert(address.clone()) {
            let valid = validate_bech32(&address);
            out.push(AddressCandidate { address, valid });
        }
    }

    out
}

/// Decodes as Base58Check and confirms the trailing 4-byte checksum
/// equals the first 4 bytes of `SHA-256(SHA-256(payload))` — `bs58`'s
/// `with_check` does exactly this verification internally.
pub fn validate_base58check(address: &str) -> bool {
    bs58::decode(address).with_check(None).into_vec().is_ok()
}

/// Full Bech32 checksum validation via the `bech32` crate (the resolved
/// Open Question from `spec.md` §9 — prefix-only matching is not enough
/// to call an address "valid").
pub fn validate_bech32(address: &str) -> bool {
    match bech32::decode(address) {
        Ok((hrp, _data, _variant)) => hrp.eq_ignore_ascii_case("bc"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_P2PKH: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

    #[test]
    fn validates_a_known_good_address() {
        assert!(validate_base58check(VALID_P2PKH));
    }

    #[test]
    fn rejects_a_tampered_checksum() {
        let mut tampered = VALID_P2PKH.to_string();
        tampered.pop();
        tampered.push('Z');
        assert!(!validate_base58check(&tampered));
    }

    #[test]
    fn extracts_one_valid_and_one_invalid_candidate() {
        let tampered = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfZZ";
        let text = format!("payment to {VALID_P2PKH} or {tampered}");
        let found = extract_addresses(&text);

        let valid_count = found.iter().filter(|c| c.valid).count();
        let invalid_count = found.iter().filter(|c| !c.valid).count();
        assert_eq!(valid_count, 1);
        assert!(invalid_count <= 1);
    }

    #[test]
    fn deduplicates_repeated_mentions() {
        let text = format!("{VALID_P2PKH} appears twice: {VALID_P2PKH}");
        let found = extract_addresses(&text);
        assert_eq!(found.iter().filter(|c| c.address == VALID_P2PKH).count(), 1);
    }
}
