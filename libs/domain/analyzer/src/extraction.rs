// [libs/domain/analyzer/src/extraction.rs]
/*!
 * =================================================================
 * APARATO: METADATA EXTRACTION (ESTRATO L5)
 * RESPONSABILIDAD: FUNCIONES PURAS SOBRE BYTES DE PÁGINA
 *
 * Ninguna función de este módulo toca el Store; todas son deterministas
 * sobre `&[u8]`/`&str` de entrada, lo que las hace triviales de testear
 * y seguras de ejecutar sobre HTML arbitrario (incluyendo vacío o roto).
 * =================================================================
 */

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use sha1::{Digest, Sha1};

use onyx_domain_models::PageMetadata;

static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta").expect("static selector must compile"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("static selector must compile"));
static SCRIPT_STYLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script, style").expect("static selector must compile"));

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("static regex must compile")
});

static XMR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[48][0-9A-Za-z]{94,105}\b").expect("static regex must compile"));

static HANDLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:vendor|seller|dealer|admin|operator)\s*:?\s*([A-Za-z0-9_-]{3,30})")
        .expect("static regex must compile")
});

const PGP_BEGIN: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----";
const PGP_END: &str = "-----END PGP PUBLIC KEY BLOCK-----";

/// Runs every extraction rule of `spec.md` §4.7 over one page's raw bytes
/// and returns a fully-populated `PageMetadata`. Never panics, never
/// returns an `Err` — a page that fails to parse as HTML still yields
/// whatever fields a looser pass can recover (title/meta default to
/// empty, `scraper::Html::parse_document` itself never fails on
/// malformed markup).
pub fn extract_metadata(page_id: &str, raw_html: &[u8]) -> PageMetadata {
    let text = String::from_utf8_lossy(raw_html);
    let document = Html::parse_document(&text);

    let mut metadata = PageMetadata::new(page_id);
    metadata.title = extract_title(&document);
    metadata.meta_tags = extract_meta_tags(&document);
    metadata.emails = extract_emails(&text);
    metadata.pgp_keys = extract_pgp_blocks(&text);
    metadata.pgp_fingerprints = metadata.pgp_keys.iter().map(|block| sha1_hex(block.as_bytes())).collect();
    metadata.xmr_addresses = extract_xmr_addresses(&text);
    metadata.vendor_handles = extract_vendor_handles(&text);
    metadata.language = detect_language(&text);
    metadata
}

fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `name|property` → `content`, over every `<meta>` element that supplies
/// both attributes.
fn extract_meta_tags(document: &Html) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for el in document.select(&META_SELECTOR) {
        let value = el.value();
        let key = value.attr("name").or_else(|| value.attr("property"));
        if let (Some(key), Some(content)) = (key, value.attr("content")) {
            out.insert(key.to_string(), content.to_string());
        }
    }
    out
}

fn extract_emails(text: &str) -> BTreeSet<String> {
    EMAIL_PATTERN.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Armored blocks between `-----BEGIN PGP PUBLIC KEY BLOCK-----` and
/// `-----END PGP PUBLIC KEY BLOCK-----`, markers included — the
/// fingerprint is taken over exactly these bytes.
fn extract_pgp_blocks(text: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let mut rest = text;
    while let Some(start) = rest.find(PGP_BEGIN) {
        let after_begin = &rest[start..];
        if let Some(end) = after_begin.find(PGP_END) {
            let block_end = end + PGP_END.len();
            out.insert(after_begin[..block_end].to_string());
            rest = &after_begin[block_end..];
        } else {
            break;
        }
    }
    out
}

fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn extract_xmr_addresses(text: &str) -> BTreeSet<String> {
    XMR_PATTERN.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

fn extract_vendor_handles(text: &str) -> BTreeSet<String> {
    HANDLE_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Common-word heuristic over the first 5000 characters: counts stop-word
/// hits per language and returns the plurality winner, or `"unknown"` when
/// nothing scores. Restores the original implementation's best-effort
/// intent (it used `langdetect`, which has no maintained Rust equivalent
/// in this workspace's dependency pack) without adding a new dependency.
fn detect_language(text: &str) -> String {
    const STOPWORDS: &[(&str, &[&str])] = &[
        ("en", &["the", "and", "you", "with", "for", "this", "that"]),
        ("es", &["el", "la", "que", "de", "para", "con", "los"]),
        ("de", &["der", "die", "und", "das", "mit", "nicht", "fuer"]),
        ("fr", &["le", "la", "et", "vous", "pour", "avec", "que"]),
        ("ru", &["и", "в", "не", "на", "что", "как", "это"]),
    ];

    let window: String = text.chars().take(5000).collect::<String>().to_lowercase();
    let words: BTreeSet<&str> = window.split_whitespace().collect();

    let mut best: Option<(&str, usize)> = None;
    for (lang, markers) in STOPWORDS {
        let score = markers.iter().filter(|m| words.contains(*m)).count();
        if score > 0 && best.map(|(_, best_score)| score > best_score).unwrap_or(true) {
            best = Some((lang, score));
        }
    }

    best.map(|(lang, _)| lang.to_string()).unwrap_or_else(|| "unknown".to_string())
}

/// Lowercased visible text with `<script>`/`<style>` subtrees removed —
/// shared by the Classifier (`spec.md` §4.11), exposed here since it is
/// the same "strip markup noise" rule as metadata extraction's plain-text
/// view.
pub fn strip_scripts_and_styles(raw_html: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw_html);
    let document = Html::parse_document(&text);

    let mut out = String::new();
    let skip: std::collections::HashSet<_> = document
        .select(&SCRIPT_STYLE_SELECTOR)
        .flat_map(|el| el.descendants().map(|d| d.id()))
        .collect();

    for node in document.root_element().descendants() {
        if skip.contains(&node.id()) {
            continue;
        }
        if let Some(fragment) = node.value().as_text() {
            out.push_str(fragment);
            out.push(' ');
        }
    }
    out.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_html_yields_empty_artifact_set_without_panicking() {
        let metadata = extract_metadata("p1", b"");
        assert!(metadata.title.is_none());
        assert!(metadata.emails.is_empty());
        assert!(metadata.pgp_keys.is_empty());
        assert_eq!(metadata.language, "unknown");
    }

    #[test]
    fn extracts_title_and_meta_tags() {
        let html = br#"<html><head><title> Market </title>
            <meta name="description" content="onion market"></head></html>"#;
        let metadata = extract_metadata("p1", html);
        assert_eq!(metadata.title.as_deref(), Some("Market"));
        assert_eq!(metadata.meta_tags.get("description").map(String::as_str), Some("onion market"));
    }

    #[test]
    fn extracts_email_and_handle() {
        let html = b"contact vendor: shadow_broker or email admin@example.onion";
        let metadata = extract_metadata("p1", html);
        assert!(metadata.emails.contains("admin@example.onion"));
        assert!(metadata.vendor_handles.contains("shadow_broker"));
    }

    #[test]
    fn pgp_block_and_fingerprint_round_trip() {
        let block = format!("{PGP_BEGIN}\nmDMEY\n{PGP_END}");
        let html = format!("<p>{block}</p>");
        let metadata = extract_metadata("p1", html.as_bytes());
        assert_eq!(metadata.pgp_keys.len(), 1);
        assert_eq!(metadata.pgp_fingerprints.len(), 1);
        assert_eq!(
            metadata.pgp_fingerprints.iter().next().unwrap(),
            &sha1_hex(block.as_bytes())
        );
    }

    #[test]
    fn detects_english_over_stopwords() {
        let html = b"<p>the quick fox and you with this and that for the market</p>";
        let metadata = extract_metadata("p1", html);
        assert_eq!(metadata.language, "en");
    }
}
