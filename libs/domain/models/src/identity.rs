// [libs/domain/models/src/identity.rs]
/*!
 * =================================================================
 * APARATO: URL NORMALIZER & IDENTITY (ESTRATO L0)
 * RESPONSABILIDAD: FUNCIONES PURAS DE CANONICALIZACIÓN Y HASHING
 *
 * Ningún otro estrato debe reimplementar estas reglas: `site_id` y
 * `page_id` derivan exclusivamente de `site_root`/`canonical` + `sha256_hex`.
 * =================================================================
 */

use sha2::{Digest, Sha256};

/// Digests the UTF-8 bytes of `value` with SHA-256 and renders lowercase hex.
pub fn sha256_hex(value: &str) -> String {
    sha256_hex_bytes(value.as_bytes())
}

/// Digests opaque bytes with SHA-256 and renders lowercase hex — used for
/// `html_hash`, where the input is raw page content and must be hashed
/// byte-for-byte, never routed through a lossy UTF-8 decode first.
pub fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// Returns scheme + lowercased host, with no path/query/fragment — the
/// identity of a site independent of any one page.
///
/// Falls back to the raw (trimmed) input when the URL cannot be parsed as
/// `scheme://host[...]`; callers that need a hard guarantee of validity
/// should check `is_onion_host` first.
pub fn site_root(url: &str) -> String {
    let trimmed = url.trim();
    match split_scheme_host(trimmed) {
        Some((scheme, rest)) => {
            let (host, _) = split_host_path(rest);
            format!("{}://{}", scheme.to_lowercase(), host.to_lowercase())
        }
        None => trimmed.trim_end_matches('/').to_string(),
    }
}

/// Like `site_root`, but for a full page URL: strips a trailing index
/// document (`index.html`, `index.htm`, `index.php`) and a trailing slash,
/// except when the result would be the bare site root.
pub fn canonical(url: &str) -> String {
    let trimmed = url.trim();
    let Some((scheme, rest)) = split_scheme_host(trimmed) else {
        return trimmed.trim_end_matches('/').to_string();
    };

    let (host, path_and_more) = split_host_path(rest);
    let mut path = path_and_more.to_string();

    for index_doc in ["/index.html", "/index.htm", "/index.php"] {
        if path == index_doc {
            path = String::new();
            break;
        }
        if let Some(stripped) = path.strip_suffix(index_doc) {
            path = stripped.to_string();
        }
    }

    if path.len() > 1 {
        path = path.trim_end_matches('/').to_string();
    }

    format!("{}://{}{}", scheme, host.to_lowercase(), path)
}

/// True when the URL's host contains `.onion` — the crawler's and seed
/// collector's scoping gate. Other stages (Store, Analyzer, Correlator)
/// accept arbitrary URLs; this function is not consulted there.
pub fn is_onion_host(url: &str) -> bool {
    match split_scheme_host(url.trim()) {
        Some((_, rest)) => {
            let (host, _) = split_host_path(rest);
            host.to_lowercase().contains(".onion")
        }
        None => false,
    }
}

fn split_scheme_host(url: &str) -> Option<(&str, &str)> {
    let idx = url.find("://")?;
    let scheme = &url[..idx];
    let rest = &url[idx + 3..];
    if scheme.is_empty() || rest.is_empty() {
        return None;
    }
    Some((scheme, rest))
}

fn split_host_path(rest: &str) -> (&str, &str) {
    match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_root_strips_path_and_lowercases_host() {
        assert_eq!(
            site_root("HTTP://Example.ONION/a/b?x=1#frag"),
            "http://example.onion"
        );
    }

    #[test]
    fn canonical_strips_trailing_index_and_slash() {
        assert_eq!(canonical("http://example.onion/a/index.html"), "http://example.onion/a");
        assert_eq!(canonical("http://example.onion/a/"), "http://example.onion/a");
        assert_eq!(canonical("http://example.onion/"), "http://example.onion/");
        assert_eq!(canonical("http://example.onion"), "http://example.onion");
    }

    #[test]
    fn is_onion_host_detects_onion_suffix() {
        assert!(is_onion_host("http://abcdefgh.onion/a"));
        assert!(!is_onion_host("https://example.com/a"));
        assert!(!is_onion_host("not-a-url"));
    }

    #[test]
    fn sha256_hex_is_stable() {
        assert_eq!(
            sha256_hex("http://example.onion"),
            sha256_hex("http://example.onion")
        );
        assert_ne!(sha256_hex("a"), sha256_hex("b"));
    }
}
