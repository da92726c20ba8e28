// [libs/infra/link-manager/src/lib.rs]
/*!
 * =================================================================
 * APARATO: LINK MANAGER (ESTRATO L4 — COLAS DE DESCUBRIMIENTO)
 * RESPONSABILIDAD: FRONTERA DE RASTREO EN MEMORIA, PROPIEDAD ÚNICA
 *
 * Este aparato no serializa acceso internamente: es propiedad exclusiva
 * del worker Crawler (§5 del pipeline — "LinkManager queues are
 * single-owner"). Cualquier otro llamador (Seed Collector) debe invocar
 * sus métodos a través de ese único propietario.
 * =================================================================
 */

use std::collections::{HashMap, HashSet, VecDeque};

use onyx_domain_models::identity::{canonical, site_root};
use tracing::{debug, info};

/// An outer (site-level) queue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OuterLink {
    pub site_root: String,
    pub source: String,
}

/// An inner (page-level) queue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerLink {
    pub url: String,
    pub depth: u32,
}

pub struct LinkManagerConfig {
    pub max_depth: u32,
    pub max_inner_per_site: u32,
}

impl Default for LinkManagerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_inner_per_site: 50,
        }
    }
}

/// The crawl frontier: two FIFO queues, two dedup sets, and a per-site
/// fan-out counter. Not `Sync`/shareable by design — see module docs.
pub struct LinkManager {
    sites_queue: VecDeque<OuterLink>,
    pages_queue: VecDeque<InnerLink>,
    visited_sites: HashSet<String>,
    visited_pages: HashSet<String>,
    per_domain_count: HashMap<String, u32>,
    config: LinkManagerConfig,
}

impl LinkManager {
    pub fn new(config: LinkManagerConfig) -> Self {
        Self {
            sites_queue: VecDeque::new(),
            pages_queue: VecDeque::new(),
            visited_sites: HashSet::new(),
            visited_pages: HashSet::new(),
            per_domain_count: HashMap::new(),
            config,
        }
    }

    /// Enqueues a site root if not already visited. Returns whether it was
    /// newly added.
    pub fn add_site(&mut self, url: &str, source: impl Into<String>) -> bool {
        let root = site_root(url);
        if self.visited_sites.contains(&root) {
            return false;
        }
        self.visited_sites.insert(root.clone());
        self.sites_queue.push_back(OuterLink {
            site_root: root.clone(),
            source: source.into(),
        });
        debug!("🌍 [LINKMANAGER]: queued site root {root}");
        true
    }

    /// Enqueues a page URL at `depth`, applying the depth cap, the
    /// per-site fan-out cap, and the visited-pages dedup set, in that
    /// order. Returns whether it was accepted.
    pub fn add_inner_page(&mut self, url: &str, depth: u32) -> bool {
        if depth > self.config.max_depth {
            return false;
        }

        let root = site_root(url);
        let count = self.per_domain_count.get(&root).copied().unwrap_or(0);
        if count >= self.config.max_inner_per_site {
            return false;
        }

        let normalized = canonical(url);
        if self.visited_pages.contains(&normalized) {
            return false;
        }

        self.visited_pages.insert(normalized.clone());
        *self.per_domain_count.entry(root).or_insert(0) += 1;
        self.pages_queue.push_back(InnerLink {
            url: normalized.clone(),
            depth,
        });
        debug!("↳ [LINKMANAGER]: queued inner page (depth={depth}) {normalized}");
        true
    }

    /// Reload hook: seeds the outer queue with every site root the caller
    /// determined is stale (null or older-than-horizon `last_seen`) —
    /// callers fetch the stale list from `onyx_infra_store::SiteRepository`
    /// and pass each root through here so dedup bookkeeping stays correct.
    pub fn reload_stale_site(&mut self, site_root_url: &str) -> bool {
        self.add_site(site_root_url, "Reload")
    }

    pub fn has_inner_links(&self) -> bool {
        !self.pages_queue.is_empty()
    }

    pub fn pop_inner_link(&mut self) -> Option<InnerLink> {
        self.pages_queue.pop_front()
    }

    pub fn has_outer_links(&self) -> bool {
        !self.sites_queue.is_empty()
    }

    pub fn pop_outer_link(&mut self) -> Option<OuterLink> {
        self.sites_queue.pop_front()
    }

    pub fn inner_queue_len(&self) -> usize {
        self.pages_queue.len()
    }

    pub fn outer_queue_len(&self) -> usize {
        self.sites_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> LinkManager {
        LinkManager::new(LinkManagerConfig {
            max_depth: 1,
            max_inner_per_site: 2,
        })
    }

    #[test]
    fn add_site_is_idempotent_against_duplicates() {
        let mut lm = manager();
        assert!(lm.add_site("http://a.onion/x", "Seed"));
        assert!(!lm.add_site("http://a.onion/y", "Seed"));
        assert_eq!(lm.outer_queue_len(), 1);
    }

    #[test]
    fn add_inner_page_rejects_beyond_depth_cap() {
        let mut lm = manager();
        assert!(lm.add_inner_page("http://a.onion/x", 1));
        assert!(!lm.add_inner_page("http://a.onion/y", 2));
    }

    #[test]
    fn add_inner_page_rejects_beyond_fan_out_cap() {
        let mut lm = manager();
        assert!(lm.add_inner_page("http://a.onion/1", 0));
        assert!(lm.add_inner_page("http://a.onion/2", 0));
        assert!(!lm.add_inner_page("http://a.onion/3", 0));
        assert_eq!(lm.inner_queue_len(), 2);
    }

    #[test]
    fn add_inner_page_dedupes_on_canonical_form() {
        let mut lm = manager();
        assert!(lm.add_inner_page("http://a.onion/x/", 0));
        assert!(!lm.add_inner_page("http://a.onion/x", 0));
    }
}
