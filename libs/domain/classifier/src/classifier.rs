// [libs/domain/classifier/src/classifier.rs]
/*!
 * =================================================================
 * APARATO: SITE CLASSIFIER (ESTRATO L5)
 * RESPONSABILIDAD: ETIQUETADO DE SITIOS POR DICCIONARIO DE PALABRAS CLAVE
 * =================================================================
 */

use onyx_domain_analyzer::strip_scripts_and_styles;
use onyx_domain_models::Classification;
use onyx_infra_store::{ClassificationRepository, PageRepository, SiteRepository};
use tracing::{info, instrument};

use crate::errors::ClassifierResult;
use crate::scoring::{pick_label, score_categories, CategoryDictionary};

/// Pages below this many raw bytes are considered too thin to carry a
/// reliable category signal (`spec.md` §4.11: ">200 bytes threshold").
const MIN_PAGE_BYTES: usize = 200;

/// Cap on how many of a site's most recent pages feed the classifier.
const MAX_PAGES_CONSIDERED: usize = 3;

/// How many pages to pull before filtering by size, so the size filter
/// doesn't starve the classifier when a site's newest pages are thin.
const PAGE_FETCH_WINDOW: u32 = 10;

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub dictionary: CategoryDictionary,
    pub accept_threshold: f64,
}

pub struct Classifier {
    pages: PageRepository,
    sites: SiteRepository,
    classifications: ClassificationRepository,
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(
        pages: PageRepository,
        sites: SiteRepository,
        classifications: ClassificationRepository,
        config: ClassifierConfig,
    ) -> Self {
        Self { pages, sites, classifications, config }
    }

    /// Classifies one site, persists the verdict, and — if the label is
    /// not `"unknown"` and differs from the site's current keyword —
    /// updates the site's category and logs the transition.
    #[instrument(skip(self))]
    pub async fn classify_site(&self, site_id: &str) -> ClassifierResult<Classification> {
        let candidates = self.pages.list_for_site(site_id, PAGE_FETCH_WINDOW).await?;
        let text: String = candidates
            .into_iter()
            .filter(|page| page.raw_html.len() > MIN_PAGE_BYTES)
            .take(MAX_PAGES_CONSIDERED)
            .map(|page| strip_scripts_and_styles(&page.raw_html))
            .collect::<Vec<_>>()
            .join(" ");

        let scores = score_categories(&text, &self.config.dictionary);
        let (label, confidence) = pick_label(&scores, self.config.accept_threshold);

        let classification = Classification::new(site_id, label.clone(), confidence);
        self.classifications.upsert(&classification).await?;

        if label != "unknown" {
            if let Some(site) = self.sites.get(site_id).await? {
                if site.keyword != label {
                    self.sites.update_keyword(site_id, &label).await?;
                    info!(site_id, from = %site.keyword, to = %label, "🏷️ site category transitioned");
                }
            }
        }

        Ok(classification)
    }
}
