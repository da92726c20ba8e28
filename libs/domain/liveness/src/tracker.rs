// [libs/domain/liveness/src/tracker.rs]
/*!
 * =================================================================
 * APARATO: LIVENESS TRACKER (ESTRATO L5)
 * RESPONSABILIDAD: BARRIDO DEL REGISTRO DE SITIOS
 *
 * Sin cadencia interna (`spec.md` §4.10: "Designed to be scheduled
 * externally"); `sweep()` es una sola pasada, invocada por el proceso
 * orquestador o por un cron externo.
 * =================================================================
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use onyx_domain_models::{Liveness, SiteStatus};
use onyx_infra_proxy_client::ProxyClient;
use onyx_infra_store::{LivenessRepository, SiteRepository};
use rand::Rng;
use tokio::sync::Semaphore;
use tracing::{instrument, warn};

use crate::errors::LivenessResult;

#[derive(Debug, Clone)]
pub struct LivenessConfig {
    pub concurrency: usize,
    pub jitter_min_secs: f64,
    pub jitter_max_secs: f64,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            jitter_min_secs: 0.3,
            jitter_max_secs: 1.2,
        }
    }
}

pub struct LivenessTracker {
    sites: SiteRepository,
    liveness: LivenessRepository,
    proxy: ProxyClient,
    config: LivenessConfig,
}

impl LivenessTracker {
    pub fn new(sites: SiteRepository, liveness: LivenessRepository, proxy: ProxyClient, config: LivenessConfig) -> Self {
        Self { sites, liveness, proxy, config }
    }

    /// One full pass over every registered site, bounded by a semaphore of
    /// `config.concurrency` permits; each probe waits a random jitter
    /// before firing to avoid a thundering herd against the onion
    /// services. Returns the number of sites probed.
    #[instrument(skip(self))]
    pub async fn sweep(&self) -> LivenessResult<usize> {
        let sites = self.sites.all_sites().await?;
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));

        let jitter_min = self.config.jitter_min_secs;
        let jitter_max = self.config.jitter_max_secs;

        let results = stream::iter(sites.into_iter().map(|site| {
            let semaphore = semaphore.clone();
            let liveness = self.liveness.clone();
            let proxy = self.proxy.clone();
            async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
                let jitter = rand::thread_rng().gen_range(jitter_min..=jitter_max);
                tokio::time::sleep(Duration::from_secs_f64(jitter)).await;

                let (status, response_time) = probe(&proxy, &site.url).await;

                let observation = Liveness::new(site.site_id.clone(), status, response_time);
                if let Err(error) = liveness.record(&observation).await {
                    warn!(site_id = %site.site_id, %error, "💥 failed to record liveness observation");
                }
            }
        }))
        .buffer_unordered(self.config.concurrency.max(1))
        .count()
        .await;

        Ok(results)
    }
}

/// Fetches `url` through the liveness timeout profile and classifies the
/// outcome, mirroring the Crawler's HTTP/timeout taxonomy (`spec.md` §4.6).
async fn probe(proxy: &ProxyClient, url: &str) -> (SiteStatus, Option<f64>) {
    let started = Instant::now();
    match proxy.fetch_liveness(url).await {
        Ok(response) => {
            let elapsed = started.elapsed().as_secs_f64();
            let status = response.status();
            if status.is_success() || status.is_redirection() {
                (SiteStatus::Alive, Some(elapsed))
            } else {
                (SiteStatus::Dead, Some(elapsed))
            }
        }
        Err(error) => {
            let message = error.to_string().to_lowercase();
            let status = if message.contains("timeout") || message.contains("timed out") {
                SiteStatus::Timeout
            } else {
                SiteStatus::Error
            };
            (status, None)
        }
    }
}
