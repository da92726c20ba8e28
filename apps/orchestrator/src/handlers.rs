// [apps/orchestrator/src/handlers.rs]
/*!
 * =================================================================
 * APARATO: CRAWL CONTROL HANDLERS (ESTRATO L3)
 * RESPONSABILIDAD: SUPERFICIE HTTP START/STOP/STATUS
 * =================================================================
 */

use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use onyx_domain_crawler::{Crawler, CrawlerConfig};
use onyx_domain_models::SiteStatus;
use onyx_domain_seed::{submit_discoveries, SeedCollector, SeedSource};
use onyx_infra_link_manager::{LinkManager, LinkManagerConfig};
use onyx_infra_store::{PageRepository, SiteRepository};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::state::{AppState, CrawlPhase};

#[derive(Debug, Deserialize)]
pub struct StartCrawlRequest {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub manual_urls: Vec<String>,
    pub crawl_depth: Option<u32>,
    pub polite_delay_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CrawlStatusResponse {
    pub state: String,
    pub progress: u8,
    pub message: String,
}

/// `POST /v1/crawl/start` — seeds the link frontier from the request's
/// keywords and manual URLs, then spawns the crawler task if one is not
/// already running (`SPEC_FULL.md` §6).
#[instrument(skip(state, payload))]
pub async fn start_crawl(State(state): State<AppState>, Json(payload): Json<StartCrawlRequest>) -> impl IntoResponse {
    {
        let crawl = state.crawl.lock().await;
        if matches!(crawl.phase, CrawlPhase::Starting | CrawlPhase::Running) {
            return (
                StatusCode::CONFLICT,
                Json(CrawlStatusResponse {
                    state: "running".to_string(),
                    progress: 0,
                    message: "a crawl is already in progress".to_string(),
                }),
            );
        }
    }

    {
        let mut crawl = state.crawl.lock().await;
        crawl.phase = CrawlPhase::Starting;
        crawl.message = "seeding link frontier".to_string();
    }

    let sites = SiteRepository::new(state.store.clone());
    let mut link_manager = LinkManager::new(LinkManagerConfig {
        max_depth: payload.crawl_depth.unwrap_or(state.config.crawl_max_depth),
        ..LinkManagerConfig::default()
    });

    let search_client = reqwest::Client::new();
    let seed_collector = SeedCollector::new(search_client, state.config.search_endpoint_template.clone());

    for keyword in &payload.keywords {
        match seed_collector.collect(&SeedSource::Keyword(keyword.clone())).await {
            Ok(urls) => {
                if let Err(error) = submit_discoveries(&mut link_manager, &sites, &urls, "Keyword", keyword).await {
                    warn!(%keyword, %error, "💥 failed to submit keyword-sourced discoveries");
                }
            }
            Err(error) => warn!(%keyword, %error, "💥 keyword seed collection failed"),
        }
    }

    for manual_url in &payload.manual_urls {
        let urls = match seed_collector.collect(&SeedSource::Operator(manual_url.clone())).await {
            Ok(urls) => urls,
            Err(error) => {
                warn!(%manual_url, %error, "💥 operator seed collection failed");
                continue;
            }
        };
        if let Err(error) = submit_discoveries(&mut link_manager, &sites, &urls, "Operator", "").await {
            warn!(%manual_url, %error, "💥 failed to submit operator-sourced discoveries");
        }
    }

    let pages = PageRepository::new(state.store.clone());
    let crawler_config = CrawlerConfig {
        max_depth: payload.crawl_depth.unwrap_or(state.config.crawl_max_depth),
        polite_delay: payload
            .polite_delay_ms
            .map(std::time::Duration::from_millis)
            .unwrap_or_else(|| state.config.polite_delay()),
        ..CrawlerConfig::default()
    };
    let crawler = Crawler::new(state.proxy.clone(), sites, pages, crawler_config);
    let stop_flag = crawler.stop_handle();

    {
        let mut crawl = state.crawl.lock().await;
        crawl.phase = CrawlPhase::Running;
        crawl.message = "crawl in progress".to_string();
        crawl.stop_flag = Some(stop_flag);
    }

    let crawl_state = state.crawl.clone();
    tokio::spawn(async move {
        let outcome = crawler.run(&mut link_manager).await;
        let mut crawl = crawl_state.lock().await;
        crawl.stop_flag = None;
        match outcome {
            Ok(()) => {
                crawl.phase = CrawlPhase::Stopped;
                crawl.message = "crawl stopped".to_string();
                info!("🏁 crawl task exited cleanly");
            }
            Err(error) => {
                crawl.phase = CrawlPhase::Error;
                crawl.message = format!("crawl task failed: {error}");
                error!(%error, "💥 crawl task exited with an error");
            }
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(CrawlStatusResponse {
            state: "starting".to_string(),
            progress: 0,
            message: "crawl started".to_string(),
        }),
    )
}

/// `POST /v1/crawl/stop` — flips the stop flag; the crawler exits at its
/// next loop boundary, never mid-fetch or mid-transaction.
#[instrument(skip(state))]
pub async fn stop_crawl(State(state): State<AppState>) -> impl IntoResponse {
    let mut crawl = state.crawl.lock().await;
    match &crawl.stop_flag {
        Some(flag) => {
            flag.store(true, Ordering::Relaxed);
            crawl.message = "stop requested".to_string();
            (StatusCode::ACCEPTED, Json(CrawlStatusResponse {
                state: "stopping".to_string(),
                progress: 0,
                message: "stop requested".to_string(),
            }))
        }
        None => (
            StatusCode::CONFLICT,
            Json(CrawlStatusResponse {
                state: "idle".to_string(),
                progress: 0,
                message: "no crawl is running".to_string(),
            }),
        ),
    }
}

/// `GET /v1/crawl/status` — progress is a best-effort heuristic: the
/// fraction of registered sites that have been probed at least once
/// (`current_status != Unknown`), clamped to `[0, 100]`
/// (`SPEC_FULL.md` §6 — explicitly not a completeness guarantee).
#[instrument(skip(state))]
pub async fn crawl_status(State(state): State<AppState>) -> impl IntoResponse {
    let crawl = state.crawl.lock().await;
    let phase = crawl.phase;
    let message = crawl.message.clone();
    drop(crawl);

    let sites = SiteRepository::new(state.store.clone());
    let progress = match sites.all_sites().await {
        Ok(records) => crawl_progress(&records),
        Err(error) => {
            warn!(%error, "💥 failed to read site registry for progress estimate");
            0
        }
    };

    let state_label = match phase {
        CrawlPhase::Idle => "idle",
        CrawlPhase::Starting => "starting",
        CrawlPhase::Running => "running",
        CrawlPhase::Completed => "completed",
        CrawlPhase::Stopped => "stopped",
        CrawlPhase::Error => "error",
    };

    Json(CrawlStatusResponse {
        state: state_label.to_string(),
        progress,
        message,
    })
}

fn crawl_progress(sites: &[onyx_domain_models::SiteRecord]) -> u8 {
    if sites.is_empty() {
        return 0;
    }
    let visited = sites.iter().filter(|s| s.current_status != SiteStatus::Unknown).count();
    ((visited as f64 / sites.len() as f64) * 100.0).clamp(0.0, 100.0) as u8
}
