// [libs/shared/telemetry/src/lib.rs]
/*!
 * =================================================================
 * APARATO: TELEMETRY (ESTRATO L4 — COMPARTIDO)
 * RESPONSABILIDAD: INICIALIZACIÓN DE TRAZADO Y CAPTURA DE PÁNICOS
 * =================================================================
 */

use std::panic;

use tracing::{error, info, instrument};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Loads `.env` (if present) and wires a global `tracing` subscriber.
/// Development builds get compact, human-readable output; release builds
/// get flattened JSON for log ingestion. A panic hook logs the location
/// and payload of any thread panic before the default hook runs.
#[instrument(skip_all)]
pub fn init_tracing(service_name: &str) {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if cfg!(debug_assertions) { "debug" } else { "info" };
        format!("{service_name}={level},tower_http=warn,hyper=warn,libsql=error").into()
    });

    if cfg!(debug_assertions) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().flatten_event(true))
            .init();
    }

    let service = service_name.to_string();
    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");
        error!(target: "panic", service = %service, %location, "thread panicked: {payload}");
    }));

    info!(service_name, "📡 telemetry initialized");
}
