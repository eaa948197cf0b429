pub mod ai; // External AI capabilities: traits + Gemini client
pub mod auth; // Registration / login orchestration
pub mod config;
pub mod coordinator; // In-memory snapshot + active view + write-through persistence
pub mod journal; // Symptom journal engine: calendar grid + rolling metrics
pub mod models;
pub mod regimen; // Medication list transforms
pub mod store; // Local key-value document store behind an async trait
pub mod triage; // Status-header protocol parser + chat session

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and integration harnesses.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the
/// application default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("BreatheThrough core starting v{}", config::APP_VERSION);
}
