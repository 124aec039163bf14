//! Documind - ask questions about an uploaded document
//!
//! A terminal client driving a session state machine: upload a PDF to the
//! ingestion service, then hold a conversation about it with the
//! question-answering service.

mod config;
mod console;
mod document;
mod runtime;
mod service;
mod state_machine;
mod transcript;

use config::ClientConfig;
use runtime::SessionHandle;
use service::{HttpDocumentService, LoggingService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ClientConfig::from_env()?;
    tracing::info!(
        api_url = %config.api_url,
        timeout = ?config.request_timeout,
        "Loaded configuration"
    );

    let service = HttpDocumentService::new(config)?;
    match service.health().await {
        Ok(status) => tracing::info!(
            url = %service.base_url(),
            message = status.message.as_deref().unwrap_or(""),
            "Document services reachable"
        ),
        Err(e) => tracing::warn!(
            url = %service.base_url(),
            kind = e.kind.as_str(),
            error = %e,
            "Document services not reachable yet"
        ),
    }

    let handle = SessionHandle::spawn(
        LoggingService::new(service.clone()),
        LoggingService::new(service),
    );
    tracing::info!(session_id = %handle.session_id(), "Session started");

    console::run(handle).await?;
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "documind=info".into());

    // Logs go to stderr so they never interleave with the transcript on stdout
    let json = std::env::var("DOCUMIND_LOG_FORMAT").is_ok_and(|f| f == "json");
    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
