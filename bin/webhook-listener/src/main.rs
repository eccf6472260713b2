//! Webhook listener binary
//!
//! Checks the configured credentials against the observery API, then serves
//! the webhook endpoint and logs every state change observery reports.

use std::time::Duration;

use axum::{Json, Router, routing::get};
use clap::Parser;
use config::Opts;
use dotenvy::dotenv;
use observery::{CheckState, Client, Webhook, webhook};
use serde_json::{Value, json};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::filter::EnvFilter;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn on_webhook(result: observery::Result<Webhook>) {
    match result {
        Ok(hook) => info!(
            check_id = hook.check_id,
            check_name = %hook.check_name,
            check_type = %hook.check_type,
            state = %hook.state,
            http_status_code = ?hook.http_status_code,
            response_time_ms = ?hook.response_time.map(|d| d.as_millis()),
            timed_out = hook.timed_out,
            details = %hook.details,
            "Check changed state"
        ),
        Err(e) => warn!(error = %e, "Discarded malformed webhook"),
    }
}

fn router(path: &str) -> Router {
    let path = if path.starts_with('/') { path.to_owned() } else { format!("/{path}") };
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health))
        .route(&path, webhook::handler(on_webhook))
        .layer(trace)
}

/// Log a summary of the account's checks, or why they could not be listed.
async fn report_checks(client: &Client) {
    match client.checks().list().await {
        Ok(env) if env.success => {
            let checks = env.result.unwrap_or_default();
            let down = checks.iter().filter(|c| c.state == CheckState::Down).count();
            info!(
                username = client.credentials().username(),
                checks = checks.len(),
                down,
                "Connected to observery"
            );
        }
        Ok(env) => warn!(reason = ?env.reason, "Observery rejected the configured credentials"),
        Err(e) => warn!(error = %e, api = client.base_url(), "Could not reach observery"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down webhook listener");
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let client = Client::with_base_url(
        opts.observery.username,
        opts.observery.password,
        opts.observery.api_url,
    )
    .with_timeout(Duration::from_secs(opts.observery.timeout_secs));
    report_checks(&client).await;

    let addr = opts.webhook.addr();
    info!(%addr, path = %opts.webhook.path, "Starting webhook listener");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(&opts.webhook.path))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn health_reports_ok() {
        let response = router("/observery")
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn webhook_path_without_slash_is_mounted() {
        let response = router("hooks")
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/hooks")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("checkId=1&checkType=http&state=up&code=200&timedOut=no"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
