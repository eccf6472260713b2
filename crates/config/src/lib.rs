//! Observery listener configuration
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;
use url::Url;

/// Default path the webhook endpoint is mounted on.
pub const DEFAULT_WEBHOOK_PATH: &str = "/observery";

/// Observery API access options
#[derive(Debug, Clone, Parser)]
pub struct ObserveryOpts {
    /// Observery account username
    #[clap(long, env = "OBSERVERY_USERNAME")]
    pub username: String,
    /// Observery account password
    #[clap(long, env = "OBSERVERY_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Observery API root
    #[clap(long, env = "OBSERVERY_API_URL", default_value = observery::API_URL)]
    pub api_url: Url,
    /// Per-request timeout in seconds
    #[clap(long, env = "OBSERVERY_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,
}

/// Inbound webhook server options
#[derive(Debug, Clone, Parser)]
pub struct WebhookOpts {
    /// Address to bind the webhook server to
    #[clap(
        long = "webhook-host",
        env = "WEBHOOK_HOST",
        default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    )]
    pub host: IpAddr,
    /// Port to bind the webhook server to
    #[clap(long = "webhook-port", env = "WEBHOOK_PORT", default_value = "8080")]
    pub port: u16,
    /// Path the webhook endpoint is served on
    #[clap(long = "webhook-path", env = "WEBHOOK_PATH", default_value = DEFAULT_WEBHOOK_PATH)]
    pub path: String,
}

impl WebhookOpts {
    /// Socket address to listen on.
    pub const fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// CLI options for the webhook listener
#[derive(Debug, Clone, Parser)]
pub struct Opts {
    /// Observery API configuration
    #[clap(flatten)]
    pub observery: ObserveryOpts,

    /// Webhook server configuration
    #[clap(flatten)]
    pub webhook: WebhookOpts,
}
