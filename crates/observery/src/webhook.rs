//! Decoder and axum handler for the webhooks observery posts on state changes.

use std::{collections::HashSet, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::{MethodRouter, post},
};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::{
    check::{CheckState, CheckType},
    error::{Error, Result},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One webhook delivery.
///
/// `checkId`, `checkType` and `state` (or `status`) are required; a delivery
/// missing any of them fails with [`Error::FieldDecode`]. Every other field
/// falls back to its default when absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    /// Id of the check that changed state.
    pub check_id: u64,
    #[serde(default)]
    pub check_name: String,
    pub check_type: CheckType,
    #[serde(rename = "state", alias = "status")]
    pub state: CheckState,
    /// Status code returned by the endpoint, for `http` checks.
    #[serde(default, rename = "httpStatusCode", alias = "code")]
    pub http_status_code: Option<u16>,
    #[serde(default, deserialize_with = "duration_with_unit")]
    pub response_time: Option<Duration>,
    /// Whether the probe gave up waiting for a response.
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub details: String,
}

impl Webhook {
    /// Decode a delivery from its `Content-Type` header and raw body.
    pub fn decode(content_type: Option<&str>, body: &[u8]) -> Result<Self> {
        if let Some(content_type) = content_type {
            let mime = content_type.split(';').next().unwrap_or_default().trim();
            if !mime.eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
                return Err(Error::FormParse(format!("unexpected content type {content_type:?}")));
            }
        }
        Self::from_form(body)
    }

    /// Decode a form-encoded delivery body.
    pub fn from_form(body: &[u8]) -> Result<Self> {
        std::str::from_utf8(body).map_err(|e| Error::FormParse(e.to_string()))?;
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(body).map_err(|e| Error::FormParse(e.to_string()))?;
        let normalized = serde_urlencoded::to_string(normalize(pairs))
            .map_err(|e| Error::FormParse(e.to_string()))?;
        Ok(serde_urlencoded::from_str(&normalized)?)
    }
}

/// Rewrite the fields observery sends in shapes the typed decoder cannot
/// read: `responseTime` is bare milliseconds and `timedOut` is `yes`/`no`.
/// `status` and `code` are folded into `state` and `httpStatusCode`, and only
/// the first value of each field is kept. Empty values are dropped so they
/// decode as absent.
fn normalize(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut timed_out = false;
    let mut out = Vec::with_capacity(pairs.len() + 1);
    for (key, value) in pairs {
        if value.is_empty() {
            continue;
        }
        let key = match key.as_str() {
            "status" => "state".to_owned(),
            "code" => "httpStatusCode".to_owned(),
            _ => key,
        };
        if !seen.insert(key.clone()) {
            continue;
        }
        match key.as_str() {
            "timedOut" => timed_out = value.eq_ignore_ascii_case("yes"),
            "responseTime" if value.bytes().all(|b| b.is_ascii_digit() || b == b'.') => {
                out.push((key, format!("{value}ms")));
            }
            _ => out.push((key, value)),
        }
    }
    out.push(("timedOut".to_owned(), timed_out.to_string()));
    out
}

/// Parse a duration of the form `<number><unit>`, unit one of `ms`, `s`.
/// Fractions are kept down to the nanosecond.
fn parse_duration(value: &str) -> Option<Duration> {
    let (amount, nanos_per_unit) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1e6)
    } else if let Some(secs) = value.strip_suffix('s') {
        (secs, 1e9)
    } else {
        return None;
    };
    let nanos = (amount.parse::<f64>().ok()? * nanos_per_unit).round();
    (0.0..=u64::MAX as f64).contains(&nanos).then_some(Duration::from_nanos(nanos as u64))
}

fn duration_with_unit<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_duration(&value)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid duration {value:?}")))
}

/// Build a POST route that decodes each delivery and hands the result to
/// `callback`.
///
/// Decoding happens inside the request. The callback then runs on a
/// blocking task that is not awaited, so the HTTP response can be sent
/// before it finishes and deliveries may invoke it concurrently. Responds
/// `200 OK` when the delivery decoded and `400 Bad Request` otherwise,
/// including deliveries that lack one of the required [`Webhook`] fields.
pub fn handler<F, S>(callback: F) -> MethodRouter<S>
where
    F: Fn(Result<Webhook>) + Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
{
    let callback = Arc::new(callback);
    post(move |headers: HeaderMap, body: Bytes| {
        let callback = Arc::clone(&callback);
        async move {
            let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
            let decoded = Webhook::decode(content_type, &body);
            let status = match &decoded {
                Ok(_) => StatusCode::OK,
                Err(e) => {
                    warn!(error = %e, "Failed to decode observery webhook");
                    StatusCode::BAD_REQUEST
                }
            };
            tokio::task::spawn_blocking(move || (*callback)(decoded));
            status
        }
    })
}
