use std::{
    future::Future,
    time::{Duration, Instant},
};

use derive_more::Debug;
use reqwest::{
    Client as HttpClient, Method,
    header::{CONTENT_TYPE, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};
use url::Url;

use crate::{
    check::Checks,
    contact::Contacts,
    envelope::Envelope,
    error::{Error, Result},
    form,
    outage::Outages,
};

/// Root of the public observery API.
pub const API_URL: &str = "https://api.observery.com/api/v1";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Username/password pair sent as HTTP Basic auth with every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    #[debug(skip)]
    password: String,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// The account username.
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Client for the observery API.
///
/// Cheap to clone; clones share the underlying connection pool. Construction
/// never touches the network.
#[derive(Clone, Debug)]
pub struct Client {
    #[debug(skip)]
    http: HttpClient,
    credentials: Credentials,
    base_url: String,
    timeout: Option<Duration>,
}

impl Client {
    /// Create a client for the public API.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            credentials: Credentials::new(username, password),
            base_url: API_URL.to_owned(),
            timeout: None,
        }
    }

    /// Create a client that talks to `base_url` instead of the public API.
    pub fn with_base_url(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: Url,
    ) -> Self {
        Self {
            http: HttpClient::new(),
            credentials: Credentials::new(username, password),
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
            timeout: None,
        }
    }

    /// Abort every request that takes longer than `timeout`.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Credentials sent with every request.
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The API root this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Operations on checks.
    pub const fn checks(&self) -> Checks<'_> {
        Checks::new(self)
    }

    /// Operations on contacts.
    pub const fn contacts(&self) -> Contacts<'_> {
        Contacts::new(self)
    }

    /// Operations on outages.
    pub const fn outages(&self) -> Outages<'_> {
        Outages::new(self)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send one request and decode the response envelope.
    ///
    /// `body`, when present, is sent form-encoded. Non-2xx statuses are not
    /// errors on their own; the envelope reports API-level failures.
    pub async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .basic_auth(&self.credentials.username, Some(&self.credentials.password));
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
                .body(form::encode(body)?);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let duration_ms = start.elapsed().as_millis();
                error!(%method, path, duration_ms, error = %e, "Observery request failed");
                return Err(e.into());
            }
        };
        let status = response.status();
        let bytes = response.bytes().await?;
        let duration_ms = start.elapsed().as_millis();
        debug!(%method, path, %status, duration_ms, "Observery request completed");

        let envelope = Envelope::from_slice(&bytes).inspect_err(|e| {
            error!(%method, path, %status, error = %e, "Failed to decode observery response");
        })?;
        if !envelope.success {
            debug!(
                %method,
                path,
                reason = ?envelope.reason,
                reasons = ?envelope.reasons,
                "Observery rejected request"
            );
        }
        Ok(envelope)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        self.execute::<(), T>(Method::GET, path, None).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<Envelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::PUT, path, Some(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        self.execute::<(), T>(Method::DELETE, path, None).await
    }
}

/// Path of the item `id` under `collection`, with `id` percent-encoded as a
/// single segment.
pub(crate) fn item_path(collection: &str, id: &str) -> String {
    let segment: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    format!("{collection}/{}", segment.replace('+', "%20"))
}

/// Run `fut` until it completes or `token` is cancelled.
///
/// Cancelling drops the in-flight request; the call resolves to
/// [`Error::Cancelled`].
pub async fn cancellable<F, T>(token: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => Err(Error::Cancelled),
        res = fut => res,
    }
}
