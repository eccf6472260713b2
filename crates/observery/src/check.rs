//! Checks: the endpoints observery monitors.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    client::{Client, item_path},
    envelope::Envelope,
    error::Result,
    form::comma_separated,
    time::{null_as_empty, parse_optional_timestamp},
};

const PATH: &str = "/check";

/// Protocol a check probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    /// HTTP(S) request against `url`.
    Http,
    /// ICMP ping of `host`.
    Ping,
    /// SSH handshake.
    Ssh,
    /// FTP login.
    Ftp,
    /// POP3 greeting.
    Pop,
    /// SMTP greeting.
    Smtp,
    /// IMAP greeting.
    Imap,
    /// TLS certificate expiry.
    Cert,
}

impl CheckType {
    /// Wire name of the check type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Ping => "ping",
            Self::Ssh => "ssh",
            Self::Ftp => "ftp",
            Self::Pop => "pop",
            Self::Smtp => "smtp",
            Self::Imap => "imap",
            Self::Cert => "cert",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last observed state of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    /// The endpoint responded as expected.
    Up,
    /// The endpoint failed; an outage is open.
    Down,
    /// No result yet.
    Waiting,
}

impl CheckState {
    /// Wire name of the state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Waiting => "waiting",
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A check as returned by [`Checks::list`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    pub id: String,
    pub name: String,
    pub active: bool,
    #[serde(rename = "type")]
    pub check_type: CheckType,
    pub state: CheckState,
    /// When the check last changed state.
    #[serde(skip)]
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
}

/// Weekly window during which a check is paused.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaintenanceSchedule {
    pub days: String,
    pub start: String,
    pub stop: String,
    pub timezone: String,
}

/// Contact mapped to a check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactRef {
    pub id: String,
    pub name: String,
}

/// A check as returned by [`Checks::get`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub check_type: CheckType,
    pub state: CheckState,
    /// When the check last changed state.
    #[serde(skip)]
    pub since: Option<DateTime<Utc>>,
    /// Open outage, if the check is down.
    #[serde(default)]
    pub outage_id: Option<String>,
    pub active: bool,
    /// Minutes between probes.
    pub interval: u32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub secure: Option<bool>,
    #[serde(default)]
    pub cert_expiration_days: Option<u32>,
    /// Minutes to wait before emailing contacts.
    #[serde(default)]
    pub email_notification_delay: u32,
    /// Minutes to wait before texting contacts.
    #[serde(default)]
    pub sms_notification_delay: u32,
    #[serde(default)]
    pub in_maintenance: bool,
    #[serde(default)]
    pub maintenance_mode_active: bool,
    #[serde(default)]
    pub maintenance_schedules: Vec<MaintenanceSchedule>,
    #[serde(default)]
    pub contact_ids: Vec<String>,
    #[serde(default)]
    pub contacts: Vec<ContactRef>,
}

/// Wire form of a check: `since` arrives as a layout string and is parsed
/// after decoding so a bad value surfaces as a timestamp error.
#[derive(Debug, Deserialize)]
struct Timestamped<T> {
    #[serde(default, deserialize_with = "null_as_empty")]
    since: String,
    #[serde(flatten)]
    check: T,
}

impl Timestamped<CheckSummary> {
    fn parse(self) -> Result<CheckSummary> {
        Ok(CheckSummary { since: parse_optional_timestamp(&self.since)?, ..self.check })
    }
}

impl Timestamped<Check> {
    fn parse(self) -> Result<Check> {
        Ok(Check { since: parse_optional_timestamp(&self.since)?, ..self.check })
    }
}

/// Id and server message returned by create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Mutation {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

/// Fields for [`Checks::create`].
///
/// `http` checks need `url`; every other type needs `host`; `cert` checks
/// also need `cert_expiration_days`. The server validates these and reports
/// missing fields in [`Envelope::reasons`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckRequest {
    #[serde(rename = "type")]
    pub check_type: CheckType,
    pub name: String,
    pub active: bool,
    /// Minutes between probes.
    pub interval: u32,
    /// Contact ids to notify.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "comma_separated")]
    pub contacts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Login for `http` or `ftp` checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Request body for `http` checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_data: Option<String>,
    #[serde(rename = "httpHeaders", skip_serializing_if = "Option::is_none")]
    pub http_headers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Use the TLS variant of `ftp`, `pop`, `smtp` or `imap`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    /// Days before certificate expiry at which a `cert` check goes down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_expiration_days: Option<u32>,
}

impl CreateCheckRequest {
    fn base(check_type: CheckType, name: impl Into<String>) -> Self {
        Self {
            check_type,
            name: name.into(),
            active: true,
            interval: 1,
            contacts: None,
            url: None,
            username: None,
            password: None,
            send_data: None,
            http_headers: None,
            host: None,
            port: None,
            secure: None,
            cert_expiration_days: None,
        }
    }

    /// An active `http` check probing `url` every minute.
    pub fn http(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { url: Some(url.into()), ..Self::base(CheckType::Http, name) }
    }

    /// An active host-based check (`ping`, `ssh`, `ftp`, `pop`, `smtp`,
    /// `imap`) probing `host` every minute.
    pub fn host(check_type: CheckType, name: impl Into<String>, host: impl Into<String>) -> Self {
        Self { host: Some(host.into()), ..Self::base(check_type, name) }
    }

    /// An active `cert` check that goes down `days` before `host`'s
    /// certificate expires.
    pub fn cert(name: impl Into<String>, host: impl Into<String>, days: u32) -> Self {
        Self {
            host: Some(host.into()),
            cert_expiration_days: Some(days),
            ..Self::base(CheckType::Cert, name)
        }
    }

    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub const fn with_interval(mut self, minutes: u32) -> Self {
        self.interval = minutes;
        self
    }

    pub fn with_contacts<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contacts = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_send_data(mut self, data: impl Into<String>) -> Self {
        self.send_data = Some(data.into());
        self
    }

    pub fn with_http_headers(mut self, headers: impl Into<String>) -> Self {
        self.http_headers = Some(headers.into());
        self
    }

    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }
}

/// Fields for [`Checks::update`]. Only fields set to `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheckRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// Replaces the mapped contacts; `Some(vec![])` clears them.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "comma_separated")]
    pub contacts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_data: Option<String>,
    #[serde(rename = "httpHeaders", skip_serializing_if = "Option::is_none")]
    pub http_headers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_expiration_days: Option<u32>,
}

/// Check endpoints, obtained from [`Client::checks`].
#[derive(Debug, Clone, Copy)]
pub struct Checks<'a> {
    client: &'a Client,
}

impl<'a> Checks<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// All checks on the account, with a reduced field set.
    pub async fn list(&self) -> Result<Envelope<Vec<CheckSummary>>> {
        let env: Envelope<Vec<Timestamped<CheckSummary>>> = self.client.get(PATH).await?;
        env.try_map(|checks| {
            checks.into_iter().map(Timestamped::<CheckSummary>::parse).collect()
        })
    }

    /// A single check by id.
    pub async fn get(&self, id: &str) -> Result<Envelope<Check>> {
        let env: Envelope<Timestamped<Check>> = self.client.get(&item_path(PATH, id)).await?;
        env.try_map(Timestamped::<Check>::parse)
    }

    /// Create a check.
    pub async fn create(&self, req: &CreateCheckRequest) -> Result<Envelope<Mutation>> {
        self.client.post(PATH, req).await
    }

    /// Change the fields set in `req` on check `id`.
    pub async fn update(&self, id: &str, req: &UpdateCheckRequest) -> Result<Envelope<Mutation>> {
        self.client.put(&item_path(PATH, id), req).await
    }

    /// Delete check `id`. The result is the server's confirmation message.
    pub async fn delete(&self, id: &str) -> Result<Envelope<String>> {
        self.client.delete(&item_path(PATH, id)).await
    }
}
