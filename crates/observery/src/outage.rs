//! Outages: read-only history of the periods a check was down.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    client::{Client, item_path},
    envelope::Envelope,
    error::Result,
    time::{millis, null_as_empty, parse_optional_timestamp, parse_timestamp},
};

const PATH: &str = "/outage";

/// An outage as returned by [`Outages::list_recent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageSummary {
    pub id: String,
    pub check_id: String,
    pub check_name: String,
    /// Reported by the server; not derived from `stop`.
    pub ongoing: bool,
    pub start: DateTime<Utc>,
    /// `None` while the outage is ongoing.
    pub stop: Option<DateTime<Utc>>,
    pub duration: Duration,
}

/// An outage as returned by [`Outages::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outage {
    pub id: String,
    pub check_id: String,
    pub check_name: String,
    pub ongoing: bool,
    pub start: DateTime<Utc>,
    pub stop: Option<DateTime<Utc>>,
    pub duration: Duration,
    /// Response time of the probe that ended the outage.
    pub response_time: Duration,
    /// What caused the outage, in the server's words.
    pub details: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutage {
    id: String,
    check_id: String,
    #[serde(default)]
    check_name: String,
    ongoing: bool,
    start: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    stop: String,
    #[serde(deserialize_with = "millis")]
    duration: Duration,
    #[serde(default, deserialize_with = "millis")]
    response_time: Duration,
    #[serde(default, deserialize_with = "null_as_empty")]
    details: String,
}

impl TryFrom<RawOutage> for OutageSummary {
    type Error = crate::Error;

    fn try_from(raw: RawOutage) -> Result<Self> {
        Ok(Self {
            start: parse_timestamp(&raw.start)?,
            stop: parse_optional_timestamp(&raw.stop)?,
            id: raw.id,
            check_id: raw.check_id,
            check_name: raw.check_name,
            ongoing: raw.ongoing,
            duration: raw.duration,
        })
    }
}

impl TryFrom<RawOutage> for Outage {
    type Error = crate::Error;

    fn try_from(raw: RawOutage) -> Result<Self> {
        Ok(Self {
            start: parse_timestamp(&raw.start)?,
            stop: parse_optional_timestamp(&raw.stop)?,
            id: raw.id,
            check_id: raw.check_id,
            check_name: raw.check_name,
            ongoing: raw.ongoing,
            duration: raw.duration,
            response_time: raw.response_time,
            details: raw.details,
        })
    }
}

/// Outage endpoints, obtained from [`Client::outages`].
#[derive(Debug, Clone, Copy)]
pub struct Outages<'a> {
    client: &'a Client,
}

impl<'a> Outages<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// The most recent outages. The server returns at most 100 and offers no
    /// paging.
    pub async fn list_recent(&self) -> Result<Envelope<Vec<OutageSummary>>> {
        let env: Envelope<Vec<RawOutage>> = self.client.get(PATH).await?;
        env.try_map(|outages| outages.into_iter().map(OutageSummary::try_from).collect())
    }

    /// A single outage by id.
    pub async fn get(&self, id: &str) -> Result<Envelope<Outage>> {
        let env: Envelope<RawOutage> = self.client.get(&item_path(PATH, id)).await?;
        env.try_map(Outage::try_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use chrono::TimeZone;
    use mockito::{Server, ServerGuard};
    use url::Url;

    fn client_for(server: &ServerGuard) -> Client {
        Client::with_base_url("user", "pass", Url::parse(&server.url()).unwrap())
    }

    #[tokio::test]
    async fn list_recent_handles_ongoing_and_closed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/outage")
            .with_status(200)
            .with_body(
                r#"{"success":true,"result":[
                    {"id":"o1","checkId":"k1","checkName":"web","ongoing":true,
                     "start":"2024-01-15T10:30:00","stop":"","duration":1500},
                    {"id":"o2","checkId":"k2","checkName":"db","ongoing":false,
                     "start":"2024-01-14T08:00:00","stop":"2024-01-14T08:05:00","duration":300000}
                ]}"#,
            )
            .create_async()
            .await;

        let outages = client_for(&server).outages().list_recent().await.unwrap().result.unwrap();
        assert_eq!(outages.len(), 2);

        assert!(outages[0].ongoing);
        assert_eq!(outages[0].start, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
        assert_eq!(outages[0].stop, None);
        assert_eq!(outages[0].duration, Duration::from_millis(1500));

        assert!(!outages[1].ongoing);
        assert_eq!(outages[1].stop, Some(Utc.with_ymd_and_hms(2024, 1, 14, 8, 5, 0).unwrap()));
        assert_eq!(outages[1].duration, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn ongoing_flag_is_not_cross_checked() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/outage")
            .with_status(200)
            .with_body(
                r#"{"success":true,"result":[
                    {"id":"o1","checkId":"k1","checkName":"web","ongoing":true,
                     "start":"2024-01-15T10:30:00","stop":"2024-01-15T10:31:00","duration":60000}
                ]}"#,
            )
            .create_async()
            .await;

        let outages = client_for(&server).outages().list_recent().await.unwrap().result.unwrap();
        assert!(outages[0].ongoing);
        assert!(outages[0].stop.is_some());
    }

    #[tokio::test]
    async fn get_uses_response_time_field() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/outage/o1")
            .with_status(200)
            .with_body(
                r#"{"success":true,"result":{"id":"o1","checkId":"k1","checkName":"web",
                    "ongoing":false,"start":"2024-01-15T10:30:00","stop":"2024-01-15T10:45:00",
                    "duration":900000,"responseTime":250,"details":"Connection refused"}}"#,
            )
            .create_async()
            .await;

        let outage = client_for(&server).outages().get("o1").await.unwrap().result.unwrap();
        assert_eq!(outage.duration, Duration::from_secs(900));
        assert_eq!(outage.response_time, Duration::from_millis(250));
        assert_eq!(outage.details, "Connection refused");
        assert_eq!(outage.stop, Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 45, 0).unwrap()));
    }

    #[tokio::test]
    async fn missing_start_is_a_timestamp_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/outage/o1")
            .with_status(200)
            .with_body(
                r#"{"success":true,"result":{"id":"o1","checkId":"k1","checkName":"web",
                    "ongoing":true,"start":"","duration":0}}"#,
            )
            .create_async()
            .await;

        let err = client_for(&server).outages().get("o1").await.unwrap_err();
        assert!(matches!(err, Error::TimestampParse { .. }));
    }

    #[tokio::test]
    async fn unknown_outage_is_not_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/outage/nope")
            .with_status(404)
            .with_body(r#"{"success":false,"reason":"Outage not found","result":{}}"#)
            .create_async()
            .await;

        let env = client_for(&server).outages().get("nope").await.unwrap();
        assert!(!env.success);
        assert_eq!(env.reason.as_deref(), Some("Outage not found"));
        assert!(env.result.is_none());
    }
}
