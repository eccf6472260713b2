//! Timestamp and duration conversions for values the API sends as strings
//! and integer milliseconds.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Layout of every timestamp the API returns. The wire format carries no
/// offset; values are treated as UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a required server timestamp.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| Error::TimestampParse { value: value.to_owned(), source })
}

/// Parse a server timestamp where an empty string means "no value".
pub fn parse_optional_timestamp(value: &str) -> Result<Option<DateTime<Utc>>> {
    if value.is_empty() { Ok(None) } else { parse_timestamp(value).map(Some) }
}

/// Deserialize an integer number of milliseconds into a [`Duration`].
pub(crate) fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// Deserialize a string that may be `null` or missing into an empty string.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
