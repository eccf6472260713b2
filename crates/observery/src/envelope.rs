use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Result;

/// A single per-field validation failure reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    /// Name of the offending request field, e.g. `email`.
    pub field: String,
    /// Human readable description of the problem.
    pub error: String,
}

/// The `{ success, reason, reasons, result }` wrapper every endpoint returns.
///
/// `success == false` is not an [`Error`](crate::Error); callers must inspect
/// the flag and the accompanying `reason`/`reasons`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<T> {
    /// Whether the API accepted the request.
    pub success: bool,
    /// Failure explanation, when the API gives one.
    pub reason: Option<String>,
    /// Per-field validation failures. Empty on success.
    pub reasons: Vec<FieldError>,
    /// Operation payload. Always decoded on success, best-effort on failure.
    pub result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    reasons: Option<Vec<FieldError>>,
    #[serde(default)]
    result: Option<Value>,
}

impl<T> Envelope<T> {
    /// Look up the validation failure reported for `field`.
    pub fn field_error(&self, field: &str) -> Option<&FieldError> {
        self.reasons.iter().find(|r| r.field == field)
    }

    /// Convert the payload, keeping the rest of the envelope.
    pub(crate) fn try_map<U, F>(self, f: F) -> Result<Envelope<U>>
    where
        F: FnOnce(T) -> Result<U>,
    {
        let result = self.result.map(f).transpose()?;
        Ok(Envelope { success: self.success, reason: self.reason, reasons: self.reasons, result })
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decode an envelope from a response body.
    ///
    /// A failed envelope often carries a result shaped differently from the
    /// success payload, so on failure a mismatching result is dropped.
    pub(crate) fn from_slice(body: &[u8]) -> Result<Self> {
        let raw: RawEnvelope = serde_json::from_slice(body)?;
        let result = match raw.result {
            None | Some(Value::Null) => None,
            Some(value) if raw.success => Some(serde_json::from_value(value)?),
            Some(value) => serde_json::from_value(value).ok(),
        };
        Ok(Self {
            success: raw.success,
            reason: raw.reason.filter(|r| !r.is_empty()),
            reasons: raw.reasons.unwrap_or_default(),
            result,
        })
    }
}
