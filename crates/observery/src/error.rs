use thiserror::Error;

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the client and the webhook decoder.
///
/// API-level failures (validation errors, unknown ids) are not represented
/// here: they come back as an [`Envelope`](crate::Envelope) with
/// `success == false`.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP exchange could not complete.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request body could not be form-encoded.
    #[error("failed to form-encode request: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// The response body is not JSON or does not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A timestamp returned by the server does not match `YYYY-MM-DDTHH:MM:SS`.
    #[error("invalid timestamp {value:?}: {source}")]
    TimestampParse {
        /// The raw value received.
        value: String,
        /// Underlying parser error.
        source: chrono::ParseError,
    },

    /// An inbound webhook request is not form data.
    #[error("malformed webhook form: {0}")]
    FormParse(String),

    /// A webhook field could not be converted to its type.
    #[error("invalid webhook field: {0}")]
    FieldDecode(#[from] serde_urlencoded::de::Error),

    /// The caller cancelled the request before it completed.
    #[error("request cancelled")]
    Cancelled,
}
