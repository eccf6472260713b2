//! Form-encoding helpers shared by the request types.

use serde::{Serialize, Serializer};

use crate::error::Result;

/// Encode a request as `application/x-www-form-urlencoded`.
pub(crate) fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String> {
    Ok(serde_urlencoded::to_string(body)?)
}

/// Serialize a list of ids the way the API expects associations: one field
/// holding a comma-joined list.
pub(crate) fn comma_separated<S>(
    ids: &Option<Vec<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match ids {
        Some(ids) => ids.join(",").serialize(serializer),
        None => serializer.serialize_none(),
    }
}
