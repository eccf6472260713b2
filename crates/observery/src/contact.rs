//! Contacts: email and SMS notification targets.

use serde::{Deserialize, Deserializer, Serialize, de::IntoDeserializer};

use crate::{
    check::{CheckType, Mutation},
    client::{Client, item_path},
    envelope::Envelope,
    error::Result,
    form::comma_separated,
};

const PATH: &str = "/contact";

/// How a contact is notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Email,
    Sms,
}

/// Length of email notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    Short,
    Long,
}

/// Email-only fields come back as empty strings on SMS contacts and vice versa.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.is_empty() => T::deserialize(value.into_deserializer()).map(Some),
        _ => Ok(None),
    }
}

/// A contact as returned by [`Contacts::list`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    pub name: String,
    pub verified: bool,
    pub enabled: bool,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub format: Option<MessageFormat>,
    /// Phone number, `+<country code><number>`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub number: Option<String>,
    #[serde(default)]
    pub check_mapping_count: u32,
}

/// Check mapped to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub check_type: CheckType,
}

/// A contact as returned by [`Contacts::get`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    pub name: String,
    pub verified: bool,
    pub enabled: bool,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub format: Option<MessageFormat>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub number: Option<String>,
    #[serde(default)]
    pub check_mapping_count: u32,
    #[serde(default)]
    pub check_ids: Vec<String>,
    #[serde(default)]
    pub checks: Vec<CheckRef>,
}

/// Fields for [`Contacts::create`].
///
/// `email` contacts need `email` and `format`; `sms` contacts need `number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateContactRequest {
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<MessageFormat>,
    /// Check ids to map to the contact.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "comma_separated")]
    pub checks: Option<Vec<String>>,
}

impl CreateContactRequest {
    /// An enabled email contact.
    pub fn email(name: impl Into<String>, email: impl Into<String>, format: MessageFormat) -> Self {
        Self {
            contact_type: ContactType::Email,
            name: name.into(),
            email: Some(email.into()),
            number: None,
            enabled: true,
            format: Some(format),
            checks: None,
        }
    }

    /// An enabled SMS contact. `number` is `+<country code><number>`.
    pub fn sms(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            contact_type: ContactType::Sms,
            name: name.into(),
            email: None,
            number: Some(number.into()),
            enabled: true,
            format: None,
            checks: None,
        }
    }

    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_checks<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checks = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

/// Fields for [`Contacts::update`]. Only fields set to `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateContactRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<MessageFormat>,
    /// Replaces the mapped checks; `Some(vec![])` clears them.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "comma_separated")]
    pub checks: Option<Vec<String>>,
}

/// Contact endpoints, obtained from [`Client::contacts`].
#[derive(Debug, Clone, Copy)]
pub struct Contacts<'a> {
    client: &'a Client,
}

impl<'a> Contacts<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// All contacts on the account.
    pub async fn list(&self) -> Result<Envelope<Vec<ContactSummary>>> {
        self.client.get(PATH).await
    }

    /// A single contact by id, including its mapped checks.
    pub async fn get(&self, id: &str) -> Result<Envelope<Contact>> {
        self.client.get(&item_path(PATH, id)).await
    }

    /// Create a contact.
    pub async fn create(&self, req: &CreateContactRequest) -> Result<Envelope<Mutation>> {
        self.client.post(PATH, req).await
    }

    /// Change the fields set in `req` on contact `id`.
    pub async fn update(
        &self,
        id: &str,
        req: &UpdateContactRequest,
    ) -> Result<Envelope<Mutation>> {
        self.client.put(&item_path(PATH, id), req).await
    }

    /// Delete contact `id`.
    pub async fn delete(&self, id: &str) -> Result<Envelope<String>> {
        self.client.delete(&item_path(PATH, id)).await
    }
}
