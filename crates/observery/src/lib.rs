//! Client for the [observery](https://observery.com/apidocs/) monitoring API.
//!
//! [`Client`] owns the credentials and HTTP transport and hands out
//! per-resource views: [`Client::checks`], [`Client::contacts`] and
//! [`Client::outages`]. Every call returns an [`Envelope`]; API-level
//! failures come back with `success == false` rather than as an [`Error`].
//!
//! Inbound webhooks are decoded by [`Webhook`] and can be served with
//! [`webhook::handler`].
#![allow(missing_docs)]
#![allow(clippy::uninlined_format_args)]

/// Check endpoints and types
pub mod check;
/// HTTP client and request execution
pub mod client;
/// Contact endpoints and types
pub mod contact;
mod envelope;
mod error;
mod form;
/// Outage endpoints and types
pub mod outage;
/// Server timestamp helpers
pub mod time;
pub mod webhook;

pub use check::{
    Check, CheckState, CheckSummary, CheckType, Checks, CreateCheckRequest, Mutation,
    UpdateCheckRequest,
};
pub use client::{API_URL, Client, Credentials, cancellable};
pub use contact::{
    Contact, ContactSummary, ContactType, Contacts, CreateContactRequest, MessageFormat,
    UpdateContactRequest,
};
pub use envelope::{Envelope, FieldError};
pub use error::{Error, Result};
pub use outage::{Outage, OutageSummary, Outages};
pub use webhook::Webhook;
