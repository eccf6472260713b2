//! Round trips against the real API.
//!
//! Run with `OBSERVERY_USERNAME` and `OBSERVERY_PASSWORD` set:
//! `cargo test -p observery --test live -- --ignored`

use observery::{
    Client, CreateCheckRequest, CreateContactRequest, MessageFormat, UpdateCheckRequest,
    UpdateContactRequest,
};

fn live_client() -> Client {
    let username = std::env::var("OBSERVERY_USERNAME").unwrap_or_default();
    let password = std::env::var("OBSERVERY_PASSWORD").unwrap_or_default();
    assert!(
        !username.is_empty() && !password.is_empty(),
        "set OBSERVERY_USERNAME and OBSERVERY_PASSWORD to run live tests"
    );
    Client::new(username, password)
}

#[tokio::test]
#[ignore = "talks to api.observery.com"]
async fn outages() {
    let resp = live_client().outages().list_recent().await.unwrap();
    assert!(resp.success, "unable to list outages: {:?}", resp.reason);
}

#[tokio::test]
#[ignore = "talks to api.observery.com"]
async fn check_lifecycle() {
    let client = live_client();
    let checks = client.checks();

    let created =
        checks.create(&CreateCheckRequest::http("Test Check", "http://example.com")).await.unwrap();
    assert!(created.success, "create failed: {:?} {:?}", created.reason, created.reasons);
    let id = created.result.unwrap().id;

    let listed = checks.list().await.unwrap();
    assert!(listed.result.unwrap_or_default().iter().any(|c| c.id == id));

    let fetched = checks.get(&id).await.unwrap().result.unwrap();
    assert_eq!(fetched.name, "Test Check");
    assert_eq!(fetched.url.as_deref(), Some("http://example.com"));

    let update = UpdateCheckRequest {
        name: Some("Check #2".to_owned()),
        active: Some(false),
        interval: Some(2),
        url: Some("http://www.example.com".to_owned()),
        ..Default::default()
    };
    let updated = checks.update(&id, &update).await.unwrap();
    assert!(updated.success, "update failed: {:?}", updated.reason);

    let deleted = checks.delete(&id).await.unwrap();
    assert!(deleted.success, "delete failed: {:?}", deleted.result);
}

#[tokio::test]
#[ignore = "talks to api.observery.com"]
async fn contact_lifecycle() {
    let client = live_client();
    let contacts = client.contacts();

    let req = CreateContactRequest::email("Test Email", "me@example.com", MessageFormat::Long);
    let created = contacts.create(&req).await.unwrap();
    assert!(created.success, "create failed: {:?} {:?}", created.reason, created.reasons);
    let id = created.result.unwrap().id;

    let fetched = contacts.get(&id).await.unwrap().result.unwrap();
    assert_eq!(fetched.name, req.name);
    assert_eq!(fetched.email, req.email);
    assert_eq!(fetched.format, req.format);

    let change = UpdateContactRequest {
        name: Some("Test #2".to_owned()),
        enabled: Some(false),
        format: Some(MessageFormat::Short),
        ..Default::default()
    };
    assert!(contacts.update(&id, &change).await.unwrap().success);

    let fetched = contacts.get(&id).await.unwrap().result.unwrap();
    assert_eq!(fetched.name, "Test #2");
    assert!(!fetched.enabled);
    assert_eq!(fetched.format, Some(MessageFormat::Short));

    assert!(contacts.delete(&id).await.unwrap().success);
}
