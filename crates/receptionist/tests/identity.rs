//! Clerk sync against a mock backend API.

use database::{user, Database};
use receptionist::{sync_user, ClerkClient, ClerkConfig, IdentityError, IdentityProvider};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ClerkClient {
    ClerkClient::new(ClerkConfig::new("sk_test_abc").with_api_url(server.uri())).unwrap()
}

fn clerk_user(first_name: &str) -> serde_json::Value {
    json!({
        "id": "user_2abc",
        "object": "user",
        "email_addresses": [{"id": "idn_1", "email_address": "dana@hvac.example"}],
        "phone_numbers": [],
        "first_name": first_name,
        "last_name": "Reyes"
    })
}

#[tokio::test]
async fn test_sync_stores_and_overwrites_user() {
    let server = MockServer::start().await;
    let db = Database::in_memory().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/users/user_2abc"))
        .and(header("authorization", "Bearer sk_test_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clerk_user("Dana")))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let stored = sync_user(&client(&server), &db, "user_2abc").await.unwrap();
    assert_eq!(stored.email, "dana@hvac.example");
    assert_eq!(stored.first_name.as_deref(), Some("Dana"));
    assert_eq!(stored.phone, None);

    Mock::given(method("GET"))
        .and(path("/v1/users/user_2abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clerk_user("Danielle")))
        .mount(&server)
        .await;

    sync_user(&client(&server), &db, "user_2abc").await.unwrap();

    let reloaded = user::get_user(db.pool(), "user_2abc").await.unwrap().unwrap();
    assert_eq!(reloaded.first_name.as_deref(), Some("Danielle"));
    assert_eq!(reloaded.last_name.as_deref(), Some("Reyes"));
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/user_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"message": "not found", "code": "resource_not_found"}]
        })))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).fetch_user("user_missing").await,
        Err(IdentityError::NotFound(id)) if id == "user_missing"
    ));
}

#[tokio::test]
async fn test_provider_error_message_is_kept() {
    let server = MockServer::start().await;
    let db = Database::in_memory().await.unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{"message": "Invalid authentication", "code": "authentication_invalid"}]
        })))
        .mount(&server)
        .await;

    match sync_user(&client(&server), &db, "user_2abc").await {
        Err(IdentityError::Provider { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid authentication");
        }
        other => panic!("Expected Provider error, got {:?}", other),
    }

    assert!(user::get_user(db.pool(), "user_2abc").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unreachable_provider_is_unavailable() {
    let client =
        ClerkClient::new(ClerkConfig::new("sk_test_abc").with_api_url("http://127.0.0.1:1")).unwrap();

    assert!(matches!(
        client.fetch_user("user_2abc").await,
        Err(IdentityError::Unavailable(_))
    ));
}
