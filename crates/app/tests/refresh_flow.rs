//! End-to-end session flow against a mock backend: sign-in, transparent
//! token renewal with replay, persisted-session restore and the fatal path.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portico_application::ports::{Navigator, TokenStore};
use portico_application::{AuthorizedClient, RefreshCoordinator, SessionManager};
use portico_domain::{ApiRequest, ClientSettings, Credentials, TokenPair};
use portico_infrastructure::{CookieFileStore, HttpAuthApi, ReqwestTransport};

#[derive(Default)]
struct RecordingNavigator {
    destinations: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &str) {
        self.destinations
            .lock()
            .unwrap()
            .push(destination.to_string());
    }
}

struct Harness {
    store: Arc<CookieFileStore>,
    client: Arc<AuthorizedClient>,
    manager: Arc<SessionManager>,
    navigator: Arc<RecordingNavigator>,
}

/// Full wiring, as the binary does it, pointed at the mock backend.
fn wire(base_url: &str, store_path: &Path) -> Harness {
    let settings = ClientSettings::new(base_url);
    let store = Arc::new(CookieFileStore::new(store_path));
    let api = Arc::new(HttpAuthApi::new(&settings).unwrap());
    let transport = Arc::new(ReqwestTransport::new(&settings).unwrap());
    let coordinator = Arc::new(RefreshCoordinator::new(
        store.clone(),
        api.clone(),
        settings.store_options(),
        settings.refresh_timeout(),
    ));
    let client = Arc::new(AuthorizedClient::new(
        transport,
        store.clone(),
        coordinator,
    ));
    let navigator = Arc::new(RecordingNavigator::default());
    let manager = Arc::new(SessionManager::new(
        store.clone(),
        api,
        client.clone(),
        navigator.clone(),
        settings,
    ));
    client.bind_terminator(manager.clone());
    Harness {
        store,
        client,
        manager,
        navigator,
    }
}

async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T1",
            "refreshToken": "R1",
            "permissions": ["metrics.list"],
            "roles": ["editor"],
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn expired_token_is_renewed_once_and_the_request_replayed() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_sign_in(&server).await;

    // The stale token is rejected with the renewable sentinel; the rotated
    // token is accepted.
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"code": "token.expired"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "a@x.com",
            "permissions": ["metrics.list"],
            "roles": ["editor"],
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .and(body_json(json!({"refreshToken": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T2",
            "refreshToken": "R2",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let harness = wire(&server.uri(), &dir.path().join("cookies.json"));
    harness
        .manager
        .sign_in(Credentials::new("a@x.com", "pw"))
        .await
        .unwrap();

    let response = harness.client.send(ApiRequest::get("/me")).await.unwrap();

    assert!(response.is_success());
    assert_eq!(
        harness.store.get().await.unwrap(),
        TokenPair::new("T2", "R2")
    );
    assert!(harness.manager.is_authenticated().await);
}

#[tokio::test]
async fn session_restores_from_the_persisted_pair() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("cookies.json");
    mount_sign_in(&server).await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "a@x.com",
            "permissions": [],
            "roles": ["editor"],
        })))
        .mount(&server)
        .await;

    let first = wire(&server.uri(), &store_path);
    first
        .manager
        .sign_in(Credentials::new("a@x.com", "pw"))
        .await
        .unwrap();

    // A fresh wiring over the same store file, as a process restart would be.
    let second = wire(&server.uri(), &store_path);
    let session = second.manager.restore().await.unwrap();

    assert_eq!(session.email, "a@x.com");
    assert_eq!(session.roles, vec!["editor".to_string()]);
    assert!(second.manager.is_authenticated().await);
}

#[tokio::test]
async fn failed_refresh_signs_the_session_out() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_sign_in(&server).await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"code": "token.expired"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Refresh token is invalid."})),
        )
        .mount(&server)
        .await;

    let harness = wire(&server.uri(), &dir.path().join("cookies.json"));
    harness
        .manager
        .sign_in(Credentials::new("a@x.com", "pw"))
        .await
        .unwrap();

    let error = harness.client.send(ApiRequest::get("/me")).await.unwrap_err();

    assert!(error.is_fatal());
    assert!(harness.store.get().await.is_none());
    assert!(!harness.manager.is_authenticated().await);
    // Sign-in navigated home, the terminated session navigated to entry.
    assert_eq!(
        *harness.navigator.destinations.lock().unwrap(),
        vec!["/dashboard".to_string(), "/".to_string()]
    );
}
