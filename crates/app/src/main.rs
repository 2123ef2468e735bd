//! Portico session client - command line entry point
//!
//! Wires the adapters to the session core, restores a persisted session
//! (or signs in with credentials from the environment) and fetches the
//! signed-in identity through the authorized dispatcher.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use portico_application::ports::Navigator;
use portico_application::{AuthorizedClient, RefreshCoordinator, SessionManager};
use portico_domain::{ApiRequest, ClientSettings, Credentials, Session};
use portico_infrastructure::{CookieFileStore, HttpAuthApi, ReqwestTransport};

/// Navigator for a headless host: destinations are logged, not rendered.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, destination: &str) {
        tracing::info!(%destination, "navigate");
    }
}

fn settings_from_env() -> ClientSettings {
    std::env::var("PORTICO_BASE_URL")
        .map_or_else(|_| ClientSettings::default(), ClientSettings::new)
}

fn token_store() -> CookieFileStore {
    match CookieFileStore::default_location() {
        Some(path) => CookieFileStore::new(path),
        None => CookieFileStore::new("portico-cookies.json"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = settings_from_env();

    let store = Arc::new(token_store());
    let api = Arc::new(HttpAuthApi::new(&settings)?);
    let transport = Arc::new(ReqwestTransport::new(&settings)?);
    let coordinator = Arc::new(RefreshCoordinator::new(
        store.clone(),
        api.clone(),
        settings.store_options(),
        settings.refresh_timeout(),
    ));
    let client = Arc::new(AuthorizedClient::new(transport, store.clone(), coordinator));
    let manager = Arc::new(SessionManager::new(
        store,
        api,
        client.clone(),
        Arc::new(LogNavigator),
        settings,
    ));
    client.bind_terminator(manager.clone());

    let session = match manager.restore().await {
        Some(session) => session,
        None => {
            let email = std::env::var("PORTICO_EMAIL")?;
            let password = std::env::var("PORTICO_PASSWORD")?;
            manager.sign_in(Credentials::new(email, password)).await?
        }
    };
    tracing::info!(email = %session.email, "session established");

    let response = client.send(ApiRequest::get("/me")).await?;
    let identity: Session = response.json()?;
    println!(
        "signed in as {} (roles: {:?}, permissions: {:?})",
        identity.email, identity.roles, identity.permissions
    );

    Ok(())
}
