//! Single-flight token refresh.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::auth::credentials::{CredentialCache, SessionCredentials};
use crate::auth::store::TokenStore;
use crate::client::error::ApiError;
use crate::config::schema::AuthConfig;
use crate::observability::metrics;
use crate::services::registry::ServiceRegistry;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    refresh_token: Option<String>,
}

/// Serializes concurrent refresh attempts into one HTTP call.
///
/// Callers that hit 401 while a refresh is in flight queue on the mutex;
/// the generation counter tells a waiter that a refresh completed while it
/// waited, so it adopts that result instead of repeating the call. On
/// failure the stored refresh token is cleared, so queued waiters reject
/// instead of re-posting.
pub struct TokenRefresher {
    client: reqwest::Client,
    registry: Arc<ServiceRegistry>,
    credentials: Arc<CredentialCache>,
    store: Arc<dyn TokenStore>,
    config: AuthConfig,
    timeout: Duration,
    lock: Mutex<()>,
    generation: AtomicU64,
}

impl TokenRefresher {
    pub fn new(
        client: reqwest::Client,
        registry: Arc<ServiceRegistry>,
        credentials: Arc<CredentialCache>,
        store: Arc<dyn TokenStore>,
        config: AuthConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            registry,
            credentials,
            store,
            config,
            timeout,
            lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Obtain a fresh access token, sharing one in-flight refresh among
    /// all concurrent callers.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let observed = self.generation.load(Ordering::Acquire);
        let _guard = self.lock.lock().await;

        // Another caller completed a refresh while we queued; adopt it.
        if self.generation.load(Ordering::Acquire) != observed {
            if let Some(token) = self.credentials.access_token() {
                return Ok(token);
            }
        }

        let refresh_token = match self.credentials.refresh_token() {
            Some(token) => token,
            None => {
                self.clear_session().await;
                return Err(ApiError::SessionExpired(
                    "no refresh token available".to_string(),
                ));
            }
        };

        let service = self.registry.current();
        let url = service.endpoint(&self.config.refresh_path);
        tracing::debug!(service = %service.name, "Refreshing access token");

        let result = self
            .client
            .post(&url)
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .timeout(self.timeout)
            .send()
            .await;

        let response = match result {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                let status = response.status();
                self.clear_session().await;
                metrics::record_refresh(false);
                tracing::warn!(status = %status, "Token refresh rejected");
                return Err(ApiError::SessionExpired(format!(
                    "refresh endpoint returned {}",
                    status
                )));
            }
            Err(e) => {
                self.clear_session().await;
                metrics::record_refresh(false);
                tracing::warn!(error = %e, "Token refresh failed");
                return Err(ApiError::SessionExpired(format!("refresh failed: {}", e)));
            }
        };

        let tokens: RefreshResponse = match response.json().await {
            Ok(tokens) => tokens,
            Err(e) => {
                self.clear_session().await;
                metrics::record_refresh(false);
                return Err(ApiError::SessionExpired(format!(
                    "malformed refresh response: {}",
                    e
                )));
            }
        };

        // Keep the old refresh token if the backend did not rotate it.
        let new_refresh = tokens.refresh_token.unwrap_or(refresh_token);

        self.credentials.set(SessionCredentials {
            access_token: tokens.access_token.clone(),
            refresh_token: Some(new_refresh.clone()),
        });
        self.store
            .set(&self.config.access_token_key, &tokens.access_token)
            .await;
        self.store
            .set(&self.config.refresh_token_key, &new_refresh)
            .await;

        self.generation.fetch_add(1, Ordering::Release);
        metrics::record_refresh(true);
        tracing::info!("Access token refreshed");

        Ok(tokens.access_token)
    }

    async fn clear_session(&self) {
        self.credentials.clear();
        self.store.remove(&self.config.access_token_key).await;
        self.store.remove(&self.config.refresh_token_key).await;
    }
}
