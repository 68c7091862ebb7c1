//! The request façade.
//!
//! # Responsibilities
//! - Expose get/post/put/patch/delete against the selected service
//! - Attach bearer tokens and per-request timeouts
//! - Classify failures and drive the two recovery paths (failover retry,
//!   token refresh + replay), each bounded to one replay
//! - Own the background health monitor and its shutdown
//! - Log one structured line per request and record metrics

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::credentials::{CredentialCache, SessionCredentials};
use crate::auth::refresher::TokenRefresher;
use crate::auth::store::TokenStore;
use crate::client::error::ApiError;
use crate::config::loader::ConfigError;
use crate::config::schema::{AuthConfig, FailoverConfig};
use crate::config::validation::validate_config;
use crate::failover::selector::FailoverSelector;
use crate::health::monitor::HealthMonitor;
use crate::health::probe::HealthProbe;
use crate::lifecycle::cancel::CancelToken;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;
use crate::services::backend::BackendService;
use crate::services::registry::ServiceRegistry;

/// Per-request overrides.
#[derive(Default, Clone)]
pub struct RequestOptions {
    /// Overrides the configured request timeout.
    pub timeout: Option<Duration>,
    /// Extra headers; same-named headers win over the defaults.
    pub headers: HeaderMap,
    /// Caller-side abort handle.
    pub cancel: Option<CancelToken>,
}

/// Outcome of a single dispatch attempt.
enum Attempt {
    Success(Response),
    Unauthorized { body: String },
    Retryable(ApiError),
    Fatal(ApiError),
}

/// The failover-aware HTTP client.
///
/// One instance per app session, owned by the composition root and handed
/// to callers by reference.
pub struct ApiClient {
    registry: Arc<ServiceRegistry>,
    http: reqwest::Client,
    selector: FailoverSelector,
    refresher: Arc<TokenRefresher>,
    credentials: Arc<CredentialCache>,
    store: Arc<dyn TokenStore>,
    auth: AuthConfig,
    request_timeout: Duration,
    shutdown: Shutdown,
}

impl ApiClient {
    /// Build a client, hydrate persisted credentials, and start the
    /// background health monitor when enabled.
    pub async fn connect(
        config: FailoverConfig,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        validate_config(&config)
            .map_err(|errors| ApiError::Config(ConfigError::Validation(errors)))?;

        let registry = Arc::new(
            ServiceRegistry::from_config(&config.services)
                .map_err(|e| ApiError::Config(ConfigError::Validation(vec![e])))?,
        );

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(ApiError::Network)?;

        let probe = HealthProbe::new(
            http.clone(),
            Duration::from_secs(config.health_check.timeout_secs),
        );
        let selector = FailoverSelector::new(registry.clone(), probe.clone());

        let credentials = Arc::new(CredentialCache::new());
        if let Some(access_token) = store.get(&config.auth.access_token_key).await {
            let refresh_token = store.get(&config.auth.refresh_token_key).await;
            credentials.set(SessionCredentials {
                access_token,
                refresh_token,
            });
        }

        let request_timeout = Duration::from_secs(config.timeouts.request_secs);
        let refresher = Arc::new(TokenRefresher::new(
            http.clone(),
            registry.clone(),
            credentials.clone(),
            store.clone(),
            config.auth.clone(),
            request_timeout,
        ));

        let shutdown = Shutdown::new();
        if config.health_check.enabled {
            let monitor = HealthMonitor::new(
                registry.clone(),
                probe,
                selector.clone(),
                Duration::from_secs(config.health_check.interval_secs),
            );
            let receiver = shutdown.subscribe();
            tokio::spawn(async move {
                monitor.run(receiver).await;
            });
        }

        tracing::info!(
            services = registry.len(),
            active = %registry.active_service_name(),
            "API client ready"
        );

        Ok(Self {
            registry,
            http,
            selector,
            refresher,
            credentials,
            store,
            auth: config.auth,
            request_timeout,
            shutdown,
        })
    }

    pub async fn get(&self, path: &str, opts: RequestOptions) -> Result<Response, ApiError> {
        self.request(Method::GET, path, None, opts).await
    }

    pub async fn delete(&self, path: &str, opts: RequestOptions) -> Result<Response, ApiError> {
        self.request(Method::DELETE, path, None, opts).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOptions,
    ) -> Result<Response, ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.request(Method::POST, path, Some(body), opts).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOptions,
    ) -> Result<Response, ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.request(Method::PUT, path, Some(body), opts).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOptions,
    ) -> Result<Response, ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.request(Method::PATCH, path, Some(body), opts).await
    }

    /// Issue a request with the full recovery lifecycle.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        opts: RequestOptions,
    ) -> Result<Response, ApiError> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let method_str = method.to_string();

        let result = self
            .execute(&method, path, body.as_ref(), &opts, &request_id)
            .await;

        let service = self.registry.active_service_name();
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(response) => {
                let status = response.status().as_u16();
                tracing::info!(
                    request_id = %request_id,
                    method = %method_str,
                    path = %path,
                    service = %service,
                    status,
                    duration_ms,
                    "Request completed"
                );
                metrics::record_request(&method_str, &status.to_string(), &service, started);
            }
            Err(error) => {
                let status = error
                    .status()
                    .map(|s| s.as_u16().to_string())
                    .unwrap_or_else(|| "error".to_string());
                tracing::warn!(
                    request_id = %request_id,
                    method = %method_str,
                    path = %path,
                    service = %service,
                    status = %status,
                    duration_ms,
                    error = %error,
                    "Request failed"
                );
                metrics::record_request(&method_str, &status, &service, started);
            }
        }

        result
    }

    async fn execute(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        opts: &RequestOptions,
        request_id: &Uuid,
    ) -> Result<Response, ApiError> {
        let service = self.registry.current();
        let first = self
            .dispatch(method, &service, path, body, opts, request_id)
            .await;

        match Self::classify(first).await {
            Attempt::Success(response) => Ok(response),
            Attempt::Fatal(error) => Err(error),

            Attempt::Unauthorized { .. } => {
                tracing::debug!(request_id = %request_id, "Received 401, refreshing session");
                self.refresher.refresh().await?;

                let service = self.registry.current();
                let replay = self
                    .dispatch(method, &service, path, body, opts, request_id)
                    .await;
                match Self::classify(replay).await {
                    Attempt::Success(response) => Ok(response),
                    Attempt::Unauthorized { body } => Err(ApiError::Status {
                        status: StatusCode::UNAUTHORIZED,
                        body,
                    }),
                    Attempt::Retryable(error) | Attempt::Fatal(error) => Err(error),
                }
            }

            Attempt::Retryable(original) => {
                tracing::warn!(
                    request_id = %request_id,
                    service = %service.name,
                    error = %original,
                    "Retryable failure, starting failover search"
                );

                let current = self.registry.current_index();
                let next = match self.selector.select_next(current).await {
                    Some(next) => next,
                    None => {
                        tracing::error!(request_id = %request_id, "No reachable backend service");
                        return Err(original);
                    }
                };

                let target = self.registry.get(next);
                self.registry.set_current(next);
                tracing::info!(
                    request_id = %request_id,
                    from = %service.name,
                    to = %target.name,
                    "Failed over, replaying request"
                );
                metrics::record_failover(&service.name, &target.name);

                let replay = self
                    .dispatch(method, &target, path, body, opts, request_id)
                    .await;
                match Self::classify(replay).await {
                    Attempt::Success(response) => Ok(response),
                    Attempt::Unauthorized { .. } => {
                        tracing::warn!(request_id = %request_id, "Replay rejected as unauthorized");
                        Err(original)
                    }
                    Attempt::Retryable(error) | Attempt::Fatal(error) => {
                        // Both attempts failed; the caller sees the original
                        // failure, not the replay's.
                        tracing::warn!(request_id = %request_id, error = %error, "Replay also failed");
                        Err(original)
                    }
                }
            }
        }
    }

    /// One attempt against one service.
    async fn dispatch(
        &self,
        method: &Method,
        service: &BackendService,
        path: &str,
        body: Option<&Value>,
        opts: &RequestOptions,
        request_id: &Uuid,
    ) -> Result<Response, ApiError> {
        let timeout = opts.timeout.unwrap_or(self.request_timeout);
        let url = service.endpoint(path);

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .timeout(timeout)
            .header("x-request-id", request_id.to_string());

        if let Some(token) = self.credentials.access_token() {
            builder = builder.bearer_auth(token);
        }
        if !opts.headers.is_empty() {
            builder = builder.headers(opts.headers.clone());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let send = builder.send();
        let result = match &opts.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => return Err(ApiError::Cancelled),
                result = send => result,
            },
            None => send.await,
        };

        result.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(timeout)
            } else {
                ApiError::Network(e)
            }
        })
    }

    async fn classify(result: Result<Response, ApiError>) -> Attempt {
        match result {
            Ok(response) if response.status().is_success() => Attempt::Success(response),
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                if status == StatusCode::UNAUTHORIZED {
                    Attempt::Unauthorized { body }
                } else {
                    let error = ApiError::Status { status, body };
                    if error.is_retryable() {
                        Attempt::Retryable(error)
                    } else {
                        Attempt::Fatal(error)
                    }
                }
            }
            Err(error) if error.is_retryable() => Attempt::Retryable(error),
            Err(error) => Attempt::Fatal(error),
        }
    }

    /// Store a full credential set (login).
    pub async fn set_session(&self, access_token: &str, refresh_token: &str) {
        self.credentials.set(SessionCredentials {
            access_token: access_token.to_string(),
            refresh_token: Some(refresh_token.to_string()),
        });
        self.store
            .set(&self.auth.access_token_key, access_token)
            .await;
        self.store
            .set(&self.auth.refresh_token_key, refresh_token)
            .await;
    }

    /// Replace the access token, keeping any stored refresh token.
    pub async fn set_auth_token(&self, access_token: &str) {
        self.credentials.set_access(access_token);
        self.store
            .set(&self.auth.access_token_key, access_token)
            .await;
    }

    /// Clear credentials everywhere (logout).
    pub async fn remove_auth_token(&self) {
        self.credentials.clear();
        self.store.remove(&self.auth.access_token_key).await;
        self.store.remove(&self.auth.refresh_token_key).await;
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    /// Name of the currently selected service.
    pub fn active_service_name(&self) -> String {
        self.registry.active_service_name()
    }

    /// The currently selected service.
    pub fn current_service(&self) -> Arc<BackendService> {
        self.registry.current()
    }

    /// The underlying registry, for display surfaces.
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Stop the background health monitor. Idempotent.
    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }
}
