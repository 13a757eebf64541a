//! HTTP client that keeps a session alive across access-token expiry.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::domains::auth::models::{RegisterResponse, SessionResponse, UserSummary};

use super::{ClientError, SessionEvent, SessionState};

/// HTTP request timeout in seconds.
/// Bounds every call, so a server that never answers surfaces as a network error.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Capacity of the session event channel. Slow observers lose old events, not new ones.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// An authenticated call, described so it can be replayed after a refresh.
///
/// `retried` is this request's own single-flight marker: concurrent requests
/// each carry their own, so one request's refresh never consumes another's budget.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn retried(&self) -> bool {
        self.retried
    }
}

/// Client for the auth API and any endpoint behind it.
///
/// Clone is cheap and clones share one session: the reqwest client, the
/// cookie store, the token holder, the event channel and the refresh lock.
#[derive(Clone)]
pub struct SessionClient {
    client: Client,
    base_url: String,
    session: Arc<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    /// 동시에 하나의 refresh만 서버로 전송
    refresh_lock: Arc<Mutex<()>>,
}

impl SessionClient {
    /// Create a client for an API rooted at `base_url` (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_cookie_jar(base_url, Arc::new(Jar::default()))
    }

    /// Create a client over an existing cookie jar, e.g. one that outlives
    /// a previous client instance the way a browser's jar outlives a page.
    /// The in-memory session always starts empty; call `hydrate` to restore it.
    pub fn with_cookie_jar(base_url: impl Into<String>, jar: Arc<Jar>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .cookie_provider(jar)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: Arc::new(SessionState::new()),
            events,
            refresh_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current_user(&self) -> Option<UserSummary> {
        self.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Observe global session events (e.g. to force navigation to login).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ClientError::from_response(response).await)
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ClientError> {
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse {} response: {}", what, e)))
    }

    /// Create an account. Does not log in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<UserSummary, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({ "email": email, "password": password, "name": name }))
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body: RegisterResponse = Self::parse(response, "register").await?;
        Ok(body.user)
    }

    /// Log in; the refresh cookie lands in the cookie store, the access token in memory.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserSummary, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body: SessionResponse = Self::parse(response, "login").await?;

        self.session.establish(body.access_token, body.user.clone());
        info!(user_id = body.user.id, "Logged in");
        Ok(body.user)
    }

    /// Exchange the refresh cookie for a new access token. Returns the new token.
    pub async fn refresh(&self) -> Result<String, ClientError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    // 호출 전에 refresh_lock을 잡고 있어야 함
    async fn refresh_locked(&self) -> Result<String, ClientError> {
        let response = self.client.post(self.url("/auth/refresh")).send().await?;

        let response = Self::check_response(response).await?;
        let body: SessionResponse = Self::parse(response, "refresh").await?;

        self.session.establish(body.access_token.clone(), body.user);
        Ok(body.access_token)
    }

    /// Silent re-authentication at startup.
    ///
    /// Success seeds the token and identity; any failure leaves the session
    /// anonymous and is not reported as an error.
    pub async fn hydrate(&self) -> Option<UserSummary> {
        match self.refresh().await {
            Ok(_) => self.session.user(),
            Err(err) => {
                debug!(error = %err, "No active session detected");
                self.session.clear();
                None
            }
        }
    }

    /// Log out on the server, then clear local state regardless of the outcome.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = match self.client.post(self.url("/auth/logout")).send().await {
            Ok(response) => Self::check_response(response).await.map(|_| ()),
            Err(e) => Err(ClientError::from(e)),
        };

        self.session.clear();
        if let Err(ref err) = result {
            warn!(error = %err, "Logout request failed; local session cleared anyway");
        }
        result
    }

    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response, ClientError> {
        let mut builder = self.client.request(request.method.clone(), self.url(&request.path));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Send an authenticated request.
    ///
    /// On 401 the request is suspended, the refresh flow runs, and the request
    /// is replayed with the new token, at most once per request. If the refresh
    /// fails the session is cleared, `SessionEvent::Unauthenticated` is
    /// broadcast and the refresh error is returned.
    ///
    /// Refreshes are serialized. A request that waited while another one
    /// refreshed replays with the token that refresh produced instead of
    /// presenting the (possibly rotated) cookie a second time.
    pub async fn dispatch(&self, mut request: ApiRequest) -> Result<Response, ClientError> {
        loop {
            let sent_token = self.session.token();
            let response = self.send(&request, sent_token.as_deref()).await?;

            if response.status() != StatusCode::UNAUTHORIZED || request.retried {
                return Self::check_response(response).await;
            }

            request.retried = true;
            let _guard = self.refresh_lock.lock().await;

            let current_token = self.session.token();
            if current_token != sent_token {
                if current_token.is_some() {
                    debug!(path = %request.path, "Session refreshed by another request, replaying");
                    continue;
                }
                // 대기 중 세션이 종료됨 (다른 요청의 refresh 실패 또는 로그아웃)
                return Self::check_response(response).await;
            }

            debug!(path = %request.path, "Access token rejected, refreshing session");

            if let Err(err) = self.refresh_locked().await {
                warn!(error = %err, "Session refresh failed; signalling unauthenticated");
                self.session.clear();
                // Err only means there are no subscribers
                let _ = self.events.send(SessionEvent::Unauthenticated);
                return Err(err);
            }
        }
    }

    /// `dispatch` a GET and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.dispatch(ApiRequest::get(path)).await?;
        Self::parse(response, path).await
    }

    /// The authenticated user's profile, fetched through `dispatch`.
    pub async fn me(&self) -> Result<UserSummary, ClientError> {
        self.get_json("/auth/me").await
    }
}
