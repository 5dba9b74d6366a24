use crate::wire::{BookRequest, BookResponse, ErrorBody, JoinRequest, NewMatch};
use crate::{Match, Stadium, User};
use log::{debug, error, warn};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

pub type ApiResult<T> = Result<T, ApiFailure>;

const USER_AGENT: &str = "pitchside/0.1 (terminal pitch booking)";

/// Gateway to the pitchside REST API. The only type in the workspace that
/// performs network I/O.
///
/// One attempt per call: no retries and no timeout. Nothing escapes this
/// boundary as a panic; reads come back as `Option`, writes as `Result` with
/// an [`ApiFailure`] carrying the server's message when it sent one.
#[derive(Debug, Clone)]
pub struct PitchsideApi {
    client: Client,
    base_url: String,
}

/// Transport-level classification, kept internal to the gateway.
#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Status {
        status: StatusCode,
        url: String,
        message: Option<String>,
    },
    Parsing(serde_json::Error, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Status { status, url, message } => match message {
                Some(m) => write!(f, "API error for {url}: {status} ({m})"),
                None => write!(f, "API error for {url}: {status}"),
            },
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
        }
    }
}

/// Uniform failure shape returned by `create`/`replace`. Callers branch on
/// `error` without inspecting transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub error: String,
    pub status: Option<u16>,
}

impl ApiFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), status: None }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error)
    }
}

impl std::error::Error for ApiFailure {}

impl From<ApiError> for ApiFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(..) => ApiFailure::new("Could not reach the server"),
            ApiError::Status { status, message, .. } => ApiFailure {
                error: message.unwrap_or_else(|| format!("Request failed ({})", status.as_u16())),
                status: Some(status.as_u16()),
            },
            ApiError::Parsing(..) => ApiFailure::new("Unexpected response from the server"),
        }
    }
}

impl PitchsideApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Generic verbs
    // -----------------------------------------------------------------------

    /// GET and decode. Any failure is logged and becomes `None`.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        match self.request::<(), T>(Method::GET, path, None).await {
            Ok(value) => Some(value),
            Err(e) => {
                error!("GET {path} failed: {e}");
                None
            }
        }
    }

    /// POST a JSON body.
    pub async fn create<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await.map_err(|e| {
            error!("POST {path} failed: {e}");
            ApiFailure::from(e)
        })
    }

    /// PUT a JSON body.
    pub async fn replace<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await.map_err(|e| {
            error!("PUT {path} failed: {e}");
            ApiFailure::from(e)
        })
    }

    /// DELETE. An empty success body decodes as JSON `null`.
    pub async fn remove(&self, path: &str) -> Option<serde_json::Value> {
        let url = self.url(path);
        let text = match self.send::<()>(Method::DELETE, &url, None).await {
            Ok(text) => text,
            Err(e) => {
                error!("DELETE {path} failed: {e}");
                return None;
            }
        };
        if text.trim().is_empty() {
            return Some(serde_json::Value::Null);
        }
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("DELETE {path} failed: {}", ApiError::Parsing(e, url));
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Endpoints
    // -----------------------------------------------------------------------

    pub async fn list_stadiums(&self) -> Option<Vec<Stadium>> {
        self.fetch("/stadiums").await
    }

    pub async fn create_stadium(&self, stadium: &Stadium) -> ApiResult<Stadium> {
        self.create("/stadiums", stadium).await
    }

    /// Book one slot; the response carries the updated stadium.
    pub async fn book_slot(&self, stadium_id: &str, time: &str) -> ApiResult<Stadium> {
        let path = format!("/stadiums/{stadium_id}/book");
        let response: BookResponse = self.create(&path, &BookRequest { time }).await?;
        if let Some(message) = response.message() {
            debug!("booking {stadium_id} at {time}: {message}");
        }
        Ok(response.into_stadium())
    }

    pub async fn list_matches(&self) -> Option<Vec<Match>> {
        self.fetch("/matches").await
    }

    pub async fn create_match(&self, new_match: &NewMatch) -> ApiResult<Match> {
        self.create("/matches", new_match).await
    }

    /// The join response shape varies by backend, so it stays untyped.
    pub async fn join_match(&self, match_id: &str, player_name: &str) -> ApiResult<serde_json::Value> {
        let path = format!("/matches/{match_id}/join");
        self.create(&path, &JoinRequest { player_name }).await
    }

    pub async fn list_users(&self) -> Option<Vec<User>> {
        self.fetch("/users").await
    }

    pub async fn create_user(&self, user: &User) -> ApiResult<User> {
        self.create("/users", user).await
    }

    pub async fn update_user(&self, user_id: &str, user: &User) -> ApiResult<User> {
        self.replace(&format!("/users/{user_id}"), user).await
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let text = self.send(method, &url, body).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parsing(e, url))
    }

    async fn send<B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        if status.is_success() {
            return Ok(text);
        }

        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.into_message(),
            Err(_) => {
                warn!("{url} answered {status} without a JSON error body");
                None
            }
        };
        Err(ApiError::Status { status, url: url.to_owned(), message })
    }
}
