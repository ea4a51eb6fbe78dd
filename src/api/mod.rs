//! HTTP client for the remote user-management API.
//!
//! Five calls, one per endpoint. Users and positions are opaque JSON records:
//! the client passes them through and the UI pretty-prints them.

use std::path::PathBuf;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{Instrument, debug, info_span};
use url::Url;

use crate::error::ApiError;

/// Origin used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://user-management-api-cvmt.onrender.com";

/// A user record as returned by the API, kept verbatim.
pub type User = Value;

/// Body of `GET /positions`, stored as-is. Neither field is checked on
/// arrival; [`PositionList::visible`] decides what gets shown.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionList {
    #[serde(default)]
    pub success: Option<Value>,
    #[serde(default)]
    pub positions: Option<Value>,
    /// Any other top-level fields the server sends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PositionList {
    /// The positions, once the server reported success and sent something.
    pub fn visible(&self) -> Option<&Value> {
        if !self.success.as_ref().is_some_and(is_truthy) {
            return None;
        }
        self.positions.as_ref().filter(|p| is_truthy(p))
    }
}

/// Loose truthiness: null, false, zero and "" are off; containers are on.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct UsersResponse {
    users: Vec<User>,
}

#[derive(Deserialize)]
struct UserResponse {
    user: User,
}

#[derive(Deserialize)]
struct CreatedResponse {
    message: String,
}

/// Fields of a user to be created. The token is not part of it: it travels
/// as a request header, never as a body part.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position_id: String,
    pub photo: Option<PathBuf>,
}

impl NewUser {
    /// Text parts of the multipart body, in submission order.
    pub fn text_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("position_id", &self.position_id),
        ]
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client rooted at `base_url`. Paths are appended to whatever
    /// path the base already has, so a proxy prefix like `/api` works.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET /token`
    pub async fn token(&self) -> Result<String, ApiError> {
        let url = self.endpoint(&["token"]);
        let body: TokenResponse = self.send("GET", &url, self.http.get(url.clone())).await?;
        Ok(body.token)
    }

    /// `GET /positions`
    pub async fn positions(&self) -> Result<PositionList, ApiError> {
        let url = self.endpoint(&["positions"]);
        self.send("GET", &url, self.http.get(url.clone())).await
    }

    /// `GET /users?page=&count=`
    pub async fn users(&self, page: u32, count: u32) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint(&["users"]);
        let request = self
            .http
            .get(url.clone())
            .query(&[("page", page), ("count", count)]);
        let body: UsersResponse = self.send("GET", &url, request).await?;
        Ok(body.users)
    }

    /// `GET /users/{id}`; `id` is sent as typed, as a single path segment.
    pub async fn user(&self, id: &str) -> Result<User, ApiError> {
        let url = self.endpoint(&["users", id]);
        let body: UserResponse = self.send("GET", &url, self.http.get(url.clone())).await?;
        Ok(body.user)
    }

    /// `POST /users` as multipart, with the token in the `token` header.
    /// Returns the server's confirmation message.
    pub async fn create_user(&self, user: &NewUser, token: &str) -> Result<String, ApiError> {
        let form = build_form(user).await?;
        let url = self.endpoint(&["users"]);
        let request = self
            .http
            .post(url.clone())
            .header("token", token)
            .multipart(form);
        let body: CreatedResponse = self.send("POST", &url, request).await?;
        Ok(body.message)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let span = info_span!("api.request", http.method = method, path = %url.path());
        async move {
            let response = request.send().await?;
            let status = response.status();
            debug!(status = status.as_u16(), "response received");
            if !status.is_success() {
                return Err(ApiError::Status {
                    status,
                    body: read_error_body(response).await,
                });
            }
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
                status,
                reason: e.to_string(),
            })
        }
        .instrument(span)
        .await
    }
}

/// Body of an error response: JSON when it parses, otherwise the raw text.
async fn read_error_body(response: Response) -> Option<Value> {
    let text = response.text().await.ok()?;
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

async fn build_form(user: &NewUser) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in user.text_fields() {
        form = form.text(name, value.to_owned());
    }
    if let Some(path) = &user.photo {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ApiError::Photo {
                path: path.clone(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_owned());
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.essence_str())?;
        form = form.part("photo", part);
    }
    Ok(form)
}
