//! Attrove API client.
//!
//! Thin reqwest wrapper over the per-user endpoints (events, search, query,
//! meetings, integrations). The flows are written against the `CommsApi`
//! trait so the demo data source and tests can stand in for the live API.
//!
//! Modules:
//! - admin: partner-level provisioning (users, connect tokens)
//! - types: response payloads

pub mod admin;
pub mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use types::{
    DataEnvelope, Event, Integration, MeetingRecord, QueryResponse, SearchResponse,
};

/// Production API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.attrove.com";

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Authentication { message: String },
    #[error("{message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },
    #[error("{message}")]
    Api {
        code: String,
        message: String,
        status: Option<u16>,
    },
    #[error("{0}")]
    Validation(String),
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status carried by the error, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Authentication { .. } => Some(401),
            ApiError::RateLimit { .. } => Some(429),
            ApiError::Api { status, .. } => *status,
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Error body shape: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Classify a non-success response.
pub(crate) fn classify_error(
    status: reqwest::StatusCode,
    retry_after: Option<u64>,
    body: &str,
) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let detail = parsed.error.unwrap_or_default();
    let message = detail
        .message
        .or(parsed.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    match status.as_u16() {
        401 | 403 => ApiError::Authentication { message },
        429 => ApiError::RateLimit {
            message,
            retry_after,
        },
        code => ApiError::Api {
            code: detail.code.unwrap_or_else(|| format!("HTTP_{}", code)),
            message,
            status: Some(code),
        },
    }
}

fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Decode a response, classifying any non-2xx status.
pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let retry_after = retry_after_secs(resp.headers());
        let body = resp.text().await.unwrap_or_default();
        return Err(classify_error(status, retry_after, &body));
    }
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

// ============================================================================
// Request options
// ============================================================================

/// Parameters for `events.list`. Dates are local `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub start_date: String,
    pub end_date: String,
    pub expand: Vec<&'static str>,
}

/// Options for keyword/semantic search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_date: Option<String>,
    pub include_body_text: bool,
}

/// Options for a natural-language query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryOptions {
    pub include_sources: bool,
}

/// Parameters for `meetings.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingQuery {
    pub expand: Vec<&'static str>,
    pub limit: Option<u32>,
}

// ============================================================================
// Data-source trait
// ============================================================================

/// The per-user operations the rundown tools depend on.
#[async_trait]
pub trait CommsApi: Send + Sync {
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>, ApiError>;

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, ApiError>;

    async fn query(&self, prompt: &str, options: QueryOptions) -> Result<QueryResponse, ApiError>;

    async fn list_meetings(&self, query: &MeetingQuery) -> Result<Vec<MeetingRecord>, ApiError>;

    async fn list_integrations(&self) -> Result<Vec<Integration>, ApiError>;
}

// ============================================================================
// Live client
// ============================================================================

/// Per-user client authenticated with an `sk_` key.
#[derive(Debug, Clone)]
pub struct AttroveClient {
    http: reqwest::Client,
    base_url: url::Url,
    api_key: String,
    user_id: String,
}

impl AttroveClient {
    pub fn new(api_key: &str, user_id: &str) -> Result<Self, ApiError> {
        Self::with_base_url(api_key, user_id, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, user_id: &str, base_url: &str) -> Result<Self, ApiError> {
        if api_key.trim().is_empty() {
            return Err(ApiError::Validation("apiKey is required".to_string()));
        }
        if user_id.trim().is_empty() {
            return Err(ApiError::Validation("userId is required".to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: url::Url::parse(base_url)?,
            api_key: api_key.to_string(),
            user_id: user_id.to_string(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn user_url(&self, resource: &str) -> Result<url::Url, ApiError> {
        Ok(self
            .base_url
            .join(&format!("/v1/users/{}/{}", self.user_id, resource))?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.user_url(resource)?;
        log::debug!("attrove GET {}", url);
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .query(params)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.user_url(resource)?;
        log::debug!("attrove POST {}", url);
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        read_json(resp).await
    }
}

#[async_trait]
impl CommsApi for AttroveClient {
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>, ApiError> {
        let mut params = vec![
            ("start_date", query.start_date.clone()),
            ("end_date", query.end_date.clone()),
        ];
        if !query.expand.is_empty() {
            params.push(("expand", query.expand.join(",")));
        }
        let envelope: DataEnvelope<Event> = self.get("events", &params).await?;
        Ok(envelope.data)
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, ApiError> {
        #[derive(Serialize)]
        struct SearchBody<'a> {
            query: &'a str,
            #[serde(flatten)]
            options: &'a SearchOptions,
        }

        self.post("search", &SearchBody { query, options }).await
    }

    async fn query(&self, prompt: &str, options: QueryOptions) -> Result<QueryResponse, ApiError> {
        #[derive(Serialize)]
        struct QueryBody<'a> {
            question: &'a str,
            include_sources: bool,
        }

        self.post(
            "query",
            &QueryBody {
                question: prompt,
                include_sources: options.include_sources,
            },
        )
        .await
    }

    async fn list_meetings(&self, query: &MeetingQuery) -> Result<Vec<MeetingRecord>, ApiError> {
        let mut params = Vec::new();
        if !query.expand.is_empty() {
            params.push(("expand", query.expand.join(",")));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        let envelope: DataEnvelope<MeetingRecord> = self.get("meetings", &params).await?;
        Ok(envelope.data)
    }

    async fn list_integrations(&self) -> Result<Vec<Integration>, ApiError> {
        // Older deployments return a bare array, newer ones wrap it in `data`.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IntegrationsBody {
            Bare(Vec<Integration>),
            Wrapped(DataEnvelope<Integration>),
        }

        let body: IntegrationsBody = self.get("integrations", &[]).await?;
        Ok(match body {
            IntegrationsBody::Bare(items) => items,
            IntegrationsBody::Wrapped(envelope) => envelope.data,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
