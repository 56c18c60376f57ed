//! The script store seam: what the review queue needs from a backend.
//!
//! `ScriptStore` mirrors the review server's HTTP surface (list, review,
//! reasons, stats); `HttpStore` is the reqwest client for it. The local
//! SQLite library in `crate::store` implements the same trait for offline
//! triage. Transport policy (retries, timeouts) is the collaborator's
//! business; the queue only needs calls to resolve to success or a
//! distinguishable failure.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{Decision, RejectionReason, ReviewStats, ReviewStatus, Script};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("library error: {0}")]
    Library(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Filter set for listing scripts. Opaque to the queue controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptFilters {
    pub dj: Option<String>,
    pub category: Option<String>,
    pub status: Option<ReviewStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// One page of scripts.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptPage {
    pub scripts: Vec<Script>,
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_more: bool,
}

/// Backend collaborator for listing and reviewing scripts.
#[async_trait]
pub trait ScriptStore: Send + Sync {
    async fn list_scripts(
        &self,
        filters: &ScriptFilters,
        page: u32,
        page_size: u32,
    ) -> Result<ScriptPage>;

    /// Persist a decision. `reason_id`/`comment` accompany rejections only.
    async fn review_script(
        &self,
        script_id: &str,
        decision: Decision,
        reason_id: Option<&str>,
        comment: Option<&str>,
    ) -> Result<()>;

    async fn rejection_reasons(&self) -> Result<Vec<RejectionReason>>;

    async fn stats(&self) -> Result<ReviewStats>;
}

#[derive(Debug, Serialize)]
struct ReviewRequest<'a> {
    script_id: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_comment: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Client for the review server's JSON API.
pub struct HttpStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            token,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
        };
        Err(StoreError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ScriptStore for HttpStore {
    async fn list_scripts(
        &self,
        filters: &ScriptFilters,
        page: u32,
        page_size: u32,
    ) -> Result<ScriptPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(dj) = &filters.dj {
            query.push(("dj", dj.clone()));
        }
        if let Some(category) = &filters.category {
            query.push(("category", category.clone()));
        }
        if let Some(status) = filters.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(from) = filters.date_from {
            query.push(("date_from", from.to_string()));
        }
        if let Some(to) = filters.date_to {
            query.push(("date_to", to.to_string()));
        }

        debug!(page, page_size, "fetching script page");
        let response = self
            .request(self.client.get(format!("{}/api/scripts", self.base_url)))
            .query(&query)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn review_script(
        &self,
        script_id: &str,
        decision: Decision,
        reason_id: Option<&str>,
        comment: Option<&str>,
    ) -> Result<()> {
        let body = ReviewRequest {
            script_id,
            status: decision.as_str(),
            reason_id,
            custom_comment: comment,
        };

        debug!(script_id, decision = decision.as_str(), "submitting review");
        let response = self
            .request(self.client.post(format!("{}/api/review", self.base_url)))
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn rejection_reasons(&self) -> Result<Vec<RejectionReason>> {
        let response = self
            .request(self.client.get(format!("{}/api/reasons", self.base_url)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn stats(&self) -> Result<ReviewStats> {
        let response = self
            .request(self.client.get(format!("{}/api/stats", self.base_url)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
