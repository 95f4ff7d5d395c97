use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use shared::{
    domain::{CategoryFilter, Fact, FactId, VoteKind, FACT_PAGE_LIMIT},
    error::ApiError,
    protocol::{vote_increment_body, NewFact},
};
use thiserror::Error;
use tracing::info;

use crate::config::StoreSettings;

const PREFER_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store rejected request with status {status}: {}", error.message)]
    Api { status: u16, error: ApiError },
    #[error("store returned no row for {operation}")]
    EmptyResponse { operation: &'static str },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Transport(err) => err.status().map(|status| status.as_u16()),
            StoreError::Api { status, .. } => Some(*status),
            StoreError::EmptyResponse { .. } | StoreError::Unavailable(_) => None,
        }
    }
}

/// Table operations the fact board needs from the backend.
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Up to [`FACT_PAGE_LIMIT`] rows ordered by descending likes.
    async fn list_facts(&self, filter: CategoryFilter) -> Result<Vec<Fact>, StoreError>;
    async fn insert_fact(&self, new_fact: &NewFact) -> Result<Fact, StoreError>;
    /// Sets `kind` to `current + 1` on row `id` and returns the updated row.
    async fn increment_vote(
        &self,
        id: FactId,
        kind: VoteKind,
        current: u32,
    ) -> Result<Fact, StoreError>;
}

/// [`FactStore`] over the hosted REST table API.
#[derive(Clone)]
pub struct SupabaseStore {
    http: Client,
    settings: StoreSettings,
}

impl SupabaseStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: StoreSettings) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.settings.table_url())
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(&self.settings.anon_key)
    }

    async fn rows(response: Response) -> Result<Vec<Fact>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                error: ApiError::from_response(status.as_u16(), &body),
            });
        }
        Ok(response.json().await?)
    }

    async fn single_row(
        response: Response,
        operation: &'static str,
    ) -> Result<Fact, StoreError> {
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::EmptyResponse { operation })
    }
}

#[async_trait]
impl FactStore for SupabaseStore {
    async fn list_facts(&self, filter: CategoryFilter) -> Result<Vec<Fact>, StoreError> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "likes.desc".to_string()),
            ("limit", FACT_PAGE_LIMIT.to_string()),
        ];
        if let Some(category) = filter.category() {
            query.push(("category", format!("eq.{}", category.name())));
        }

        let response = self.request(Method::GET).query(&query).send().await?;
        let facts = Self::rows(response).await?;
        info!(filter = %filter, count = facts.len(), "store: facts listed");
        Ok(facts)
    }

    async fn insert_fact(&self, new_fact: &NewFact) -> Result<Fact, StoreError> {
        let response = self
            .request(Method::POST)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&[new_fact])
            .send()
            .await?;
        let fact = Self::single_row(response, "insert").await?;
        info!(fact_id = fact.id.0, category = %fact.category, "store: fact inserted");
        Ok(fact)
    }

    async fn increment_vote(
        &self,
        id: FactId,
        kind: VoteKind,
        current: u32,
    ) -> Result<Fact, StoreError> {
        let response = self
            .request(Method::PATCH)
            .query(&[("id", format!("eq.{}", id.0))])
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&vote_increment_body(kind, current))
            .send()
            .await?;
        let fact = Self::single_row(response, "vote update").await?;
        info!(
            fact_id = fact.id.0,
            counter = kind.column(),
            value = fact.votes(kind),
            "store: vote recorded"
        );
        Ok(fact)
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
