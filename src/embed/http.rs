//! HTTP embedding client for OpenAI-compatible `/embeddings` endpoints
//!
//! Blocking client, used from the synchronous indexing path. The endpoint
//! must return vectors of the configured dimension for every request.

use crate::embed::{EmbedError, EmbedResult, Embedder};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

/// Embeddings client for OpenAI-compatible HTTP services
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimension: usize,
}

impl HttpEmbedder {
    /// Builds a new HTTP embeddings client
    ///
    /// # Arguments
    ///
    /// * `base_url` - Service base URL; `/embeddings` is appended
    /// * `model` - Model name sent with every request
    /// * `dimension` - Expected vector dimensionality
    /// * `api_key` - Optional bearer token
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        dimension: usize,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> EmbedResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = api_key {
            let auth = format!("Bearer {}", key.trim());
            let value = HeaderValue::from_str(&auth)
                .map_err(|_| EmbedError::Request("invalid API key header".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| EmbedError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.into(),
            dimension,
        })
    }
}

impl Embedder for HttpEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> EmbedResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| EmbedError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbedError::HttpStatus(status.as_u16()));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| EmbedError::MalformedResponse(e.to_string()))?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|row| row.embedding)
            .ok_or_else(|| EmbedError::MalformedResponse("empty data array".to_string()))?;

        if vector.len() != self.dimension {
            return Err(EmbedError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        Ok(vector)
    }
}
