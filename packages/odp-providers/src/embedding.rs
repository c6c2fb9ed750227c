//! C1: embedding provider trait plus the default OpenAI-embeddings-shaped implementation.

use std::sync::Arc;

use async_trait::async_trait;
use odp_config::EmbeddingProviderConfig;
use serde::Deserialize;

use crate::{Error, Result, auth_headers};

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
	async fn embed(&self, text: &str) -> Result<Vec<f32>>;
	async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Builds the configured embedding provider. `provider_id` currently recognizes `"openai"`;
/// unrecognized values are rejected by `odp-config::validate` before this is ever called.
pub fn build_embedding_provider(config: &EmbeddingProviderConfig) -> Result<Arc<dyn EmbeddingProvider>> {
	match config.provider_id.as_str() {
		"openai" => Ok(Arc::new(OpenAiEmbeddingProvider::new(config))),
		other => Err(Error::UnknownProvider { provider_id: other.to_string() }),
	}
}

pub struct OpenAiEmbeddingProvider {
	client: reqwest::Client,
	api_key: String,
	model: String,
	base_url: String,
}

impl OpenAiEmbeddingProvider {
	pub fn new(config: &EmbeddingProviderConfig) -> Self {
		Self {
			client: reqwest::Client::new(),
			api_key: config.api_key.clone(),
			model: config.model.clone(),
			base_url: config
				.base_url
				.clone()
				.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
		}
	}
}

#[derive(Debug, serde::Serialize)]
struct EmbeddingRequest<'a> {
	model: &'a str,
	input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
	embedding: Vec<f32>,
	index: usize,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
	async fn embed(&self, text: &str) -> Result<Vec<f32>> {
		let mut vectors = self.embed_batch(std::slice::from_ref(&text.to_string())).await?;
		vectors.pop().ok_or_else(|| Error::InvalidResponse("empty embedding batch response".to_string()))
	}

	async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		let url = format!("{}/embeddings", self.base_url);
		let body = EmbeddingRequest { model: &self.model, input: texts };

		let response = self
			.client
			.post(url)
			.headers(auth_headers(&self.api_key))
			.json(&body)
			.send()
			.await?
			.error_for_status()?;

		let mut parsed: EmbeddingResponse = response.json().await?;

		// Providers are not guaranteed to preserve request order.
		parsed.data.sort_by_key(|row| row.index);

		Ok(parsed.data.into_iter().map(|row| row.embedding).collect())
	}
}
