//! Deterministic fakes for C1/C2, driven by caller-configured scripts rather than a real network
//! call. Used throughout `odp-service`'s orchestrator tests.

use std::sync::Mutex;

use async_trait::async_trait;
use odp_domain::ChatTurn;
use odp_providers::{Result as ProviderResult, chat::ChatProvider, embedding::EmbeddingProvider};

/// Embeds any text to a fixed vector, unless a specific text is pinned to a specific vector via
/// [`FakeEmbeddingProvider::pin`] — enough to drive similarity-ordering assertions without a real
/// model.
pub struct FakeEmbeddingProvider {
	default_vector: Vec<f32>,
	pins: Mutex<Vec<(String, Vec<f32>)>>,
}

impl FakeEmbeddingProvider {
	pub fn new(dim: usize) -> Self {
		Self { default_vector: vec![0.1; dim], pins: Mutex::new(Vec::new()) }
	}

	pub fn pin(&self, text: impl Into<String>, vector: Vec<f32>) {
		self.pins.lock().unwrap().push((text.into(), vector));
	}

	fn resolve(&self, text: &str) -> Vec<f32> {
		let pins = self.pins.lock().unwrap();

		pins.iter()
			.find(|(pinned_text, _)| pinned_text == text)
			.map(|(_, vector)| vector.clone())
			.unwrap_or_else(|| self.default_vector.clone())
	}
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddingProvider {
	async fn embed(&self, text: &str) -> ProviderResult<Vec<f32>> {
		Ok(self.resolve(text))
	}

	async fn embed_batch(&self, texts: &[String]) -> ProviderResult<Vec<Vec<f32>>> {
		Ok(texts.iter().map(|t| self.resolve(t)).collect())
	}
}

/// Replays a fixed queue of responses, one per `complete` call, regardless of the prompt. Tests
/// that need to assert on the prompt itself should capture `messages` via
/// [`FakeChatProvider::calls`] rather than branching the fake on content.
pub struct FakeChatProvider {
	responses: Mutex<Vec<String>>,
	calls: Mutex<Vec<Vec<ChatTurn>>>,
}

impl FakeChatProvider {
	/// Responses are returned in order, oldest first; the last one repeats once exhausted.
	pub fn new(responses: Vec<&str>) -> Self {
		Self {
			responses: Mutex::new(responses.into_iter().map(str::to_string).collect()),
			calls: Mutex::new(Vec::new()),
		}
	}

	pub fn calls(&self) -> Vec<Vec<ChatTurn>> {
		self.calls.lock().unwrap().clone()
	}
}

#[async_trait]
impl ChatProvider for FakeChatProvider {
	async fn complete(
		&self,
		messages: &[ChatTurn],
		_temperature: f32,
		_max_tokens: u32,
	) -> ProviderResult<String> {
		self.calls.lock().unwrap().push(messages.to_vec());

		let mut responses = self.responses.lock().unwrap();

		if responses.len() > 1 {
			Ok(responses.remove(0))
		} else {
			Ok(responses.first().cloned().unwrap_or_default())
		}
	}
}
