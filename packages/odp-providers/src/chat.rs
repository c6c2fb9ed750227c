//! C2: chat provider trait, with an OpenAI-Chat-Completions-shaped implementation and an
//! Anthropic-Messages-shaped implementation. The Anthropic variant requires a separate top-level
//! `system` field, so it folds leading/mid-conversation system turns per C2's contract.

use std::sync::Arc;

use async_trait::async_trait;
use odp_config::ChatProviderConfig;
use odp_domain::{ChatRole, ChatTurn};
use serde::Deserialize;

use crate::{Error, Result, auth_headers};

#[async_trait]
pub trait ChatProvider: Send + Sync {
	async fn complete(&self, messages: &[ChatTurn], temperature: f32, max_tokens: u32) -> Result<String>;
}

/// Builds the configured chat provider. `provider_id` currently recognizes `"openai"` and
/// `"anthropic"`; unrecognized values are rejected by `odp-config::validate` before this is ever
/// called.
pub fn build_chat_provider(config: &ChatProviderConfig) -> Result<Arc<dyn ChatProvider>> {
	match config.provider_id.as_str() {
		"openai" => Ok(Arc::new(OpenAiChatProvider::new(config))),
		"anthropic" => Ok(Arc::new(AnthropicChatProvider::new(config))),
		other => Err(Error::UnknownProvider { provider_id: other.to_string() }),
	}
}

/// Splits off the leading run of `System` turns as a single joined string, and folds any
/// mid-conversation `System` turn into the content of the next `User` turn.
fn fold_system_turns(messages: &[ChatTurn]) -> (String, Vec<ChatTurn>) {
	let mut leading_system = Vec::new();
	let mut rest: Vec<&ChatTurn> = Vec::new();
	let mut seen_non_system = false;

	for turn in messages {
		if !seen_non_system && turn.role == ChatRole::System {
			leading_system.push(turn.content.as_str());
			continue;
		}
		seen_non_system = true;
		rest.push(turn);
	}

	let mut folded = Vec::new();
	let mut pending_prefix = String::new();

	for turn in rest {
		match turn.role {
			ChatRole::System => {
				if !pending_prefix.is_empty() {
					pending_prefix.push('\n');
				}
				pending_prefix.push_str(&turn.content);
			},
			ChatRole::User => {
				let content = if pending_prefix.is_empty() {
					turn.content.clone()
				} else {
					let merged = format!("{pending_prefix}\n{}", turn.content);
					pending_prefix.clear();
					merged
				};
				folded.push(ChatTurn { role: ChatRole::User, content });
			},
			ChatRole::Assistant => folded.push(turn.clone()),
		}
	}

	if !pending_prefix.is_empty() {
		folded.push(ChatTurn { role: ChatRole::User, content: pending_prefix });
	}

	(leading_system.join("\n"), folded)
}

pub struct OpenAiChatProvider {
	client: reqwest::Client,
	api_key: String,
	model: String,
	base_url: String,
}

impl OpenAiChatProvider {
	pub fn new(config: &ChatProviderConfig) -> Self {
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
struct OpenAiMessage<'a> {
	role: &'a str,
	content: &'a str,
}

fn role_str(role: ChatRole) -> &'static str {
	match role {
		ChatRole::System => "system",
		ChatRole::User => "user",
		ChatRole::Assistant => "assistant",
	}
}

#[derive(Debug, serde::Serialize)]
struct OpenAiChatRequest<'a> {
	model: &'a str,
	messages: Vec<OpenAiMessage<'a>>,
	temperature: f32,
	max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
	choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
	message: OpenAiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoiceMessage {
	content: String,
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
	async fn complete(&self, messages: &[ChatTurn], temperature: f32, max_tokens: u32) -> Result<String> {
		let url = format!("{}/chat/completions", self.base_url);
		let body = OpenAiChatRequest {
			model: &self.model,
			messages: messages.iter().map(|m| OpenAiMessage { role: role_str(m.role), content: &m.content }).collect(),
			temperature,
			max_tokens,
		};

		let response = self
			.client
			.post(url)
			.headers(auth_headers(&self.api_key))
			.json(&body)
			.send()
			.await?
			.error_for_status()?;

		let mut parsed: OpenAiChatResponse = response.json().await?;

		if parsed.choices.is_empty() {
			return Err(Error::InvalidResponse("chat completion returned no choices".to_string()));
		}

		Ok(parsed.choices.remove(0).message.content)
	}
}

pub struct AnthropicChatProvider {
	client: reqwest::Client,
	api_key: String,
	model: String,
	base_url: String,
}

impl AnthropicChatProvider {
	pub fn new(config: &ChatProviderConfig) -> Self {
		Self {
			client: reqwest::Client::new(),
			api_key: config.api_key.clone(),
			model: config.model.clone(),
			base_url: config
				.base_url
				.clone()
				.unwrap_or_else(|| "https://api.anthropic.com/v1".to_string()),
		}
	}
}

#[derive(Debug, serde::Serialize)]
struct AnthropicMessage<'a> {
	role: &'a str,
	content: &'a str,
}

#[derive(Debug, serde::Serialize)]
struct AnthropicChatRequest<'a> {
	model: &'a str,
	system: &'a str,
	messages: Vec<AnthropicMessage<'a>>,
	temperature: f32,
	max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicChatResponse {
	content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
	text: String,
}

#[async_trait]
impl ChatProvider for AnthropicChatProvider {
	async fn complete(&self, messages: &[ChatTurn], temperature: f32, max_tokens: u32) -> Result<String> {
		let (system, folded) = fold_system_turns(messages);
		let url = format!("{}/messages", self.base_url);
		let body = AnthropicChatRequest {
			model: &self.model,
			system: &system,
			messages: folded.iter().map(|m| AnthropicMessage { role: role_str(m.role), content: &m.content }).collect(),
			temperature,
			max_tokens,
		};

		let response = self
			.client
			.post(url)
			.header("x-api-key", &self.api_key)
			.header("anthropic-version", "2023-06-01")
			.json(&body)
			.send()
			.await?
			.error_for_status()?;

		let parsed: AnthropicChatResponse = response.json().await?;

		parsed
			.content
			.into_iter()
			.next()
			.map(|block| block.text)
			.ok_or_else(|| Error::InvalidResponse("message response had no content blocks".to_string()))
	}
}
