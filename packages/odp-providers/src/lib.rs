//! LLM-facing providers: C1 (embedding) and C2 (chat), each a trait plus concrete
//! HTTP-shaped implementations selected at startup from configuration.

mod error;

pub mod chat;
pub mod embedding;

pub use chat::{AnthropicChatProvider, ChatProvider, OpenAiChatProvider, build_chat_provider};
pub use embedding::{EmbeddingProvider, OpenAiEmbeddingProvider, build_embedding_provider};
pub use error::{Error, Result};

use reqwest::header::{HeaderMap, HeaderValue};

fn auth_headers(api_key: &str) -> HeaderMap {
	let mut headers = HeaderMap::new();
	let mut value =
		HeaderValue::from_str(&format!("Bearer {api_key}")).expect("api key must be a valid header value");
	value.set_sensitive(true);
	headers.insert(reqwest::header::AUTHORIZATION, value);
	headers
}
