use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub retrieval: Retrieval,
	pub context: Context,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

fn default_log_level() -> String {
	"info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub chat: ChatProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub model: String,
	pub api_key: String,
	pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatProviderConfig {
	pub provider_id: String,
	pub model: String,
	pub api_key: String,
	pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Retrieval {
	pub top_k: u32,
	pub similarity_threshold: f32,
	pub vector_dim: u32,
}

/// Resource caps governing prompt-size/token spend (§5): history windows and their
/// assistant-message truncation lengths, plus the static-KB chunk preview length.
#[derive(Debug, Clone, Deserialize)]
pub struct Context {
	#[serde(default = "default_history_window_answer")]
	pub history_window_answer: usize,
	#[serde(default = "default_history_window_draft")]
	pub history_window_draft: usize,
	#[serde(default = "default_assistant_truncate_answer")]
	pub assistant_truncate_answer: usize,
	#[serde(default = "default_assistant_truncate_draft")]
	pub assistant_truncate_draft: usize,
	#[serde(default = "default_chunk_preview_chars")]
	pub chunk_preview_chars: usize,
}

fn default_history_window_answer() -> usize {
	6
}
fn default_history_window_draft() -> usize {
	10
}
fn default_assistant_truncate_answer() -> usize {
	600
}
fn default_assistant_truncate_draft() -> usize {
	800
}
fn default_chunk_preview_chars() -> usize {
	200
}
