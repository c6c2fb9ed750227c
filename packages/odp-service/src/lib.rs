//! The investor bot's service layer: `OdpService` composes a connection pool and the two LLM
//! provider trait objects into the public operations `odp-api` exposes over HTTP. Everything
//! that talks to Postgres or a provider lives under this crate or the layers beneath it;
//! `odp-domain` stays pure.

pub mod clarifier;
pub mod draft;
pub mod dynamic_kb;
pub mod error;
pub mod fact_extractor;
pub mod orchestrator;
pub mod query_rewrite;
pub mod static_search;
pub mod types;

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use odp_config::Config;
use odp_providers::{chat::ChatProvider, embedding::EmbeddingProvider};

pub use error::{Error, Result};
pub use types::{AskResponse, ConversationMessage, ConversationResponse, SessionSummary};

use orchestrator::Orchestrator;

/// Holds what every request needs and nothing request-scoped; `ask`/`generate_draft` build a
/// borrowing [`Orchestrator`] per call rather than this struct owning one long-lived.
pub struct OdpService {
	pool: PgPool,
	embedding: Arc<dyn EmbeddingProvider>,
	chat: Arc<dyn ChatProvider>,
	config: Config,
}

impl OdpService {
	pub fn new(
		pool: PgPool,
		embedding: Arc<dyn EmbeddingProvider>,
		chat: Arc<dyn ChatProvider>,
		config: Config,
	) -> Self {
		Self { pool, embedding, chat, config }
	}

	fn orchestrator(&self) -> Orchestrator<'_> {
		Orchestrator {
			pool: &self.pool,
			embedding: self.embedding.as_ref(),
			chat: self.chat.as_ref(),
			retrieval: &self.config.retrieval,
			context: &self.config.context,
		}
	}

	/// §6 `POST /bot/ask` and `POST /bot/ask/<deal_id>`.
	pub async fn ask(
		&self,
		question: &str,
		user_id: &str,
		session_id: Option<&str>,
		deal_id: Option<Uuid>,
	) -> Result<AskResponse> {
		self.orchestrator().ask(question, user_id, session_id, deal_id).await
	}

	/// §6 `POST /bot/generate-draft`.
	pub async fn generate_draft(&self, session_id: &str, user_id: &str) -> Result<AskResponse> {
		self.orchestrator().generate_draft(session_id, user_id).await
	}

	/// §6 `GET /bot/conversation/<session_id>`.
	pub async fn get_conversation(&self, session_id: &str, limit: Option<i64>) -> Result<ConversationResponse> {
		let messages = odp_storage::messages::history(&self.pool, session_id, limit).await.map_err(|err| {
			tracing::warn!(error = %err, "failed to load conversation");
			Error::QueryFailed
		})?;

		let total = messages.len();

		Ok(ConversationResponse {
			session_id: session_id.to_string(),
			messages: messages.into_iter().map(ConversationMessage::from).collect(),
			total,
		})
	}

	/// §6 `DELETE /bot/conversation/<session_id>`: returns whether any message existed.
	pub async fn clear_conversation(&self, session_id: &str) -> Result<bool> {
		odp_storage::messages::clear_conversation(&self.pool, session_id).await.map_err(|err| {
			tracing::warn!(error = %err, "failed to clear conversation");
			Error::QueryFailed
		})
	}

	/// §6 `GET /bot/sessions/<user_id>`.
	pub async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
		let sessions = odp_storage::sessions::list_sessions(&self.pool, user_id).await.map_err(|err| {
			tracing::warn!(error = %err, "failed to list sessions");
			Error::QueryFailed
		})?;

		Ok(sessions.into_iter().map(SessionSummary::from).collect())
	}

	/// §4.C16 schema bootstrap, exposed so the admin surface can trigger it on demand.
	pub async fn ensure_schema(&self) -> odp_storage::Result<()> {
		odp_storage::db::Db { pool: self.pool.clone() }.ensure_schema(self.config.retrieval.vector_dim).await
	}

	pub fn pool(&self) -> &PgPool {
		&self.pool
	}
}
