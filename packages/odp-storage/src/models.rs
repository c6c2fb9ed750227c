//! `FromRow` row shapes. Embeddings are never read back into Rust — `document_chunks.embedding`
//! and `dynamic_facts.embedding` are write-only columns from this crate's perspective, bound only
//! as `pgvector::Vector` query parameters and referenced inside `ORDER BY`/`WHERE` distance
//! expressions — so no row here carries an embedding column.

use odp_domain::{ChunkHit, Deal, Message, MessageMetadata, MessageRole, Session, ToneRule, ToneScope};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DealRow {
	pub deal_id: uuid::Uuid,
	pub deal_name: String,
	pub deal_code: String,
	pub active: bool,
}

impl From<DealRow> for Deal {
	fn from(row: DealRow) -> Self {
		Deal { deal_id: row.deal_id, deal_name: row.deal_name, deal_code: row.deal_code, active: row.active }
	}
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ToneRuleRow {
	pub rule_id: uuid::Uuid,
	pub scope: String,
	pub deal_id: Option<uuid::Uuid>,
	pub rule_type: String,
	pub rule_text: String,
	pub priority: i32,
	pub active: bool,
}

impl From<ToneRuleRow> for ToneRule {
	fn from(row: ToneRuleRow) -> Self {
		let scope = if row.scope == "deal" { ToneScope::Deal } else { ToneScope::Global };

		ToneRule {
			rule_id: row.rule_id,
			scope,
			deal_id: row.deal_id,
			rule_type: row.rule_type,
			rule_text: row.rule_text,
			priority: row.priority,
			active: row.active,
		}
	}
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SessionRow {
	pub session_id: String,
	pub user_id: String,
	pub created_at: time::OffsetDateTime,
	pub updated_at: time::OffsetDateTime,
}

impl From<SessionRow> for Session {
	fn from(row: SessionRow) -> Self {
		Session {
			session_id: row.session_id,
			user_id: row.user_id,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MessageRow {
	pub message_id: uuid::Uuid,
	pub session_id: String,
	pub role: String,
	pub content: String,
	pub deal_id: Option<uuid::Uuid>,
	pub metadata: Option<serde_json::Value>,
	pub created_at: time::OffsetDateTime,
}

impl TryFrom<MessageRow> for Message {
	type Error = serde_json::Error;

	fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
		let metadata: Option<MessageMetadata> = row.metadata.map(serde_json::from_value).transpose()?;

		Ok(Message {
			message_id: row.message_id,
			session_id: row.session_id,
			role: MessageRole::from_str(&row.role).unwrap_or(MessageRole::User),
			content: row.content,
			deal_id: row.deal_id,
			metadata,
			created_at: row.created_at,
		})
	}
}

/// A dynamic-fact Q&A row surfaced by `search_dynamic`, before formatting into `Q:…/A:…` text.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DynamicQaRow {
	pub question: Option<String>,
	pub answer: Option<String>,
}

/// A dynamic-fact key-value row surfaced by `search_dynamic`, before formatting into
/// `Title-cased-Key: value` text.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DynamicKvRow {
	pub fact_key: Option<String>,
	pub fact_value: Option<String>,
}

/// One Static KB candidate, scored against the query embedding by `embedding <=> $query`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ChunkHitRow {
	pub chunk_id: uuid::Uuid,
	pub deal_id: uuid::Uuid,
	pub doc_name: String,
	pub chunk_index: i32,
	pub page_number: Option<i32>,
	pub text: String,
	pub similarity: f32,
}

impl From<ChunkHitRow> for ChunkHit {
	fn from(row: ChunkHitRow) -> Self {
		ChunkHit {
			chunk_id: row.chunk_id,
			deal_id: row.deal_id,
			doc_name: row.doc_name,
			chunk_index: row.chunk_index,
			page_number: row.page_number,
			text: row.text,
			similarity: row.similarity,
		}
	}
}
