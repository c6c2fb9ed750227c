use serde::{Deserialize, Serialize};

/// A live investment opportunity. Read-only to the core: created and maintained externally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
	pub deal_id: uuid::Uuid,
	pub deal_name: String,
	pub deal_code: String,
	pub active: bool,
}

/// A passage of an ingested source document, carrying the embedding used for Static KB search.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
	pub chunk_id: uuid::Uuid,
	pub deal_id: uuid::Uuid,
	pub doc_id: uuid::Uuid,
	pub doc_name: String,
	pub chunk_index: i32,
	pub page_number: Option<i32>,
	pub text: String,
	pub embedding: Vec<f32>,
}

/// A single Static KB search result, scored against the query embedding.
#[derive(Debug, Clone)]
pub struct ChunkHit {
	pub chunk_id: uuid::Uuid,
	pub deal_id: uuid::Uuid,
	pub doc_name: String,
	pub chunk_index: i32,
	pub page_number: Option<i32>,
	pub text: String,
	pub similarity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStatus {
	Approved,
	Pending,
}
impl ApprovalStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Approved => "approved",
			Self::Pending => "pending",
		}
	}

	pub fn from_str(raw: &str) -> Option<Self> {
		match raw {
			"approved" => Some(Self::Approved),
			"pending" => Some(Self::Pending),
			_ => None,
		}
	}
}

/// Outcome of `upsert_fact`: whether the `(deal_id, fact_key)` row was newly inserted or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactAction {
	Created,
	Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
	User,
	Assistant,
}
impl MessageRole {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Assistant => "assistant",
		}
	}

	pub fn from_str(raw: &str) -> Option<Self> {
		match raw {
			"user" => Some(Self::User),
			"assistant" => Some(Self::Assistant),
			_ => None,
		}
	}
}

/// A rendered document source, attached to an `answer`/`needs_info` response and its persisted
/// message metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
	pub document_name: String,
	pub relevance: String,
	pub preview: String,
	pub page_number: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
	High,
	Medium,
	Low,
}
impl Confidence {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::High => "high",
			Self::Medium => "medium",
			Self::Low => "low",
		}
	}
}

/// The typed tag carried by every assistant message. Discriminated on `type`; the orchestrator
/// branches on this tag and no other representation of assistant intent exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageMetadata {
	Answer {
		sources: Vec<Source>,
		confidence: Confidence,
	},
	NeedsInfo {
		investor_question: String,
		sources: Vec<Source>,
		confidence: Confidence,
	},
	NeedsClarification {
		original_question: String,
	},
	DraftEmail {
		trigger: DraftTrigger,
	},
	Greeting,
}
impl MessageMetadata {
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Answer { .. } => "answer",
			Self::NeedsInfo { .. } => "needs_info",
			Self::NeedsClarification { .. } => "needs_clarification",
			Self::DraftEmail { .. } => "draft_email",
			Self::Greeting => "greeting",
		}
	}

	pub fn is_needs_info(&self) -> bool {
		matches!(self, Self::NeedsInfo { .. })
	}

	pub fn is_needs_clarification(&self) -> bool {
		matches!(self, Self::NeedsClarification { .. })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftTrigger {
	UserSuppliedAnswer,
	GenerateDraftButton,
}

#[derive(Debug, Clone)]
pub struct Session {
	pub session_id: String,
	pub user_id: String,
	pub created_at: time::OffsetDateTime,
	pub updated_at: time::OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct Message {
	pub message_id: uuid::Uuid,
	pub session_id: String,
	pub role: MessageRole,
	pub content: String,
	pub deal_id: Option<uuid::Uuid>,
	pub metadata: Option<MessageMetadata>,
	pub created_at: time::OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneScope {
	Global,
	Deal,
}

#[derive(Debug, Clone)]
pub struct ToneRule {
	pub rule_id: uuid::Uuid,
	pub scope: ToneScope,
	pub deal_id: Option<uuid::Uuid>,
	pub rule_type: String,
	pub rule_text: String,
	pub priority: i32,
	pub active: bool,
}

/// A single turn in a chat completion request. `System` turns mid-conversation are folded by
/// provider-specific clients per C2's contract; only the leading run of `System` turns is kept
/// as a true system message by providers that require one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
	pub role: ChatRole,
	pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
	System,
	User,
	Assistant,
}

/// One atomic `(focused_question, value)` pair extracted from a multi-part answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicFact {
	pub question: String,
	pub value: String,
}

/// The response envelope tag, `response_type` in the HTTP contract (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
	Answer,
	NeedsClarification,
	NeedsInfo,
	DraftEmail,
}
