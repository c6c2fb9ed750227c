//! §6 HTTP response envelope, one level below the JSON wire shape (`odp-api` wraps this in
//! `{status, data}` or `{status, error_code, message}`).

use serde::Serialize;
use uuid::Uuid;

use odp_domain::{Confidence, ResponseType, Source};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "response_type", rename_all = "snake_case")]
pub enum AskPayload {
	Answer {
		answer: String,
		sources: Vec<Source>,
		confidence: Confidence,
	},
	NeedsInfo {
		partial_answer: String,
		info_request: String,
		sources: Vec<Source>,
		confidence: Confidence,
	},
	NeedsClarification {
		clarifying_question: String,
	},
	DraftEmail {
		draft_email: String,
	},
}

impl AskPayload {
	pub fn response_type(&self) -> ResponseType {
		match self {
			Self::Answer { .. } => ResponseType::Answer,
			Self::NeedsInfo { .. } => ResponseType::NeedsInfo,
			Self::NeedsClarification { .. } => ResponseType::NeedsClarification,
			Self::DraftEmail { .. } => ResponseType::DraftEmail,
		}
	}
}

/// The full response to `/bot/ask*` and `/bot/generate-draft`.
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
	#[serde(flatten)]
	pub payload: AskPayload,
	pub session_id: String,
	pub active_deal_id: Option<Uuid>,
	pub show_draft_button: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationMessage {
	pub message_id: Uuid,
	pub role: String,
	pub content: String,
	pub deal_id: Option<Uuid>,
	pub metadata: Option<odp_domain::MessageMetadata>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: time::OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
	pub session_id: String,
	pub messages: Vec<ConversationMessage>,
	pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
	pub session_id: String,
	pub user_id: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: time::OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: time::OffsetDateTime,
}

impl From<odp_domain::Session> for SessionSummary {
	fn from(session: odp_domain::Session) -> Self {
		Self {
			session_id: session.session_id,
			user_id: session.user_id,
			created_at: session.created_at,
			updated_at: session.updated_at,
		}
	}
}

impl From<odp_domain::Message> for ConversationMessage {
	fn from(message: odp_domain::Message) -> Self {
		Self {
			message_id: message.message_id,
			role: message.role.as_str().to_string(),
			content: message.content,
			deal_id: message.deal_id,
			metadata: message.metadata,
			created_at: message.created_at,
		}
	}
}
