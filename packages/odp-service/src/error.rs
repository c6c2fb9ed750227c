//! §7 error taxonomy, as it reaches the orchestrator's top frame. Deep layers (storage, the
//! query rewriter, the fact decomposer, the fact extractor) never surface this type directly —
//! they roll back and return a safe default (§4.C12 "Failure semantics"); only the steps that the
//! orchestrator cannot degrade past convert a failure into one of these variants.

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// §7: the main answer/draft LLM call failed; there is no safe default to degrade to.
	#[error("QUERY_FAILED: the assistant could not produce a response")]
	QueryFailed,

	/// §7: the inbound user message itself could not be persisted — the one storage failure the
	/// orchestrator does not swallow, since without it there is no session state to act on.
	#[error("QUERY_FAILED: failed to persist the incoming message")]
	PersistFailed(#[source] odp_storage::Error),

	/// §6 `generate_draft` on an unknown session.
	#[error("NO_CONVERSATION: no conversation exists for this session")]
	NoConversation,

	/// §4.C12 manual draft entry: a session exists but no substantive investor question can be
	/// resolved from its history.
	#[error("NO_QUESTION: no investor question could be resolved from this conversation")]
	NoQuestion,

	#[error("invalid request: {message}")]
	InvalidRequest { message: String },
}

impl Error {
	/// §6 error shape's `error_code` field.
	pub fn code(&self) -> &'static str {
		match self {
			Self::QueryFailed | Self::PersistFailed(_) => "QUERY_FAILED",
			Self::NoConversation => "NO_CONVERSATION",
			Self::NoQuestion => "NO_QUESTION",
			Self::InvalidRequest { .. } => "INVALID_REQUEST",
		}
	}
}
