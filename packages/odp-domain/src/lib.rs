//! Pure domain logic for the Open Doors Partners investor bot: types shared across crates, and
//! the deterministic, I/O-free building blocks of the 17-step pipeline (question analysis, deal
//! detection, clarification gating, query-rewrite gating, fact decomposition, and prompt/context
//! assembly). Anything that talks to Postgres or an LLM provider lives one layer up, in
//! `odp-service`.

pub mod clarifier;
pub mod deal_registry;
pub mod dynamic_kb;
pub mod fact_decomposer;
pub mod keywords;
pub mod prompt;
pub mod question_analyzer;
pub mod query_rewrite_gate;
pub mod types;

pub use types::{
	ApprovalStatus, AtomicFact, ChatRole, ChatTurn, ChunkHit, Confidence, Deal, DocumentChunk,
	DraftTrigger, FactAction, Message, MessageMetadata, MessageRole, ResponseType, Session, Source,
	ToneRule, ToneScope,
};
