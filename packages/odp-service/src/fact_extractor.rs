//! §4.C14: a standalone pathway for stand-alone team statements, not tied to a pending
//! `needs_info` and not wired into the 17-step orchestrator (§4.C12 names no step that calls
//! this, and §6's route table defines no endpoint for it — see DESIGN.md). Exposed as a library
//! capability a caller outside the request pipeline (e.g. a separate ingestion worker watching a
//! team channel) can invoke directly.

use sqlx::PgExecutor;
use uuid::Uuid;

use odp_domain::{ChatRole, ChatTurn, FactAction, keywords::GREETING_STARTERS};
use odp_providers::chat::ChatProvider;

const EXTRACTION_SYSTEM_PROMPT: &str = "You detect whether a message states a concrete fact about a deal (e.g. a figure, date, or policy). Reply with strict JSON only, no prose, no markdown fences: {\"is_fact\": bool, \"fact_key\": string|null, \"fact_value\": string|null}. fact_key must be snake_case.";

#[derive(Debug, serde::Deserialize)]
struct ExtractionResult {
	is_fact: bool,
	fact_key: Option<String>,
	fact_value: Option<String>,
}

/// §4.C14 step 1: reject messages too short, questions, or short greeting openings — none of
/// these are candidate stand-alone fact statements.
fn passes_prescreen(message: &str) -> bool {
	let trimmed = message.trim();

	if trimmed.chars().count() < 5 {
		return false;
	}
	if trimmed.ends_with('?') {
		return false;
	}

	let lowered = trimmed.to_lowercase();
	let starts_with_greeting = GREETING_STARTERS.iter().any(|starter| lowered.starts_with(starter));

	if trimmed.chars().count() < 30 && starts_with_greeting {
		return false;
	}

	true
}

fn strip_markdown_fences(raw: &str) -> &str {
	let trimmed = raw.trim();
	let trimmed = trimmed.strip_prefix("```json").or_else(|| trimmed.strip_prefix("```")).unwrap_or(trimmed);

	trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

/// §4.C14: pre-screen, extract, and upsert. Returns `None` on pre-screen rejection, a negative
/// extraction, or any parse/LLM failure (helper-failure policy, §7) — no write occurs in any of
/// those cases.
pub async fn extract_and_upsert<'e, E>(
	executor: E,
	chat: &dyn ChatProvider,
	deal_id: Uuid,
	message: &str,
	created_by: &str,
) -> Option<FactAction>
where
	E: PgExecutor<'e>,
{
	if !passes_prescreen(message) {
		return None;
	}

	let messages = vec![
		ChatTurn { role: ChatRole::System, content: EXTRACTION_SYSTEM_PROMPT.to_string() },
		ChatTurn { role: ChatRole::User, content: message.to_string() },
	];

	let raw = match chat.complete(&messages, 0.0, 100).await {
		Ok(raw) => raw,
		Err(err) => {
			tracing::warn!(error = %err, "fact extraction LLM call failed");

			return None;
		},
	};

	let cleaned = strip_markdown_fences(&raw);
	let parsed: ExtractionResult = match serde_json::from_str(cleaned) {
		Ok(parsed) => parsed,
		Err(err) => {
			tracing::warn!(error = %err, response = %raw, "fact extraction response was not valid JSON");

			return None;
		},
	};

	if !parsed.is_fact {
		return None;
	}

	let (Some(fact_key), Some(fact_value)) = (parsed.fact_key, parsed.fact_value) else {
		return None;
	};

	match odp_storage::dynamic_facts::upsert_fact(executor, deal_id, &fact_key, &fact_value, created_by).await {
		Ok(action) => Some(action),
		Err(err) => {
			tracing::warn!(error = %err, "fact extraction upsert failed");

			None
		},
	}
}
