//! C8 I/O part: the gate lives in `odp_domain::query_rewrite_gate`; this module owns the LLM call
//! once the gate passes.

use odp_domain::{ChatRole, ChatTurn};
use odp_providers::chat::ChatProvider;

const REWRITE_SYSTEM_PROMPT: &str = "Rewrite the user's latest message into a single, fully self-contained question by resolving pronouns and ellipsis using the conversation history. Reply with only the rewritten question, nothing else.";
const REWRITE_HISTORY_TURNS: usize = 6;
const REWRITE_TRUNCATE_LEN: usize = 200;

/// §4.C8 `rewrite`: unchanged when the gate doesn't fire; on an LLM failure, unchanged (helper
/// failure policy, §7).
pub async fn rewrite(chat: &dyn ChatProvider, current: &str, history: &[(ChatRole, String)]) -> String {
	if !odp_domain::query_rewrite_gate::should_rewrite(current, history.len()) {
		return current.to_string();
	}

	let mut messages = vec![ChatTurn { role: ChatRole::System, content: REWRITE_SYSTEM_PROMPT.to_string() }];
	messages.extend(odp_domain::prompt::build_history_turns(history, REWRITE_HISTORY_TURNS, REWRITE_TRUNCATE_LEN));
	messages.push(ChatTurn { role: ChatRole::User, content: current.to_string() });

	match chat.complete(&messages, 0.1, 1500).await {
		Ok(rewritten) => {
			let trimmed = rewritten.trim().trim_matches('"');

			if trimmed.is_empty() { current.to_string() } else { trimmed.to_string() }
		},
		Err(err) => {
			tracing::warn!(error = %err, "query rewrite failed, falling back to the original question");

			current.to_string()
		},
	}
}
