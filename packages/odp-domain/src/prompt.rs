//! C11 (pure parts): system/user prompt text assembly, KB-context merging, and the
//! confidence/source derivation grounded in the original's `ContextBuilder` (§4.C11, this
//! document's addition). The LLM call itself lives in `odp-service`.

use crate::{
	deal_registry::FALLBACK_TONE,
	types::{ChatRole, ChatTurn, ChunkHit, Confidence, Source},
};

pub const TEAM_FACTS_HEADER: &str = "TEAM-SUPPLIED FACTS (override document values below)";
pub const NO_KB_CONTEXT_NOTICE: &str =
	"NO KB CONTEXT: no team-supplied facts or document passages were found for this question. Do not answer from training knowledge; say the information is not available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
	Greeting,
	Answer,
	Ask,
	Draft,
	Clarify,
}

/// §4.C11 system prompt template: role intro + tone rules + mode instructions.
pub fn build_system_prompt(mode: PromptMode, tone_block: &str) -> String {
	let tone = if tone_block.trim().is_empty() { FALLBACK_TONE } else { tone_block };
	let role_intro =
		"You are the Open Doors Partners investor bot, answering team questions about active deals.";
	let mode_instructions = match mode {
		PromptMode::Greeting => "Reply with one to two warm, on-brand sentences. No KB context is attached; do not invent deal details.",
		PromptMode::Answer => "TEAM-SUPPLIED FACTS override document passages. Never invent figures; say so when missing.",
		PromptMode::Ask => "Read the partial answer below. Ask only about items explicitly flagged as missing; do not re-ask items already confirmed. End with \"Once you share these, I will draft the reply right away.\"",
		PromptMode::Draft => "Produce an email body replying to the investor. End with \"Best,\". Insert \"[Note: please confirm — …]\" where a fact remains unknown.",
		PromptMode::Clarify => "Ask one warm sentence about which deal the investor means; two or more deals are plausible.",
	};

	format!("{role_intro}\n\n{tone}\n\n{mode_instructions}")
}

/// §4.C11 step: `build_context` — numbered `Document N:` blocks joined by `---`.
pub fn build_context(chunks: &[ChunkHit]) -> String {
	chunks
		.iter()
		.enumerate()
		.map(|(idx, chunk)| {
			let page = chunk.page_number.map(|p| p.to_string()).unwrap_or_else(|| "n/a".to_string());
			format!(
				"Document {}:\n{}\n[Source: {}, Page {}, Relevance: {:.2}%]",
				idx + 1,
				chunk.text,
				chunk.doc_name,
				page,
				chunk.similarity * 100.0,
			)
		})
		.collect::<Vec<_>>()
		.join("\n---\n")
}

/// §4.C11 `extract_sources`: one entry per distinct `doc_name`, first occurrence wins.
pub fn extract_sources(chunks: &[ChunkHit]) -> Vec<Source> {
	let mut seen = std::collections::HashSet::new();
	let mut sources = Vec::new();

	for chunk in chunks {
		if !seen.insert(chunk.doc_name.clone()) {
			continue;
		}

		let preview = if chunk.text.chars().count() > 200 {
			let truncated: String = chunk.text.chars().take(200).collect();
			format!("{truncated}...")
		} else {
			chunk.text.clone()
		};

		sources.push(Source {
			document_name: chunk.doc_name.clone(),
			relevance: format!("{:.2}%", chunk.similarity * 100.0),
			preview,
			page_number: chunk.page_number,
		});
	}

	sources
}

/// §4.C11 `calculate_confidence`: average similarity, empty input is `low`.
pub fn calculate_confidence(chunks: &[ChunkHit]) -> Confidence {
	if chunks.is_empty() {
		return Confidence::Low;
	}

	let avg: f32 = chunks.iter().map(|c| c.similarity).sum::<f32>() / chunks.len() as f32;

	if avg >= 0.85 {
		Confidence::High
	} else if avg >= 0.70 {
		Confidence::Medium
	} else {
		Confidence::Low
	}
}

/// §4.C11 "Merging rule for KB contexts": dynamic first, joined by a blank line, or whichever is
/// non-empty.
pub fn merge_kb_contexts(dynamic: &str, static_block: &str) -> String {
	match (dynamic.trim().is_empty(), static_block.trim().is_empty()) {
		(true, true) => String::new(),
		(true, false) => static_block.to_string(),
		(false, true) => dynamic.to_string(),
		(false, false) => format!("{dynamic}\n\n{static_block}"),
	}
}

/// §4.C11 user prompt for `answer` mode: deal line, KB block (or NO KB CONTEXT notice), footer.
pub fn build_answer_user_prompt(deal_line: Option<&str>, kb_context: &str, question: &str) -> String {
	let mut parts = Vec::new();

	if let Some(line) = deal_line {
		parts.push(line.to_string());
	}

	if kb_context.trim().is_empty() {
		parts.push(NO_KB_CONTEXT_NOTICE.to_string());
	} else {
		parts.push(format!("KNOWLEDGE BASE (team facts first, then documents)\n\n{kb_context}"));
	}

	parts.push(format!("Investor Question: {question}\n\nAnswer:"));

	parts.join("\n\n")
}

/// §4.C11 history injection truncation: assistant messages longer than `max_len` are truncated
/// with an ellipsis.
pub fn truncate_for_history(content: &str, max_len: usize) -> String {
	if content.chars().count() <= max_len {
		return content.to_string();
	}

	let truncated: String = content.chars().take(max_len).collect();

	format!("{truncated}...")
}

/// §4.C11 user prompt for `draft` mode: deal line, KB block (or notice), the flattened
/// conversation summary (C13's job to build), then the investor question footer.
pub fn build_draft_user_prompt(
	deal_line: Option<&str>,
	kb_context: &str,
	session_summary: &str,
	investor_question: &str,
) -> String {
	let mut parts = Vec::new();

	if let Some(line) = deal_line {
		parts.push(line.to_string());
	}

	if kb_context.trim().is_empty() {
		parts.push(NO_KB_CONTEXT_NOTICE.to_string());
	} else {
		parts.push(format!("KNOWLEDGE BASE (team facts first, then documents)\n\n{kb_context}"));
	}

	parts.push(format!("CONVERSATION SUMMARY\n\n{session_summary}"));
	parts.push(format!("Investor Question: {investor_question}\n\nDraft the reply email body:"));

	parts.join("\n\n")
}

/// Builds the history turns injected between the system and user messages: the last `limit`
/// turns, assistant turns truncated to `assistant_truncate_len`.
pub fn build_history_turns(
	history: &[(ChatRole, String)],
	limit: usize,
	assistant_truncate_len: usize,
) -> Vec<ChatTurn> {
	let start = history.len().saturating_sub(limit);

	history[start..]
		.iter()
		.map(|(role, content)| {
			let content = if *role == ChatRole::Assistant {
				truncate_for_history(content, assistant_truncate_len)
			} else {
				content.clone()
			};

			ChatTurn { role: *role, content }
		})
		.collect()
}
