//! §4.C9 I/O part: the gate and the templated form live in `odp_domain::clarifier`; this module
//! supplies the LLM-generated warm sentence for the vague-with-no-deal case the template can't
//! cover.

use odp_domain::{ChatRole, ChatTurn, prompt::PromptMode, prompt::build_system_prompt};
use odp_providers::chat::ChatProvider;

const FALLBACK_CLARIFYING_QUESTION: &str = "Happy to help! Which deal are you asking about?";

/// §4.C9 `clarifying_question`: templated first, then an LLM-generated warm sentence, then a
/// fixed fallback sentence if the LLM call itself fails.
pub async fn clarifying_question(chat: &dyn ChatProvider, question: &str, deal_names: &[String]) -> String {
	if let Some(templated) = odp_domain::clarifier::clarifying_question_template(question, deal_names) {
		return templated;
	}

	let messages = vec![
		ChatTurn { role: ChatRole::System, content: build_system_prompt(PromptMode::Clarify, "") },
		ChatTurn { role: ChatRole::User, content: question.to_string() },
	];

	match chat.complete(&messages, 0.5, 80).await {
		Ok(sentence) => {
			let trimmed = sentence.trim();

			if trimmed.is_empty() { FALLBACK_CLARIFYING_QUESTION.to_string() } else { trimmed.to_string() }
		},
		Err(err) => {
			tracing::warn!(error = %err, "clarifying question generation failed, using the fixed fallback");

			FALLBACK_CLARIFYING_QUESTION.to_string()
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use odp_testkit::FakeChatProvider;

	#[tokio::test]
	async fn deal_specific_question_uses_the_template_and_skips_the_llm() {
		let chat = FakeChatProvider::new(vec!["should not be used"]);
		let names = vec!["SpaceX".to_string()];
		let result = clarifying_question(&chat, "What is the minimum ticket?", &names).await;
		assert_eq!(result, "Happy to help! Are you asking about SpaceX?");
		assert!(chat.calls().is_empty());
	}

	#[tokio::test]
	async fn vague_question_calls_the_llm() {
		let chat = FakeChatProvider::new(vec!["Which deal would you like to know more about?"]);
		let names = vec!["SpaceX".to_string(), "Anthropic".to_string()];
		let result = clarifying_question(&chat, "Tell me more.", &names).await;
		assert_eq!(result, "Which deal would you like to know more about?");
		assert_eq!(chat.calls().len(), 1);
	}

	#[tokio::test]
	async fn blank_llm_response_uses_the_fixed_fallback() {
		let chat = FakeChatProvider::new(vec![""]);
		let names = vec!["SpaceX".to_string(), "Anthropic".to_string()];
		let result = clarifying_question(&chat, "Tell me more.", &names).await;
		assert_eq!(result, FALLBACK_CLARIFYING_QUESTION);
	}
}
