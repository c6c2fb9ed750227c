//! §4.C13: wraps `odp_domain::prompt`'s `draft` mode. The only job specific to this module is
//! flattening a full session into the plain "Investor … / ODP Team …" summary fed as
//! `user_supplied_info`, with the same 800-char truncation policy as history injection.

use odp_domain::{Message, MessageRole};

const DRAFT_TRUNCATE_LEN: usize = 800;

/// Flattens `messages` (oldest-first) into alternating `Investor: …` / `ODP Team: …` lines,
/// truncating assistant content the same way history injection does (§4.C11).
pub fn flatten_session(messages: &[Message]) -> String {
	messages
		.iter()
		.map(|message| {
			let label = match message.role {
				MessageRole::User => "Investor",
				MessageRole::Assistant => "ODP Team",
			};
			let content = if message.role == MessageRole::Assistant {
				odp_domain::prompt::truncate_for_history(&message.content, DRAFT_TRUNCATE_LEN)
			} else {
				message.content.clone()
			};

			format!("{label}: {content}")
		})
		.collect::<Vec<_>>()
		.join("\n")
}

/// Appends the trailing "[ODP Team — answer provided]:" line the answer-supplied subflow folds
/// in so the draft prompt sees the just-supplied answer as part of the flattened summary.
pub fn flatten_session_with_supplied_answer(messages: &[Message], supplied_answer: &str) -> String {
	let base = flatten_session(messages);
	let truncated = odp_domain::prompt::truncate_for_history(supplied_answer, DRAFT_TRUNCATE_LEN);

	format!("{base}\n[ODP Team — answer provided]: {truncated}")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn message(role: MessageRole, content: &str) -> Message {
		Message {
			message_id: uuid::Uuid::new_v4(),
			session_id: "s1".to_string(),
			role,
			content: content.to_string(),
			deal_id: None,
			metadata: None,
			created_at: time::OffsetDateTime::UNIX_EPOCH,
		}
	}

	#[test]
	fn flattens_alternating_roles_with_labels() {
		let messages = vec![
			message(MessageRole::User, "What is the minimum ticket?"),
			message(MessageRole::Assistant, "It's $25,000."),
		];
		let flattened = flatten_session(&messages);
		assert_eq!(flattened, "Investor: What is the minimum ticket?\nODP Team: It's $25,000.");
	}

	#[test]
	fn truncates_long_assistant_turns_only() {
		let long_investor = "x".repeat(900);
		let long_assistant = "y".repeat(900);
		let messages = vec![message(MessageRole::User, &long_investor), message(MessageRole::Assistant, &long_assistant)];
		let flattened = flatten_session(&messages);
		assert!(flattened.contains(&long_investor));
		assert!(!flattened.contains(&long_assistant));
		assert!(flattened.contains("..."));
	}

	#[test]
	fn supplied_answer_subflow_appends_trailer() {
		let messages =
			vec![message(MessageRole::User, "Do you have details on structure and minimum ticket?")];
		let flattened = flatten_session_with_supplied_answer(&messages, "Structure is SPV.");
		assert!(flattened.ends_with("[ODP Team — answer provided]: Structure is SPV."));
	}
}
