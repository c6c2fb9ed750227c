//! C9: decide whether "which deal?" must be asked, and render the cheap templated clarifying
//! question when the rule that triggered it is deal-specific (no LLM call needed).

use crate::keywords::{DEAL_SPECIFIC_KEYWORDS, GENERAL_KNOWLEDGE_KEYWORDS};

/// §4.C9 rule 3: does the question contain a deal-specific keyword?
pub fn is_deal_specific(question: &str) -> bool {
	let lowered = question.to_lowercase();

	DEAL_SPECIFIC_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

fn is_general_knowledge(question: &str) -> bool {
	let lowered = question.to_lowercase();

	GENERAL_KNOWLEDGE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// §4.C9 `needs_clarification`.
pub fn needs_clarification(question: &str, has_deal: bool) -> bool {
	if has_deal {
		return false;
	}
	if is_general_knowledge(question) {
		return false;
	}

	// Rule 3 (deal-specific) and rule 4 (vague, no deal) both resolve to true; rule 3 only
	// changes how the clarifying question is worded, not whether one is asked.
	true
}

/// §4.C9 `clarifying_question`: the templated form used when the triggering rule was
/// deal-specific (rule 3). Returns `None` when the caller must fall back to an LLM-generated
/// warm sentence instead (vague-with-no-deal case).
pub fn clarifying_question_template(question: &str, deal_names: &[String]) -> Option<String> {
	if !is_deal_specific(question) {
		return None;
	}

	match deal_names {
		[] => None,
		[single] => Some(format!("Happy to help! Are you asking about {single}?")),
		[first, rest @ ..] if !rest.is_empty() => {
			let (last, middle) = rest.split_last().unwrap();
			let mut names = vec![first.clone()];
			names.extend(middle.iter().cloned());
			let joined = names.join(", ");
			Some(format!("Happy to help! Are you asking about {joined} or {last}?"))
		},
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_deal_never_needs_clarification() {
		assert!(!needs_clarification("What is the minimum ticket?", true));
	}

	#[test]
	fn general_knowledge_question_skips_clarification() {
		assert!(!needs_clarification("What deals are currently active?", false));
		assert!(!needs_clarification("Who are you?", false));
	}

	#[test]
	fn deal_specific_question_without_deal_needs_clarification() {
		assert!(needs_clarification("What is the minimum ticket?", false));
	}

	#[test]
	fn vague_question_without_deal_needs_clarification() {
		assert!(needs_clarification("Tell me more about it.", false));
	}

	#[test]
	fn templated_question_lists_two_deals() {
		let names = vec!["SpaceX".to_string(), "Anthropic".to_string()];
		let templated = clarifying_question_template("What is the minimum ticket?", &names);
		let templated = templated.expect("expected a templated question");
		assert!(templated.contains("SpaceX"));
		assert!(templated.contains("Anthropic"));
	}

	#[test]
	fn non_deal_specific_question_has_no_template() {
		let names = vec!["SpaceX".to_string(), "Anthropic".to_string()];
		assert_eq!(clarifying_question_template("Tell me more about it.", &names), None);
	}
}
