//! C8 (pure part): the gate deciding whether a query is vague enough to warrant an LLM rewrite.
//! The LLM call itself, plus the quote-stripping and failure fallback, lives in `odp-service`
//! since it requires a chat provider.

use crate::keywords::{KNOWN_COMPANY_NAMES, METRIC_ONLY_NOUNS, VAGUE_PRONOUN_WORDS};

fn contains_known_company(lowered: &str) -> bool {
	KNOWN_COMPANY_NAMES.iter().any(|name| lowered.contains(name))
}

fn contains_vague_pronoun(lowered: &str) -> bool {
	let tokens: Vec<&str> = lowered.split_whitespace().collect();

	tokens.iter().any(|tok| VAGUE_PRONOUN_WORDS.contains(&tok.trim_matches(|c: char| !c.is_alphanumeric())))
}

fn contains_metric_only_noun(lowered: &str) -> bool {
	METRIC_ONLY_NOUNS.iter().any(|noun| lowered.contains(noun))
}

/// §4.C8 gate: `false` (don't rewrite) when history has fewer than 2 messages, or none of the
/// vagueness signals fire.
pub fn should_rewrite(current: &str, history_len: usize) -> bool {
	if history_len < 2 {
		return false;
	}

	let lowered = current.to_lowercase();
	let word_count = lowered.split_whitespace().count();
	let has_company = contains_known_company(&lowered);

	if contains_vague_pronoun(&lowered) {
		return true;
	}
	if word_count < 4 && !has_company {
		return true;
	}
	if word_count <= 5 && contains_metric_only_noun(&lowered) && !has_company {
		return true;
	}

	false
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_history_never_rewrites() {
		assert!(!should_rewrite("What about it?", 1));
		assert!(!should_rewrite("What about it?", 0));
	}

	#[test]
	fn vague_pronoun_triggers_rewrite() {
		assert!(should_rewrite("What about it?", 4));
	}

	#[test]
	fn short_question_without_company_triggers_rewrite() {
		assert!(should_rewrite("And the fee?", 2));
	}

	#[test]
	fn metric_only_noun_without_company_triggers_rewrite() {
		assert!(should_rewrite("What about the valuation?", 2));
	}

	#[test]
	fn question_naming_a_company_does_not_trigger() {
		assert!(!should_rewrite("What is the valuation for SpaceX?", 5));
	}

	#[test]
	fn substantial_unambiguous_question_does_not_trigger() {
		assert!(!should_rewrite("Can you walk me through the full closing timeline please?", 4));
	}
}
