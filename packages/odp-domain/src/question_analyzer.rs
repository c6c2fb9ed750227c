//! C7: greeting / new-question / missing-info classification. Pure string predicates over the
//! fixed keyword sets in [`crate::keywords`].

use crate::keywords::{
	BUSINESS_KEYWORDS, GREETING_PHRASES, GREETING_STARTERS, MISSING_INFO_PHRASES,
	QUESTION_STARTERS, SOCIAL_FILLER_TOKENS,
};

fn normalize(message: &str) -> String {
	let mut out = String::with_capacity(message.len());

	for ch in message.chars() {
		if ch.is_alphanumeric() || ch.is_whitespace() {
			out.push(ch.to_ascii_lowercase());
		} else {
			out.push(' ');
		}
	}

	out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// §4.C7: normalize, then check exact greeting phrases, then the starter + filler-strip rule.
pub fn is_greeting(message: &str) -> bool {
	let normalized = normalize(message);

	if normalized.is_empty() {
		return false;
	}
	if GREETING_PHRASES.contains(&normalized.as_str()) {
		return true;
	}

	let tokens: Vec<&str> = normalized.split(' ').collect();
	let Some(first) = tokens.first() else { return false };

	if !GREETING_STARTERS.contains(first) {
		return false;
	}

	let remaining: Vec<&str> =
		tokens.iter().copied().filter(|tok| !SOCIAL_FILLER_TOKENS.contains(tok)).collect();

	if remaining.is_empty() {
		return true;
	}
	if remaining.iter().any(|tok| BUSINESS_KEYWORDS.contains(tok)) {
		return false;
	}

	tokens.len() <= 8
}

/// §4.C7: true iff the lowercased, trimmed message begins with a fixed question starter.
pub fn is_new_question(message: &str) -> bool {
	let lowered = message.trim().to_lowercase();

	QUESTION_STARTERS.iter().any(|starter| lowered.starts_with(starter))
}

/// §4.C7: true iff the lowercased answer contains any missing-info phrase.
pub fn has_missing_info_signal(answer: &str) -> bool {
	let lowered = answer.to_lowercase();

	MISSING_INFO_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}
