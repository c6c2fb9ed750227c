//! C10: parse a team member's answer into atomic `(focused_question, value)` pairs, driven by the
//! pattern table in [`crate::keywords`]. Operates with ASCII case-insensitive substring search
//! directly over the original string, so extracted byte offsets are always valid — never by
//! slicing an original-case string using offsets computed against a separately lowercased copy
//! (see DESIGN.md).

use crate::{
	keywords::{CLAUSE_TERMINATORS, DERIVE_KEY_TABLE, FACT_PATTERNS, LEADING_CONNECTORS, STOPWORDS},
	types::AtomicFact,
};

/// Case-insensitive `find`, returning the byte offset in `haystack` (original case preserved).
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
	if needle.is_empty() {
		return None;
	}

	let haystack_lower = haystack.to_ascii_lowercase();
	let needle_lower = needle.to_ascii_lowercase();

	haystack_lower.find(&needle_lower)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
	find_ci(haystack, needle).is_some()
}

/// Extract the substring starting right after `start`, up to the nearest clause terminator (or
/// end of string), then strip a single leading connector.
fn extract_value(answer: &str, start: usize) -> String {
	let rest = &answer[start..];
	let mut end = rest.len();

	for terminator in CLAUSE_TERMINATORS {
		if let Some(idx) = rest.find(terminator)
			&& idx < end
		{
			end = idx;
		}
	}

	let mut value = &rest[..end];

	for connector in LEADING_CONNECTORS {
		if let Some(stripped) = value.strip_prefix(connector) {
			value = stripped;
			break;
		}
	}

	let value = value.trim();

	// A trailing sentence-ending period with nothing after it (no clause terminator was hit
	// because it sits at the very end of the answer) is not part of the value.
	value.strip_suffix('.').unwrap_or(value).to_string()
}

/// §4.C10 `extract_atomic`: for each pattern whose topic keywords hit the investor question, scan
/// the answer for its earliest signal and emit a focused `(question, value)` pair.
pub fn extract_atomic(investor_question: &str, user_answer: &str, deal_name: &str) -> Vec<AtomicFact> {
	let mut facts = Vec::new();

	for pattern in FACT_PATTERNS {
		let topic_hit = pattern.topic_keywords.iter().any(|kw| contains_ci(investor_question, kw));

		if !topic_hit {
			continue;
		}

		let mut best: Option<(usize, usize, &str)> = None;

		for signal in pattern.signals {
			if let Some(idx) = find_ci(user_answer, signal.signal) {
				let signal_end = idx + signal.signal.len();

				if best.is_none_or(|(best_idx, ..)| idx < best_idx) {
					best = Some((idx, signal_end, signal.question_template));
				}
			}
		}

		let Some((_, signal_end, template)) = best else { continue };
		let value = extract_value(user_answer, signal_end);

		if value.len() >= 2 {
			facts.push(AtomicFact {
				question: template.replace("{deal_name}", deal_name),
				value,
			});
		}
	}

	facts
}

/// §4.C10 `derive_fact_key` fallback: first hit in the keyword table, else up to three
/// stopword-filtered tokens of the question joined by underscores.
pub fn derive_fact_key(question: &str) -> Option<String> {
	let lowered = question.to_lowercase();

	for (keyword, key) in DERIVE_KEY_TABLE {
		if lowered.contains(keyword) {
			return Some((*key).to_string());
		}
	}

	let tokens: Vec<String> = lowered
		.split(|c: char| !c.is_alphanumeric())
		.filter(|tok| !tok.is_empty() && !STOPWORDS.contains(tok))
		.take(3)
		.map(|tok| tok.to_string())
		.collect();

	if tokens.is_empty() { None } else { Some(tokens.join("_")) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decomposes_multi_part_answer() {
		let iq = "Do you have details on structure, payment dates, and minimum ticket?";
		let ua = "Structure would be SPV. Payment dates would be Next Tuesday and Minimum Ticket would be $25K.";
		let facts = extract_atomic(iq, ua, "Project D");

		assert_eq!(facts.len(), 3);
		assert_eq!(facts[0].question, "What is the minimum ticket size for Project D?");
		assert_eq!(facts[0].value, "$25K");
		assert_eq!(facts[1].question, "What are the payment dates for Project D?");
		assert_eq!(facts[1].value, "Next Tuesday");
		assert_eq!(facts[2].question, "What is the investment structure for Project D?");
		assert_eq!(facts[2].value, "SPV");
	}

	#[test]
	fn decomposition_values_are_substrings_of_the_answer() {
		let iq = "What is the valuation and minimum ticket?";
		let ua = "Valuation is $50M and minimum ticket is $25,000.";
		let facts = extract_atomic(iq, ua, "Deal X");

		for fact in &facts {
			assert!(ua.to_lowercase().contains(&fact.value.to_lowercase()));
		}
	}

	#[test]
	fn no_pattern_match_yields_empty() {
		let facts = extract_atomic("What's the weather like?", "It's sunny.", "Deal X");
		assert!(facts.is_empty());
	}

	#[test]
	fn short_extracted_value_is_dropped() {
		let iq = "What is the valuation?";
		let ua = "Valuation is a.";
		let facts = extract_atomic(iq, ua, "Deal X");
		assert!(facts.is_empty());
	}

	#[test]
	fn derive_fact_key_hits_table() {
		assert_eq!(derive_fact_key("What is the minimum ticket size?"), Some("minimum_ticket".to_string()));
	}

	#[test]
	fn derive_fact_key_falls_back_to_tokens() {
		let key = derive_fact_key("What is the board seat arrangement?").unwrap();
		assert_eq!(key, "board_seat_arrangement");
	}
}
