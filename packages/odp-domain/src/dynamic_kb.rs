//! C4 (pure part): formats Dynamic KB search rows into the `Q:…/A:…` and `Title-cased-Key: value`
//! text block the prompt assembler merges ahead of the Static KB block. The search queries
//! themselves are I/O and live in `odp_storage::dynamic_facts`.

use crate::prompt::TEAM_FACTS_HEADER;

fn title_case_key(key: &str) -> String {
	key.split('_')
		.map(|word| {
			let mut chars = word.chars();

			match chars.next() {
				Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

/// §4.C4 `search_dynamic`: pass 1 (Q&A pairs) then pass 2 (key-value rows), concatenated and
/// prefixed with [`TEAM_FACTS_HEADER`] when non-empty.
pub fn format_dynamic_block(qa_rows: &[(String, String)], kv_rows: &[(String, String)]) -> String {
	let mut lines = Vec::new();

	for (question, answer) in qa_rows {
		lines.push(format!("Q: {question}\nA: {answer}"));
	}
	for (key, value) in kv_rows {
		lines.push(format!("{}: {value}", title_case_key(key)));
	}

	if lines.is_empty() {
		return String::new();
	}

	format!("{TEAM_FACTS_HEADER}\n\n{}", lines.join("\n\n"))
}
