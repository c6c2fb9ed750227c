//! C5: pure parts of the deal registry — name/code detection in free text and tone-rule
//! rendering. Listing active deals and loading tone rules is I/O and lives in `odp-storage`; this
//! module only shapes the text once the rows are in hand.

use crate::types::{Deal, ToneRule, ToneScope};

/// The fixed minimal tone-rules string used when the table yields nothing for a request.
pub const FALLBACK_TONE: &str =
	"- [TONE] Be warm, precise, and concise. Never invent figures; say so when information is missing.";

/// §4.C5 `detect_deal`: lowercase substring match of `deal_name` or `deal_code`; first match wins.
pub fn detect_deal(text: &str, deals: &[Deal]) -> Option<uuid::Uuid> {
	let lowered = text.to_lowercase();

	deals
		.iter()
		.find(|deal| {
			lowered.contains(&deal.deal_name.to_lowercase())
				|| lowered.contains(&deal.deal_code.to_lowercase())
		})
		.map(|deal| deal.deal_id)
}

/// §4.C5 `tone_rules`: concatenated `- [TYPE] text` lines, active globals (priority desc) first,
/// then active deal-scoped (priority desc). Falls back to [`FALLBACK_TONE`] when empty.
pub fn tone_rules_block(rules: &[ToneRule]) -> String {
	let mut globals: Vec<&ToneRule> =
		rules.iter().filter(|r| r.active && r.scope == ToneScope::Global).collect();
	let mut deal_scoped: Vec<&ToneRule> =
		rules.iter().filter(|r| r.active && r.scope == ToneScope::Deal).collect();

	globals.sort_by(|a, b| b.priority.cmp(&a.priority));
	deal_scoped.sort_by(|a, b| b.priority.cmp(&a.priority));

	let lines: Vec<String> = globals
		.into_iter()
		.chain(deal_scoped)
		.map(|rule| format!("- [{}] {}", rule.rule_type.to_uppercase(), rule.rule_text))
		.collect();

	if lines.is_empty() { FALLBACK_TONE.to_string() } else { lines.join("\n") }
}

/// §4.C5 `deal_context_line`: one-line `ACTIVE DEAL: <name> (code: <code>)`.
pub fn deal_context_line(deal: &Deal) -> String {
	format!("ACTIVE DEAL: {} (code: {})", deal.deal_name, deal.deal_code)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn deal(name: &str, code: &str) -> Deal {
		Deal { deal_id: uuid::Uuid::new_v4(), deal_name: name.to_string(), deal_code: code.to_string(), active: true }
	}

	#[test]
	fn detect_deal_matches_name_case_insensitively() {
		let deals = vec![deal("SpaceX", "SPX"), deal("Anthropic", "ANT")];
		let found = detect_deal("What is the minimum ticket for spacex?", &deals);
		assert_eq!(found, Some(deals[0].deal_id));
	}

	#[test]
	fn detect_deal_matches_code() {
		let deals = vec![deal("SpaceX", "SPX"), deal("Anthropic", "ANT")];
		let found = detect_deal("Any update on the ANT round?", &deals);
		assert_eq!(found, Some(deals[1].deal_id));
	}

	#[test]
	fn detect_deal_first_match_wins() {
		let deals = vec![deal("SpaceX", "SPX"), deal("Anthropic", "ANT")];
		let found = detect_deal("Comparing SpaceX and Anthropic here.", &deals);
		assert_eq!(found, Some(deals[0].deal_id));
	}

	#[test]
	fn detect_deal_no_match_is_none() {
		let deals = vec![deal("SpaceX", "SPX")];
		assert_eq!(detect_deal("What is the weather like?", &deals), None);
	}

	#[test]
	fn tone_rules_orders_globals_before_deal_scoped_by_priority() {
		let d = uuid::Uuid::new_v4();
		let rules = vec![
			ToneRule {
				rule_id: uuid::Uuid::new_v4(),
				scope: ToneScope::Deal,
				deal_id: Some(d),
				rule_type: "formality".to_string(),
				rule_text: "Use first names.".to_string(),
				priority: 10,
				active: true,
			},
			ToneRule {
				rule_id: uuid::Uuid::new_v4(),
				scope: ToneScope::Global,
				deal_id: None,
				rule_type: "brevity".to_string(),
				rule_text: "Keep it short.".to_string(),
				priority: 1,
				active: true,
			},
			ToneRule {
				rule_id: uuid::Uuid::new_v4(),
				scope: ToneScope::Global,
				deal_id: None,
				rule_type: "brand".to_string(),
				rule_text: "Sign as ODP Team.".to_string(),
				priority: 5,
				active: true,
			},
		];
		let block = tone_rules_block(&rules);
		let lines: Vec<&str> = block.lines().collect();
		assert_eq!(lines[0], "- [BRAND] Sign as ODP Team.");
		assert_eq!(lines[1], "- [BREVITY] Keep it short.");
		assert_eq!(lines[2], "- [FORMALITY] Use first names.");
	}

	#[test]
	fn tone_rules_falls_back_when_empty() {
		assert_eq!(tone_rules_block(&[]), FALLBACK_TONE);
	}

	#[test]
	fn inactive_rules_are_excluded() {
		let rules = vec![ToneRule {
			rule_id: uuid::Uuid::new_v4(),
			scope: ToneScope::Global,
			deal_id: None,
			rule_type: "brevity".to_string(),
			rule_text: "Keep it short.".to_string(),
			priority: 1,
			active: false,
		}];
		assert_eq!(tone_rules_block(&rules), FALLBACK_TONE);
	}
}
