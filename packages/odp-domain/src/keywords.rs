//! Fixed keyword sets and pattern tables consumed by the classifiers (§4.C7, C9) and the fact
//! decomposer (§4.C10). Kept as plain data, per §9 "Pattern tables as data" — nothing here branches
//! on content, it is only ever matched against.

/// Phrases that, verbatim after normalization, are a greeting and nothing else.
pub const GREETING_PHRASES: &[&str] = &[
	"hi",
	"hello",
	"hey",
	"hiya",
	"yo",
	"good morning",
	"good afternoon",
	"good evening",
	"morning",
	"afternoon",
	"evening",
	"hi there",
	"hello there",
	"hey there",
	"greetings",
	"whats up",
	"sup",
];

/// First tokens that plausibly open a greeting (but may be followed by a real question).
pub const GREETING_STARTERS: &[&str] =
	&["hi", "hello", "hey", "hiya", "yo", "good", "greetings", "morning", "afternoon", "evening"];

/// Social filler tokens stripped after a greeting starter before deciding whether anything
/// substantive remains.
pub const SOCIAL_FILLER_TOKENS: &[&str] = &[
	"there",
	"team",
	"folks",
	"everyone",
	"all",
	"again",
	"morning",
	"afternoon",
	"evening",
	"how",
	"are",
	"you",
	"doing",
	"going",
	"today",
	"guys",
];

/// If any of these survive filler-stripping, the message is treated as substantive, not a
/// greeting, even though it opened with a greeting starter.
pub const BUSINESS_KEYWORDS: &[&str] = &[
	"deal",
	"deals",
	"ticket",
	"minimum",
	"fee",
	"fees",
	"structure",
	"closing",
	"share",
	"shares",
	"valuation",
	"question",
	"investor",
	"investment",
	"spv",
	"allocation",
	"lockup",
	"return",
	"irr",
	"distribution",
	"price",
];

/// Lowercased-prefix starters that make a message a new top-level question rather than a
/// supplied answer to a pending `needs_info`.
pub const QUESTION_STARTERS: &[&str] = &[
	"what",
	"when",
	"where",
	"who",
	"why",
	"how",
	"which",
	"is",
	"are",
	"can you",
	"could you",
	"do you",
	"does",
	"did",
	"will",
	"would",
	"should",
	"please tell",
	"please share",
	"please send",
	"tell me",
];

/// Substrings that mark an assistant answer as admitting missing information.
pub const MISSING_INFO_PHRASES: &[&str] = &[
	"we don't have",
	"we do not have",
	"don't have that information",
	"do not have that information",
	"not in our knowledge base",
	"not in the knowledge base",
	"could you provide",
	"could you please provide",
	"i don't have",
	"i do not have",
	"we'll need to confirm",
	"we will need to confirm",
	"need to check with the team",
	"i'm not able to confirm",
	"i am not able to confirm",
	"no information available",
];

/// Vague pronoun words that signal the query rewriter's gate should fire.
pub const VAGUE_PRONOUN_WORDS: &[&str] =
	&["it", "that", "this", "they", "them", "those", "these", "one"];

/// Nouns that name a metric but say nothing about which deal, used by the rewriter's gate
/// (short question + metric noun + no company name => ambiguous).
pub const METRIC_ONLY_NOUNS: &[&str] = &[
	"price",
	"ticket",
	"fee",
	"fees",
	"valuation",
	"structure",
	"closing",
	"allocation",
	"return",
	"irr",
	"lockup",
	"share",
	"shares",
	"minimum",
];

/// Canonical list of known company/deal names used to gate query rewriting (§4.C8). Unified onto
/// one list used identically by both branches of the gate (see DESIGN.md).
pub const KNOWN_COMPANY_NAMES: &[&str] =
	&["spacex", "anthropic", "openai", "stripe", "databricks", "perplexity", "xai", "scale ai"];

/// General-knowledge keywords that short-circuit the clarifier to `false` even with no active
/// deal (greeting-adjacent or meta questions about the bot/deal roster itself).
pub const GENERAL_KNOWLEDGE_KEYWORDS: &[&str] = &[
	"what deals",
	"which deals",
	"who are you",
	"what can you do",
	"what do you do",
	"how does this work",
	"list deals",
	"active deals",
	"help",
];

/// Deal-specific keywords that, absent an active deal, force the clarifier to ask "which deal?"
pub const DEAL_SPECIFIC_KEYWORDS: &[&str] = &[
	"minimum",
	"ticket",
	"fee",
	"fees",
	"structure",
	"closing",
	"share",
	"shares",
	"valuation",
	"lockup",
	"allocation",
	"return",
	"irr",
	"distribution",
	"spv",
	"carry",
];

/// Stopwords dropped when `derive_fact_key` falls back to tokenizing the investor question.
pub const STOPWORDS: &[&str] = &[
	"what", "is", "are", "the", "for", "of", "a", "an", "do", "you", "does", "can", "will",
	"would", "could", "to", "on", "in", "and", "or", "please", "tell", "me", "about", "your",
	"we", "us", "deal", "this",
];

/// Fallback `keyword -> snake_case key` mapping used by `derive_fact_key` when no fact pattern's
/// topic keywords match. 13 entries, reproduced verbatim from the distilled source.
pub const DERIVE_KEY_TABLE: &[(&str, &str)] = &[
	("minimum ticket", "minimum_ticket"),
	("ticket size", "minimum_ticket"),
	("closing date", "closing_date"),
	("payment date", "payment_dates"),
	("structure", "deal_structure"),
	("management fee", "management_fee"),
	("carry", "carry_fee"),
	("lockup", "lockup_period"),
	("valuation", "valuation"),
	("share price", "share_price"),
	("allocation", "allocation_amount"),
	("irr", "expected_return"),
	("distribution", "distribution_schedule"),
];

/// Clause terminators the decomposer scans for when bounding an extracted value, in priority
/// order of first appearance after the signal.
pub const CLAUSE_TERMINATORS: &[&str] = &[", ", " and ", "\n", ". ", " or ", "; "];

/// Leading connector phrases stripped from the front of an extracted value.
pub const LEADING_CONNECTORS: &[&str] = &[" is ", " are ", " would be ", ": ", " - ", " = "];

/// One `(answer_signal, question_template)` sub-rule within a topic. The first sub-rule whose
/// signal is found earliest in the user answer wins.
pub struct FactSignal {
	pub signal: &'static str,
	pub question_template: &'static str,
}

/// One topic in the fact-decomposition pattern table (§4.C10). `topic_keywords` gate whether the
/// topic was asked about at all; `signals` are tried against the answer in order, and the
/// earliest-appearing match determines both the extraction point and which template is emitted.
pub struct FactPattern {
	pub topic_keywords: &'static [&'static str],
	pub signals: &'static [FactSignal],
}

/// The full fact-decomposition pattern table: 11 topics, reproduced verbatim from the distilled
/// source (§4.C10).
pub const FACT_PATTERNS: &[FactPattern] = &[
	FactPattern {
		topic_keywords: &["minimum ticket", "ticket size", "minimum investment", "minimum check"],
		signals: &[
			FactSignal {
				signal: "minimum ticket",
				question_template: "What is the minimum ticket size for {deal_name}?",
			},
			FactSignal {
				signal: "ticket size",
				question_template: "What is the minimum ticket size for {deal_name}?",
			},
			FactSignal {
				signal: "minimum investment",
				question_template: "What is the minimum ticket size for {deal_name}?",
			},
			FactSignal {
				signal: "minimum check",
				question_template: "What is the minimum ticket size for {deal_name}?",
			},
		],
	},
	FactPattern {
		topic_keywords: &["first closing", "second closing", "final closing", "payment date"],
		signals: &[
			FactSignal {
				signal: "first closing",
				question_template: "What is the first closing payment date for {deal_name}?",
			},
			FactSignal {
				signal: "second closing",
				question_template: "What is the second closing payment date for {deal_name}?",
			},
			FactSignal {
				signal: "final closing",
				question_template: "What is the final closing payment date for {deal_name}?",
			},
			FactSignal {
				signal: "payment dates",
				question_template: "What are the payment dates for {deal_name}?",
			},
			FactSignal {
				signal: "payment date",
				question_template: "What are the payment dates for {deal_name}?",
			},
		],
	},
	FactPattern {
		topic_keywords: &["structure", "spv"],
		signals: &[FactSignal {
			signal: "structure",
			question_template: "What is the investment structure for {deal_name}?",
		}],
	},
	FactPattern {
		topic_keywords: &["management fee", "carry", "carried interest"],
		signals: &[
			FactSignal {
				signal: "management fee",
				question_template: "What is the management fee for {deal_name}?",
			},
			FactSignal {
				signal: "carried interest",
				question_template: "What is the carry fee for {deal_name}?",
			},
			FactSignal {
				signal: "carry",
				question_template: "What is the carry fee for {deal_name}?",
			},
		],
	},
	FactPattern {
		topic_keywords: &["lockup", "lock-up"],
		signals: &[
			FactSignal {
				signal: "lockup",
				question_template: "What is the lockup period for {deal_name}?",
			},
			FactSignal {
				signal: "lock-up",
				question_template: "What is the lockup period for {deal_name}?",
			},
		],
	},
	FactPattern {
		topic_keywords: &["closing date"],
		signals: &[FactSignal {
			signal: "closing date",
			question_template: "What is the closing date for {deal_name}?",
		}],
	},
	FactPattern {
		topic_keywords: &["valuation"],
		signals: &[FactSignal {
			signal: "valuation",
			question_template: "What is the valuation for {deal_name}?",
		}],
	},
	FactPattern {
		topic_keywords: &["share price", "price per share"],
		signals: &[
			FactSignal {
				signal: "share price",
				question_template: "What is the share price for {deal_name}?",
			},
			FactSignal {
				signal: "price per share",
				question_template: "What is the share price for {deal_name}?",
			},
		],
	},
	FactPattern {
		topic_keywords: &["allocation"],
		signals: &[FactSignal {
			signal: "allocation",
			question_template: "What is the allocation amount for {deal_name}?",
		}],
	},
	FactPattern {
		topic_keywords: &["irr", "expected return"],
		signals: &[
			FactSignal {
				signal: "expected return",
				question_template: "What is the expected return (IRR) for {deal_name}?",
			},
			FactSignal {
				signal: "irr",
				question_template: "What is the expected return (IRR) for {deal_name}?",
			},
		],
	},
	FactPattern {
		topic_keywords: &["distribution schedule", "distributions"],
		signals: &[
			FactSignal {
				signal: "distribution schedule",
				question_template: "What is the distribution schedule for {deal_name}?",
			},
			FactSignal {
				signal: "distributions",
				question_template: "What is the distribution schedule for {deal_name}?",
			},
		],
	},
];
