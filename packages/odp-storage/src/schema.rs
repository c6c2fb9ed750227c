//! Renders `sql/schema.sql` with its `\ir` includes expanded and the vector dimension
//! substituted in, so `ensure_schema` can run it as a single idempotent script (§4.C16).

pub fn render_schema(vector_dim: u32) -> String {
	let init = include_str!("../../../sql/schema.sql");
	let expanded = expand_includes(init);

	expanded.replace("<VECTOR_DIM>", &vector_dim.to_string())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_deals.sql" => out.push_str(include_str!("../../../sql/tables/001_deals.sql")),
				"tables/002_sessions.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_sessions.sql")),
				"tables/003_messages.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_messages.sql")),
				"tables/004_document_chunks.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_document_chunks.sql")),
				"tables/005_dynamic_facts.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_dynamic_facts.sql")),
				"tables/006_tone_rules.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_tone_rules.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
