//! §4.C5 I/O: listing active deals and loading tone rules. Detection and rendering over the
//! loaded rows is pure and lives in `odp_domain::deal_registry`.

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
	Result,
	models::{DealRow, ToneRuleRow},
};
use odp_domain::{Deal, ToneRule};

pub async fn list_active_deals<'e, E>(executor: E) -> Result<Vec<Deal>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, DealRow>(
		"SELECT deal_id, deal_name, deal_code, active FROM deals WHERE active ORDER BY deal_name",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows.into_iter().map(Deal::from).collect())
}

pub async fn find_deal<'e, E>(executor: E, deal_id: Uuid) -> Result<Option<Deal>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, DealRow>(
		"SELECT deal_id, deal_name, deal_code, active FROM deals WHERE deal_id = $1",
	)
	.bind(deal_id)
	.fetch_optional(executor)
	.await?;

	Ok(row.map(Deal::from))
}

/// Loads every active tone rule relevant to `deal_id` (or every active global rule when absent).
/// Ordering into the rendered `- [TYPE] text` block is `odp_domain::deal_registry::tone_rules_block`'s
/// job; this query only scopes the rows.
pub async fn tone_rules<'e, E>(executor: E, deal_id: Option<Uuid>) -> Result<Vec<ToneRule>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, ToneRuleRow>(
		"\
SELECT rule_id, scope, deal_id, rule_type, rule_text, priority, active
FROM tone_rules
WHERE active AND (scope = 'global' OR deal_id = $1)
ORDER BY priority DESC",
	)
	.bind(deal_id)
	.fetch_all(executor)
	.await?;

	Ok(rows.into_iter().map(ToneRule::from).collect())
}
