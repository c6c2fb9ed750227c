//! §4.C4 Dynamic KB Store I/O. Embeddings are computed by the caller (`odp-service`, which owns
//! the `EmbeddingProvider`) and passed in; this module only persists and searches rows. Formatting
//! search results into the `Q:…/A:…` and `Title-cased-Key: value` block is
//! `odp_domain::dynamic_kb`'s job (pure), consistent with how `odp_domain::prompt::build_context`
//! formats Static KB hits.

use pgvector::Vector;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
	Result,
	models::{DynamicKvRow, DynamicQaRow},
};
use odp_domain::FactAction;

/// §4.C4 search pass 1: cosine similarity over approved Q&A-shaped rows (embedding present,
/// deal-scoped when given). Same scoring/threshold rule as Static KB.
pub async fn search_qa_candidates<'e, E>(
	executor: E,
	query_embedding: &[f32],
	deal_id: Option<Uuid>,
	top_k: u32,
	threshold: f32,
) -> Result<Vec<(String, String)>>
where
	E: PgExecutor<'e>,
{
	let query = Vector::from(query_embedding.to_vec());

	let rows = sqlx::query_as::<_, DynamicQaRow>(
		"\
SELECT question, answer
FROM dynamic_facts
WHERE approval_status = 'approved'
  AND embedding IS NOT NULL
  AND question IS NOT NULL
  AND answer IS NOT NULL
  AND ($2::uuid IS NULL OR deal_id = $2)
  AND (1 - (embedding <=> $1)) >= $3
ORDER BY embedding <=> $1
LIMIT $4",
	)
	.bind(&query)
	.bind(deal_id)
	.bind(threshold)
	.bind(i64::from(top_k))
	.fetch_all(executor)
	.await?;

	Ok(rows.into_iter().filter_map(|r| Some((r.question?, r.answer?))).collect())
}

/// §4.C4 search pass 2: every approved key-value row for the deal with both key and value set.
pub async fn kv_rows_for_deal<'e, E>(executor: E, deal_id: Uuid) -> Result<Vec<(String, String)>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, DynamicKvRow>(
		"\
SELECT fact_key, fact_value
FROM dynamic_facts
WHERE approval_status = 'approved'
  AND deal_id = $1
  AND fact_key IS NOT NULL
  AND fact_value IS NOT NULL",
	)
	.bind(deal_id)
	.fetch_all(executor)
	.await?;

	Ok(rows.into_iter().filter_map(|r| Some((r.fact_key?, r.fact_value?))).collect())
}

/// Inserts a single Q&A-shaped row, approved by construction (§4.C4 `store_qa`, and the full-row
/// write within `store_with_decomposition`).
pub async fn insert_qa_row<'e, E>(
	executor: E,
	deal_id: Uuid,
	question: &str,
	answer: &str,
	embedding: &[f32],
	created_by: &str,
) -> Result<Uuid>
where
	E: PgExecutor<'e>,
{
	let embedding = Vector::from(embedding.to_vec());

	let id: Uuid = sqlx::query_scalar(
		"\
INSERT INTO dynamic_facts (deal_id, question, answer, embedding, approval_status, created_by)
VALUES ($1, $2, $3, $4, 'approved', $5)
RETURNING id",
	)
	.bind(deal_id)
	.bind(question)
	.bind(answer)
	.bind(embedding)
	.bind(created_by)
	.fetch_one(executor)
	.await?;

	Ok(id)
}

/// Inserts the decomposition fallback row: `fact_key` derived from the investor question,
/// `fact_value = user_answer`, carrying the full Q&A embedding (§4.C4 `store_with_decomposition`
/// step 3).
pub async fn insert_kv_fallback_row<'e, E>(
	executor: E,
	deal_id: Uuid,
	fact_key: &str,
	fact_value: &str,
	embedding: &[f32],
	created_by: &str,
) -> Result<Uuid>
where
	E: PgExecutor<'e>,
{
	let embedding = Vector::from(embedding.to_vec());

	let id: Uuid = sqlx::query_scalar(
		"\
INSERT INTO dynamic_facts (deal_id, fact_key, fact_value, embedding, approval_status, created_by)
VALUES ($1, $2, $3, $4, 'approved', $5)
RETURNING id",
	)
	.bind(deal_id)
	.bind(fact_key)
	.bind(fact_value)
	.bind(embedding)
	.bind(created_by)
	.fetch_one(executor)
	.await?;

	Ok(id)
}

/// §4.C4 `upsert_fact`: key is `(deal_id, fact_key)`. Relies on the unique partial index in
/// `sql/tables/005_dynamic_facts.sql` to make the insert/update decision atomic; the `xmax = 0`
/// trick on the returned row tells created from updated without a second round-trip.
pub async fn upsert_fact<'e, E>(
	executor: E,
	deal_id: Uuid,
	fact_key: &str,
	fact_value: &str,
	created_by: &str,
) -> Result<FactAction>
where
	E: PgExecutor<'e>,
{
	let inserted: bool = sqlx::query_scalar(
		"\
INSERT INTO dynamic_facts (deal_id, fact_key, fact_value, approval_status, created_by)
VALUES ($1, $2, $3, 'approved', $4)
ON CONFLICT (deal_id, fact_key) WHERE fact_key IS NOT NULL DO UPDATE
	SET fact_value = EXCLUDED.fact_value,
	    approval_status = 'approved',
	    created_by = EXCLUDED.created_by,
	    updated_at = now()
RETURNING (xmax = 0)",
	)
	.bind(deal_id)
	.bind(fact_key)
	.bind(fact_value)
	.bind(created_by)
	.fetch_one(executor)
	.await?;

	Ok(if inserted { FactAction::Created } else { FactAction::Updated })
}
