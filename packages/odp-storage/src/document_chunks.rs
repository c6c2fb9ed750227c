//! §4.C3 Static KB Search I/O: cosine similarity over `document_chunks.embedding`. The caller
//! (`odp-service`) embeds the question with C1; this module only scores and filters candidate
//! rows already in the database.

use pgvector::Vector;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{Result, models::ChunkHitRow};
use odp_domain::ChunkHit;

/// §4.C3: similarity `1 - cosine_distance`, filtered to rows with an embedding and similarity
/// `>= threshold`, scoped to `deal_id` when given, ordered ascending by distance (i.e. descending
/// similarity), capped at `top_k`.
///
/// Any row whose `embedding` is `NULL` never participates: the `pgvector` cosine-distance
/// operator `<=>` is undefined against `NULL` and the `WHERE embedding IS NOT NULL` guard keeps
/// it out of the plan entirely (invariant 1, §3).
pub async fn search_static<'e, E>(
	executor: E,
	query_embedding: &[f32],
	deal_id: Option<Uuid>,
	top_k: u32,
	threshold: f32,
) -> Result<Vec<ChunkHit>>
where
	E: PgExecutor<'e>,
{
	let query = Vector::from(query_embedding.to_vec());

	let rows = sqlx::query_as::<_, ChunkHitRow>(
		"\
SELECT chunk_id, deal_id, doc_name, chunk_index, page_number, text,
       (1 - (embedding <=> $1))::real AS similarity
FROM document_chunks
WHERE embedding IS NOT NULL
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

	Ok(rows.into_iter().map(ChunkHit::from).collect())
}

/// Ingestion-side insert; chunking and document extraction happen in an external job. A row
/// still needs a path into the table for fixtures and for that job to write through.
#[allow(clippy::too_many_arguments)]
pub async fn insert_chunk<'e, E>(
	executor: E,
	deal_id: Uuid,
	doc_id: Uuid,
	doc_name: &str,
	chunk_index: i32,
	page_number: Option<i32>,
	text: &str,
	embedding: &[f32],
) -> Result<Uuid>
where
	E: PgExecutor<'e>,
{
	let embedding = Vector::from(embedding.to_vec());

	let chunk_id: Uuid = sqlx::query_scalar(
		"\
INSERT INTO document_chunks (deal_id, doc_id, doc_name, chunk_index, page_number, text, embedding)
VALUES ($1, $2, $3, $4, $5, $6, $7)
RETURNING chunk_id",
	)
	.bind(deal_id)
	.bind(doc_id)
	.bind(doc_name)
	.bind(chunk_index)
	.bind(page_number)
	.bind(text)
	.bind(embedding)
	.fetch_one(executor)
	.await?;

	Ok(chunk_id)
}
