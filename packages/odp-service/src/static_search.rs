//! §4.C3 I/O composition: embed the question (C1), then score candidate chunks (`odp-storage`).
//! Never propagates an error to the caller — any embedding or database failure becomes an empty
//! result, per §4.C3 "Empty on any error ... never throws out" and §7's helper-failure policy.

use sqlx::PgExecutor;
use uuid::Uuid;

use odp_domain::ChunkHit;
use odp_providers::embedding::EmbeddingProvider;

pub async fn search_static<'e, E>(
	executor: E,
	embedding_provider: &dyn EmbeddingProvider,
	question: &str,
	deal_id: Option<Uuid>,
	top_k: u32,
	threshold: f32,
) -> Vec<ChunkHit>
where
	E: PgExecutor<'e>,
{
	let query_embedding = match embedding_provider.embed(question).await {
		Ok(vector) => vector,
		Err(err) => {
			tracing::warn!(error = %err, "static KB embedding failed, falling back to no results");

			return Vec::new();
		},
	};

	match odp_storage::document_chunks::search_static(executor, &query_embedding, deal_id, top_k, threshold).await {
		Ok(hits) => hits,
		Err(err) => {
			tracing::warn!(error = %err, "static KB search failed, falling back to no results");

			Vec::new()
		},
	}
}
