//! §4.C4 I/O composition: search (two passes, formatted by `odp_domain::dynamic_kb`), and the two
//! write paths (`store_qa`, `store_with_decomposition`) plus the keyed `upsert_fact`.

use sqlx::PgExecutor;
use uuid::Uuid;

use odp_domain::{FactAction, fact_decomposer};
use odp_providers::embedding::EmbeddingProvider;

/// §4.C4 `search_dynamic`: never propagates an error (helper-failure policy, §7) — an embedding
/// or database failure just yields an empty block, same as Static KB.
pub async fn search_dynamic<'e, E>(
	executor: E,
	embedding_provider: &dyn EmbeddingProvider,
	question: &str,
	deal_id: Option<Uuid>,
	top_k: u32,
	threshold: f32,
) -> String
where
	E: PgExecutor<'e> + Clone,
{
	let query_embedding = match embedding_provider.embed(question).await {
		Ok(vector) => vector,
		Err(err) => {
			tracing::warn!(error = %err, "dynamic KB embedding failed, falling back to no results");

			return String::new();
		},
	};

	let qa_rows = odp_storage::dynamic_facts::search_qa_candidates(
		executor.clone(),
		&query_embedding,
		deal_id,
		top_k,
		threshold,
	)
	.await
	.unwrap_or_else(|err| {
		tracing::warn!(error = %err, "dynamic KB Q&A search failed, falling back to no results");

		Vec::new()
	});

	let kv_rows = match deal_id {
		Some(deal_id) => odp_storage::dynamic_facts::kv_rows_for_deal(executor, deal_id)
			.await
			.unwrap_or_else(|err| {
				tracing::warn!(error = %err, "dynamic KB key-value lookup failed, falling back to none");

				Vec::new()
			}),
		None => Vec::new(),
	};

	odp_domain::dynamic_kb::format_dynamic_block(&qa_rows, &kv_rows)
}

/// §4.C4 `store_qa`: embeds `question + " " + answer`, inserts an approved Q&A row.
pub async fn store_qa<'e, E>(
	executor: E,
	embedding_provider: &dyn EmbeddingProvider,
	vector_dim: usize,
	deal_id: Uuid,
	question: &str,
	answer: &str,
	created_by: &str,
) -> odp_storage::Result<Uuid>
where
	E: PgExecutor<'e>,
{
	let embedding = embed_qa(embedding_provider, vector_dim, question, answer).await;

	odp_storage::dynamic_facts::insert_qa_row(executor, deal_id, question, answer, &embedding, created_by).await
}

/// §4.C4 `store_with_decomposition`: full Q&A row, then one narrowly-embedded row per atomic fact
/// C10 extracts, and — only if C10 produced nothing — a single key-value fallback row.
pub async fn store_with_decomposition<'e, E>(
	executor: E,
	embedding_provider: &dyn EmbeddingProvider,
	vector_dim: usize,
	deal_id: Uuid,
	investor_question: &str,
	user_answer: &str,
	deal_name: &str,
	created_by: &str,
) -> odp_storage::Result<()>
where
	E: PgExecutor<'e> + Clone,
{
	let full_embedding = embed_qa(embedding_provider, vector_dim, investor_question, user_answer).await;

	odp_storage::dynamic_facts::insert_qa_row(
		executor.clone(),
		deal_id,
		investor_question,
		user_answer,
		&full_embedding,
		created_by,
	)
	.await?;

	let atomic_facts = fact_decomposer::extract_atomic(investor_question, user_answer, deal_name);

	if atomic_facts.is_empty() {
		let fact_key = fact_decomposer::derive_fact_key(investor_question)
			.unwrap_or_else(|| "team_supplied_fact".to_string());

		odp_storage::dynamic_facts::insert_kv_fallback_row(
			executor,
			deal_id,
			&fact_key,
			user_answer,
			&full_embedding,
			created_by,
		)
		.await?;

		return Ok(());
	}

	for fact in atomic_facts {
		let embedding = embed_qa(embedding_provider, vector_dim, &fact.question, &fact.value).await;

		odp_storage::dynamic_facts::insert_qa_row(
			executor.clone(),
			deal_id,
			&fact.question,
			&fact.value,
			&embedding,
			created_by,
		)
		.await?;
	}

	Ok(())
}

/// §4.C4 `upsert_fact`.
pub async fn upsert_fact<'e, E>(
	executor: E,
	deal_id: Uuid,
	fact_key: &str,
	fact_value: &str,
	created_by: &str,
) -> odp_storage::Result<FactAction>
where
	E: PgExecutor<'e>,
{
	odp_storage::dynamic_facts::upsert_fact(executor, deal_id, fact_key, fact_value, created_by).await
}

/// An embedding failure here has no safe default to fall back to (the row must carry some
/// vector to be searchable later) so a zero vector of the provider's configured dimension is
/// used instead and the failure is logged; the row is still written with its text intact.
async fn embed_qa(embedding_provider: &dyn EmbeddingProvider, vector_dim: usize, question: &str, answer: &str) -> Vec<f32> {
	let text = format!("{question} {answer}");

	match embedding_provider.embed(&text).await {
		Ok(vector) => vector,
		Err(err) => {
			tracing::warn!(error = %err, "dynamic KB write embedding failed, storing a zero vector");

			vec![0.0; vector_dim]
		},
	}
}
