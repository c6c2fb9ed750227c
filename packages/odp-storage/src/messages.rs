//! §4.C6 (Conversation Store) message half: append, history, and conversation clearing.

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{Result, models::MessageRow};
use odp_domain::{Message, MessageMetadata, MessageRole};

/// §4.C6 `append_message`. `metadata` is serialized to `jsonb` via its tagged-union `Serialize`
/// impl; `None` stores SQL `NULL`.
pub async fn append_message<'e, E>(
	executor: E,
	session_id: &str,
	role: MessageRole,
	content: &str,
	deal_id: Option<Uuid>,
	metadata: Option<&MessageMetadata>,
) -> Result<Message>
where
	E: PgExecutor<'e>,
{
	let metadata_json = metadata.map(serde_json::to_value).transpose()?;

	let row = sqlx::query_as::<_, MessageRow>(
		"\
INSERT INTO messages (session_id, role, content, deal_id, metadata)
VALUES ($1, $2, $3, $4, $5)
RETURNING message_id, session_id, role, content, deal_id, metadata, created_at",
	)
	.bind(session_id)
	.bind(role.as_str())
	.bind(content)
	.bind(deal_id)
	.bind(metadata_json)
	.fetch_one(executor)
	.await?;

	Ok(Message::try_from(row)?)
}

/// §4.C6 `history`: oldest-first, most-recent `limit` messages when given.
pub async fn history<'e, E>(executor: E, session_id: &str, limit: Option<i64>) -> Result<Vec<Message>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, MessageRow>(
		"\
SELECT message_id, session_id, role, content, deal_id, metadata, created_at
FROM (
	SELECT message_id, session_id, role, content, deal_id, metadata, created_at
	FROM messages
	WHERE session_id = $1
	ORDER BY created_at DESC
	LIMIT $2
) AS recent
ORDER BY created_at ASC",
	)
	.bind(session_id)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	rows.into_iter().map(Message::try_from).map(|r| r.map_err(Into::into)).collect()
}

/// The newest assistant message in the session, if any — used by the pending-needs-info check
/// (§4.C12 step 7) and by investor-question resolution (step 16).
pub async fn newest_assistant_message<'e, E>(executor: E, session_id: &str) -> Result<Option<Message>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, MessageRow>(
		"\
SELECT message_id, session_id, role, content, deal_id, metadata, created_at
FROM messages
WHERE session_id = $1 AND role = 'assistant'
ORDER BY created_at DESC
LIMIT 1",
	)
	.bind(session_id)
	.fetch_optional(executor)
	.await?;

	row.map(Message::try_from).transpose().map_err(Into::into)
}

/// §4.C6 `clear_conversation`: deletes all messages for the session (cascade is moot here since
/// messages are the leaf), returns whether any row existed.
pub async fn clear_conversation<'e, E>(executor: E, session_id: &str) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM messages WHERE session_id = $1")
		.bind(session_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::test_pool;

	async fn with_session(pool: &sqlx::PgPool) {
		sqlx::query("INSERT INTO sessions (session_id, user_id) VALUES ('s1', 'u1')").execute(pool).await.unwrap();
	}

	#[tokio::test]
	#[ignore = "Requires external Postgres. Set ODP_TEST_PG_DSN to run."]
	async fn history_is_oldest_first() {
		let Some((test_db, pool)) = test_pool(3).await else {
			eprintln!("skipping; set ODP_TEST_PG_DSN to run this test");
			return;
		};
		with_session(&pool).await;

		append_message(&pool, "s1", MessageRole::User, "first", None, None).await.unwrap();
		append_message(&pool, "s1", MessageRole::Assistant, "second", None, None).await.unwrap();

		let messages = history(&pool, "s1", None).await.unwrap();

		assert_eq!(messages[0].content, "first");
		assert_eq!(messages[1].content, "second");

		test_db.cleanup().await.unwrap();
	}

	#[tokio::test]
	#[ignore = "Requires external Postgres. Set ODP_TEST_PG_DSN to run."]
	async fn history_limit_keeps_most_recent_oldest_first() {
		let Some((test_db, pool)) = test_pool(3).await else {
			eprintln!("skipping; set ODP_TEST_PG_DSN to run this test");
			return;
		};
		with_session(&pool).await;

		for i in 0..5 {
			append_message(&pool, "s1", MessageRole::User, &format!("turn {i}"), None, None).await.unwrap();
		}

		let messages = history(&pool, "s1", Some(2)).await.unwrap();

		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0].content, "turn 3");
		assert_eq!(messages[1].content, "turn 4");

		test_db.cleanup().await.unwrap();
	}

	#[tokio::test]
	#[ignore = "Requires external Postgres. Set ODP_TEST_PG_DSN to run."]
	async fn newest_assistant_message_ignores_user_messages() {
		let Some((test_db, pool)) = test_pool(3).await else {
			eprintln!("skipping; set ODP_TEST_PG_DSN to run this test");
			return;
		};
		with_session(&pool).await;

		append_message(&pool, "s1", MessageRole::Assistant, "reply", None, Some(&MessageMetadata::Greeting))
			.await
			.unwrap();
		append_message(&pool, "s1", MessageRole::User, "follow-up", None, None).await.unwrap();

		let newest = newest_assistant_message(&pool, "s1").await.unwrap().unwrap();

		assert_eq!(newest.content, "reply");
		assert!(matches!(newest.metadata, Some(MessageMetadata::Greeting)));

		test_db.cleanup().await.unwrap();
	}

	#[tokio::test]
	#[ignore = "Requires external Postgres. Set ODP_TEST_PG_DSN to run."]
	async fn clear_conversation_reports_whether_rows_existed() {
		let Some((test_db, pool)) = test_pool(3).await else {
			eprintln!("skipping; set ODP_TEST_PG_DSN to run this test");
			return;
		};
		with_session(&pool).await;

		assert!(!clear_conversation(&pool, "s1").await.unwrap());

		append_message(&pool, "s1", MessageRole::User, "hi", None, None).await.unwrap();

		assert!(clear_conversation(&pool, "s1").await.unwrap());

		let remaining = history(&pool, "s1", None).await.unwrap();
		assert!(remaining.is_empty());

		test_db.cleanup().await.unwrap();
	}
}
