//! §4.C6 (Conversation Store) session half: `get_or_create_session` and `list_sessions`. Message
//! operations live in [`crate::messages`].

use sqlx::PgExecutor;

use crate::{Result, models::SessionRow};
use odp_domain::Session;

/// Idempotent: relies on `sessions.session_id`'s unique constraint plus `ON CONFLICT DO UPDATE`
/// so two identical concurrent calls for the same explicit `session_id` never race a plain
/// insert-then-select.
pub async fn get_or_create_session<'e, E>(
	executor: E,
	session_id: Option<&str>,
	user_id: &str,
) -> Result<Session>
where
	E: PgExecutor<'e>,
{
	let session_id = session_id.map(str::to_string).unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

	let row = sqlx::query_as::<_, SessionRow>(
		"\
INSERT INTO sessions (session_id, user_id)
VALUES ($1, $2)
ON CONFLICT (session_id) DO UPDATE SET updated_at = now()
RETURNING session_id, user_id, created_at, updated_at",
	)
	.bind(&session_id)
	.bind(user_id)
	.fetch_one(executor)
	.await?;

	Ok(row.into())
}

/// §4.C6 `list_sessions`: newest-first.
pub async fn list_sessions<'e, E>(executor: E, user_id: &str) -> Result<Vec<Session>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, SessionRow>(
		"SELECT session_id, user_id, created_at, updated_at FROM sessions WHERE user_id = $1 ORDER BY updated_at DESC",
	)
	.bind(user_id)
	.fetch_all(executor)
	.await?;

	Ok(rows.into_iter().map(Session::from).collect())
}
