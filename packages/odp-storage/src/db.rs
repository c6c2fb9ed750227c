use sqlx::postgres::PgPoolOptions;

use crate::{Result, schema};

/// The connection pool plus the schema-bootstrap operation (§4.C16). Everything else in this
/// crate takes a `PgExecutor` (pool or open transaction) rather than reaching through `Db`
/// directly, so callers can choose whether a query joins an in-flight transaction.
pub struct Db {
	pub pool: sqlx::PgPool,
}

impl Db {
	pub async fn connect(cfg: &odp_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Takes a Postgres advisory lock for the duration of one transaction so that two instances
	/// bootstrapping concurrently never race the DDL, then runs the rendered schema statement by
	/// statement.
	pub async fn ensure_schema(&self, vector_dim: u32) -> Result<()> {
		let sql = schema::render_schema(vector_dim);
		let lock_id: i64 = 5_108_211;
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}
