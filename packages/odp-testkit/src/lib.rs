//! Test-only helpers shared across crates: a disposable Postgres database per test, and fake
//! `EmbeddingProvider`/`ChatProvider` implementations so `odp-service`'s orchestrator tests never
//! make a real network call.

mod error;
pub mod providers;

pub use error::{Error, Result};
pub use providers::{FakeChatProvider, FakeEmbeddingProvider};

use std::str::FromStr;

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use uuid::Uuid;

const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];

/// A scratch Postgres database created for one test and dropped on [`TestDatabase::cleanup`] (or
/// best-effort on [`Drop`] if the caller forgets).
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	cleaned: bool,
}

impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options: PgConnectOptions = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("failed to parse ODP_TEST_PG_DSN: {err}")))?;
		let (admin_options, mut admin_conn) = connect_admin(&base_options).await?;
		let name = format!("odp_test_{}", Uuid::new_v4().simple());

		admin_conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str()).await?;

		let dsn = base_options.clone().database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options, cleaned: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner().await
	}

	async fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		let mut conn = PgConnection::connect_with(&self.admin_options).await?;

		let _ = sqlx::query(
			"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = $1 AND pid <> pg_backend_pid()",
		)
		.bind(&self.name)
		.fetch_all(&mut conn)
		.await;

		conn.execute(format!(r#"DROP DATABASE IF EXISTS "{}""#, self.name).as_str()).await?;

		self.cleaned = true;

		Ok(())
	}
}

impl Drop for TestDatabase {
	fn drop(&mut self) {
		// Best-effort: the async drop path can't run here, so a forgotten `cleanup()` call just
		// leaves the scratch database behind for a human to notice and reap.
	}
}

pub fn env_dsn() -> Option<String> {
	std::env::var("ODP_TEST_PG_DSN").ok()
}

async fn connect_admin(base_options: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let mut last_err = None;

	for database in ADMIN_DATABASES {
		let options = base_options.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => last_err = Some(err),
		}
	}

	Err(Error::Message(format!("failed to connect to an admin database: {last_err:?}")))
}
