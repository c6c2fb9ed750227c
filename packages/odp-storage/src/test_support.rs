//! Shared by every module's `#[cfg(test)]` block: a scratch database bootstrapped through the
//! real `ensure_schema` DDL (§4.C16), so storage-layer tests exercise the same schema production
//! runs against rather than a hand-rolled subset of it. Gated behind `ODP_TEST_PG_DSN` exactly
//! like `odp-service`'s acceptance tests (see `packages/odp-service/tests/acceptance.rs`).

use crate::db::Db;

/// `None` when `ODP_TEST_PG_DSN` is unset — callers early-return and print a skip notice.
pub(crate) async fn test_pool(vector_dim: u32) -> Option<(odp_testkit::TestDatabase, sqlx::PgPool)> {
	let base_dsn = odp_testkit::env_dsn()?;
	let test_db = odp_testkit::TestDatabase::new(&base_dsn).await.expect("failed to create test database");
	let cfg = odp_config::Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 4 };
	let db = Db::connect(&cfg).await.expect("failed to connect to the test database");

	db.ensure_schema(vector_dim).await.expect("failed to bootstrap schema");

	Some((test_db, db.pool))
}
