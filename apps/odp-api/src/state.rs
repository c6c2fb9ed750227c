use std::sync::Arc;

use odp_providers::{chat::build_chat_provider, embedding::build_embedding_provider};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<odp_service::OdpService>,
}

impl AppState {
	pub async fn new(config: odp_config::Config) -> color_eyre::Result<Self> {
		let db = odp_storage::db::Db::connect(&config.storage.postgres).await?;
		db.ensure_schema(config.retrieval.vector_dim).await?;

		let embedding = build_embedding_provider(&config.providers.embedding)?;
		let chat = build_chat_provider(&config.providers.chat)?;
		let pool = db.pool;
		let service = odp_service::OdpService::new(pool, embedding, chat, config);

		Ok(Self { service: Arc::new(service) })
	}
}
