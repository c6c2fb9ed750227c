//! Deployment configuration (§4.C16): a single TOML file, deserialized then validated
//! section-by-section so a malformed deployment fails fast with a named offending field.

mod error;
mod types;

pub use error::{Error, Result};
pub use types::{ChatProviderConfig, Config, Context, EmbeddingProviderConfig, Postgres, Providers, Retrieval, Service, Storage};

use std::path::Path;

const KNOWN_PROVIDER_IDS: &[&str] = &["openai", "anthropic"];

/// Reads, parses, and validates the config file at `path`.
pub fn load(path: &Path) -> Result<Config> {
	let raw = std::fs::read_to_string(path)
		.map_err(|source| Error::ReadConfig { path: path.to_path_buf(), source })?;
	let config: Config = toml::from_str(&raw)
		.map_err(|source| Error::ParseConfig { path: path.to_path_buf(), source })?;

	validate(&config)?;

	Ok(config)
}

/// Dispatches to per-section validators; the first failing check names its field.
pub fn validate(config: &Config) -> Result<()> {
	validate_storage(&config.storage)?;
	validate_provider(&config.providers.embedding.provider_id, &config.providers.embedding.api_key, "providers.embedding")?;
	validate_provider(&config.providers.chat.provider_id, &config.providers.chat.api_key, "providers.chat")?;
	validate_retrieval(&config.retrieval)?;

	Ok(())
}

fn validate_storage(storage: &Storage) -> Result<()> {
	if storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation { message: "storage.postgres.dsn must not be empty".to_string() });
	}
	if storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than 0".to_string(),
		});
	}

	Ok(())
}

fn validate_provider(provider_id: &str, api_key: &str, section: &str) -> Result<()> {
	if !KNOWN_PROVIDER_IDS.contains(&provider_id) {
		return Err(Error::Validation {
			message: format!("{section}.provider_id '{provider_id}' is not a known provider"),
		});
	}
	if api_key.trim().is_empty() {
		return Err(Error::Validation { message: format!("{section}.api_key must not be empty") });
	}

	Ok(())
}

fn validate_retrieval(retrieval: &Retrieval) -> Result<()> {
	if retrieval.vector_dim == 0 {
		return Err(Error::Validation { message: "retrieval.vector_dim must be greater than 0".to_string() });
	}
	if !(0.0..=1.0).contains(&retrieval.similarity_threshold) {
		return Err(Error::Validation {
			message: "retrieval.similarity_threshold must be within [0, 1]".to_string(),
		});
	}
	if retrieval.top_k == 0 {
		return Err(Error::Validation { message: "retrieval.top_k must be greater than 0".to_string() });
	}

	Ok(())
}
