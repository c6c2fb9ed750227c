use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("failed to read config file {path}")]
	ReadConfig { path: PathBuf, #[source] source: std::io::Error },

	#[error("failed to parse config file {path}")]
	ParseConfig { path: PathBuf, #[source] source: toml::de::Error },

	#[error("invalid configuration: {message}")]
	Validation { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
