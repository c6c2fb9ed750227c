#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("database error")]
	Sqlx(#[from] sqlx::Error),

	#[error("failed to decode stored message metadata")]
	Decode(#[from] serde_json::Error),

	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error("not found")]
	NotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
