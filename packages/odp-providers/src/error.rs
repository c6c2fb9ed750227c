#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("provider request failed")]
	Request(#[from] reqwest::Error),

	#[error("failed to decode provider response")]
	Decode(#[from] serde_json::Error),

	#[error("provider returned an unexpected response shape: {0}")]
	InvalidResponse(String),

	#[error("provider {provider_id} is not recognized")]
	UnknownProvider { provider_id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
