pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("{provider} did not answer within {timeout_ms} ms.")]
	Timeout { provider: &'static str, timeout_ms: u64 },
	#[error("Invalid response: {message}")]
	InvalidResponse { message: String },
}
impl From<scout_providers::Error> for Error {
	fn from(err: scout_providers::Error) -> Self {
		match err {
			scout_providers::Error::InvalidResponse { message } => Self::InvalidResponse { message },
			other => Self::Provider { message: other.to_string() },
		}
	}
}
