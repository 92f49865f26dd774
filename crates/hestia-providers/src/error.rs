use thiserror::Error;

/// Failure of a non-generation provider call (publishing, payments, speech).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The credential is not configured; carries the environment variable name.
    #[error("Missing {0}")]
    MissingKey(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    pub(crate) fn transport(err: reqwest::Error, context: &str) -> Self {
        ProviderError::Transport(anyhow::Error::new(err).context(context.to_string()))
    }
}
