use thiserror::Error;

/// Failures surfaced by the recipe-server API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered but rejected the request, either with a non-2xx
    /// status or with a 2xx body carrying an explicit failure.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The body did not match the agreed response shape.
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// Failures raised by session operations, including local validation that
/// short-circuits before any network call.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("no active recipe")]
    NoActiveRecipe,
    #[error("the active recipe has not been saved yet")]
    RecipeNotSaved,
    #[error("{0}")]
    Validation(String),
}

/// Error type for configuration load/save failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
