use thiserror::Error;

/// Failures from the generation service, split so the workflow can log a
/// transport problem differently from the service declining to answer.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("generation service returned no usable content")]
    EmptyResponse,
}
