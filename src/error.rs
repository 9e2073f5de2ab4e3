use thiserror::Error;

/// Failure of a single probe request. Probes report these and move on.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot resolve endpoint {path}: {source}")]
    Endpoint {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build request payload: {0}")]
    Payload(#[source] reqwest::Error),
}

/// Errors while taking apart or forging a JWT.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token does not have three dot-separated segments")]
    Malformed,

    #[error("segment is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("segment is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("claims segment is not a JSON object")]
    ClaimsNotObject,

    #[error("invalid HMAC key")]
    Key,
}
