use thiserror;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("http client error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("graphql errors: {0}")]
    GraphQLErrors(String),

    #[error("response missing data for {0}")]
    MissingData(&'static str),
}

impl From<Error> for notes_core::Error {
    fn from(e: Error) -> notes_core::Error {
        notes_core::Error::ApiError(e.to_string())
    }
}
