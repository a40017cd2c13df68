use thiserror;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("note has no id")]
    MissingNoteId,

    #[error("note not found: {0}")]
    NoteNotFound(String),

    #[error("api error: {0}")]
    ApiError(String),

    #[error("storage error: {0}")]
    StorageError(String),
}
