use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror;

use notes_core::Error as CoreError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("http invalid header value")]
    HTTPInvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("invalid form submission: {0}")]
    MultipartError(#[from] axum::extract::multipart::MultipartError),

    #[error(transparent)]
    NotesCoreError(#[from] CoreError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotesCoreError(e) => core_error_to_response(e),
            Error::MultipartError(_) => {
                (StatusCode::BAD_REQUEST, format!("{}", self)).into_response()
            }
            Error::HTTPInvalidHeaderValue(_) => {
                tracing::warn!("{:?}", self);
                internal_server_error()
            }
        }
    }
}

#[inline]
fn core_error_to_response(e: CoreError) -> Response {
    match e {
        CoreError::MissingField(_) | CoreError::MissingNoteId => {
            (StatusCode::BAD_REQUEST, format!("{}", e)).into_response()
        }
        CoreError::NoteNotFound(_) => (StatusCode::NOT_FOUND, format!("{}", e)).into_response(),
        CoreError::ApiError(_) | CoreError::StorageError(_) => {
            tracing::warn!("{:?}", e);
            internal_server_error()
        }
    }
}

#[inline]
fn internal_server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        String::from("internal server error"),
    )
        .into_response()
}
