use async_trait::async_trait;

use crate::errors::Error;
use crate::note::{Attachment, Note, NoteId, NoteInput};

/// The structured request interface of the backend that persists note records.
#[async_trait]
pub trait NoteApi: Clone + Send + Sync + 'static {
    type Error: std::error::Error + Into<Error> + Send + Sync + 'static;

    /// Return every note known to the backend. Images are reported as
    /// [`NoteImage::Stored`](crate::NoteImage::Stored) keys.
    async fn list_notes(&self) -> std::result::Result<Vec<Note>, Self::Error>;

    /// Persist a new note record carrying `{name, description, image}` where `image` is the
    /// attachment's file name, if any. Returns the record with its backend-assigned id.
    async fn create_note(&self, input: &NoteInput) -> std::result::Result<Note, Self::Error>;

    async fn delete_note(&self, id: &NoteId) -> std::result::Result<(), Self::Error>;
}

/// Key-addressed binary object store used for image attachments.
#[async_trait]
pub trait BlobStore: Clone + Send + Sync + 'static {
    type Error: std::error::Error + Into<Error> + Send + Sync + 'static;

    async fn put(&self, key: &str, attachment: &Attachment)
        -> std::result::Result<(), Self::Error>;

    /// Return a time-limited URL from which the object at `key` can be retrieved.
    async fn get_url(&self, key: &str) -> std::result::Result<String, Self::Error>;

    async fn remove(&self, key: &str) -> std::result::Result<(), Self::Error>;
}
