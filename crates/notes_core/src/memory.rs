//! In-process implementations of [`NoteApi`] and [`BlobStore`].
//!
//! Useful for local development without cloud credentials and as test doubles for crates that
//! sit on top of [`crate::NoteListController`].
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::{Error, Result};
use crate::note::{Attachment, Note, NoteId, NoteImage, NoteInput};
use crate::traits::{BlobStore, NoteApi};

#[derive(Clone, Default)]
pub struct MemoryNoteApi {
    notes: Arc<Mutex<Vec<Note>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryNoteApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.notes.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.lock().await.is_empty()
    }
}

#[async_trait]
impl NoteApi for MemoryNoteApi {
    type Error = Error;

    async fn list_notes(&self) -> Result<Vec<Note>> {
        Ok(self.notes.lock().await.clone())
    }

    async fn create_note(&self, input: &NoteInput) -> Result<Note> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let note = Note {
            id: Some(NoteId::new(format!("note-{id}"))),
            name: input.name().to_string(),
            description: input.description().to_string(),
            image: input.image_name().map(|n| NoteImage::Stored(n.to_string())),
        };
        self.notes.lock().await.push(note.clone());
        Ok(note)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let mut notes = self.notes.lock().await;
        let before = notes.len();
        notes.retain(|n| n.id.as_ref() != Some(id));
        if notes.len() == before {
            return Err(Error::NoteNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemoryBlobStore {
    objects: Arc<Mutex<HashMap<String, Attachment>>>,
    url_prefix: String,
}

impl MemoryBlobStore {
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            url_prefix: url_prefix.into(),
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.lock().await.contains_key(key)
    }

    /// Return a copy of the object stored at `key`.
    pub async fn object(&self, key: &str) -> Option<Attachment> {
        self.objects.lock().await.get(key).cloned()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("memory://")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    type Error = Error;

    async fn put(&self, key: &str, attachment: &Attachment) -> Result<()> {
        self.objects
            .lock()
            .await
            .insert(key.to_string(), attachment.clone());
        Ok(())
    }

    async fn get_url(&self, key: &str) -> Result<String> {
        if !self.contains(key).await {
            return Err(Error::StorageError(format!("no object at key: {key}")));
        }
        Ok(format!("{}{}", self.url_prefix, key))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.objects.lock().await.remove(key);
        Ok(())
    }
}
