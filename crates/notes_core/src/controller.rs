use std::sync::Arc;

use futures::future::try_join_all;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::errors::{Error, Result};
use crate::note::{Note, NoteId, NoteImage, NoteInput};
use crate::traits::{BlobStore, NoteApi};

/// How [`NoteListController::delete`] treats its optimistic local removal when a backend removal
/// fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// Leave the note out of the local list until the next [`NoteListController::fetch_all`].
    #[default]
    Optimistic,
    /// Put the note back where it was.
    RollbackOnFailure,
}

/// Holds the in-memory note list and orchestrates list, create and delete operations against a
/// [`NoteApi`] and a [`BlobStore`].
///
/// The list lock is only taken to read or replace the list and is never held across a backend
/// call, so concurrently issued operations interleave at their await points. No ordering between
/// them is guaranteed.
#[derive(Clone)]
pub struct NoteListController<A: NoteApi, B: BlobStore> {
    api: A,
    blobs: B,
    delete_mode: DeleteMode,
    notes: Arc<RwLock<Vec<Note>>>,
}

impl<A: NoteApi, B: BlobStore> NoteListController<A, B> {
    pub fn new(api: A, blobs: B, delete_mode: DeleteMode) -> Self {
        Self {
            api,
            blobs,
            delete_mode,
            notes: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Snapshot of the current list.
    pub async fn notes(&self) -> Vec<Note> {
        self.notes.read().await.clone()
    }

    pub async fn find(&self, id: &NoteId) -> Option<Note> {
        self.notes
            .read()
            .await
            .iter()
            .find(|n| n.id.as_ref() == Some(id))
            .cloned()
    }

    /// Replace the local list with the backend's, resolving every stored image key to a
    /// retrieval URL.
    ///
    /// Resolutions run concurrently. If any of them fails the whole fetch fails and the local list
    /// is left as it was.
    pub async fn fetch_all(&self) -> Result<()> {
        let notes = self.api.list_notes().await.map_err(Into::<Error>::into)?;
        let notes = try_join_all(notes.into_iter().map(|note| self.resolve_image(note))).await?;

        tracing::debug!(count = notes.len(), "fetched notes");
        *self.notes.write().await = notes;
        Ok(())
    }

    async fn resolve_image(&self, mut note: Note) -> Result<Note> {
        if let Some(NoteImage::Stored(_)) = note.image {
            let url = self
                .blobs
                .get_url(note.blob_key())
                .await
                .map_err(Into::<Error>::into)?;
            note.image = Some(NoteImage::Resolved(url));
        }
        Ok(note)
    }

    /// Upload the attachment (if any), create the note record and then resynchronize the list.
    ///
    /// The upload completes before the record is created so that a listed note never refers to
    /// an image that cannot be resolved yet.
    pub async fn create(&self, input: NoteInput) -> Result<Note> {
        if let Some(attachment) = input.attachment() {
            tracing::debug!(
                key = input.name(),
                file_name = %attachment.file_name,
                bytes = attachment.data.len(),
                "uploading attachment"
            );
            self.blobs
                .put(input.name(), attachment)
                .await
                .map_err(Into::<Error>::into)?;
        }

        let note = self.api.create_note(&input).await.map_err(Into::<Error>::into)?;
        tracing::info!(id = ?note.id, name = %note.name, "created note");

        self.fetch_all().await?;
        Ok(note)
    }

    /// Remove the note from the local list immediately, then remove its blob and finally its
    /// record from the backend.
    ///
    /// The two backend removals are not atomic. What happens to the local list when one of them
    /// fails depends on the controller's [`DeleteMode`]; the error is returned either way.
    pub async fn delete(&self, note: &Note) -> Result<()> {
        let id = note.id.as_ref().ok_or(Error::MissingNoteId)?;

        let removed = {
            let mut notes = self.notes.write().await;
            let position = notes.iter().position(|n| n.id.as_ref() == Some(id));
            notes.retain(|n| n.id.as_ref() != Some(id));
            position
        };

        let result = self.remove_from_backend(note.blob_key(), id).await;

        if let Err(e) = &result {
            tracing::debug!("failed to delete note {id}: {e}");
            if let (DeleteMode::RollbackOnFailure, Some(position)) = (self.delete_mode, removed) {
                self.restore(position, note.clone()).await;
            }
        } else {
            tracing::info!(%id, name = %note.name, "deleted note");
        }

        result
    }

    async fn remove_from_backend(&self, key: &str, id: &NoteId) -> Result<()> {
        self.blobs.remove(key).await.map_err(Into::<Error>::into)?;
        self.api.delete_note(id).await.map_err(Into::<Error>::into)?;
        Ok(())
    }

    async fn restore(&self, position: usize, note: Note) {
        let mut notes = self.notes.write().await;
        // a fetch that completed in the meantime may already have brought it back
        if notes.iter().any(|n| n.id == note.id) {
            return;
        }
        let position = position.min(notes.len());
        notes.insert(position, note);
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use rstest::*;
    use tokio::sync::{Barrier, Notify};

    use super::*;
    use crate::memory::{MemoryBlobStore, MemoryNoteApi};
    use crate::note::Attachment;

    /// Shared log of backend calls in the order they completed.
    #[derive(Clone, Default)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        fn record(&self, event: String) {
            self.0.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    #[derive(Clone)]
    struct ScriptedApi {
        inner: MemoryNoteApi,
        journal: Journal,
        fail_delete: bool,
    }

    #[async_trait]
    impl NoteApi for ScriptedApi {
        type Error = Error;

        async fn list_notes(&self) -> Result<Vec<Note>> {
            self.journal.record(String::from("list"));
            self.inner.list_notes().await
        }

        async fn create_note(&self, input: &NoteInput) -> Result<Note> {
            self.journal.record(format!("create:{}", input.name()));
            self.inner.create_note(input).await
        }

        async fn delete_note(&self, id: &NoteId) -> Result<()> {
            if self.fail_delete {
                return Err(Error::ApiError(String::from("delete rejected")));
            }
            self.journal.record(format!("delete:{id}"));
            self.inner.delete_note(id).await
        }
    }

    #[derive(Clone, Default)]
    struct ScriptedBlobs {
        inner: MemoryBlobStore,
        journal: Journal,
        failing_keys: Arc<Mutex<HashSet<String>>>,
        get_barrier: Option<Arc<Barrier>>,
        remove_gate: Option<(Arc<Notify>, Arc<Notify>)>,
    }

    #[async_trait]
    impl BlobStore for ScriptedBlobs {
        type Error = Error;

        async fn put(&self, key: &str, attachment: &Attachment) -> Result<()> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.inner.put(key, attachment).await?;
            self.journal.record(format!("put:{key}"));
            Ok(())
        }

        async fn get_url(&self, key: &str) -> Result<String> {
            if let Some(barrier) = &self.get_barrier {
                barrier.wait().await;
            }
            if self.failing_keys.lock().unwrap().contains(key) {
                return Err(Error::StorageError(format!("cannot sign {key}")));
            }
            self.journal.record(format!("get:{key}"));
            self.inner.get_url(key).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            if let Some((entered, release)) = &self.remove_gate {
                entered.notify_one();
                release.notified().await;
            }
            self.inner.remove(key).await?;
            self.journal.record(format!("remove:{key}"));
            Ok(())
        }
    }

    type Controller = NoteListController<ScriptedApi, ScriptedBlobs>;

    fn attachment(file_name: &str) -> Attachment {
        Attachment {
            file_name: file_name.to_string(),
            content_type: Some(String::from("image/png")),
            data: Bytes::from_static(b"\x89PNG\r\n"),
        }
    }

    fn input(name: &str, file_name: Option<&str>) -> NoteInput {
        NoteInput::new(name, format!("about {name}"), file_name.map(attachment))
            .expect("valid input")
    }

    fn controller(api: ScriptedApi, blobs: ScriptedBlobs, mode: DeleteMode) -> Controller {
        NoteListController::new(api, blobs, mode)
    }

    fn api(journal: &Journal) -> ScriptedApi {
        ScriptedApi {
            inner: MemoryNoteApi::new(),
            journal: journal.clone(),
            fail_delete: false,
        }
    }

    fn blobs(journal: &Journal) -> ScriptedBlobs {
        ScriptedBlobs {
            inner: MemoryBlobStore::new("https://blobs.test/"),
            journal: journal.clone(),
            ..Default::default()
        }
    }

    /// Seed the backend directly, bypassing the controller.
    async fn seed(api: &ScriptedApi, blobs: &ScriptedBlobs, name: &str, with_image: bool) {
        let file_name = format!("{name}.png");
        let input = input(name, with_image.then_some(file_name.as_str()));
        if let Some(a) = input.attachment() {
            blobs.inner.put(name, a).await.unwrap();
        }
        api.inner.create_note(&input).await.unwrap();
    }

    #[tokio::test]
    async fn fetch_all_replaces_list_and_resolves_images() {
        let journal = Journal::default();
        let (api, blobs) = (api(&journal), blobs(&journal));
        seed(&api, &blobs, "groceries", true).await;
        seed(&api, &blobs, "chores", false).await;
        let c = controller(api.clone(), blobs, DeleteMode::Optimistic);

        c.fetch_all().await.unwrap();

        let notes = c.notes().await;
        assert_eq!(notes.len(), api.inner.len().await);
        assert_eq!(
            notes[0].image,
            Some(NoteImage::Resolved(String::from("https://blobs.test/groceries")))
        );
        assert_eq!(notes[1].image, None);
        assert!(notes
            .iter()
            .filter_map(|n| n.image.as_ref())
            .all(|i| i.url().is_some_and(|u| !u.is_empty())));
    }

    #[tokio::test]
    async fn fetch_all_resolves_images_concurrently() {
        let journal = Journal::default();
        let api = api(&journal);
        let mut blobs = blobs(&journal);
        for name in ["one", "two", "three"] {
            seed(&api, &blobs, name, true).await;
        }
        // each resolution only completes once all three are in flight
        blobs.get_barrier = Some(Arc::new(Barrier::new(3)));
        let c = controller(api, blobs, DeleteMode::Optimistic);

        tokio::time::timeout(Duration::from_secs(5), c.fetch_all())
            .await
            .expect("resolutions were not issued concurrently")
            .unwrap();

        let notes = c.notes().await;
        assert_eq!(notes.len(), 3);
        assert!(notes
            .iter()
            .all(|n| matches!(n.image, Some(NoteImage::Resolved(_)))));
    }

    #[tokio::test]
    async fn failed_resolution_leaves_list_untouched() {
        let journal = Journal::default();
        let (api, blobs) = (api(&journal), blobs(&journal));
        seed(&api, &blobs, "one", true).await;
        let c = controller(api.clone(), blobs.clone(), DeleteMode::Optimistic);
        c.fetch_all().await.unwrap();
        let before = c.notes().await;

        seed(&api, &blobs, "two", true).await;
        seed(&api, &blobs, "three", true).await;
        blobs
            .failing_keys
            .lock()
            .unwrap()
            .insert(String::from("two"));

        match c.fetch_all().await {
            Err(Error::StorageError(_)) => {}
            other => panic!("expected storage error, got {other:?}"),
        }
        assert_eq!(c.notes().await, before);
    }

    #[tokio::test]
    async fn fetch_all_restores_unconfirmed_deletion() {
        let journal = Journal::default();
        let (mut api, blobs) = (api(&journal), blobs(&journal));
        seed(&api, &blobs, "groceries", false).await;
        api.fail_delete = true;
        let c = controller(api, blobs, DeleteMode::Optimistic);
        c.fetch_all().await.unwrap();

        let note = c.notes().await.remove(0);
        assert!(c.delete(&note).await.is_err());
        assert!(c.notes().await.is_empty());

        c.fetch_all().await.unwrap();
        assert_eq!(c.notes().await.len(), 1);
    }

    #[tokio::test]
    async fn create_uploads_before_creating_record() {
        let journal = Journal::default();
        let (api, blobs) = (api(&journal), blobs(&journal));
        let c = controller(api, blobs, DeleteMode::Optimistic);

        c.create(input("photo.png", Some("photo.png"))).await.unwrap();

        assert_eq!(
            journal.events(),
            vec!["put:photo.png", "create:photo.png", "list", "get:photo.png"]
        );
    }

    #[tokio::test]
    async fn create_without_attachment_skips_upload() {
        let journal = Journal::default();
        let (api, blobs) = (api(&journal), blobs(&journal));
        let c = controller(api, blobs.clone(), DeleteMode::Optimistic);

        let note = c.create(input("groceries", None)).await.unwrap();

        assert_eq!(note.image, None);
        assert!(!blobs.inner.contains("groceries").await);
        assert_eq!(journal.events(), vec!["create:groceries", "list"]);
    }

    #[tokio::test]
    async fn created_note_appears_exactly_once() {
        let journal = Journal::default();
        let (api, blobs) = (api(&journal), blobs(&journal));
        seed(&api, &blobs, "chores", false).await;
        let c = controller(api, blobs, DeleteMode::Optimistic);
        c.fetch_all().await.unwrap();

        let created = c.create(input("groceries", Some("list.png"))).await.unwrap();

        let notes = c.notes().await;
        let matching: Vec<_> = notes.iter().filter(|n| n.name == "groceries").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id, created.id);
        assert_eq!(created.image, Some(NoteImage::Stored(String::from("list.png"))));
        assert_eq!(
            matching[0].image,
            Some(NoteImage::Resolved(String::from("https://blobs.test/groceries")))
        );
    }

    #[tokio::test]
    async fn delete_removes_blob_then_record() {
        let journal = Journal::default();
        let (api, blobs) = (api(&journal), blobs(&journal));
        seed(&api, &blobs, "groceries", true).await;
        let c = controller(api.clone(), blobs.clone(), DeleteMode::Optimistic);
        c.fetch_all().await.unwrap();
        let note = c.notes().await.remove(0);
        let id = note.id.clone().unwrap();

        c.delete(&note).await.unwrap();

        assert!(c.notes().await.is_empty());
        assert!(api.inner.is_empty().await);
        assert!(!blobs.inner.contains("groceries").await);
        let events = journal.events();
        assert_eq!(
            &events[events.len() - 2..],
            &[String::from("remove:groceries"), format!("delete:{id}")]
        );
    }

    #[tokio::test]
    async fn delete_is_visible_before_backend_completes() {
        let journal = Journal::default();
        let api = api(&journal);
        let mut blobs = blobs(&journal);
        seed(&api, &blobs, "groceries", false).await;
        seed(&api, &blobs, "chores", false).await;
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        blobs.remove_gate = Some((entered.clone(), release.clone()));
        let c = controller(api, blobs, DeleteMode::Optimistic);
        c.fetch_all().await.unwrap();
        let note = c.notes().await.remove(0);

        let pending = tokio::spawn({
            let c = c.clone();
            let note = note.clone();
            async move { c.delete(&note).await }
        });
        entered.notified().await;

        let names: Vec<_> = c.notes().await.into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["chores"]);

        release.notify_one();
        pending.await.unwrap().unwrap();
        assert_eq!(c.notes().await.len(), 1);
    }

    #[rstest]
    #[case::optimistic(DeleteMode::Optimistic, vec!["chores"])]
    #[case::rollback(DeleteMode::RollbackOnFailure, vec!["groceries", "chores"])]
    #[tokio::test]
    async fn failed_delete_per_mode(#[case] mode: DeleteMode, #[case] expected: Vec<&str>) {
        let journal = Journal::default();
        let (mut api, blobs) = (api(&journal), blobs(&journal));
        seed(&api, &blobs, "groceries", true).await;
        seed(&api, &blobs, "chores", false).await;
        api.fail_delete = true;
        let c = controller(api, blobs.clone(), mode);
        c.fetch_all().await.unwrap();
        let note = c.notes().await.remove(0);

        match c.delete(&note).await {
            Err(Error::ApiError(_)) => {}
            other => panic!("expected api error, got {other:?}"),
        }

        let names: Vec<_> = c.notes().await.into_iter().map(|n| n.name).collect();
        assert_eq!(names, expected);
        // the blob removal already happened and is not undone
        assert!(!blobs.inner.contains("groceries").await);
    }

    #[tokio::test]
    async fn delete_requires_id() {
        let journal = Journal::default();
        let c = controller(api(&journal), blobs(&journal), DeleteMode::Optimistic);
        let note = Note {
            id: None,
            name: String::from("draft"),
            description: String::from("never saved"),
            image: None,
        };

        match c.delete(&note).await {
            Err(Error::MissingNoteId) => {}
            other => panic!("expected MissingNoteId, got {other:?}"),
        }
        assert!(journal.events().is_empty());
    }
}
