use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Opaque identifier assigned to a note by the graph API when it is created.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The image attached to a note.
///
/// Records come back from the graph API carrying the persisted key. After
/// [`crate::NoteListController::fetch_all`] enriches them, the key is replaced by a time-limited
/// retrieval URL that is never written back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoteImage {
    Stored(String),
    Resolved(String),
}

impl NoteImage {
    /// Retrieval URL, if this image has been resolved.
    pub fn url(&self) -> Option<&str> {
        match self {
            NoteImage::Resolved(url) => Some(url),
            NoteImage::Stored(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    /// Absent on notes that have not been persisted yet.
    pub id: Option<NoteId>,
    pub name: String,
    pub description: String,
    pub image: Option<NoteImage>,
}

impl Note {
    /// Key under which this note's attachment lives in the blob store.
    pub fn blob_key(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> String {
        capitalize_first(&self.name)
    }
}

/// A binary file submitted alongside a new note.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// The recognized fields of the note creation form.
///
/// Construction fails when either required text field is empty, so a `NoteInput` that exists is
/// always fit to submit.
#[derive(Clone, Debug)]
pub struct NoteInput {
    name: String,
    description: String,
    attachment: Option<Attachment>,
}

impl NoteInput {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        attachment: Option<Attachment>,
    ) -> Result<Self> {
        let name = name.into();
        let description = description.into();
        if name.trim().is_empty() {
            return Err(Error::MissingField("name"));
        }
        if description.trim().is_empty() {
            return Err(Error::MissingField("description"));
        }
        Ok(Self {
            name,
            description,
            attachment,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Value recorded in the note's `image` field: the attachment's file name.
    pub fn image_name(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.file_name.as_str())
    }
}

/// Uppercase the first character of `s`, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
