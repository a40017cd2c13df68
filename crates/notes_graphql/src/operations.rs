//! Request documents and response shapes of the note model API.
use serde::{Deserialize, Serialize};

use notes_core::{Note, NoteId, NoteImage};

use crate::errors::{Error, Result};

pub(crate) const LIST_NOTES: &str = r#"query ListNotes {
  listNotes {
    items {
      id
      name
      description
      image
    }
  }
}"#;

pub(crate) const CREATE_NOTE: &str = r#"mutation CreateNote($input: CreateNoteInput!) {
  createNote(input: $input) {
    id
    name
    description
    image
  }
}"#;

pub(crate) const DELETE_NOTE: &str = r#"mutation DeleteNote($input: DeleteNoteInput!) {
  deleteNote(input: $input) {
    id
  }
}"#;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphQLRequest<V: Serialize> {
    pub query: &'static str,
    pub operation_name: &'static str,
    pub variables: V,
}

#[derive(Debug, Serialize)]
pub(crate) struct NoVariables {}

#[derive(Debug, Serialize)]
pub(crate) struct InputVariables<T: Serialize> {
    pub input: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateNoteInput<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteNoteInput<'a> {
    pub id: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteRecord {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl From<NoteRecord> for Note {
    fn from(r: NoteRecord) -> Note {
        Note {
            id: Some(NoteId::new(r.id)),
            name: r.name,
            description: r.description.unwrap_or_default(),
            image: r.image.filter(|i| !i.is_empty()).map(NoteImage::Stored),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListNotesData {
    pub list_notes: Option<NoteConnection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteConnection {
    // the model API reports deleted-but-not-yet-compacted entries as nulls
    #[serde(default)]
    pub items: Vec<Option<NoteRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateNoteData {
    pub create_note: Option<NoteRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteNoteData {
    pub delete_note: Option<DeletedNote>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeletedNote {
    #[allow(dead_code)]
    pub id: String,
}

/// Decode a GraphQL response envelope, failing on any reported error or missing `data`.
pub(crate) fn decode<T: for<'de> Deserialize<'de>>(
    body: &str,
    operation: &'static str,
) -> Result<T> {
    let response: GraphQLResponse<T> = serde_json::from_str(body)?;
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(Error::GraphQLErrors(messages.join("; ")));
    }
    response.data.ok_or(Error::MissingData(operation))
}
