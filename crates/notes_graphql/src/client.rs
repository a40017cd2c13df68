use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use notes_core::{Note, NoteApi, NoteId, NoteInput};

use crate::errors::{Error, Result};
use crate::operations::{
    decode, CreateNoteData, CreateNoteInput, DeleteNoteData, DeleteNoteInput, GraphQLRequest,
    InputVariables, ListNotesData, NoVariables, CREATE_NOTE, DELETE_NOTE, LIST_NOTES,
};

#[derive(Clone)]
pub struct GraphQLClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GraphQLClient {
    pub fn new(endpoint: String, api_key: Option<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint,
            api_key,
            client,
        }
    }

    /// Run `query` and decode its `data`; `field` names the response field used to report a
    /// missing payload.
    async fn execute<V, T>(
        &self,
        operation_name: &'static str,
        field: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<T>
    where
        V: Serialize + Send,
        T: for<'de> Deserialize<'de>,
    {
        let request = GraphQLRequest {
            query,
            operation_name,
            variables,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("x-api-key", api_key);
        }

        tracing::debug!(operation = operation_name, "sending graphql request");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        decode(&body, field)
    }
}

#[async_trait]
impl NoteApi for GraphQLClient {
    type Error = Error;

    async fn list_notes(&self) -> Result<Vec<Note>> {
        let data: ListNotesData = self
            .execute("ListNotes", "listNotes", LIST_NOTES, NoVariables {})
            .await?;
        let connection = data.list_notes.ok_or(Error::MissingData("listNotes"))?;
        Ok(connection
            .items
            .into_iter()
            .flatten()
            .map(Note::from)
            .collect())
    }

    async fn create_note(&self, input: &NoteInput) -> Result<Note> {
        let variables = InputVariables {
            input: CreateNoteInput {
                name: input.name(),
                description: input.description(),
                image: input.image_name(),
            },
        };
        let data: CreateNoteData = self
            .execute("CreateNote", "createNote", CREATE_NOTE, variables)
            .await?;
        let record = data.create_note.ok_or(Error::MissingData("createNote"))?;
        Ok(record.into())
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let variables = InputVariables {
            input: DeleteNoteInput { id: id.as_str() },
        };
        let data: DeleteNoteData = self
            .execute("DeleteNote", "deleteNote", DELETE_NOTE, variables)
            .await?;
        data.delete_note.ok_or(Error::MissingData("deleteNote"))?;
        Ok(())
    }
}
