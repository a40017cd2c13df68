use axum::extract::{Multipart, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;

use notes_core::{Attachment, BlobStore, Error as CoreError, NoteApi, NoteId, NoteInput};

use super::errors::Result;
use super::page;
use super::NotesApp;

pub fn router<A: NoteApi, B: BlobStore>() -> Router<NotesApp<A, B>> {
    Router::new()
        .route("/", get(index::<A, B>))
        .route("/notes", post(create_note::<A, B>))
        .route("/notes/:id/delete", post(delete_note::<A, B>))
        .route("/signout", post(sign_out::<A, B>))
}

/// Each page load resynchronizes the list with the backend before rendering it.
async fn index<A: NoteApi, B: BlobStore>(
    State(app): State<NotesApp<A, B>>,
) -> Result<Html<String>> {
    app.controller.fetch_all().await?;
    Ok(Html(page::render(&app.controller.notes().await)))
}

async fn create_note<A: NoteApi, B: BlobStore>(
    State(app): State<NotesApp<A, B>>,
    multipart: Multipart,
) -> Result<Response> {
    let input = read_note_form(multipart).await?;
    app.controller.create(input).await?;
    Ok(Redirect::to("/").into_response())
}

/// Collect the recognized form fields. Unknown fields are ignored; a file part without a file
/// name or content means no file was picked.
async fn read_note_form(mut multipart: Multipart) -> Result<NoteInput> {
    let mut name = String::new();
    let mut description = String::new();
    let mut attachment = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => name = field.text().await?,
            Some("description") => description = field.text().await?,
            Some("image") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                attachment = match file_name {
                    Some(file_name) if !file_name.is_empty() && !data.is_empty() => {
                        Some(Attachment {
                            file_name,
                            content_type,
                            data,
                        })
                    }
                    _ => None,
                };
            }
            other => tracing::debug!("ignoring form field {other:?}"),
        }
    }

    Ok(NoteInput::new(name, description, attachment)?)
}

async fn delete_note<A: NoteApi, B: BlobStore>(
    State(app): State<NotesApp<A, B>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = NoteId::new(id);
    let note = app
        .controller
        .find(&id)
        .await
        .ok_or_else(|| CoreError::NoteNotFound(id.to_string()))?;
    app.controller.delete(&note).await?;
    Ok(Redirect::to("/").into_response())
}

async fn sign_out<A: NoteApi, B: BlobStore>(State(app): State<NotesApp<A, B>>) -> Response {
    tracing::info!("signing out");
    Redirect::to(&app.sign_out_url).into_response()
}
