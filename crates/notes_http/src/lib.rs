//! # Notes HTTP
//!
//! `notes_http` serves the single notes page: a creation form, the grid of current notes and a
//! sign-out control. It is generic over the [`NoteApi`] and [`BlobStore`] traits defined in
//! [`notes_core`] and renders whatever the shared [`NoteListController`] currently holds.
//!
//! ## Example `main.rs`
//!
//! ```rust,ignore
//! use notes_core::memory::{MemoryBlobStore, MemoryNoteApi};
//! use notes_core::{DeleteMode, NoteListController};
//! use notes_http::NotesApp;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let controller = NoteListController::new(
//!         MemoryNoteApi::new(),
//!         MemoryBlobStore::default(),
//!         DeleteMode::Optimistic,
//!     );
//!     controller.fetch_all().await?;
//!
//!     let app = NotesApp::new(controller, "/".to_string())?;
//!
//!     axum::Server::bind(&"0.0.0.0:13030".parse()?)
//!         .serve(app.router(10 * 1024 * 1024)?.into_make_service())
//!         .await?;
//!     Ok(())
//! }
//! ```
use axum::extract::DefaultBodyLimit;
use axum::http::header::{self, HeaderValue};
use axum::routing::get;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{self, TraceLayer};

mod errors;
pub use errors::{Error, Result};

mod notes;
mod page;

use notes_core::{BlobStore, NoteApi, NoteListController};

/// Shared state of the notes page handlers.
#[derive(Clone)]
pub struct NotesApp<A: NoteApi, B: BlobStore> {
    controller: NoteListController<A, B>,
    sign_out_url: String,
}

impl<A: NoteApi, B: BlobStore> NotesApp<A, B> {
    pub fn new(controller: NoteListController<A, B>, sign_out_url: String) -> Result<Self> {
        // rejected up front so that the sign-out redirect cannot fail later
        HeaderValue::from_str(&sign_out_url)?;
        Ok(Self {
            controller,
            sign_out_url,
        })
    }

    pub fn controller(&self) -> &NoteListController<A, B> {
        &self.controller
    }

    /// Return an [`axum::Router`] serving the notes page, accepting request bodies of up to
    /// `max_upload_bytes`.
    pub fn router(&self, max_upload_bytes: usize) -> Result<Router> {
        let app = Router::new()
            .route("/healthz", get(healthz))
            .merge(notes::router::<A, B>())
            .with_state(self.clone())
            .layer(DefaultBodyLimit::max(max_upload_bytes))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace::DefaultMakeSpan::new())
                    .on_response(trace::DefaultOnResponse::new())
                    .on_request(trace::DefaultOnRequest::new()),
            )
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CACHE_CONTROL,
                HeaderValue::from_str("no-store")?,
            ));

        Ok(app)
    }
}

async fn healthz() -> &'static str {
    "ok"
}
