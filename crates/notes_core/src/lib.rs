//! # Notes Core
//!
//! `notes_core` keeps a client-visible list of notes in sync with two external collaborators: a
//! graph API that stores note records and a blob store that holds image attachments. Both
//! collaborators are abstracted behind the [`NoteApi`] and [`BlobStore`] traits so that the
//! [`NoteListController`] can be driven by any backend implementation, e.g. the GraphQL client in
//! `notes_graphql` and the S3 client in `notes_objectstore`.

mod controller;
pub use controller::{DeleteMode, NoteListController};

pub mod errors;
pub use errors::{Error, Result};

pub mod memory;

mod note;
pub use note::{capitalize_first, Attachment, Note, NoteId, NoteImage, NoteInput};

mod traits;
pub use traits::{BlobStore, NoteApi};
