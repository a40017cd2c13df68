//! GraphQL-over-HTTP implementation of [`notes_core::NoteApi`].
//!
//! Speaks the `listNotes` query and the `createNote`/`deleteNote` mutations of a generated
//! GraphQL model API (as served by e.g. AWS AppSync), authenticating with an optional API key.
mod client;
pub use client::GraphQLClient;

mod config;
pub use config::GraphQLConfig;

mod errors;
pub use errors::{Error, Result};

pub(crate) mod operations;
