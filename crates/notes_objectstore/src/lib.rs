//! S3-backed [`notes_core::BlobStore`].
//!
//! Attachments are written with `PutObject`, retrieved by handing out presigned `GetObject` URLs
//! and removed with `DeleteObject`.
mod config;
pub use config::Config;
mod errors;
pub use errors::{Error, Result};
pub(crate) mod s3;
pub use s3::S3Config;
pub use s3::S3;
