use std::time::Duration;

use async_trait::async_trait;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use http::Uri;
use serde::Deserialize;

use notes_core::{Attachment, BlobStore};

pub(crate) mod logging;
use super::errors::{Error, Result};
use super::s3::logging::LoggingInterceptor;

/// S3 rejects keys longer than this many bytes.
const MAX_KEY_BYTES: usize = 1024;

fn default_url_expiry_secs() -> u64 {
    900
}

#[derive(Clone, Deserialize)]
pub struct S3Config {
    secret_key: String,
    access_key: String,
    hostname: String,
    bucket_name: String,
    region: String,
    /// Lifetime of the retrieval URLs handed out by [`BlobStore::get_url`].
    #[serde(default = "default_url_expiry_secs")]
    url_expiry_secs: u64,
}

impl S3Config {
    pub async fn new_objects(&self) -> Result<S3> {
        let scp = SharedCredentialsProvider::new(
            Credentials::new(
                self.access_key.clone(),
                self.secret_key.clone(),
                None,
                None,
                "notes",
            )
            .provide_credentials()
            .await?,
        );

        let uri = Uri::builder()
            .scheme("https")
            .authority(self.hostname.as_str())
            .path_and_query("/")
            .build()?;

        let sdk_config = aws_config::load_from_env().await;

        let config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .region(Region::new(self.region.clone()))
            .credentials_provider(scp)
            .endpoint_url(uri.to_string())
            .interceptor(LoggingInterceptor)
            .build();

        let s3_client = aws_sdk_s3::Client::from_conf(config);

        tracing::info!(bucket = %self.bucket_name, endpoint = %uri, "initialized s3 client");

        Ok(S3 {
            bucket_name: self.bucket_name.clone(),
            client: s3_client,
            url_expiry: Duration::from_secs(self.url_expiry_secs),
        })
    }
}

#[derive(Clone)]
pub struct S3 {
    bucket_name: String,
    client: Client,
    url_expiry: Duration,
}

fn validate_key(key: &str) -> Result<&str> {
    if key.is_empty() || key.len() > MAX_KEY_BYTES {
        return Err(Error::InvalidKey(key.to_string()));
    }
    Ok(key)
}

#[async_trait]
impl BlobStore for S3 {
    type Error = Error;

    async fn put(&self, key: &str, attachment: &Attachment) -> Result<()> {
        let _put_object_output = self
            .client
            .put_object()
            .key(validate_key(key)?)
            .body(ByteStream::from(attachment.data.clone()))
            .content_length(attachment.data.len() as i64)
            .set_content_type(attachment.content_type.clone())
            .bucket(&self.bucket_name)
            .send()
            .await?;
        Ok(())
    }

    async fn get_url(&self, key: &str) -> Result<String> {
        let presigned = self
            .client
            .get_object()
            .key(validate_key(key)?)
            .bucket(&self.bucket_name)
            .presigned(PresigningConfig::expires_in(self.url_expiry)?)
            .await?;

        Ok(presigned.uri().to_string())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .key(validate_key(key)?)
            .bucket(&self.bucket_name)
            .send()
            .await?;
        Ok(())
    }
}
