use serde::Deserialize;

use super::Result;
use super::S3;

#[derive(Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Config {
    S3(super::s3::S3Config),
}

impl Config {
    pub async fn new_objects(&self) -> Result<S3> {
        match self {
            Self::S3(cfg) => cfg.new_objects().await,
        }
    }
}
