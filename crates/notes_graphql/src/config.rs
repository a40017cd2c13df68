use serde::Deserialize;

use crate::client::GraphQLClient;
use crate::errors::Result;

#[derive(Clone, Deserialize)]
pub struct GraphQLConfig {
    /// Full URL of the GraphQL endpoint, e.g. `https://<id>.appsync-api.<region>.amazonaws.com/graphql`.
    pub endpoint: String,
    /// Sent as the `x-api-key` header when present.
    pub api_key: Option<String>,
}

impl GraphQLConfig {
    pub fn new_client(&self) -> Result<GraphQLClient> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("notes/", env!("CARGO_PKG_VERSION")))
            .build()?;
        tracing::info!(endpoint = %self.endpoint, "initialized graphql client");
        Ok(GraphQLClient::new(
            self.endpoint.clone(),
            self.api_key.clone(),
            client,
        ))
    }
}
