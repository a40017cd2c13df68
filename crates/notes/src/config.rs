use serde::Deserialize;

use notes_core::DeleteMode;
use notes_graphql::GraphQLConfig;

#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    /// Where the sign-out control sends the browser.
    #[serde(default = "default_sign_out_url")]
    pub sign_out_url: String,
    #[serde(default)]
    pub delete_mode: DeleteMode,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    pub backend: NotesBackend,
}

#[derive(Clone, Deserialize)]
#[serde(tag = "type")]
pub enum NotesBackend {
    GraphQLS3 {
        api: GraphQLConfig,
        objects: notes_objectstore::Config,
    },
    /// Keep everything in process memory; nothing survives a restart.
    Memory,
}

fn default_listen_address() -> String {
    String::from("0.0.0.0:13030")
}

fn default_sign_out_url() -> String {
    String::from("/")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
