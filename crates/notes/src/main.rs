use std::fs::File;
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use notes_core::memory::{MemoryBlobStore, MemoryNoteApi};
use notes_core::{BlobStore, NoteApi, NoteListController};
use notes_http::NotesApp;

mod config;
use crate::config::{Config, NotesBackend};

#[derive(Parser)]
struct Cli {
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .compact()
        .init();

    // load configuration
    let mut dev_config = File::open(cli.config_file.unwrap_or("./dev-config.yml".into()))?;
    let mut s = String::new();
    dev_config.read_to_string(&mut s)?;
    let config: Config = serde_yaml::from_str(&s)?;

    // initialize backend clients
    match config.backend.clone() {
        NotesBackend::GraphQLS3 { api, objects } => {
            let api = api.new_client()?;
            let objects = objects.new_objects().await?;
            serve(&config, api, objects).await
        }
        NotesBackend::Memory => {
            tracing::warn!("using in-memory backend, notes will not persist");
            serve(&config, MemoryNoteApi::new(), MemoryBlobStore::default()).await
        }
    }
}

async fn serve<A: NoteApi, B: BlobStore>(config: &Config, api: A, blobs: B) -> Result<()> {
    let controller = NoteListController::new(api, blobs, config.delete_mode);
    controller.fetch_all().await?;

    let app = NotesApp::new(controller, config.sign_out_url.clone())?;
    let router = app.router(config.max_upload_bytes)?;

    // run HTTP server
    let addr: SocketAddr = config.listen_address.parse()?;
    tracing::info!("listening on {addr}");
    axum::Server::bind(&addr)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}
