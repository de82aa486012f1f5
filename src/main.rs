use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use cmdcraft::api;
use cmdcraft::paths;
use cmdcraft::project;
use cmdcraft::settings;
use cmdcraft::state::AppState;

#[derive(Parser)]
#[command(name = "cmdcraft", about = "execute command builder HTTP API", version)]
struct Args {
    /// Config directory override
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Bind address (overrides settings)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Bind port (overrides settings; 0 picks a free port)
    #[arg(long)]
    port: Option<u16>,

    /// Start the session from this draft file
    #[arg(long)]
    draft: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let app_config_dir = args.config_dir.unwrap_or_else(paths::default_config_dir);

    let mut loaded_settings = settings::load_with_tracing(&app_config_dir);
    if !paths::settings_path(&app_config_dir).exists() {
        // First run: leave an editable settings file behind.
        match settings::save_settings(&app_config_dir, &loaded_settings) {
            Ok(()) => tracing::info!(dir = %app_config_dir.display(), "wrote default settings"),
            Err(e) => tracing::warn!(error = %e, "could not write default settings"),
        }
    }
    if let Some(host) = args.host {
        loaded_settings.host = host;
    }
    if let Some(port) = args.port {
        loaded_settings.port = port;
    }
    let addr: SocketAddr = loaded_settings.socket_addr();

    let mut state = AppState::new(loaded_settings, app_config_dir);
    if let Some(path) = &args.draft {
        match project::load_draft(path) {
            Ok(draft) => {
                tracing::info!(path = %path.display(), steps = draft.chain.len(), "loaded draft");
                state = state.with_initial_draft(draft);
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to load draft");
                process::exit(1);
            }
        }
    }
    let state = Arc::new(state);

    if let Err(e) = api::start_api_server(state, addr).await {
        tracing::error!(error = %e, "could not start API server");
        process::exit(1);
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
