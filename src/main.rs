use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use eyre::{Result, WrapErr};
use log::{info, warn};

use yt_transcript_service::config::{self, Config};
use yt_transcript_service::parse_languages;
use yt_transcript_service::server::{self, AppState, SERVICE_NAME};
use yt_transcript_service::youtube::YoutubeProvider;

mod cli;

use cli::Cli;

fn setup_logging(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    if let Some(path) = log_file {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(path)?);
        builder.target(env_logger::Target::Pipe(target));
    }

    builder.init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => Config::load_from(path),
        // Default location is optional; a broken file there should not stop the service
        None => Ok(Config::load().unwrap_or_else(|e| {
            eprintln!("Ignoring config {}: {e:#}", config::config_path().display());
            Config::default()
        })),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {e}");
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // CLI flags take priority over the config file
    let log_file = cli.log_file.as_deref().or(config.log_file.as_deref());
    setup_logging(log_file, cli.verbose)?;

    let listen_addr = cli.listen.clone().unwrap_or_else(|| config.listen_addr().to_string());
    let cli_languages = parse_languages(&cli.lang.join(","));
    let default_languages = if cli_languages.is_empty() {
        config.default_languages()
    } else {
        cli_languages
    };

    let mut provider = YoutubeProvider::new(reqwest::Client::new());
    if let Some(ref user_agent) = config.user_agent {
        provider = provider.with_user_agent(user_agent.as_str());
    }

    let state = AppState::new(Arc::new(provider), default_languages.clone());
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .wrap_err_with(|| format!("binding to {listen_addr}"))?;

    info!(
        "{SERVICE_NAME} listening on http://{listen_addr} (default languages: {})",
        default_languages.join(",")
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("running HTTP server")?;

    Ok(())
}
