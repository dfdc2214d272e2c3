use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yt-transcript-service",
    about = "HTTP service returning YouTube transcripts",
    version
)]
pub struct Cli {
    /// Config file (default: ~/.config/yt-transcript-service/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8000
    #[arg(long)]
    pub listen: Option<String>,

    /// Default preferred caption languages, in priority order
    #[arg(short, long, value_delimiter = ',')]
    pub lang: Vec<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
