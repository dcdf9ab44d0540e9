//! spin360 desktop preview
//!
//! Opens a window spinning through a folder of pre-captured frames, using
//! the same configuration file a page embedding the viewer would use.
//!
//! ```text
//! spin360 [CONFIG] [--folder DIR] [--amount N] [--fullscreen]
//! ```

mod adapter;
mod app;
mod loader;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use spin360_core::{ViewerConfig, config};

#[derive(Parser, Debug)]
#[command(name = "spin360", about = "Preview a 360° product spin", version)]
struct Cli {
    /// Viewer config file (defaults to the user config directory)
    config: Option<PathBuf>,

    /// Folder holding the frame images, overriding the config
    #[arg(long)]
    folder: Option<String>,

    /// Frame count, overriding the config
    #[arg(long)]
    amount: Option<u32>,

    /// Start with autoplay on
    #[arg(long)]
    autoplay: bool,

    /// Open the window full screen
    #[arg(short, long)]
    fullscreen: bool,
}

impl Cli {
    fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut viewer_config = match &self.config {
            Some(path) => config::load(path)?,
            None => config::load_default(),
        };

        if let Some(folder) = &self.folder {
            viewer_config.source.folder = folder.clone();
        }
        if let Some(amount) = self.amount {
            viewer_config.grid.amount = Some(amount);
            viewer_config.grid.cols = None;
        }
        if self.autoplay {
            viewer_config.autoplay.enabled = true;
        }
        Ok(viewer_config)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let viewer_config = cli.viewer_config()?;
    tracing::info!(
        "Loading frames from '{}{}'",
        viewer_config.source.folder,
        viewer_config.source.filename
    );

    app::run(viewer_config, cli.fullscreen)?;
    Ok(())
}
