//! Background frame decoding
//!
//! Frame sources are decoded on the rayon pool and handed back to the UI
//! thread over a channel, which drains it once per repaint.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use eframe::egui;
use rayon::prelude::*;
use thiserror::Error;

use spin360_core::pool::source::is_absolute_url;
use spin360_core::{FrameRequest, LoadOutcome};
use spin360_shared::{FrameId, ViewerId};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Remote frame sources are not supported: {0}")]
    Remote(String),
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Decoded RGBA pixels of one frame.
pub struct DecodedFrame {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Result of one frame request.
pub struct LoadedFrame {
    pub viewer: ViewerId,
    pub frame: FrameId,
    pub result: Result<DecodedFrame, LoadError>,
}

impl LoadedFrame {
    pub fn outcome(&self) -> LoadOutcome {
        match self.result {
            Ok(_) => LoadOutcome::Loaded,
            Err(_) => LoadOutcome::Failed,
        }
    }
}

/// Local path of a frame source. `file://` prefixes are stripped.
pub fn local_path(source: &str) -> Result<PathBuf, LoadError> {
    if is_absolute_url(source) || source.starts_with("//") {
        return Err(LoadError::Remote(source.to_string()));
    }
    let path = source.strip_prefix("file://").unwrap_or(source);
    Ok(PathBuf::from(path))
}

pub fn decode(source: &str) -> Result<DecodedFrame, LoadError> {
    let path = local_path(source)?;
    let image = image::open(&path).map_err(|source| LoadError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    let rgba = image.to_rgba8();
    Ok(DecodedFrame {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}

pub struct FrameLoader {
    tx: Sender<LoadedFrame>,
    rx: Receiver<LoadedFrame>,
    /// Woken whenever a frame arrives
    repaint: Option<egui::Context>,
}

impl Default for FrameLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            repaint: None,
        }
    }

    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    /// Decode `requests` for `viewer` in the background.
    pub fn request(&self, viewer: ViewerId, requests: Vec<FrameRequest>) {
        if requests.is_empty() {
            return;
        }
        tracing::debug!("Decoding {} frames for {}", requests.len(), viewer);

        let tx = self.tx.clone();
        let repaint = self.repaint.clone();
        rayon::spawn(move || {
            requests.into_par_iter().for_each_with(tx, |tx, request| {
                let result = decode(&request.source);
                if let Err(e) = &result {
                    tracing::warn!("Frame {} of {}: {}", request.id, viewer, e);
                }
                let loaded = LoadedFrame {
                    viewer,
                    frame: request.id,
                    result,
                };
                // Send fails only once the UI side is gone
                if tx.send(loaded).is_ok()
                    && let Some(ctx) = &repaint
                {
                    ctx.request_repaint();
                }
            });
        });
    }

    /// Frames finished since the last call.
    pub fn poll(&self) -> Vec<LoadedFrame> {
        let mut finished = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(loaded) => finished.push(loaded),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        finished
    }

    #[cfg(test)]
    fn wait(&self, timeout: std::time::Duration) -> Option<LoadedFrame> {
        self.rx.recv_timeout(timeout).ok()
    }
}
