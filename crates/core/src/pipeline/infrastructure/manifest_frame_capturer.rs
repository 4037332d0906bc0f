use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::frame_capturer::FrameCapturer;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to write capture manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode capture entry: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedFrame {
    pub index: usize,
    pub timestamp_ms: u64,
}

/// Records which frames were captured, optionally appending each entry to
/// a JSON Lines manifest as it happens.
pub struct ManifestFrameCapturer {
    frames: Vec<CapturedFrame>,
    manifest: Option<(PathBuf, BufWriter<File>)>,
}

impl ManifestFrameCapturer {
    pub fn in_memory() -> Self {
        Self {
            frames: Vec::new(),
            manifest: None,
        }
    }

    /// Creates (or truncates) the manifest file at `path`.
    pub fn create(path: &Path) -> Result<Self, CaptureError> {
        let file = File::create(path).map_err(|source| CaptureError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            frames: Vec::new(),
            manifest: Some((path.to_path_buf(), BufWriter::new(file))),
        })
    }

    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    fn append(&mut self, entry: &CapturedFrame) -> Result<(), CaptureError> {
        let Some((path, writer)) = self.manifest.as_mut() else {
            return Ok(());
        };
        serde_json::to_writer(&mut *writer, entry).map_err(CaptureError::Encode)?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|source| CaptureError::Write {
                path: path.clone(),
                source,
            })
    }
}

impl FrameCapturer for ManifestFrameCapturer {
    fn capture(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let entry = CapturedFrame {
            index: frame.index(),
            timestamp_ms: frame.timestamp_ms(),
        };
        self.append(&entry)?;
        self.frames.push(entry);
        Ok(())
    }

    fn captured(&self) -> usize {
        self.frames.len()
    }
}
