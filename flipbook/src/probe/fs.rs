use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::discovery::AssetProbe;
use crate::page::{Candidate, Extension};

/// Probes a book directory on disk.
///
/// A candidate counts as present only if it actually loads: images must have
/// a decodable header, videos must start with an ISO-BMFF `ftyp` box.
#[derive(Debug, Clone)]
pub struct FsProbe {
    root: PathBuf,
}

impl FsProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetProbe for FsProbe {
    async fn exists(&self, candidate: &Candidate) -> bool {
        let path = self.root.join(&candidate.path);
        let extension = candidate.extension;
        let loaded = tokio::task::spawn_blocking(move || loads(&path, extension))
            .await
            .unwrap_or(false);
        tracing::trace!(path = %candidate.path, loaded, "probed file");
        loaded
    }
}

fn loads(path: &Path, extension: Extension) -> bool {
    if extension.is_video() {
        has_ftyp_box(path)
    } else {
        image::ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map(|reader| reader.into_dimensions().is_ok())
            .unwrap_or(false)
    }
}

fn has_ftyp_box(path: &Path) -> bool {
    let mut header = [0u8; 8];
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    if file.read_exact(&mut header).is_err() {
        return false;
    }
    let size = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    // size 1 means a 64-bit size follows the type.
    (size == 1 || size >= 8) && &header[4..8] == b"ftyp"
}
