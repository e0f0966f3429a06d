//! Native asset probes.
//!
//! - `fs`: local-file context: open the asset and decode its header
//! - `http`: served context: `HEAD` request against a base URL

mod fs;
mod http;

pub use fs::FsProbe;
pub use http::HttpProbe;

use crate::discovery::AssetProbe;
use crate::page::Candidate;

/// Either probe, chosen from a command-line source argument.
pub enum SourceProbe {
    Local(FsProbe),
    Served(HttpProbe),
}

impl SourceProbe {
    /// `http://` and `https://` sources are probed over the network;
    /// `file://` URLs and plain paths are local directories.
    pub fn from_source(source: &str) -> crate::error::Result<Self> {
        if source.starts_with("http://") || source.starts_with("https://") {
            Ok(Self::Served(HttpProbe::new(source)?))
        } else {
            Ok(Self::Local(FsProbe::new(local_path(source)?)))
        }
    }
}

/// Directory named by a local source. Only local `file://` URLs are accepted.
pub fn local_path(source: &str) -> crate::error::Result<&str> {
    let Some(rest) = source.strip_prefix("file://") else {
        return Ok(source);
    };
    let path = rest.strip_prefix("localhost").unwrap_or(rest);
    if path.starts_with('/') {
        Ok(path)
    } else {
        Err(crate::error::FlipbookError::config(format!(
            "'{source}' is not a local file URL"
        )))
    }
}

impl AssetProbe for SourceProbe {
    async fn exists(&self, candidate: &Candidate) -> bool {
        match self {
            Self::Local(probe) => probe.exists(candidate).await,
            Self::Served(probe) => probe.exists(candidate).await,
        }
    }
}
