use std::path::PathBuf;

/// All errors produced by the flipbook viewer.
#[derive(Debug, thiserror::Error)]
pub enum FlipbookError {
    /// Discovery found no asset for page 1.
    #[error("no page files found in {dir}/")]
    NoPages { dir: String },

    /// Configuration failed to parse or validate.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Filesystem access failed.
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required host element is missing or has the wrong type.
    #[error("host page: {0}")]
    Dom(String),

    /// The media element refused to start playback.
    #[error("playback rejected: {0}")]
    Playback(String),

    /// An HTTP client could not be built or a request could not be formed.
    #[error("http: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, FlipbookError>;

/// Shorthand constructors.
impl FlipbookError {
    pub fn no_pages(dir: &str) -> Self {
        Self::NoPages {
            dir: dir.to_string(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn dom(msg: impl Into<String>) -> Self {
        Self::Dom(msg.into())
    }

    /// Whether startup should leave the loader up and stop.
    pub fn is_discovery_empty(&self) -> bool {
        matches!(self, Self::NoPages { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pages_mentions_directory() {
        let err = FlipbookError::no_pages("assets");
        assert_eq!(err.to_string(), "no page files found in assets/");
        assert!(err.is_discovery_empty());
    }

    #[test]
    fn io_error_keeps_source() {
        let err = FlipbookError::io(
            "book/flipbook.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("book/flipbook.toml"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_discovery_empty());
    }
}
