use reqwest::{Client, Url};

use crate::discovery::AssetProbe;
use crate::error::{FlipbookError, Result};
use crate::page::Candidate;

/// Probes a served book with `HEAD` requests.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    base: Url,
}

impl HttpProbe {
    /// `base` is the URL of the host page's directory; asset paths are
    /// resolved against it.
    pub fn new(base: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| FlipbookError::Http(e.to_string()))?;
        Self::with_client(client, base)
    }

    pub fn with_client(client: Client, base: &str) -> Result<Self> {
        let mut base = Url::parse(base).map_err(|e| FlipbookError::Http(format!("{base}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    pub fn url_for(&self, candidate: &Candidate) -> Option<Url> {
        self.base.join(&candidate.path).ok()
    }
}

impl AssetProbe for HttpProbe {
    async fn exists(&self, candidate: &Candidate) -> bool {
        let Some(url) = self.url_for(candidate) else {
            return false;
        };
        match self.client.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(path = %candidate.path, "HEAD failed: {e}");
                false
            }
        }
    }
}
