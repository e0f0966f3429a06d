//! Viewer configuration.
//!
//! Every field has a default matching the stock host page, so an empty
//! `flipbook.toml` (or an `undefined` config object in the browser) is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FlipbookError, Result};
use crate::layout::Size;
use crate::page::AssetLayout;

pub const DEFAULT_DOWNLOAD_URL: &str =
    "https://drive.google.com/drive/folders/1RflXkSgh1AHwnBYUk3zVf06pVOywQc4J?usp=drive_link";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FlipbookConfig {
    pub assets: AssetLayout,
    pub book: BookConfig,
    pub turn: TurnOptions,
    pub download: DownloadLink,
    pub dom: DomSelectors,
}

/// Geometry and input thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Nominal page width in CSS pixels.
    pub width: u32,
    /// Nominal page height in CSS pixels.
    pub height: u32,
    /// Minimum horizontal travel, in pixels, for a touch to count as a swipe.
    pub swipe_threshold: f64,
    /// Minimum time the loader stays up, in milliseconds.
    pub loader_delay_ms: u64,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 1280,
            swipe_threshold: 50.0,
            loader_delay_ms: 2000,
        }
    }
}

impl BookConfig {
    pub fn nominal_size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn loader_delay(&self) -> Duration {
        Duration::from_millis(self.loader_delay_ms)
    }
}

/// Options handed to the page-turn widget at init.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TurnOptions {
    pub display: String,
    pub auto_center: bool,
    pub acceleration: bool,
    pub gradients: bool,
    pub elevation: u32,
    pub corners: String,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            display: "single".to_string(),
            auto_center: false,
            acceleration: true,
            gradients: true,
            elevation: 50,
            corners: "tr,br".to_string(),
        }
    }
}

/// Overlay link rendered on the last page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadLink {
    pub href: String,
    pub title: String,
    pub icon: String,
}

impl Default for DownloadLink {
    fn default() -> Self {
        Self {
            href: DEFAULT_DOWNLOAD_URL.to_string(),
            title: "Download Memories".to_string(),
            icon: "assets/icon_download.png".to_string(),
        }
    }
}

/// CSS selectors of the elements the host page must provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomSelectors {
    pub flipbook: String,
    pub loader: String,
    pub viewport: String,
    pub container: String,
    pub previous: String,
    pub next: String,
}

impl Default for DomSelectors {
    fn default() -> Self {
        Self {
            flipbook: "#flipbook".to_string(),
            loader: "#loader".to_string(),
            viewport: ".viewport".to_string(),
            container: ".flipbook-container".to_string(),
            previous: "#prev-btn".to_string(),
            next: "#next-btn".to_string(),
        }
    }
}

impl FlipbookConfig {
    pub fn validate(&self) -> Result<()> {
        if self.book.width == 0 || self.book.height == 0 {
            return Err(FlipbookError::config(format!(
                "nominal size must be positive, got {}x{}",
                self.book.width, self.book.height
            )));
        }
        if !self.book.swipe_threshold.is_finite() || self.book.swipe_threshold < 0.0 {
            return Err(FlipbookError::config(format!(
                "swipe threshold must be a non-negative number, got {}",
                self.book.swipe_threshold
            )));
        }
        if self.assets.prefix.is_empty() {
            return Err(FlipbookError::config("asset prefix must not be empty"));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| FlipbookError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &std::path::Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml(&source),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(FlipbookError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_page() {
        let config = FlipbookConfig::default();
        assert_eq!(config.book.nominal_size(), Size::new(720.0, 1280.0));
        assert_eq!(config.book.swipe_threshold, 50.0);
        assert_eq!(config.book.loader_delay(), Duration::from_millis(2000));
        assert_eq!(config.turn.corners, "tr,br");
        assert_eq!(config.assets.relative_path(1, crate::page::Extension::Png), "assets/page1.png");
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = FlipbookConfig::from_toml(
            r#"
            [book]
            loader_delay_ms = 500

            [download]
            href = "https://example.com/all.zip"
            "#,
        )
        .expect("valid config");
        assert_eq!(config.book.loader_delay_ms, 500);
        assert_eq!(config.book.width, 720);
        assert_eq!(config.download.href, "https://example.com/all.zip");
        assert_eq!(config.download.title, "Download Memories");
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = FlipbookConfig::from_toml("[book]\nwidth = 0\n").unwrap_err();
        assert!(err.to_string().contains("nominal size"));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let err = FlipbookConfig::from_toml("[book]\nswipe_threshold = -1.0\n").unwrap_err();
        assert!(err.to_string().contains("swipe threshold"));
    }

    #[test]
    fn turn_options_serialize_camel_case() {
        let json = serde_json::to_value(TurnOptions::default()).expect("serialize");
        assert_eq!(json["autoCenter"], false);
        assert_eq!(json["display"], "single");
        assert_eq!(json["elevation"], 50);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = FlipbookConfig::load_or_default(&dir.path().join("flipbook.toml"))
            .expect("defaults");
        assert_eq!(config, FlipbookConfig::default());
    }
}
