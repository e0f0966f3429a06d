//! Page data model: asset extensions, discovered pages, and the book they form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// File extension of a page asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    Png,
    Jpg,
    Jpeg,
    Mp4,
}

impl Extension {
    /// Probe order. The first extension that exists for a page number wins.
    pub const PREFERENCE: [Extension; 4] = [
        Extension::Png,
        Extension::Jpg,
        Extension::Jpeg,
        Extension::Mp4,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Extension::Png => "png",
            Extension::Jpg => "jpg",
            Extension::Jpeg => "jpeg",
            Extension::Mp4 => "mp4",
        }
    }

    pub fn is_video(self) -> bool {
        matches!(self, Extension::Mp4)
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Extension::Png => "image/png",
            Extension::Jpg | Extension::Jpeg => "image/jpeg",
            Extension::Mp4 => "video/mp4",
        }
    }

    /// Case-insensitive lookup from a bare extension.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::PREFERENCE
            .into_iter()
            .find(|ext| ext.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where page assets live relative to the host page: `<dir>/<prefix><N>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetLayout {
    pub dir: String,
    pub prefix: String,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self {
            dir: "assets".to_string(),
            prefix: "page".to_string(),
        }
    }
}

impl AssetLayout {
    pub fn file_name(&self, number: u32, extension: Extension) -> String {
        format!("{}{number}.{extension}", self.prefix)
    }

    /// Path relative to the host page, e.g. `assets/page3.png`.
    pub fn relative_path(&self, number: u32, extension: Extension) -> String {
        let file = self.file_name(number, extension);
        let dir = self.dir.trim_end_matches('/');
        if dir.is_empty() {
            file
        } else {
            format!("{dir}/{file}")
        }
    }

    pub fn candidate(&self, number: u32, extension: Extension) -> Candidate {
        Candidate {
            number,
            extension,
            path: self.relative_path(number, extension),
        }
    }
}

/// One (page number, extension) pair to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub number: u32,
    pub extension: Extension,
    pub path: String,
}

/// A discovered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub number: u32,
    pub extension: Extension,
    pub file_name: String,
    pub path: String,
}

impl Page {
    pub fn from_candidate(candidate: Candidate, layout: &AssetLayout) -> Self {
        Self {
            number: candidate.number,
            extension: candidate.extension,
            file_name: layout.file_name(candidate.number, candidate.extension),
            path: candidate.path,
        }
    }

    pub fn is_video(&self) -> bool {
        self.extension.is_video()
    }
}

/// The contiguous, 1-indexed page sequence produced by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pages: Vec<Page>,
    video_page: Option<u32>,
}

impl Book {
    /// Pages must be numbered `1..=len` in order. The first `mp4` page
    /// becomes the managed video page.
    pub fn new(pages: Vec<Page>) -> Self {
        debug_assert!(pages
            .iter()
            .enumerate()
            .all(|(i, p)| p.number as usize == i + 1));

        let mut videos = pages.iter().filter(|p| p.is_video());
        let video_page = videos.next().map(|p| p.number);
        for extra in videos {
            tracing::warn!(
                page = extra.number,
                "additional video page is not managed by the viewer"
            );
        }
        Self { pages, video_page }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn page(&self, number: u32) -> Option<&Page> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
    }

    pub fn video_page(&self) -> Option<u32> {
        self.video_page
    }

    pub fn is_video_page(&self, number: u32) -> bool {
        self.video_page == Some(number)
    }

    pub fn is_last(&self, number: u32) -> bool {
        number == self.page_count()
    }
}
