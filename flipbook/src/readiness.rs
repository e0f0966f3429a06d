//! Load-state decisions for page media, independent of the DOM.
//!
//! The browser host reads raw element state (`readyState`, `complete`,
//! `location.protocol`) and asks this module what to do with it.

use crate::page::Extension;

/// `HTMLMediaElement.HAVE_METADATA`
pub const HAVE_METADATA: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_extension(extension: Extension) -> Self {
        if extension.is_video() {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn tag_name(self) -> &'static str {
        match self {
            MediaKind::Image => "img",
            MediaKind::Video => "video",
        }
    }

    /// Event fired once the element can be shown.
    pub fn loaded_event(self) -> &'static str {
        match self {
            MediaKind::Image => "load",
            MediaKind::Video => "loadedmetadata",
        }
    }

    /// Events that end a wait on this element. Failure counts as settled.
    pub fn settle_events(self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &["load", "error"],
            MediaKind::Video => &["loadedmetadata", "error"],
        }
    }
}

/// Outcome of inspecting the first page's media before reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyCheck {
    ReadyNow,
    WaitFor(&'static [&'static str]),
}

impl ReadyCheck {
    pub fn image(complete: bool) -> Self {
        if complete {
            ReadyCheck::ReadyNow
        } else {
            ReadyCheck::WaitFor(MediaKind::Image.settle_events())
        }
    }

    pub fn video(ready_state: u16) -> Self {
        if ready_state >= HAVE_METADATA {
            ReadyCheck::ReadyNow
        } else {
            ReadyCheck::WaitFor(MediaKind::Video.settle_events())
        }
    }
}

/// How the browser checks that a page asset exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStrategy {
    /// Load the asset into a detached element. Works for `file:` pages,
    /// where `fetch` is refused.
    MediaLoad,
    /// `HEAD` request against the page's origin.
    Head,
}

impl ProbeStrategy {
    /// Pick a strategy from `location.protocol` (`"file:"`, `"https:"`, ...).
    pub fn for_protocol(protocol: &str) -> Self {
        if protocol.trim_end_matches(':').eq_ignore_ascii_case("file") {
            ProbeStrategy::MediaLoad
        } else {
            ProbeStrategy::Head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_image_is_ready() {
        assert_eq!(ReadyCheck::image(true), ReadyCheck::ReadyNow);
    }

    #[test]
    fn loading_image_waits_for_load_or_error() {
        let ReadyCheck::WaitFor(events) = ReadyCheck::image(false) else {
            panic!("expected a wait");
        };
        assert!(events.contains(&"load"));
        assert!(events.contains(&"error"));
    }

    #[test]
    fn video_with_metadata_is_ready() {
        assert_eq!(ReadyCheck::video(HAVE_METADATA), ReadyCheck::ReadyNow);
        // HAVE_ENOUGH_DATA
        assert_eq!(ReadyCheck::video(4), ReadyCheck::ReadyNow);
    }

    #[test]
    fn video_without_metadata_waits_for_metadata_or_error() {
        let ReadyCheck::WaitFor(events) = ReadyCheck::video(0) else {
            panic!("expected a wait");
        };
        assert!(events.contains(&"loadedmetadata"));
        assert!(events.contains(&"error"));
    }

    #[test]
    fn every_wait_settles_on_error() {
        for kind in [MediaKind::Image, MediaKind::Video] {
            let events = kind.settle_events();
            assert!(events.contains(&kind.loaded_event()), "{kind:?}");
            assert!(events.contains(&"error"), "{kind:?}");
        }
    }

    #[test]
    fn media_kind_follows_extension() {
        assert_eq!(MediaKind::from_extension(Extension::Mp4), MediaKind::Video);
        assert_eq!(MediaKind::from_extension(Extension::Jpeg), MediaKind::Image);
        assert_eq!(MediaKind::Video.tag_name(), "video");
    }

    #[test]
    fn file_pages_load_media() {
        assert_eq!(ProbeStrategy::for_protocol("file:"), ProbeStrategy::MediaLoad);
        assert_eq!(ProbeStrategy::for_protocol("FILE:"), ProbeStrategy::MediaLoad);
    }

    #[test]
    fn served_pages_use_head() {
        for protocol in ["http:", "https:", "", "blob:"] {
            assert_eq!(ProbeStrategy::for_protocol(protocol), ProbeStrategy::Head, "{protocol}");
        }
    }
}
