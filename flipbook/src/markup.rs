//! Page markup: a small typed node list built from the book, rendered either
//! to an HTML fragment or (in the browser) straight into the DOM.

use crate::config::FlipbookConfig;
use crate::page::Book;

/// Element id of the managed video.
pub const VIDEO_ID: &str = "video-page";

/// Inline style that makes a video fill its page.
pub const VIDEO_STYLE: &str = "width:100%;height:100%;object-fit:cover";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNode {
    pub number: u32,
    pub media: Media,
    pub download: Option<DownloadOverlay>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    Image {
        src: String,
        alt: String,
    },
    /// The single video the controller drives: muted, inline, autoplaying,
    /// no controls, metadata-only preload.
    Video {
        src: String,
        mime: &'static str,
    },
    /// Any further video page. Left alone by the controller.
    StaticVideo {
        src: String,
        mime: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOverlay {
    pub href: String,
    pub title: String,
    pub icon: String,
}

impl PageNode {
    pub fn is_managed_video(&self) -> bool {
        matches!(self.media, Media::Video { .. })
    }
}

/// One node per page, in page order.
pub fn build_pages(book: &Book, config: &FlipbookConfig) -> Vec<PageNode> {
    book.pages()
        .iter()
        .map(|page| {
            let media = if book.is_video_page(page.number) {
                Media::Video {
                    src: page.path.clone(),
                    mime: page.extension.mime_type(),
                }
            } else if page.is_video() {
                Media::StaticVideo {
                    src: page.path.clone(),
                    mime: page.extension.mime_type(),
                }
            } else {
                Media::Image {
                    src: page.path.clone(),
                    alt: format!("Page {}", page.number),
                }
            };
            let download = book.is_last(page.number).then(|| DownloadOverlay {
                href: config.download.href.clone(),
                title: config.download.title.clone(),
                icon: config.download.icon.clone(),
            });
            PageNode {
                number: page.number,
                media,
                download,
            }
        })
        .collect()
}

/// Render the page nodes as the children of the flipbook element.
pub fn render_pages_html(nodes: &[PageNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str("<div class=\"page\">");
        match &node.media {
            Media::Image { src, alt } => {
                out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\">",
                    attr_escape(src),
                    attr_escape(alt)
                ));
            }
            Media::Video { src, mime } => {
                out.push_str(&format!(
                    "<video id=\"{VIDEO_ID}\" muted autoplay playsinline preload=\"metadata\" style=\"{VIDEO_STYLE}\">\
                     <source src=\"{}\" type=\"{mime}\"></video>",
                    attr_escape(src)
                ));
            }
            Media::StaticVideo { src, mime } => {
                out.push_str(&format!(
                    "<video controls playsinline preload=\"metadata\" style=\"{VIDEO_STYLE}\">\
                     <source src=\"{}\" type=\"{mime}\"></video>",
                    attr_escape(src)
                ));
            }
        }
        if let Some(link) = &node.download {
            out.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" class=\"download-banner\" title=\"{title}\">\
                 <img src=\"{}\" alt=\"{title}\"></a>",
                attr_escape(&link.href),
                attr_escape(&link.icon),
                title = attr_escape(&link.title),
            ));
        }
        out.push_str("</div>\n");
    }
    out
}

pub(crate) fn attr_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{AssetLayout, Extension, Page};

    fn book(exts: &[Extension]) -> Book {
        let layout = AssetLayout::default();
        Book::new(
            exts.iter()
                .enumerate()
                .map(|(i, e)| Page::from_candidate(layout.candidate(i as u32 + 1, *e), &layout))
                .collect(),
        )
    }

    #[test]
    fn nodes_follow_page_order() {
        let nodes = build_pages(
            &book(&[Extension::Png, Extension::Mp4, Extension::Jpg]),
            &FlipbookConfig::default(),
        );
        let numbers: Vec<u32> = nodes.iter().map(|n| n.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(
            nodes[0].media,
            Media::Image {
                src: "assets/page1.png".to_string(),
                alt: "Page 1".to_string()
            }
        );
        assert!(nodes[1].is_managed_video());
    }

    #[test]
    fn only_last_page_gets_download_link() {
        let nodes = build_pages(
            &book(&[Extension::Png, Extension::Png, Extension::Jpeg]),
            &FlipbookConfig::default(),
        );
        assert!(nodes[0].download.is_none());
        assert!(nodes[1].download.is_none());
        let link = nodes[2].download.as_ref().expect("overlay on last page");
        assert_eq!(link.icon, "assets/icon_download.png");
    }

    #[test]
    fn video_page_renders_one_video_with_source() {
        let html = render_pages_html(&build_pages(
            &book(&[Extension::Mp4]),
            &FlipbookConfig::default(),
        ));
        assert_eq!(html.matches("<video").count(), 1);
        assert_eq!(html.matches("<source").count(), 1);
        assert!(html.contains("id=\"video-page\""));
        assert!(html.contains("muted autoplay playsinline preload=\"metadata\""));
        assert!(!html.contains(" controls"));
        assert!(html.contains("type=\"video/mp4\""));
        // Single page is also the last page.
        assert!(html.contains("class=\"download-banner\""));
    }

    #[test]
    fn extra_videos_are_not_managed() {
        let nodes = build_pages(
            &book(&[Extension::Mp4, Extension::Mp4]),
            &FlipbookConfig::default(),
        );
        assert!(nodes[0].is_managed_video());
        assert!(matches!(nodes[1].media, Media::StaticVideo { .. }));
        let html = render_pages_html(&nodes);
        assert_eq!(html.matches("id=\"video-page\"").count(), 1);
    }

    #[test]
    fn attributes_are_escaped() {
        let mut config = FlipbookConfig::default();
        config.download.href = "https://example.com/?a=1&b=\"2\"".to_string();
        let html = render_pages_html(&build_pages(&book(&[Extension::Png]), &config));
        assert!(html.contains("a=1&amp;b=&quot;2&quot;"));
    }
}
