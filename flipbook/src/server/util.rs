use std::path::{Component, Path, PathBuf};

use crate::page::Extension;

/// Resolve a request path under `root`, refusing anything that could
/// escape it.
pub(crate) fn resolve_under(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

pub(crate) fn content_type(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str());
    if let Some(page) = ext.and_then(Extension::from_name) {
        return page.mime_type();
    }
    match ext.map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("js" | "mjs") => "text/javascript",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_is_refused() {
        let root = Path::new("/srv/book");
        assert_eq!(
            resolve_under(root, "/assets/page1.png"),
            Some(PathBuf::from("/srv/book/assets/page1.png"))
        );
        assert_eq!(resolve_under(root, "assets/../../etc/passwd"), None);
        assert_eq!(resolve_under(root, "./pkg/flipbook.js"), Some(root.join("pkg/flipbook.js")));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type(Path::new("a/page1.PNG")), "image/png");
        assert_eq!(content_type(Path::new("page2.jpeg")), "image/jpeg");
        assert_eq!(content_type(Path::new("page3.mp4")), "video/mp4");
        assert_eq!(content_type(Path::new("pkg/flipbook_bg.wasm")), "application/wasm");
        assert_eq!(content_type(Path::new("README")), "application/octet-stream");
    }
}
