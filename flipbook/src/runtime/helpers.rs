//! Shared helpers for host page generation.

use crate::markup::attr_escape;

/// Turn a simple selector (`#id` or `.class`) into the attribute that makes
/// an element match it. Anything else is treated as a bare id.
pub(super) fn selector_attr(selector: &str) -> String {
    if let Some(class) = selector.strip_prefix('.') {
        format!("class=\"{}\"", attr_escape(class))
    } else {
        let id = selector.strip_prefix('#').unwrap_or(selector);
        format!("id=\"{}\"", attr_escape(id))
    }
}

/// Like [`selector_attr`], with extra classes merged in.
pub(super) fn selector_attr_with_class(selector: &str, extra: &str) -> String {
    if let Some(class) = selector.strip_prefix('.') {
        format!("class=\"{} {extra}\"", attr_escape(class))
    } else {
        format!("{} class=\"{extra}\"", selector_attr(selector))
    }
}

/// Serialize `value` for embedding inside an inline `<script>` block.
/// `</` is escaped so the HTML parser cannot close the script early.
pub(super) fn json_inline<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/")
}
