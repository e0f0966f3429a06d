//! Generates the host page that satisfies the viewer's DOM contract and
//! boots the wasm controller.
//!
//! This module is split into:
//! - `html`: full host page (wrap_viewer_html)
//! - `helpers`: selector-to-attribute mapping and inline JSON encoding

mod helpers;
mod html;

pub use html::{wrap_viewer_html, ShellOptions};
