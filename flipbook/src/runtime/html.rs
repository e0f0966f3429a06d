//! Full host page: loader overlay, scaled viewport, flipbook element,
//! navigation arrows, and the module script that starts the controller.

use crate::config::FlipbookConfig;
use crate::markup::attr_escape;

use super::helpers::{json_inline, selector_attr, selector_attr_with_class};

/// Script sources and page title for the generated host page.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    pub title: String,
    pub jquery_src: String,
    pub turn_src: String,
    /// ES module produced by `wasm-pack build --target web --features wasm`.
    pub module_src: String,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            title: "Flipbook".to_string(),
            jquery_src: "https://code.jquery.com/jquery-3.7.1.min.js".to_string(),
            turn_src: "js/turn.min.js".to_string(),
            module_src: "./pkg/flipbook.js".to_string(),
        }
    }
}

/// Generate the host page for `config`.
///
/// The viewport stays hidden and the loader visible until the controller
/// has discovered the pages and the loader floor has elapsed.
pub fn wrap_viewer_html(config: &FlipbookConfig, options: &ShellOptions) -> String {
    let dom = &config.dom;
    let title = attr_escape(&options.title);
    let jquery_src = attr_escape(&options.jquery_src);
    let turn_src = attr_escape(&options.turn_src);
    let module_src = json_inline(&options.module_src);
    let config_json = json_inline(config);
    let width = config.book.width;
    let height = config.book.height;

    let loader = selector_attr(&dom.loader);
    let viewport = selector_attr(&dom.viewport);
    let container = selector_attr(&dom.container);
    let flipbook = selector_attr(&dom.flipbook);
    let prev = selector_attr_with_class(&dom.previous, "nav-btn");
    let next = selector_attr_with_class(&dom.next, "nav-btn");

    let loader_sel = &dom.loader;
    let viewport_sel = &dom.viewport;
    let container_sel = &dom.container;
    let flipbook_sel = &dom.flipbook;
    let prev_sel = &dom.previous;
    let next_sel = &dom.next;

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1, viewport-fit=cover">
<title>{title}</title>
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  html, body {{ width: 100%; height: 100%; overflow: hidden; background: #111; }}
  {loader_sel} {{
    position: fixed;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    z-index: 100;
    background: #111;
  }}
  {loader_sel} .spinner {{
    width: 48px;
    height: 48px;
    border: 4px solid #333;
    border-top-color: #ddd;
    border-radius: 50%;
    animation: spin 1s linear infinite;
  }}
  @keyframes spin {{ to {{ transform: rotate(360deg); }} }}
  {viewport_sel} {{
    visibility: hidden;
    position: relative;
    width: 100vw;
    height: calc(var(--vh, 1vh) * 100);
    display: flex;
    align-items: center;
    justify-content: center;
    overflow: hidden;
  }}
  {container_sel} {{
    width: {width}px;
    height: {height}px;
    flex: none;
    transform-origin: center center;
  }}
  {flipbook_sel} {{ width: {width}px; height: {height}px; }}
  {flipbook_sel} .page {{ position: relative; width: {width}px; height: {height}px; background: #000; overflow: hidden; }}
  {flipbook_sel} .page > img {{ width: 100%; height: 100%; object-fit: cover; display: block; }}
  .download-banner {{
    position: absolute;
    right: 24px;
    bottom: 24px;
    z-index: 5;
  }}
  .download-banner img {{ width: 96px; height: auto; display: block; }}
  .nav-btn {{
    position: absolute;
    top: 50%;
    transform: translateY(-50%);
    z-index: 20;
    width: 44px;
    height: 44px;
    border: none;
    border-radius: 50%;
    background: rgba(0, 0, 0, 0.45);
    color: #fff;
    font-size: 22px;
    cursor: pointer;
  }}
  {prev_sel} {{ left: 12px; }}
  {next_sel} {{ right: 12px; }}
</style>
<script src="{jquery_src}"></script>
<script src="{turn_src}"></script>
</head>
<body>
<div {loader}><div class="spinner"></div></div>
<div {viewport}>
  <button {prev} aria-label="Previous page">&#8249;</button>
  <div {container}>
    <div {flipbook}></div>
  </div>
  <button {next} aria-label="Next page">&#8250;</button>
</div>
<script type="module">
import init, {{ start }} from {module_src};
const config = {config_json};
window.addEventListener('load', async () => {{
  await init();
  try {{
    await start(config);
  }} catch (e) {{
    console.error('[flipbook]', e);
  }}
}});
</script>
</body>
</html>
"##
    )
}
