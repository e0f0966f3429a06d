//! Browser host for the flipbook controller.
//!
//! Drives turn.js (a jQuery plugin) through typed extern bindings and
//! implements the controller's seams on top of `web-sys`.
//! Build with: `wasm-pack build --target web --features wasm`

use std::rc::Rc;
use std::time::Duration;

use js_sys::{Object, Promise, Reflect};
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlImageElement, HtmlVideoElement,
    KeyboardEvent, Request, RequestInit, Response, TouchEvent, Window,
};

use crate::config::{DomSelectors, FlipbookConfig, TurnOptions};
use crate::controller::{
    Control, FlipbookController, PageTurnWidget, Stage, TurnHooks, VideoElement,
};
use crate::discovery::AssetProbe;
use crate::error::{FlipbookError, Result};
use crate::layout::Size;
use crate::markup::{DownloadOverlay, Media, PageNode, VIDEO_ID, VIDEO_STYLE};
use crate::page::Candidate;
use crate::readiness::{MediaKind, ProbeStrategy, ReadyCheck};

#[wasm_bindgen]
extern "C" {
    /// jQuery collection wrapping the flipbook element.
    #[derive(Clone)]
    type JQuery;

    #[wasm_bindgen(js_name = jQuery)]
    fn jquery(element: &Element) -> JQuery;

    #[wasm_bindgen(method, js_name = turn)]
    fn turn_init(this: &JQuery, options: &JsValue) -> JQuery;

    #[wasm_bindgen(method, js_name = turn)]
    fn turn_get(this: &JQuery, property: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = turn)]
    fn turn_set(this: &JQuery, property: &str, value: u32) -> JQuery;
}

type WebController = FlipbookController<TurnWidget, WebStage>;

/// Start the viewer once the host page has loaded.
///
/// `config` is a plain object matching `flipbook.toml`; `undefined` uses the
/// defaults. When no page is found the loader stays up and the reason is
/// written to the console.
#[wasm_bindgen]
pub async fn start(config: JsValue) -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config: FlipbookConfig = if config.is_undefined() || config.is_null() {
        FlipbookConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    config.validate().map_err(to_js_error)?;

    let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("no document"))?;
    let stage = WebStage::locate(window.clone(), document.clone(), &config.dom)
        .map_err(to_js_error)?;
    let widget = TurnWidget {
        book: jquery(&stage.flipbook),
    };
    let probe = BrowserProbe::for_location(&window);

    let controller = match crate::startup::launch(config, &probe, widget, stage).await {
        Ok(controller) => controller,
        Err(e) if e.is_discovery_empty() => {
            web_sys::console::error_1(&e.to_string().into());
            return Ok(());
        }
        Err(e) => return Err(to_js_error(e).into()),
    };

    bind_events(&controller)?;
    // Catch any resize that happened while the loader was up.
    controller.resize();
    Ok(())
}

fn to_js_error(e: FlipbookError) -> JsError {
    JsError::new(&e.to_string())
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

// ── Event wiring ──────────────────────────────────────────────────────

fn listen<E>(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> std::result::Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // The viewer lives as long as the page.
    closure.forget();
    Ok(())
}

fn bind_events(controller: &Rc<WebController>) -> std::result::Result<(), JsValue> {
    let stage = controller.stage();

    let c = controller.clone();
    listen(&stage.previous, "click", move |_: web_sys::Event| {
        c.previous();
    })?;

    let c = controller.clone();
    listen(&stage.next, "click", move |_: web_sys::Event| {
        c.next();
    })?;

    let c = controller.clone();
    listen(&stage.document, "keydown", move |e: KeyboardEvent| {
        if c.handle_key(&e.key()) {
            e.prevent_default();
        }
    })?;

    let c = controller.clone();
    listen(&stage.flipbook, "touchstart", move |e: TouchEvent| {
        if let Some(touch) = e.touches().get(0) {
            c.touch_start(f64::from(touch.client_x()));
        }
    })?;

    let c = controller.clone();
    listen(&stage.flipbook, "touchend", move |e: TouchEvent| {
        if let Some(touch) = e.changed_touches().get(0) {
            c.touch_end(f64::from(touch.client_x()));
        }
    })?;

    let c = controller.clone();
    let document = stage.document.clone();
    listen(&stage.document, "visibilitychange", move |_: web_sys::Event| {
        c.visibility_changed(document.hidden());
    })?;

    let c = controller.clone();
    listen(&stage.window, "resize", move |_: web_sys::Event| {
        c.resize();
    })?;

    Ok(())
}

// ── turn.js ───────────────────────────────────────────────────────────

#[derive(Clone)]
struct TurnWidget {
    book: JQuery,
}

impl PageTurnWidget for TurnWidget {
    fn init(&self, size: Size, options: &TurnOptions, hooks: TurnHooks) {
        let config = match serde_wasm_bindgen::to_value(options) {
            Ok(value) => value,
            Err(e) => {
                web_sys::console::error_1(&format!("turn options: {e}").into());
                return;
            }
        };
        let _ = Reflect::set(&config, &"width".into(), &size.width.into());
        let _ = Reflect::set(&config, &"height".into(), &size.height.into());

        let TurnHooks { turning, turned } = hooks;
        let turning = Closure::<dyn Fn(JsValue, JsValue)>::new(
            move |_event: JsValue, _page: JsValue| turning(),
        );
        let turned = Closure::<dyn Fn(JsValue, JsValue)>::new(
            move |_event: JsValue, page: JsValue| {
                if let Some(page) = page.as_f64() {
                    turned(page as u32);
                }
            },
        );
        let when = Object::new();
        let _ = Reflect::set(&when, &"turning".into(), turning.as_ref());
        let _ = Reflect::set(&when, &"turned".into(), turned.as_ref());
        turning.forget();
        turned.forget();
        let _ = Reflect::set(&config, &"when".into(), &when);

        self.book.turn_init(&config);
    }

    fn current_page(&self) -> u32 {
        self.book
            .turn_get("page")
            .as_f64()
            .map(|page| page as u32)
            .unwrap_or(1)
    }

    fn turn_to(&self, page: u32) {
        self.book.turn_set("page", page);
    }
}

// ── Video ─────────────────────────────────────────────────────────────

struct WebVideo(HtmlVideoElement);

impl VideoElement for WebVideo {
    fn pause(&self) {
        let _ = self.0.pause();
    }

    fn seek_to_start(&self) {
        self.0.set_current_time(0.0);
    }

    fn set_muted(&self, muted: bool) {
        self.0.set_muted(muted);
    }

    fn set_controls(&self, visible: bool) {
        self.0.set_controls(visible);
    }

    fn play(&self) -> Result<()> {
        let promise = self
            .0
            .play()
            .map_err(|e| FlipbookError::Playback(describe(&e)))?;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                tracing::debug!("playback rejected: {}", describe(&e));
            }
        });
        Ok(())
    }
}

// ── Host page ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct WebStage {
    window: Window,
    document: Document,
    flipbook: Element,
    loader: HtmlElement,
    viewport: HtmlElement,
    container: HtmlElement,
    previous: HtmlElement,
    next: HtmlElement,
}

impl WebStage {
    fn locate(window: Window, document: Document, dom: &DomSelectors) -> Result<Self> {
        let find = |selector: &str| -> Result<Element> {
            document
                .query_selector(selector)
                .ok()
                .flatten()
                .ok_or_else(|| FlipbookError::dom(format!("missing element '{selector}'")))
        };
        let find_html = |selector: &str| -> Result<HtmlElement> {
            find(selector)?
                .dyn_into::<HtmlElement>()
                .map_err(|_| FlipbookError::dom(format!("'{selector}' is not an HTML element")))
        };
        Ok(Self {
            flipbook: find(&dom.flipbook)?,
            loader: find_html(&dom.loader)?,
            viewport: find_html(&dom.viewport)?,
            container: find_html(&dom.container)?,
            previous: find_html(&dom.previous)?,
            next: find_html(&dom.next)?,
            window,
            document,
        })
    }

    fn create(&self, tag: &str) -> Result<Element> {
        self.document
            .create_element(tag)
            .map_err(|e| FlipbookError::dom(format!("cannot create <{tag}>: {}", describe(&e))))
    }

    fn build_page(&self, node: &PageNode) -> Result<(Element, Option<HtmlVideoElement>)> {
        let page = self.create("div")?;
        page.set_class_name("page");

        let mut managed = None;
        match &node.media {
            Media::Image { src, alt } => {
                let img = self.create("img")?;
                set_attrs(&img, &[("src", src), ("alt", alt)])?;
                append(&page, &img)?;
            }
            Media::Video { src, mime } => {
                let video = self.video_element(src, mime)?;
                video.set_id(VIDEO_ID);
                video.set_muted(true);
                video.set_autoplay(true);
                video.set_controls(false);
                set_attrs(&video, &[("muted", ""), ("autoplay", "")])?;
                append(&page, &video)?;
                managed = Some(video);
            }
            Media::StaticVideo { src, mime } => {
                let video = self.video_element(src, mime)?;
                video.set_controls(true);
                append(&page, &video)?;
            }
        }

        if let Some(link) = &node.download {
            append(&page, &self.download_banner(link)?)?;
        }
        Ok((page, managed))
    }

    fn video_element(&self, src: &str, mime: &str) -> Result<HtmlVideoElement> {
        let video = self
            .create("video")?
            .dyn_into::<HtmlVideoElement>()
            .map_err(|_| FlipbookError::dom("<video> is not a video element"))?;
        video.set_preload("metadata");
        set_attrs(&video, &[("playsinline", ""), ("style", VIDEO_STYLE)])?;

        let source = self.create("source")?;
        set_attrs(&source, &[("src", src), ("type", mime)])?;
        append(&video, &source)?;
        Ok(video)
    }

    fn download_banner(&self, link: &DownloadOverlay) -> Result<Element> {
        let anchor = self.create("a")?;
        set_attrs(
            &anchor,
            &[
                ("href", &link.href),
                ("target", "_blank"),
                ("class", "download-banner"),
                ("title", &link.title),
            ],
        )?;
        let icon = self.create("img")?;
        set_attrs(&icon, &[("src", &link.icon), ("alt", &link.title)])?;
        append(&anchor, &icon)?;
        Ok(anchor)
    }
}

fn set_attrs(element: &Element, attrs: &[(&str, &str)]) -> Result<()> {
    for (name, value) in attrs {
        element
            .set_attribute(name, value)
            .map_err(|e| FlipbookError::dom(format!("cannot set {name}: {}", describe(&e))))?;
    }
    Ok(())
}

fn append(parent: &Element, child: &Element) -> Result<()> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|e| FlipbookError::dom(describe(&e)))
}

/// Resolve once any of `events` fires on `target`.
async fn wait_for_any(target: &EventTarget, events: &[&str]) {
    let promise = Promise::new(&mut |resolve, _reject| {
        for event in events {
            let _ = target.add_event_listener_with_callback(event, &resolve);
        }
    });
    let _ = JsFuture::from(promise).await;
}

impl Stage for WebStage {
    type Video = WebVideo;

    fn mount(&self, nodes: &[PageNode]) -> Result<Option<WebVideo>> {
        let mut video = None;
        for node in nodes {
            let (page, managed) = self.build_page(node)?;
            append(&self.flipbook, &page)?;
            if managed.is_some() {
                video = managed.map(WebVideo);
            }
        }
        Ok(video)
    }

    async fn first_media_ready(&self) {
        let first = self
            .flipbook
            .query_selector(".page")
            .ok()
            .flatten()
            .and_then(|page| page.query_selector("img, video").ok().flatten());
        let Some(first) = first else {
            return;
        };

        let check = if let Some(video) = first.dyn_ref::<HtmlVideoElement>() {
            ReadyCheck::video(video.ready_state())
        } else if let Some(img) = first.dyn_ref::<HtmlImageElement>() {
            ReadyCheck::image(img.complete())
        } else {
            return;
        };
        if let ReadyCheck::WaitFor(events) = check {
            wait_for_any(&first, events).await;
        }
    }

    async fn sleep(&self, duration: Duration) {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let window = self.window.clone();
        let promise = Promise::new(&mut |resolve, _reject| {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
        });
        let _ = JsFuture::from(promise).await;
    }

    fn set_control_visible(&self, control: Control, visible: bool) {
        let button = match control {
            Control::Previous => &self.previous,
            Control::Next => &self.next,
        };
        let style = button.style();
        if visible {
            let _ = style.remove_property("display");
        } else {
            let _ = style.set_property("display", "none");
        }
    }

    fn viewport_size(&self) -> Size {
        Size::new(
            f64::from(self.viewport.client_width()),
            f64::from(self.viewport.client_height()),
        )
    }

    fn window_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn set_container_transform(&self, transform: &str) {
        let _ = self.container.style().set_property("transform", transform);
    }

    fn set_viewport_unit(&self, value: &str) {
        if let Some(root) = self
            .document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = root.style().set_property("--vh", value);
        }
    }

    fn reveal(&self) {
        let _ = self.loader.style().set_property("display", "none");
        let _ = self.viewport.style().set_property("visibility", "visible");
    }
}

// ── Probes ────────────────────────────────────────────────────────────

/// Probe strategy for the page's origin: media loads for `file:`, `HEAD`
/// requests otherwise.
enum BrowserProbe {
    Media(Document),
    Fetch(Window),
}

impl BrowserProbe {
    fn for_location(window: &Window) -> Self {
        let protocol = window.location().protocol().unwrap_or_default();
        match (ProbeStrategy::for_protocol(&protocol), window.document()) {
            (ProbeStrategy::MediaLoad, Some(document)) => Self::Media(document),
            _ => Self::Fetch(window.clone()),
        }
    }
}

impl AssetProbe for BrowserProbe {
    async fn exists(&self, candidate: &Candidate) -> bool {
        match self {
            Self::Media(document) => {
                let kind = MediaKind::from_extension(candidate.extension);
                media_loads(document, &candidate.path, kind).await
            }
            Self::Fetch(window) => head_ok(window, &candidate.path).await,
        }
    }
}

/// Load `url` into a throwaway element and report whether it loaded.
async fn media_loads(document: &Document, url: &str, kind: MediaKind) -> bool {
    let Ok(element) = document.create_element(kind.tag_name()) else {
        return false;
    };
    if kind == MediaKind::Video {
        let _ = element.set_attribute("preload", "metadata");
    }
    let loaded_event = kind.loaded_event();

    let promise = Promise::new(&mut |resolve, _reject| {
        let loaded = resolve.bind1(&JsValue::NULL, &JsValue::TRUE);
        let failed = resolve.bind1(&JsValue::NULL, &JsValue::FALSE);
        let _ = element.add_event_listener_with_callback(loaded_event, loaded.unchecked_ref());
        let _ = element.add_event_listener_with_callback("error", failed.unchecked_ref());
    });
    if element.set_attribute("src", url).is_err() {
        return false;
    }

    JsFuture::from(promise)
        .await
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

async fn head_ok(window: &Window, url: &str) -> bool {
    let init = RequestInit::new();
    init.set_method("HEAD");
    let Ok(request) = Request::new_with_str_and_init(url, &init) else {
        return false;
    };
    match JsFuture::from(window.fetch_with_request(&request)).await {
        Ok(value) => value
            .dyn_into::<Response>()
            .map(|response| response.ok())
            .unwrap_or(false),
        Err(e) => {
            tracing::debug!(url, "HEAD failed: {}", describe(&e));
            false
        }
    }
}
