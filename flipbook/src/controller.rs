//! The flipbook controller and the host seams it drives.
//!
//! The page-turn widget owns the current page; the controller only reads it
//! through [`PageTurnWidget::current_page`] and commands it through
//! [`PageTurnWidget::turn_to`]. All controller methods take `&self` so that
//! widget callbacks may re-enter while a navigation call is on the stack.

use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::config::{FlipbookConfig, TurnOptions};
use crate::error::Result;
use crate::layout::{self, Size};
use crate::markup::PageNode;
use crate::navigation::{clamp_page, Arrows, Step, SwipeTracker};
use crate::page::Book;

/// Lifecycle callbacks handed to the widget at init.
pub struct TurnHooks {
    /// Fired when a turn starts, before leaving the current page.
    pub turning: Box<dyn Fn()>,
    /// Fired when a turn completes, with the page arrived at.
    pub turned: Box<dyn Fn(u32)>,
}

/// External page-turn widget. Pages are addressed 1-based, in mount order.
pub trait PageTurnWidget {
    fn init(&self, size: Size, options: &TurnOptions, hooks: TurnHooks);
    fn current_page(&self) -> u32;
    fn turn_to(&self, page: u32);
}

/// The managed video element.
pub trait VideoElement {
    fn pause(&self);
    fn seek_to_start(&self);
    fn set_muted(&self, muted: bool);
    fn set_controls(&self, visible: bool);
    /// Request playback. A rejection is reported here or dropped by the
    /// implementation when it arrives asynchronously.
    fn play(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Previous,
    Next,
}

/// The host page.
#[allow(async_fn_in_trait)]
pub trait Stage: Clone {
    type Video: VideoElement;

    /// Append one node per page to the flipbook element, in order, and hand
    /// back the managed video if one was created.
    fn mount(&self, nodes: &[PageNode]) -> Result<Option<Self::Video>>;

    /// Resolve once the first page's media has loaded or failed.
    async fn first_media_ready(&self);

    async fn sleep(&self, duration: Duration);

    fn set_control_visible(&self, control: Control, visible: bool);

    /// Client size of the viewport wrapper.
    fn viewport_size(&self) -> Size;

    fn window_height(&self) -> f64;

    /// Apply the CSS `transform` to the flipbook container.
    fn set_container_transform(&self, transform: &str);

    /// Set the `--vh` custom property on the document element.
    fn set_viewport_unit(&self, value: &str);

    /// Hide the loader and make the viewport visible.
    fn reveal(&self);
}

pub struct FlipbookController<W: PageTurnWidget, S: Stage> {
    book: Book,
    config: FlipbookConfig,
    widget: W,
    stage: S,
    video: Option<S::Video>,
    swipe: SwipeTracker,
}

impl<W, S> FlipbookController<W, S>
where
    W: PageTurnWidget + 'static,
    S: Stage + 'static,
{
    pub fn new(
        book: Book,
        config: FlipbookConfig,
        widget: W,
        stage: S,
        video: Option<S::Video>,
    ) -> Rc<Self> {
        let swipe = SwipeTracker::new(config.book.swipe_threshold);
        Rc::new(Self {
            book,
            config,
            widget,
            stage,
            video,
            swipe,
        })
    }

    /// Initialize the widget with lifecycle hooks, show the arrows for the
    /// first page, and fit the book to the viewport.
    pub fn install(self: &Rc<Self>) {
        let turning: Weak<Self> = Rc::downgrade(self);
        let turned: Weak<Self> = Rc::downgrade(self);
        let hooks = TurnHooks {
            turning: Box::new(move || {
                if let Some(controller) = turning.upgrade() {
                    controller.on_turning();
                }
            }),
            turned: Box::new(move |page| {
                if let Some(controller) = turned.upgrade() {
                    controller.on_turned(page);
                }
            }),
        };
        self.widget
            .init(self.config.book.nominal_size(), &self.config.turn, hooks);
        self.update_arrows(1);
        self.resize();
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn current_page(&self) -> u32 {
        self.widget.current_page()
    }

    /// Clamp `target`, update the arrows, and turn the widget there.
    pub fn go_to(&self, target: i64) -> u32 {
        let page = clamp_page(target, self.book.page_count());
        self.update_arrows(page);
        self.widget.turn_to(page);
        page
    }

    pub fn step(&self, step: Step) -> u32 {
        self.go_to(i64::from(self.current_page()) + step.delta())
    }

    pub fn previous(&self) -> u32 {
        self.step(Step::Previous)
    }

    pub fn next(&self) -> u32 {
        self.step(Step::Next)
    }

    /// Returns `true` when the key was consumed and the default browser
    /// action should be suppressed.
    pub fn handle_key(&self, key: &str) -> bool {
        match Step::from_key(key) {
            Some(step) => {
                self.step(step);
                true
            }
            None => false,
        }
    }

    pub fn touch_start(&self, x: f64) {
        self.swipe.begin(x);
    }

    pub fn touch_end(&self, x: f64) -> Option<u32> {
        self.swipe.finish(x).map(|step| self.step(step))
    }

    /// Turn-start hook: the video never keeps playing under another page.
    pub fn on_turning(&self) {
        if let Some(video) = &self.video {
            video.pause();
            video.seek_to_start();
        }
    }

    /// Turn-complete hook.
    pub fn on_turned(&self, page: u32) {
        self.update_arrows(page);
        let Some(video) = &self.video else {
            return;
        };
        if self.book.is_video_page(page) {
            video.set_muted(false);
            video.set_controls(true);
            self.try_play(video);
        } else {
            video.set_controls(false);
        }
    }

    pub fn visibility_changed(&self, hidden: bool) {
        let Some(video) = &self.video else {
            return;
        };
        if hidden {
            video.pause();
        } else if self.book.is_video_page(self.current_page()) {
            self.try_play(video);
        }
    }

    /// Refit the book to the viewport and refresh the `--vh` unit.
    pub fn resize(&self) {
        self.stage
            .set_viewport_unit(&layout::viewport_unit(self.stage.window_height()));
        let scale =
            layout::scale_factor(self.stage.viewport_size(), self.config.book.nominal_size());
        self.stage
            .set_container_transform(&layout::scale_transform(scale));
    }

    /// Nudge playback once the viewer is visible, for browsers that ignore
    /// `autoplay` until then. Only when the video page is showing.
    pub fn kick_playback(&self) {
        if let Some(video) = &self.video {
            if self.book.is_video_page(self.current_page()) {
                self.try_play(video);
            }
        }
    }

    fn update_arrows(&self, page: u32) {
        let arrows = Arrows::for_page(page, self.book.page_count());
        self.stage.set_control_visible(Control::Previous, arrows.previous);
        self.stage.set_control_visible(Control::Next, arrows.next);
    }

    fn try_play(&self, video: &S::Video) {
        if let Err(e) = video.play() {
            tracing::debug!("{e}");
        }
    }
}
