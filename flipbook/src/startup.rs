//! Startup sequence: discovery, mount, ready-gate, widget install, and the
//! loader floor.

use std::rc::Rc;

use futures_util::future::join;

use crate::config::FlipbookConfig;
use crate::controller::{FlipbookController, PageTurnWidget, Stage};
use crate::discovery::{discover, AssetProbe};
use crate::error::Result;
use crate::markup::build_pages;

/// Discover pages, mount their markup, wait for the first page's media, and
/// initialize the widget.
pub async fn boot<P, W, S>(
    config: FlipbookConfig,
    probe: &P,
    widget: W,
    stage: S,
) -> Result<Rc<FlipbookController<W, S>>>
where
    P: AssetProbe + ?Sized,
    W: PageTurnWidget + 'static,
    S: Stage + 'static,
{
    let book = discover(probe, &config.assets).await?;
    let nodes = build_pages(&book, &config);
    let video = stage.mount(&nodes)?;
    stage.first_media_ready().await;

    let controller = FlipbookController::new(book, config, widget, stage, video);
    controller.install();
    Ok(controller)
}

/// Run [`boot`] alongside the minimum loader delay, then reveal the viewer.
///
/// When discovery finds nothing the loader is left up and the error is
/// returned for the host to report.
pub async fn launch<P, W, S>(
    config: FlipbookConfig,
    probe: &P,
    widget: W,
    stage: S,
) -> Result<Rc<FlipbookController<W, S>>>
where
    P: AssetProbe + ?Sized,
    W: PageTurnWidget + 'static,
    S: Stage + 'static,
{
    let delay = config.book.loader_delay();
    let (booted, ()) = join(boot(config, probe, widget, stage.clone()), stage.sleep(delay)).await;

    let controller = match booted {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("{e}");
            return Err(e);
        }
    };

    stage.reveal();
    controller.kick_playback();
    Ok(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{Call, FakeStage, FakeWidget, Log};
    use crate::discovery::tests::SetProbe;
    use crate::page::Extension;
    use std::time::Duration;

    fn run<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
            .block_on(f)
    }

    #[test]
    fn launch_reveals_after_boot_and_delay() {
        let log = Log::default();
        let probe = SetProbe::with(&[(1, Extension::Png), (2, Extension::Jpg)]);
        let controller = run(launch(
            FlipbookConfig::default(),
            &probe,
            FakeWidget::new(&log),
            FakeStage::new(&log),
        ))
        .expect("launched");

        assert_eq!(controller.book().page_count(), 2);
        let calls = log.borrow();
        let pos = |wanted: &Call| calls.iter().position(|c| c == wanted);
        let mount = pos(&Call::Mount(2)).expect("mounted");
        let ready = pos(&Call::Ready).expect("ready-gate");
        let init = pos(&Call::Init).expect("widget init");
        let reveal = pos(&Call::Reveal).expect("revealed");
        assert!(mount < ready && ready < init && init < reveal);
        assert!(calls.contains(&Call::Sleep(Duration::from_millis(2000))));
        assert_eq!(calls.last(), Some(&Call::Reveal));
    }

    #[test]
    fn empty_discovery_keeps_loader_and_skips_widget() {
        let log = Log::default();
        let probe = SetProbe::default();
        let result = run(launch(
            FlipbookConfig::default(),
            &probe,
            FakeWidget::new(&log),
            FakeStage::new(&log),
        ));

        assert!(result.err().is_some_and(|e| e.is_discovery_empty()));
        let calls = log.borrow();
        assert!(!calls.contains(&Call::Init));
        assert!(!calls.contains(&Call::Reveal));
        assert!(!calls.iter().any(|c| matches!(c, Call::Mount(_))));
        // The delay floor still ran.
        assert!(calls.iter().any(|c| matches!(c, Call::Sleep(_))));
    }

    #[test]
    fn video_cover_is_kicked_after_reveal() {
        let log = Log::default();
        let probe = SetProbe::with(&[(1, Extension::Mp4), (2, Extension::Png)]);
        run(launch(
            FlipbookConfig::default(),
            &probe,
            FakeWidget::new(&log),
            FakeStage::new(&log),
        ))
        .expect("launched");

        let calls = log.borrow();
        assert_eq!(&calls[calls.len() - 2..], &[Call::Reveal, Call::Play]);
    }

    #[test]
    fn video_elsewhere_is_not_kicked() {
        let log = Log::default();
        let probe = SetProbe::with(&[(1, Extension::Png), (2, Extension::Mp4)]);
        run(launch(
            FlipbookConfig::default(),
            &probe,
            FakeWidget::new(&log),
            FakeStage::new(&log),
        ))
        .expect("launched");

        assert!(!log.borrow().contains(&Call::Play));
    }
}
