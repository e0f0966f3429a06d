//! Sequential asset discovery.
//!
//! Page numbers are probed strictly in order, and extensions within a number
//! in preference order. The first number with no asset ends the book, so a
//! probe for `N + 1` never starts before the result for `N` is known.

use crate::error::{FlipbookError, Result};
use crate::page::{AssetLayout, Book, Candidate, Extension, Page};

/// Existence check for one candidate asset.
///
/// Implementations never fail: a missing, unreadable, or undecodable asset is
/// simply `false`.
#[allow(async_fn_in_trait)]
pub trait AssetProbe {
    async fn exists(&self, candidate: &Candidate) -> bool;
}

/// First extension that exists for `number`, if any.
pub async fn probe_page<P: AssetProbe + ?Sized>(
    probe: &P,
    layout: &AssetLayout,
    number: u32,
) -> Option<Candidate> {
    for extension in Extension::PREFERENCE {
        let candidate = layout.candidate(number, extension);
        if probe.exists(&candidate).await {
            tracing::debug!(path = %candidate.path, "found page asset");
            return Some(candidate);
        }
    }
    None
}

/// Discover pages `1..=K` where `K + 1` is the first missing number.
pub async fn discover<P: AssetProbe + ?Sized>(probe: &P, layout: &AssetLayout) -> Result<Book> {
    let mut pages = Vec::new();
    let mut number = 1u32;
    while let Some(candidate) = probe_page(probe, layout, number).await {
        pages.push(Page::from_candidate(candidate, layout));
        number += 1;
    }

    if pages.is_empty() {
        return Err(FlipbookError::no_pages(&layout.dir));
    }

    let book = Book::new(pages);
    tracing::info!(
        pages = book.page_count(),
        video_page = ?book.video_page(),
        "discovered flipbook pages"
    );
    Ok(book)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Probe over an in-memory set of `(number, extension)` pairs that
    /// records every call.
    #[derive(Default)]
    pub(crate) struct SetProbe {
        present: HashSet<(u32, Extension)>,
        pub(crate) calls: RefCell<Vec<(u32, Extension)>>,
    }

    impl SetProbe {
        pub(crate) fn with(assets: &[(u32, Extension)]) -> Self {
            Self {
                present: assets.iter().copied().collect(),
                calls: RefCell::default(),
            }
        }

        fn highest_probed(&self) -> u32 {
            self.calls.borrow().iter().map(|(n, _)| *n).max().unwrap_or(0)
        }
    }

    impl AssetProbe for SetProbe {
        async fn exists(&self, candidate: &Candidate) -> bool {
            let key = (candidate.number, candidate.extension);
            self.calls.borrow_mut().push(key);
            self.present.contains(&key)
        }
    }

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
            .block_on(f)
    }

    #[test]
    fn contiguous_run_stops_at_first_gap() {
        for k in 1..=6u32 {
            let mut assets: Vec<_> = (1..=k).map(|n| (n, Extension::Jpg)).collect();
            // Pages past the gap must never be reached.
            assets.push((k + 2, Extension::Png));
            let probe = SetProbe::with(&assets);

            let book = block_on(discover(&probe, &AssetLayout::default())).expect("pages");
            let numbers: Vec<u32> = book.pages().iter().map(|p| p.number).collect();
            assert_eq!(numbers, (1..=k).collect::<Vec<_>>());
            assert_eq!(probe.highest_probed(), k + 1, "k = {k}");
        }
    }

    #[test]
    fn missing_first_page_is_an_error() {
        let probe = SetProbe::with(&[(2, Extension::Png)]);
        let err = block_on(discover(&probe, &AssetLayout::default())).unwrap_err();
        assert!(err.is_discovery_empty());
        assert_eq!(probe.calls.borrow().len(), Extension::PREFERENCE.len());
    }

    #[test]
    fn earlier_extension_wins() {
        let probe = SetProbe::with(&[
            (1, Extension::Png),
            (2, Extension::Jpeg),
            (3, Extension::Png),
            (3, Extension::Mp4),
        ]);
        let book = block_on(discover(&probe, &AssetLayout::default())).expect("pages");
        assert_eq!(book.page(3).map(|p| p.extension), Some(Extension::Png));
        assert_eq!(book.video_page(), None);
        // Page 3 stops at png; mp4 is never asked for.
        assert!(!probe.calls.borrow().contains(&(3, Extension::Mp4)));
    }

    #[test]
    fn extensions_are_probed_in_order() {
        let probe = SetProbe::with(&[(1, Extension::Mp4)]);
        let book = block_on(discover(&probe, &AssetLayout::default())).expect("pages");
        assert_eq!(book.video_page(), Some(1));

        let calls = probe.calls.borrow();
        assert_eq!(
            &calls[..4],
            &[
                (1, Extension::Png),
                (1, Extension::Jpg),
                (1, Extension::Jpeg),
                (1, Extension::Mp4),
            ]
        );
        assert!(calls[4..].iter().all(|(n, _)| *n == 2));
    }

    #[test]
    fn single_video_page_is_marked() {
        let probe = SetProbe::with(&[
            (1, Extension::Png),
            (2, Extension::Mp4),
            (3, Extension::Jpg),
        ]);
        let book = block_on(discover(&probe, &AssetLayout::default())).expect("pages");
        assert_eq!(book.video_page(), Some(2));
        assert_eq!(book.page(2).map(|p| p.path.as_str()), Some("assets/page2.mp4"));
    }
}
