//! Pure navigation rules: clamping, arrow visibility, keys, and swipes.

use std::cell::Cell;

/// Direction of a page step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

impl Step {
    pub fn delta(self) -> i64 {
        match self {
            Step::Previous => -1,
            Step::Next => 1,
        }
    }

    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Step::Previous),
            "ArrowRight" => Some(Step::Next),
            _ => None,
        }
    }
}

/// Clamp `target` into `[1, page_count]`.
pub fn clamp_page(target: i64, page_count: u32) -> u32 {
    target.clamp(1, i64::from(page_count.max(1))) as u32
}

/// Which navigation arrows should be visible on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrows {
    pub previous: bool,
    pub next: bool,
}

impl Arrows {
    pub fn for_page(page: u32, page_count: u32) -> Self {
        Self {
            previous: page > 1,
            next: page < page_count,
        }
    }
}

/// Horizontal swipe detection between touch start and touch end.
#[derive(Debug)]
pub struct SwipeTracker {
    threshold: f64,
    start_x: Cell<Option<f64>>,
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_x: Cell::new(None),
        }
    }

    pub fn begin(&self, x: f64) {
        self.start_x.set(Some(x));
    }

    /// Finish the gesture. A leftward swipe past the threshold goes to the
    /// next page, a rightward one to the previous page. The gesture is
    /// reset whatever the outcome.
    pub fn finish(&self, x: f64) -> Option<Step> {
        let start = self.start_x.take()?;
        let dx = start - x;
        if dx > self.threshold {
            Some(Step::Next)
        } else if dx < -self.threshold {
            Some(Step::Previous)
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn in_progress(&self) -> bool {
        self.start_x.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_range() {
        assert_eq!(clamp_page(0, 5), 1);
        assert_eq!(clamp_page(-3, 5), 1);
        assert_eq!(clamp_page(99, 5), 5);
        assert_eq!(clamp_page(3, 5), 3);
    }

    #[test]
    fn arrows_on_edges_and_interior() {
        assert_eq!(Arrows::for_page(1, 4), Arrows { previous: false, next: true });
        assert_eq!(Arrows::for_page(4, 4), Arrows { previous: true, next: false });
        assert_eq!(Arrows::for_page(2, 4), Arrows { previous: true, next: true });
        assert_eq!(Arrows::for_page(1, 1), Arrows { previous: false, next: false });
    }

    #[test]
    fn keys() {
        assert_eq!(Step::from_key("ArrowLeft"), Some(Step::Previous));
        assert_eq!(Step::from_key("ArrowRight"), Some(Step::Next));
        assert_eq!(Step::from_key("ArrowUp"), None);
    }

    #[test]
    fn leftward_swipe_goes_forward() {
        let swipe = SwipeTracker::new(50.0);
        swipe.begin(300.0);
        assert_eq!(swipe.finish(240.0), Some(Step::Next));
        assert!(!swipe.in_progress());
    }

    #[test]
    fn rightward_swipe_goes_back() {
        let swipe = SwipeTracker::new(50.0);
        swipe.begin(100.0);
        assert_eq!(swipe.finish(170.0), Some(Step::Previous));
    }

    #[test]
    fn short_swipe_is_ignored_and_reset() {
        let swipe = SwipeTracker::new(50.0);
        swipe.begin(100.0);
        assert_eq!(swipe.finish(130.0), None);
        assert!(!swipe.in_progress());
        // Exactly on the threshold is not enough.
        swipe.begin(100.0);
        assert_eq!(swipe.finish(50.0), None);
    }

    #[test]
    fn end_without_start_is_ignored() {
        let swipe = SwipeTracker::new(50.0);
        assert_eq!(swipe.finish(0.0), None);
    }
}
