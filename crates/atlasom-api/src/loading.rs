// Loading indicator reference count
//
// Every request that wants a loading indicator bumps the count on start and
// drops it on completion. Visibility flips only on the 0 -> 1 and 1 -> 0
// edges, so overlapping requests keep one indicator up until the last one
// finishes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::trace;

/// Shared in-flight counter plus a `watch` channel publishing visibility.
#[derive(Debug)]
pub struct LoadingTracker {
    count: AtomicUsize,
    visible: watch::Sender<bool>,
}

impl Default for LoadingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingTracker {
    pub fn new() -> Self {
        let (visible, _) = watch::channel(false);
        Self {
            count: AtomicUsize::new(0),
            visible,
        }
    }

    /// Register one more in-flight request.
    pub fn show(&self) {
        let previous = self.count.fetch_add(1, Ordering::AcqRel);
        trace!(count = previous + 1, "loading show");
        if previous == 0 {
            self.visible.send_replace(true);
        }
    }

    /// Release one in-flight request. Extra calls at zero are ignored.
    pub fn hide(&self) {
        let result = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        match result {
            Ok(1) => {
                trace!(count = 0, "loading hide");
                self.visible.send_replace(false);
            }
            Ok(previous) => trace!(count = previous - 1, "loading hide"),
            Err(_) => trace!("loading hide with nothing in flight"),
        }
    }

    /// `show()` now, `hide()` when the guard is dropped.
    pub fn guard(self: &Arc<Self>) -> LoadingGuard {
        self.show();
        LoadingGuard {
            tracker: Arc::clone(self),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.borrow()
    }

    /// Receiver that observes visibility changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.visible.subscribe()
    }
}

/// RAII handle pairing exactly one `show` with one `hide`.
///
/// Dropping the guard (completion, error, or the request future being
/// abandoned) releases the count.
#[derive(Debug)]
#[must_use = "dropping the guard immediately hides the indicator"]
pub struct LoadingGuard {
    tracker: Arc<LoadingTracker>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.tracker.hide();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn visible_while_any_request_in_flight() {
        let tracker = LoadingTracker::new();
        assert!(!tracker.is_visible());

        tracker.show();
        tracker.show();
        assert!(tracker.is_visible());
        assert_eq!(tracker.count(), 2);

        tracker.hide();
        assert!(tracker.is_visible(), "one request still in flight");

        tracker.hide();
        assert!(!tracker.is_visible());
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn extra_hide_does_not_underflow() {
        let tracker = LoadingTracker::new();
        tracker.hide();
        assert_eq!(tracker.count(), 0);

        tracker.show();
        tracker.hide();
        tracker.hide();
        assert_eq!(tracker.count(), 0);
        assert!(!tracker.is_visible());

        tracker.show();
        assert!(tracker.is_visible());
    }

    #[test]
    fn guard_releases_on_drop() {
        let tracker = Arc::new(LoadingTracker::new());
        {
            let _a = tracker.guard();
            let _b = tracker.guard();
            assert_eq!(tracker.count(), 2);
        }
        assert_eq!(tracker.count(), 0);
        assert!(!tracker.is_visible());
    }

    #[test]
    fn subscribers_only_see_edges() {
        let tracker = LoadingTracker::new();
        let mut rx = tracker.subscribe();
        assert!(!rx.has_changed().unwrap());

        tracker.show();
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());

        tracker.show();
        tracker.hide();
        assert!(!rx.has_changed().unwrap(), "1 -> 2 -> 1 is not an edge");

        tracker.hide();
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());
    }

    #[test]
    fn guard_released_when_future_is_abandoned() {
        let tracker = Arc::new(LoadingTracker::new());
        let pending = {
            let tracker = Arc::clone(&tracker);
            async move {
                let _guard = tracker.guard();
                std::future::pending::<()>().await;
            }
        };
        let mut task = tokio_test::task::spawn(pending);
        assert!(task.poll().is_pending());
        assert_eq!(tracker.count(), 1);
        drop(task);
        assert_eq!(tracker.count(), 0);
    }
}
