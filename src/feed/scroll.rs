// SPDX-License-Identifier: MPL-2.0

//! Debounced "near bottom" detection for the feed container.
//!
//! Raw scroll signals arrive far more often than pages can be fetched. Each
//! signal cancels the pending check and schedules a new one; only when the
//! container has been quiet for the full interval is its geometry examined.

use crate::feed::busy::BusyIndicator;
use crate::network::Filter;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Scroll metrics of the feed container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollGeometry {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollGeometry {
    pub fn distance_from_bottom(&self) -> f64 {
        self.scroll_height - (self.viewport_height + self.scroll_top)
    }
}

/// Request for the next page, stamped with the filter that was active
/// when the user scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMore {
    pub filter: Filter,
}

/// A single cancellable deferred action. Scheduling replaces whatever
/// was pending.
#[derive(Debug, Default)]
pub struct Deferred {
    pending: Option<JoinHandle<()>>,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay` unless cancelled or rescheduled first.
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct ScrollTrigger {
    quiet: Duration,
    threshold: f64,
    geometry: watch::Sender<ScrollGeometry>,
    pending: Deferred,
    events: mpsc::UnboundedSender<LoadMore>,
    busy: BusyIndicator,
}

impl ScrollTrigger {
    /// Build a trigger and the receiver its `LoadMore` events arrive on.
    pub fn new(
        quiet: Duration,
        threshold: f64,
        busy: BusyIndicator,
    ) -> (Self, mpsc::UnboundedReceiver<LoadMore>) {
        let (events, rx) = mpsc::unbounded_channel();
        let (geometry, _) = watch::channel(ScrollGeometry::default());

        let trigger = Self {
            quiet,
            threshold,
            geometry,
            pending: Deferred::new(),
            events,
            busy,
        };

        (trigger, rx)
    }

    /// Feed one raw scroll signal.
    pub fn on_scroll(&mut self, geometry: ScrollGeometry, filter: Filter) {
        log::trace!("Scroll at {}", geometry.scroll_top);
        self.geometry.send_replace(geometry);

        let latest = self.geometry.subscribe();
        let events = self.events.clone();
        let busy = self.busy.clone();
        let threshold = self.threshold;

        self.pending.schedule(self.quiet, move || {
            if busy.is_busy() {
                log::debug!("Load already in flight, not triggering another");
                return;
            }

            let distance = latest.borrow().distance_from_bottom();
            if distance < threshold {
                log::debug!("Near bottom ({distance}px), loading more {filter} posts");
                let _ = events.send(LoadMore { filter });
            }
        });
    }

    /// Update the container metrics without counting as a scroll, e.g.
    /// after appended posts made the content taller.
    pub fn set_geometry(&self, geometry: ScrollGeometry) {
        self.geometry.send_replace(geometry);
    }

    pub fn cancel(&mut self) {
        self.pending.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(200);

    fn near_bottom() -> ScrollGeometry {
        ScrollGeometry {
            scroll_top: 850.0,
            scroll_height: 1000.0,
            viewport_height: 100.0,
        }
    }

    fn far_from_bottom() -> ScrollGeometry {
        ScrollGeometry {
            scroll_top: 0.0,
            scroll_height: 1000.0,
            viewport_height: 100.0,
        }
    }

    #[test]
    fn test_distance_from_bottom() {
        assert_eq!(near_bottom().distance_from_bottom(), 50.0);
        assert_eq!(far_from_bottom().distance_from_bottom(), 900.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_once() {
        let (mut trigger, mut rx) = ScrollTrigger::new(QUIET, 100.0, BusyIndicator::new());

        for _ in 0..3 {
            trigger.on_scroll(near_bottom(), Filter::AllPosts);
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(
            rx.try_recv().ok(),
            Some(LoadMore {
                filter: Filter::AllPosts
            })
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_before_quiet_period() {
        let (mut trigger, mut rx) = ScrollTrigger::new(QUIET, 100.0, BusyIndicator::new());

        trigger.on_scroll(near_bottom(), Filter::AllPosts);
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(rx.try_recv().is_err());
        assert!(trigger.is_pending());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_far_from_bottom_is_silent() {
        let (mut trigger, mut rx) = ScrollTrigger::new(QUIET, 100.0, BusyIndicator::new());

        trigger.on_scroll(far_from_bottom(), Filter::MyPosts);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_geometry_read_when_check_fires() {
        let (mut trigger, mut rx) = ScrollTrigger::new(QUIET, 100.0, BusyIndicator::new());

        trigger.on_scroll(near_bottom(), Filter::AllPosts);
        // Content grew before the check ran; no longer near the bottom.
        trigger.set_geometry(far_from_bottom());
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_suppresses_emission() {
        let busy = BusyIndicator::new();
        let (mut trigger, mut rx) = ScrollTrigger::new(QUIET, 100.0, busy.clone());

        let guard = busy.hold();
        trigger.on_scroll(near_bottom(), Filter::AllPosts);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err());

        drop(guard);
        trigger.on_scroll(near_bottom(), Filter::AllPosts);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_check() {
        let (mut trigger, mut rx) = ScrollTrigger::new(QUIET, 100.0, BusyIndicator::new());

        trigger.on_scroll(near_bottom(), Filter::AllPosts);
        trigger.cancel();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err());
        assert!(!trigger.is_pending());
    }
}
