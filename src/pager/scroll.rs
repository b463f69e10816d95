use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tracing::debug;

use super::coordinator::{FetchCoordinator, FetchOutcome, LoadState, MergeMode};
use crate::models::PageLimit;

/// Marker placed after the last loaded row. Its visibility means "near the end of the list".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinel {
    /// Page whose rows end at this marker.
    pub page: u32,
    /// Number of rows before the marker.
    pub position: usize,
}

/// Called by a [`ProximityWatcher`] whenever the observed sentinel becomes visible.
pub type OnVisible = Arc<dyn Fn() + Send + Sync>;

/// Viewport-proximity detection, provided by whatever renders the list.
pub trait ProximityWatcher: Send + Sync {
    /// Start watching `sentinel`. Observation lasts until the returned subscription is released.
    fn observe(&self, sentinel: Sentinel, on_visible: OnVisible) -> Subscription;
}

impl<W: ProximityWatcher + ?Sized> ProximityWatcher for Arc<W> {
    fn observe(&self, sentinel: Sentinel, on_visible: OnVisible) -> Subscription {
        (**self).observe(sentinel, on_visible)
    }
}

/// Handle to an active observation. Released explicitly or on drop, exactly once.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Arming {
    active: bool,
    /// Page the sentinel was last armed for, even when nothing ended up observed.
    page: Option<u32>,
    subscription: Option<Subscription>,
    runtime: Option<Handle>,
}

struct ScrollInner {
    coordinator: FetchCoordinator,
    watcher: Box<dyn ProximityWatcher>,
    arming: Mutex<Arming>,
}

impl ScrollInner {
    fn arming(&self) -> MutexGuard<'_, Arming> {
        self.arming.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Observe a fresh sentinel if `current_page` moved since the last arming, or if the
    /// current page has no sentinel under observation yet.
    fn rearm(self: &Arc<Self>) {
        let state = self.coordinator.snapshot();

        let previous = {
            let mut arming = self.arming();
            let armed_here =
                arming.page == Some(state.current_page) && arming.subscription.is_some();
            if !arming.active || armed_here {
                return;
            }
            arming.page = Some(state.current_page);
            arming.subscription.take()
        };
        drop(previous);

        if !state.has_next_page() {
            debug!(
                page = state.current_page,
                total_pages = state.total_pages,
                "Last page loaded; sentinel not observed"
            );
            return;
        }

        let sentinel = Sentinel {
            page: state.current_page,
            position: state.items.len(),
        };
        let subscription = self.watcher.observe(sentinel, self.visibility_callback());
        debug!(?sentinel, "Sentinel armed");

        let mut arming = self.arming();
        let stale = if arming.active
            && arming.page == Some(state.current_page)
            && arming.subscription.is_none()
        {
            arming.subscription = Some(subscription);
            None
        } else {
            Some(subscription)
        };
        drop(arming);
        drop(stale);
    }

    fn visibility_callback(self: &Arc<Self>) -> OnVisible {
        let inner = Arc::downgrade(self);
        Arc::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.on_visible();
            }
        })
    }

    fn on_visible(self: &Arc<Self>) {
        let runtime = {
            let arming = self.arming();
            if !arming.active {
                return;
            }
            arming.runtime.clone()
        };
        let Some(runtime) = runtime else {
            return;
        };

        // Claimed synchronously so a burst of signals yields a single request.
        let ticket = match self.coordinator.begin_next(MergeMode::Append) {
            Ok(ticket) => ticket,
            Err(reason) => {
                debug!(?reason, "Sentinel visible; nothing to fetch");
                return;
            }
        };

        let inner = Arc::clone(self);
        runtime.spawn(async move {
            inner.coordinator.run(ticket).await;
            inner.rearm();
        });
    }

    fn teardown(&self) {
        let (subscription, runtime) = {
            let mut arming = self.arming();
            arming.active = false;
            arming.page = None;
            (arming.subscription.take(), arming.runtime.take())
        };
        drop(subscription);
        drop(runtime);
    }
}

/// Infinite scroll: each time the sentinel comes into view the next page is appended.
///
/// The watcher is armed once per `current_page` transition and released on teardown or drop,
/// after which visibility signals are ignored. Fetches already in flight still complete.
pub struct InfiniteScroll {
    inner: Arc<ScrollInner>,
}

impl InfiniteScroll {
    pub fn new(coordinator: FetchCoordinator, watcher: impl ProximityWatcher + 'static) -> Self {
        Self {
            inner: Arc::new(ScrollInner {
                coordinator,
                watcher: Box::new(watcher),
                arming: Mutex::new(Arming::default()),
            }),
        }
    }

    pub fn coordinator(&self) -> &FetchCoordinator {
        &self.inner.coordinator
    }

    pub fn state(&self) -> LoadState {
        self.inner.coordinator.snapshot()
    }

    pub fn is_active(&self) -> bool {
        self.inner.arming().active
    }

    /// Load page 1 and start watching. Must be called from within a tokio runtime; later
    /// scroll-triggered fetches are spawned onto it.
    pub async fn activate(&self) -> FetchOutcome {
        {
            let mut arming = self.inner.arming();
            arming.active = true;
            arming.runtime = Some(Handle::current());
        }
        let outcome = self
            .inner
            .coordinator
            .request_page(1, MergeMode::Replace)
            .await;
        self.inner.rearm();
        outcome
    }

    /// Drop the accumulated list and restart from page 1 under `limit`.
    pub async fn set_limit(&self, limit: PageLimit) -> FetchOutcome {
        self.inner.coordinator.reset_limit(limit, true);
        let previous = self.inner.arming().page.take();
        debug!(?previous, limit = limit.get(), "Limit changed; pagination restarted");

        let outcome = self
            .inner
            .coordinator
            .request_page(1, MergeMode::Replace)
            .await;
        self.inner.rearm();
        outcome
    }

    /// Release the watcher. Idempotent.
    pub fn teardown(&self) {
        self.inner.teardown();
    }
}

impl Drop for InfiniteScroll {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}
