//! Shared fixtures: a simulated users listing and a watcher that reports every arming.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Semaphore, mpsc};

use user_pager::models::{PageRequest, PageResponse, UserRecord, field_text};
use user_pager::pager::{OnVisible, ProximityWatcher, Sentinel, SentinelSignal, Subscription};
use user_pager::source::{FetchError, PageSource};

/// In-memory listing of `total_users` users with ids `1..=total_users`.
pub struct FakeListing {
    total_users: u64,
    requests: Mutex<Vec<PageRequest>>,
    failing_pages: Mutex<HashSet<u32>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeListing {
    pub fn new(total_users: u64) -> Arc<Self> {
        Arc::new(Self::build(total_users, None))
    }

    /// Every fetch waits for one permit on the returned semaphore.
    pub fn gated(total_users: u64) -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (
            Arc::new(Self::build(total_users, Some(Arc::clone(&gate)))),
            gate,
        )
    }

    fn build(total_users: u64, gate: Option<Arc<Semaphore>>) -> Self {
        Self {
            total_users,
            requests: Mutex::new(Vec::new()),
            failing_pages: Mutex::new(HashSet::new()),
            gate,
        }
    }

    pub fn fail_page(&self, page: u32) {
        self.failing_pages.lock().unwrap().insert(page);
    }

    pub fn heal_page(&self, page: u32) {
        self.failing_pages.lock().unwrap().remove(&page);
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn page(&self, request: PageRequest) -> PageResponse {
        let limit = u64::from(request.limit.get());
        let total_pages = self.total_users.div_ceil(limit) as u32;
        let first = (u64::from(request.page) - 1) * limit + 1;
        let last = (u64::from(request.page) * limit).min(self.total_users);
        PageResponse {
            users: (first..=last).map(|id| user(id as i64)).collect(),
            current_page: request.page,
            total_pages,
            total_users: self.total_users,
        }
    }
}

#[async_trait]
impl PageSource for FakeListing {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResponse, FetchError> {
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if self.failing_pages.lock().unwrap().contains(&request.page) {
            return Err(FetchError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(self.page(request))
    }
}

pub fn user(id: i64) -> UserRecord {
    let mut record = UserRecord::with_id(id);
    record.first_name = format!("First{id}").into();
    record.last_name = format!("Last{id}").into();
    record.email = format!("user{id}@example.com").into();
    record.branch = "CSE".into();
    record.age = 20.into();
    record
}

pub fn ids(users: &[UserRecord]) -> Vec<String> {
    users.iter().map(|u| field_text(&u.id).into_owned()).collect()
}

/// Wraps [`SentinelSignal`], reporting each observed sentinel and counting releases.
pub struct RecordingWatcher {
    signal: SentinelSignal,
    armed: mpsc::UnboundedSender<Sentinel>,
    observed: AtomicUsize,
    released: Arc<AtomicUsize>,
}

impl RecordingWatcher {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Sentinel>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher = Arc::new(Self {
            signal: SentinelSignal::new(),
            armed: tx,
            observed: AtomicUsize::new(0),
            released: Arc::new(AtomicUsize::new(0)),
        });
        (watcher, rx)
    }

    /// Report the sentinel visible; `false` if nothing is observed.
    pub fn fire(&self) -> bool {
        self.signal.notify_visible()
    }

    pub fn armed_sentinel(&self) -> Option<Sentinel> {
        self.signal.armed_sentinel()
    }

    pub fn observed(&self) -> usize {
        self.observed.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl ProximityWatcher for RecordingWatcher {
    fn observe(&self, sentinel: Sentinel, on_visible: OnVisible) -> Subscription {
        self.observed.fetch_add(1, Ordering::SeqCst);
        let inner = self.signal.observe(sentinel, on_visible);
        let _ = self.armed.send(sentinel);

        let released = Arc::clone(&self.released);
        Subscription::new(move || {
            released.fetch_add(1, Ordering::SeqCst);
            inner.release();
        })
    }
}
