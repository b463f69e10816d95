use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::models::{PageLimit, PageRequest, PageResponse, UserRecord};
use crate::source::{FetchError, PageSource};

/// How a fetched page is merged into the item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// The page's users replace the list (explicit pagination).
    Replace,
    /// The page's users are appended in arrival order, duplicates included (infinite scroll).
    Append,
}

/// Everything a renderer needs. Only the coordinator mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState {
    pub items: Vec<UserRecord>,
    pub current_page: u32,
    /// Zero until the first response arrives.
    pub total_pages: u32,
    pub total_count: u64,
    pub limit: PageLimit,
    pub is_loading: bool,
}

impl LoadState {
    pub fn new(limit: PageLimit) -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 0,
            total_count: 0,
            limit,
            is_loading: false,
        }
    }

    pub fn total_pages_known(&self) -> bool {
        self.total_pages > 0
    }

    /// Whether `page` may be requested given what is known about the listing.
    pub fn accepts_page(&self, page: u32) -> Result<(), SkipReason> {
        if page < 1 {
            return Err(SkipReason::InvalidPage(page));
        }
        if self.total_pages_known() && page > self.total_pages {
            return Err(SkipReason::PastLastPage {
                page,
                total_pages: self.total_pages,
            });
        }
        Ok(())
    }

    pub fn has_next_page(&self) -> bool {
        self.total_pages_known() && self.current_page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    fn merge(&mut self, response: PageResponse, mode: MergeMode) {
        match mode {
            MergeMode::Replace => self.items = response.users,
            MergeMode::Append => self.items.extend(response.users),
        }
        self.current_page = response.current_page;
        self.total_pages = response.total_pages;
        self.total_count = response.total_users;
    }
}

/// Why a trigger did not produce a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another fetch holds the loading flag.
    InFlight,
    InvalidPage(u32),
    PastLastPage { page: u32, total_pages: u32 },
    /// No page after the current one, or the page count is not known yet.
    Exhausted,
}

/// Result of one trigger, for callers that want to know. Errors stay inside the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { page: u32, received: usize },
    Skipped(SkipReason),
    Failed,
}

/// Clears `is_loading` when dropped, whatever happened to the fetch.
struct LoadingGuard {
    state: Option<Arc<watch::Sender<LoadState>>>,
}

impl LoadingGuard {
    /// Apply `update` and clear the flag in a single publication.
    fn release_with(mut self, update: impl FnOnce(&mut LoadState)) {
        if let Some(state) = self.state.take() {
            state.send_modify(|s| {
                update(s);
                s.is_loading = false;
            });
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            state.send_modify(|s| s.is_loading = false);
        }
    }
}

/// A claimed fetch: the loading flag is held until the ticket is run or dropped.
pub struct FetchTicket {
    request: PageRequest,
    mode: MergeMode,
    guard: LoadingGuard,
}

impl FetchTicket {
    pub fn request(&self) -> PageRequest {
        self.request
    }

    pub fn mode(&self) -> MergeMode {
        self.mode
    }
}

/// Issues page requests and owns the resulting [`LoadState`].
///
/// At most one fetch is in flight. The `is_loading` flag lives in the watched state and is
/// claimed with a check-and-set, so triggers arriving while a fetch runs are dropped instead of
/// queued. There is no cancellation and no timeout: a claimed fetch runs to completion.
#[derive(Clone)]
pub struct FetchCoordinator {
    source: Arc<dyn PageSource>,
    state: Arc<watch::Sender<LoadState>>,
}

impl FetchCoordinator {
    pub fn new(source: impl PageSource + 'static, limit: PageLimit) -> Self {
        Self::with_source(Arc::new(source), limit)
    }

    pub fn with_source(source: Arc<dyn PageSource>, limit: PageLimit) -> Self {
        let (state, _) = watch::channel(LoadState::new(limit));
        Self {
            source,
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// Read the current state without cloning the item list.
    pub fn inspect<R>(&self, read: impl FnOnce(&LoadState) -> R) -> R {
        read(&self.state.borrow())
    }

    pub fn is_loading(&self) -> bool {
        self.inspect(|s| s.is_loading)
    }

    pub fn current_page(&self) -> u32 {
        self.inspect(|s| s.current_page)
    }

    pub fn limit(&self) -> PageLimit {
        self.inspect(|s| s.limit)
    }

    /// Claim the loading flag for `page` under the current limit.
    pub fn begin(&self, page: u32, mode: MergeMode) -> Result<FetchTicket, SkipReason> {
        self.claim(mode, |state| state.accepts_page(page).map(|()| page))
    }

    /// Claim the loading flag for the page after `current_page`.
    pub fn begin_next(&self, mode: MergeMode) -> Result<FetchTicket, SkipReason> {
        self.claim(mode, |state| {
            if state.has_next_page() {
                Ok(state.current_page + 1)
            } else {
                Err(SkipReason::Exhausted)
            }
        })
    }

    fn claim(
        &self,
        mode: MergeMode,
        pick: impl FnOnce(&LoadState) -> Result<u32, SkipReason>,
    ) -> Result<FetchTicket, SkipReason> {
        let mut claimed = Err(SkipReason::InFlight);
        self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            claimed = pick(state).map(|page| PageRequest::new(page, state.limit));
            if claimed.is_ok() {
                state.is_loading = true;
            }
            claimed.is_ok()
        });

        let request = claimed?;
        debug!(page = request.page, limit = request.limit.get(), ?mode, "Fetch claimed");
        Ok(FetchTicket {
            request,
            mode,
            guard: LoadingGuard {
                state: Some(Arc::clone(&self.state)),
            },
        })
    }

    /// Perform a claimed fetch and merge the response.
    pub async fn run(&self, ticket: FetchTicket) -> FetchOutcome {
        let FetchTicket {
            request,
            mode,
            guard,
        } = ticket;

        match self.source.fetch_page(request).await.and_then(consistent) {
            Ok(response) => {
                let page = response.current_page;
                let received = response.users.len();
                guard.release_with(|state| state.merge(response, mode));
                info!(page, received, ?mode, "Users page applied");
                FetchOutcome::Applied { page, received }
            }
            Err(e) => {
                drop(guard);
                error!(
                    page = request.page,
                    limit = request.limit.get(),
                    "Error fetching users: {e}"
                );
                FetchOutcome::Failed
            }
        }
    }

    /// Fetch `page` and merge it with `mode`. A no-op while another fetch is in flight or when
    /// `page` is outside the known range.
    pub async fn request_page(&self, page: u32, mode: MergeMode) -> FetchOutcome {
        match self.begin(page, mode) {
            Ok(ticket) => self.run(ticket).await,
            Err(reason) => {
                debug!(page, ?reason, "Page request skipped");
                FetchOutcome::Skipped(reason)
            }
        }
    }

    /// Switch the page size and restart pagination at page 1. Applies even while a fetch is in
    /// flight; that fetch still merges when it completes.
    pub fn reset_limit(&self, limit: PageLimit, clear_items: bool) {
        self.state.send_modify(|state| {
            state.limit = limit;
            state.current_page = 1;
            if clear_items {
                state.items.clear();
            }
        });
    }
}

fn consistent(response: PageResponse) -> Result<PageResponse, FetchError> {
    let out_of_range = response.current_page == 0
        || (response.total_pages > 0 && response.current_page > response.total_pages);
    if out_of_range {
        return Err(FetchError::PageOutOfRange {
            current_page: response.current_page,
            total_pages: response.total_pages,
        });
    }
    Ok(response)
}
