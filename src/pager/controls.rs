use tracing::debug;

use super::coordinator::{FetchCoordinator, FetchOutcome, LoadState, MergeMode};
use crate::models::PageLimit;

/// Explicit page navigation: every fetch replaces the list.
#[derive(Clone)]
pub struct PageControls {
    coordinator: FetchCoordinator,
}

impl PageControls {
    pub fn new(coordinator: FetchCoordinator) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &FetchCoordinator {
        &self.coordinator
    }

    pub fn state(&self) -> LoadState {
        self.coordinator.snapshot()
    }

    /// Load the first page. Call once when the view becomes active.
    pub async fn activate(&self) -> FetchOutcome {
        self.coordinator.request_page(1, MergeMode::Replace).await
    }

    /// Pages below 1 or past the known last page are ignored.
    pub async fn go_to_page(&self, page: u32) -> FetchOutcome {
        let outcome = self.coordinator.request_page(page, MergeMode::Replace).await;
        if let FetchOutcome::Skipped(reason) = outcome {
            debug!(page, ?reason, "Page change rejected");
        }
        outcome
    }

    pub async fn next_page(&self) -> FetchOutcome {
        let current = self.coordinator.current_page();
        self.go_to_page(current.saturating_add(1)).await
    }

    pub async fn previous_page(&self) -> FetchOutcome {
        let current = self.coordinator.current_page();
        self.go_to_page(current.saturating_sub(1)).await
    }

    pub fn has_next_page(&self) -> bool {
        self.coordinator.inspect(LoadState::has_next_page)
    }

    pub fn has_previous_page(&self) -> bool {
        self.coordinator.inspect(LoadState::has_previous_page)
    }

    /// Change the page size. Pagination always restarts from page 1.
    pub async fn set_limit(&self, limit: PageLimit) -> FetchOutcome {
        self.coordinator.reset_limit(limit, false);
        self.coordinator.request_page(1, MergeMode::Replace).await
    }
}
