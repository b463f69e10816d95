//! Incremental loading of the users listing.
//!
//! [`FetchCoordinator`] owns the [`LoadState`] and guarantees a single fetch in flight.
//! Two trigger sources sit on top of it and are used one at a time:
//! [`PageControls`] for explicit page/limit navigation and [`InfiniteScroll`] for
//! sentinel-driven appending.

pub mod controls;
pub mod coordinator;
pub mod scroll;
pub mod signal;

pub use controls::PageControls;
pub use coordinator::{
    FetchCoordinator, FetchOutcome, FetchTicket, LoadState, MergeMode, SkipReason,
};
pub use scroll::{InfiniteScroll, OnVisible, ProximityWatcher, Sentinel, Subscription};
pub use signal::SentinelSignal;
