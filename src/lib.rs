pub mod config;
pub mod models;
pub mod pager;
pub mod source;

pub use config::ListingConfig;
pub use pager::{FetchCoordinator, InfiniteScroll, PageControls};
pub use source::{HttpPageSource, PageSource};
