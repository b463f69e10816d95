//! Where pages come from.
//!
//! The pager never talks to the network directly: it asks a [`PageSource`] for one page at a
//! time. [`HttpPageSource`] is the production implementation; [`from_fn`] wraps any async
//! closure, which is how fakes and alternate transports plug in.

pub mod http;

pub use http::HttpPageSource;

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{PageRequest, PageResponse};

/// Transport or decode failure while fetching a page. The only error kind the pager knows.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to listing endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("listing endpoint answered HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("listing payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("listing reported page {current_page} of {total_pages}")]
    PageOutOfRange { current_page: u32, total_pages: u32 },
}

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch a single page. Retries and authentication are the implementation's business.
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResponse, FetchError>;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResponse, FetchError> {
        (**self).fetch_page(request).await
    }
}

/// A [`PageSource`] backed by an async closure.
pub struct FnSource<F> {
    fetch: F,
}

/// Build a [`PageSource`] from `fetchPage(request) -> Future<Result<PageResponse, FetchError>>`.
pub fn from_fn<F, Fut>(fetch: F) -> FnSource<F>
where
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageResponse, FetchError>> + Send,
{
    FnSource { fetch }
}

#[async_trait]
impl<F, Fut> PageSource for FnSource<F>
where
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageResponse, FetchError>> + Send,
{
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResponse, FetchError> {
        (self.fetch)(request).await
    }
}
