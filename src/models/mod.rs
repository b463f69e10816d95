pub mod users;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use users::{PageResponse, UserRecord, field_text};

/// Page sizes offered by the limit selector.
pub const LIMIT_OPTIONS: [u32; 4] = [10, 20, 30, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("page limit {0} is not one of 10, 20, 30, 50")]
pub struct LimitError(pub u32);

/// Number of users requested per page. Only the values in [`LIMIT_OPTIONS`] are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageLimit(u32);

impl PageLimit {
    pub const DEFAULT: Self = Self(10);

    pub fn new(value: u32) -> Result<Self, LimitError> {
        if LIMIT_OPTIONS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(LimitError(value))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Every selectable limit, smallest first.
    pub fn options() -> impl Iterator<Item = PageLimit> {
        LIMIT_OPTIONS.into_iter().map(Self)
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageLimit {
    type Error = LimitError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageLimit> for u32 {
    fn from(limit: PageLimit) -> Self {
        limit.0
    }
}

impl fmt::Display for PageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Query sent to the listing endpoint: `?page=<int>&limit=<int>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: PageLimit,
}

impl PageRequest {
    pub fn new(page: u32, limit: PageLimit) -> Self {
        Self { page, limit }
    }
}
