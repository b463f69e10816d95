use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{LimitError, PageLimit};

pub const DEFAULT_LISTING_URL: &str = "https://pagination-backend.vercel.app/api/users";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number, got {value:?}")]
    NotANumber { var: &'static str, value: String },
    #[error("USERS_PAGE_LIMIT is invalid: {0}")]
    Limit(#[from] LimitError),
    #[error("USERS_PAGING_MODE must be `pages` or `scroll`, got {0:?}")]
    Mode(String),
}

/// Which trigger source drives the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingMode {
    /// Explicit page and limit controls; each page replaces the list.
    #[default]
    Pages,
    /// Infinite scroll; each page is appended to the list.
    Scroll,
}

impl FromStr for PagingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pages" | "paged" => Ok(PagingMode::Pages),
            "scroll" | "infinite" => Ok(PagingMode::Scroll),
            _ => Err(ConfigError::Mode(s.to_string())),
        }
    }
}

/// Listing endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingConfig {
    pub endpoint: String,
    pub limit: PageLimit,
    pub mode: PagingMode,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LISTING_URL.to_string(),
            limit: PageLimit::DEFAULT,
            mode: PagingMode::default(),
        }
    }
}

impl ListingConfig {
    /// Read `USERS_API_URL`, `USERS_PAGE_LIMIT` and `USERS_PAGING_MODE`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let endpoint = lookup("USERS_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.endpoint);

        let limit = match lookup("USERS_PAGE_LIMIT") {
            Some(raw) => {
                let value: u32 = raw.trim().parse().map_err(|_| ConfigError::NotANumber {
                    var: "USERS_PAGE_LIMIT",
                    value: raw.clone(),
                })?;
                PageLimit::new(value)?
            }
            None => defaults.limit,
        };

        let mode = match lookup("USERS_PAGING_MODE") {
            Some(raw) => raw.parse()?,
            None => defaults.mode,
        };

        Ok(Self {
            endpoint,
            limit,
            mode,
        })
    }
}
