use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 800;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be at least 1")]
    ZeroPage,

    #[error("page_size must be at least 1")]
    ZeroPageSize,
}

/// Offset-based page selection. Pages are 1-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Build from optional request values, falling back to the defaults.
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Result<Self, PaginationError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 {
            return Err(PaginationError::ZeroPage);
        }
        if page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self { page, page_size })
    }

    /// A single-row window, used for lookups by identifier.
    pub fn first() -> Self {
        Self {
            page: 1,
            page_size: 1,
        }
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// One page of rows plus the total number of rows matching the filter.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub total_items: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn into_first(self) -> Option<T> {
        self.items.into_iter().next()
    }
}
