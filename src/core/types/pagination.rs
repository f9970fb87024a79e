//! Pagination metadata returned by list endpoints

use serde::{Deserialize, Serialize};

/// Pagination block of a successful response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    /// Page number (starts from 1)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total count
    pub total: Option<u64>,
    /// Total pages
    pub total_pages: Option<u32>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            total: None,
            total_pages: None,
        }
    }
}

impl Pagination {
    /// Calculate offset
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1) * self.limit
    }

    /// Whether another page follows this one
    pub fn has_next(&self) -> bool {
        match self.total_pages {
            Some(total_pages) => self.page < total_pages,
            None => false,
        }
    }
}
