//! Offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 25;
pub const MAX_PER_PAGE: u32 = 100;

/// `?per-page=&page=` query parameters. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_per_page", rename = "per-page")]
    pub per_page: u32,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn first_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page: 1,
        }
    }
}

impl PageRequest {
    /// Bounds raw query input: `per_page` into `1..=MAX_PER_PAGE`, `page` to at least 1.
    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
            page: self.page.max(1),
        }
    }

    pub fn limit(self) -> u64 {
        u64::from(self.per_page)
    }

    /// Rows skipped before this page.
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * self.limit()
    }
}
