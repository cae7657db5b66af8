use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 12;

/// Conditions a stored color must satisfy. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorFilter {
    /// Case-insensitive literal substring of name, code or description.
    pub text: Option<String>,
    pub family: Option<String>,
    pub undertone: Option<String>,
    pub style: Option<String>,
    /// Case-insensitive equality against any suggested room.
    pub room: Option<String>,
    pub lrv_min: Option<f64>,
    pub lrv_max: Option<f64>,
}

impl ColorFilter {
    pub fn text(query: &str) -> Self {
        Self {
            text: non_blank(query),
            ..Self::default()
        }
    }
}

pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 1-based page selection. Neither field is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Rows to skip. `None` when the page sits before the first page and must
    /// come back empty.
    pub fn skip(&self) -> Option<u64> {
        let index = self.page.checked_sub(1)?;
        Some(index.saturating_mul(self.per_page))
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// `total_pages` is `ceil(total / per_page)`, and zero when `per_page` is zero.
    pub fn new(total: u64, request: PageRequest) -> Self {
        let total_pages = if request.per_page == 0 {
            0
        } else {
            total.div_ceil(request.per_page)
        };
        Self {
            total,
            page: request.page,
            per_page: request.per_page,
            total_pages,
        }
    }
}
