//! 1-based pagination for list queries.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Which slice of a list to return. `page` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page:  u32,
  pub limit: u32,
}

impl Default for PageRequest {
  fn default() -> Self { Self { page: 1, limit: DEFAULT_PAGE_LIMIT } }
}

impl PageRequest {
  /// Clamp to `page >= 1` and `1 <= limit <= MAX_PAGE_LIMIT`.
  pub fn new(page: u32, limit: u32) -> Self {
    Self { page: page.max(1), limit: limit.clamp(1, MAX_PAGE_LIMIT) }
  }

  pub fn offset(&self) -> u64 {
    u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
  }

  pub fn total_pages(&self, total: u64) -> u64 {
    total.div_ceil(u64::from(self.limit.max(1)))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
  pub total:       u64,
  pub page:        u32,
  pub total_pages: u64,
}

/// One page of rows plus the counts a pager needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  pub data: Vec<T>,
  pub meta: PageMeta,
}

impl<T> Page<T> {
  pub fn new(data: Vec<T>, total: u64, req: PageRequest) -> Self {
    Self {
      data,
      meta: PageMeta {
        total,
        page: req.page,
        total_pages: req.total_pages(total),
      },
    }
  }

  /// Slice an in-memory list the way a store would.
  pub fn from_slice(rows: &[T], req: PageRequest) -> Self
  where
    T: Clone,
  {
    let start = usize::try_from(req.offset()).unwrap_or(usize::MAX);
    let data = rows
      .iter()
      .skip(start)
      .take(req.limit as usize)
      .cloned()
      .collect();
    Self::new(data, rows.len() as u64, req)
  }
}
