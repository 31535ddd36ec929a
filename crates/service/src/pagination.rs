//! Pagination utilities for service layer
//!
//! `skip`/`limit` query parameters with per-endpoint defaults and caps.

use serde::Deserialize;

/// Raw offset/limit as received from a query string.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Self {
        Self { skip, limit }
    }

    /// Clamp to `(offset, limit)` with `limit` in `1..=max_limit`.
    pub fn normalize(self, default_limit: u64, max_limit: u64) -> (u64, u64) {
        let skip = self.skip.unwrap_or(0).max(0) as u64;
        let limit = match self.limit {
            Some(l) => (l.max(1) as u64).min(max_limit),
            None => default_limit.min(max_limit),
        };
        (skip, limit)
    }
}

/// Job and application listings.
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Applications driven by one automation.
pub const AUTOMATION_JOBS_DEFAULT_LIMIT: u64 = 100;
pub const AUTOMATION_JOBS_MAX_LIMIT: u64 = 200;
