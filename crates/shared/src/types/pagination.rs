//! Limit/offset pagination for list endpoints.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Upper bound applied to any requested page size.
pub const MAX_LIMIT: u64 = 1000;

/// Raw pagination parameters as received from a query string.
///
/// Signed so that negative values can be rejected with a validation error
/// instead of a deserialization failure.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return.
    pub limit: Option<i64>,
    /// Number of items to skip.
    pub offset: Option<i64>,
}

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Number of items to return.
    pub limit: u64,
    /// Number of items to skip.
    pub offset: u64,
}

impl PageRequest {
    /// Creates a request from explicit values.
    #[must_use]
    pub const fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    /// Resolves the request into a page, falling back to `default_limit`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if limit or offset is negative.
    pub fn resolve(&self, default_limit: u64) -> AppResult<Page> {
        let limit = match self.limit {
            None => default_limit,
            Some(v) => u64::try_from(v)
                .map_err(|_| AppError::Validation("limit must not be negative".to_string()))?,
        };
        let offset = match self.offset {
            None => 0,
            Some(v) => u64::try_from(v)
                .map_err(|_| AppError::Validation("offset must not be negative".to_string()))?,
        };

        Ok(Page {
            limit: limit.min(MAX_LIMIT),
            offset,
        })
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
