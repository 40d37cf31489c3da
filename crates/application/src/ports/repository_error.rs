//! Types shared by the repository ports.

use serde::Deserialize;

/// Errors that can occur in any repository.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A uniqueness constraint would be violated.
    #[error("{0}")]
    Conflict(String),

    /// The record refers to something it may not link to.
    #[error("{0}")]
    Invalid(String),

    /// The backing store failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Offset pagination for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    /// Number of records to skip.
    #[serde(default)]
    pub skip: usize,
    /// Maximum number of records to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

const fn default_limit() -> usize {
    100
}

impl Page {
    /// Creates a page.
    #[must_use]
    pub const fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    /// Applies the page to an ordered iterator.
    pub fn apply<T>(self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().skip(self.skip).take(self.limit).collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, default_limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_apply() {
        assert_eq!(Page::new(1, 2).apply(1..=5), vec![2, 3]);
        assert_eq!(Page::new(10, 2).apply(1..=5), Vec::<i32>::new());
        assert_eq!(Page::default().limit, 100);
    }
}
