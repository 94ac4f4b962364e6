//! Search option validation.
//!
//! Slack caps both the page size and the page index at 100. Validation runs
//! before the transport is constructed or called.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest page size the search endpoints accept.
pub const MAX_COUNT: i64 = 100;

/// Largest page index the search endpoints accept.
pub const MAX_PAGE: i64 = 100;

/// Rejected search options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `count` outside `1..=100`.
    #[error("count must be between 1 and 100")]
    InvalidCount(i64),

    /// `page` outside `1..=100`.
    #[error("page must be between 1 and 100")]
    InvalidPage(i64),

    /// `sort` is neither `score` nor `timestamp`.
    #[error("sort must be 'score' or 'timestamp'")]
    InvalidSort(String),

    /// `sort-dir` is neither `asc` nor `desc`.
    #[error("sort-dir must be 'asc' or 'desc'")]
    InvalidSortDirection(String),
}

/// Field the API ranks matches by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Relevance score.
    #[default]
    Score,
    /// Message or file timestamp.
    Timestamp,
}

impl SortBy {
    /// Wire value sent as the `sort` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Timestamp => "timestamp",
        }
    }
}

impl FromStr for SortBy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(Self::Score),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(ValidationError::InvalidSort(other.to_string())),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering applied to the sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortDirection {
    /// Wire value sent as the `sort_dir` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ValidationError::InvalidSortDirection(other.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check raw search options against the API's limits.
///
/// Checks run in the order count, page, sort, sort direction and the first
/// failure is returned.
///
/// # Errors
///
/// Returns the [`ValidationError`] for the first option out of range.
pub fn validate(count: i64, page: i64, sort: &str, sort_dir: &str) -> Result<(), ValidationError> {
    if !(1..=MAX_COUNT).contains(&count) {
        return Err(ValidationError::InvalidCount(count));
    }
    if !(1..=MAX_PAGE).contains(&page) {
        return Err(ValidationError::InvalidPage(page));
    }
    sort.parse::<SortBy>()?;
    sort_dir.parse::<SortDirection>()?;
    Ok(())
}

/// Validated options for a single search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    count: u32,
    page: u32,
    sort: SortBy,
    sort_dir: SortDirection,
    highlight: bool,
}

impl SearchOptions {
    /// Validate raw option values and build the options.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when any option is out of range.
    pub fn new(
        count: i64,
        page: i64,
        sort: &str,
        sort_dir: &str,
        highlight: bool,
    ) -> Result<Self, ValidationError> {
        validate(count, page, sort, sort_dir)?;
        Ok(Self {
            count: u32::try_from(count).map_err(|_| ValidationError::InvalidCount(count))?,
            page: u32::try_from(page).map_err(|_| ValidationError::InvalidPage(page))?,
            sort: sort.parse()?,
            sort_dir: sort_dir.parse()?,
            highlight,
        })
    }

    /// Results per page.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// One-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Sort field.
    #[must_use]
    pub const fn sort(&self) -> SortBy {
        self.sort
    }

    /// Sort direction.
    #[must_use]
    pub const fn sort_dir(&self) -> SortDirection {
        self.sort_dir
    }

    /// Whether the API should highlight matching terms.
    #[must_use]
    pub const fn highlight(&self) -> bool {
        self.highlight
    }
}
