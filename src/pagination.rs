//! Page-number pagination policy
//!
//! Turns raw `page` / `page_size` query parameters into a slicing
//! plan and applies it to a collection. The policy is deliberately
//! permissive about `page_size` (garbage falls back to the configured
//! default, `-1` disables pagination entirely) and strict about
//! `page` (a page outside the valid range is a hard failure, so a
//! client paging past the end finds out instead of silently getting
//! an empty list).
//!
//! # Example
//!
//! ```rust
//! use crudkit::config::PaginationConfig;
//! use crudkit::pagination::{PageRequest, Paginator};
//!
//! let paginator = Paginator::new(PaginationConfig::default());
//! let items: Vec<u32> = (1..=40).collect();
//!
//! let req = PageRequest::from_raw(Some("2"), Some("15"), paginator.config());
//! let page = paginator.paginate(&items, &req).unwrap();
//! assert_eq!(page.items, (16..=30).collect::<Vec<u32>>());
//! assert_eq!(page.total, 40);
//! assert_eq!(page.page, 2);
//! assert_eq!(page.page_size, 15);
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::config::PaginationConfig;

/// Parsed `page` query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// A literal page number, as sent by the client (may be out of
    /// range or zero; validated at resolve time)
    Number(u64),
    /// A recognized final-page sentinel such as `"last"`
    Last,
    /// Anything that is neither an integer nor a sentinel; kept
    /// verbatim so the failure can name it
    Invalid(String),
}

/// Parsed `page_size` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    /// Serve pages of this many items (always at least 1)
    Limited(u64),
    /// Wire value `-1`: pagination disabled, serve everything
    Unbounded,
}

impl PageSize {
    /// The value reported back to clients: the size, or `-1` for the
    /// unbounded case
    #[must_use]
    pub fn reported(&self) -> i64 {
        match self {
            Self::Limited(n) => *n as i64,
            Self::Unbounded => -1,
        }
    }
}

/// A pagination request parsed from raw query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Requested page
    pub page: PageToken,
    /// Requested page size
    pub size: PageSize,
}

impl PageRequest {
    /// Parse raw query parameter values
    ///
    /// `page` defaults to 1 when absent. `page_size` is permissive:
    /// absent, non-numeric, zero, or nonsense negative values all
    /// fall back to the configured default, and `-1` selects the
    /// unbounded path. A configured `max_page_size` caps explicit
    /// sizes but not the unbounded path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crudkit::config::PaginationConfig;
    /// use crudkit::pagination::{PageRequest, PageSize, PageToken};
    ///
    /// let config = PaginationConfig::default();
    ///
    /// let req = PageRequest::from_raw(Some("last"), Some("abc"), &config);
    /// assert_eq!(req.page, PageToken::Last);
    /// assert_eq!(req.size, PageSize::Limited(15));
    ///
    /// let req = PageRequest::from_raw(None, Some("-1"), &config);
    /// assert_eq!(req.page, PageToken::Number(1));
    /// assert_eq!(req.size, PageSize::Unbounded);
    /// ```
    #[must_use]
    pub fn from_raw(
        page: Option<&str>,
        page_size: Option<&str>,
        config: &PaginationConfig,
    ) -> Self {
        let page = match page {
            None => PageToken::Number(config.default_page),
            Some(raw) => {
                let raw = raw.trim();
                if config.is_last_page_token(raw) {
                    PageToken::Last
                } else {
                    match raw.parse::<u64>() {
                        Ok(n) => PageToken::Number(n),
                        Err(_) => PageToken::Invalid(raw.to_string()),
                    }
                }
            }
        };

        let size = match page_size.map(str::trim) {
            Some("-1") => PageSize::Unbounded,
            Some(raw) => match raw.parse::<u64>() {
                Ok(n) if n >= 1 => {
                    let capped = match config.max_page_size {
                        Some(max) => n.min(max),
                        None => n,
                    };
                    PageSize::Limited(capped)
                }
                _ => PageSize::Limited(config.default_page_size),
            },
            None => PageSize::Limited(config.default_page_size),
        };

        Self { page, size }
    }
}

/// A slicing plan computed from a known total count
///
/// Produced by [`Paginator::resolve`]; the caller fetches
/// `limit`-many items starting at `offset`, or everything when
/// `limit` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    /// The page number that will be served (sentinels already
    /// resolved)
    pub page: u64,
    /// The page size in effect
    pub size: PageSize,
    /// Number of items to skip
    pub offset: u64,
    /// Number of items to take, or `None` on the unbounded path
    pub limit: Option<u64>,
}

/// One served page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    /// The items on this page
    pub items: Vec<T>,
    /// Total matching items across all pages, counted before slicing
    pub total: u64,
    /// The page that was served
    pub page: u64,
    /// The page size in effect, `-1` when pagination was disabled
    pub page_size: i64,
}

/// Pagination failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The requested page does not exist in the collection
    #[error("invalid page '{page}': {reason}")]
    OutOfRange {
        /// The page as the client sent it
        page: String,
        /// Why it could not be served
        reason: String,
    },
}

/// A collection that can be counted and sliced
///
/// The count comes from the source itself, so a backend with a cheap
/// `COUNT(*)` uses that while a plain `Vec` falls back to its length.
pub trait PageSource {
    /// Item type served from this source
    type Item;

    /// Total number of items
    fn total(&self) -> u64;

    /// Up to `limit` items starting at `offset`
    fn slice(&self, offset: u64, limit: u64) -> Vec<Self::Item>;

    /// Every item, in order
    fn all(&self) -> Vec<Self::Item>;
}

impl<T: Clone> PageSource for Vec<T> {
    type Item = T;

    fn total(&self) -> u64 {
        self.len() as u64
    }

    fn slice(&self, offset: u64, limit: u64) -> Vec<T> {
        self.iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect()
    }

    fn all(&self) -> Vec<T> {
        self.clone()
    }
}

/// The pagination policy
///
/// Stateless apart from its configuration; cheap to clone and share.
#[derive(Debug, Clone)]
pub struct Paginator {
    config: PaginationConfig,
}

impl Paginator {
    /// Create a paginator with the given configuration
    #[must_use]
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    /// The configuration in effect
    #[must_use]
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Compute the slicing plan for a collection of `total` items
    ///
    /// Page 1 of an empty collection is valid and yields an empty
    /// slice; any later page of an empty collection is out of range,
    /// as is page 0 or any page past the last.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crudkit::config::PaginationConfig;
    /// use crudkit::pagination::{PageRequest, Paginator};
    ///
    /// let paginator = Paginator::new(PaginationConfig::default());
    /// let req = PageRequest::from_raw(Some("last"), Some("10"), paginator.config());
    ///
    /// let plan = paginator.resolve(45, &req).unwrap();
    /// assert_eq!(plan.page, 5);
    /// assert_eq!(plan.offset, 40);
    /// assert_eq!(plan.limit, Some(10));
    /// ```
    pub fn resolve(&self, total: u64, req: &PageRequest) -> Result<ResolvedPage, PageError> {
        let size = match req.size {
            PageSize::Unbounded => {
                return Ok(ResolvedPage {
                    page: self.config.default_page,
                    size: PageSize::Unbounded,
                    offset: 0,
                    limit: None,
                });
            }
            PageSize::Limited(n) => n,
        };

        // An empty collection still has one valid (empty) page.
        let last_page = total_pages(total, size).max(1);

        let page = match &req.page {
            PageToken::Last => last_page,
            PageToken::Number(n) => *n,
            PageToken::Invalid(raw) => {
                return Err(PageError::OutOfRange {
                    page: raw.clone(),
                    reason: "not a page number or a recognized token".to_string(),
                });
            }
        };

        if page < 1 || page > last_page {
            return Err(PageError::OutOfRange {
                page: page.to_string(),
                reason: format!("collection has {last_page} page(s)"),
            });
        }

        Ok(ResolvedPage {
            page,
            size: PageSize::Limited(size),
            offset: (page - 1) * size,
            limit: Some(size),
        })
    }

    /// Serve one page from a source
    ///
    /// The total is counted once, before slicing, so `total` and
    /// `items` describe the same snapshot of the source.
    pub fn paginate<S: PageSource>(
        &self,
        source: &S,
        req: &PageRequest,
    ) -> Result<PageResult<S::Item>, PageError> {
        let total = source.total();
        let resolved = self.resolve(total, req)?;

        let items = match resolved.limit {
            None => source.all(),
            Some(limit) => source.slice(resolved.offset, limit),
        };

        Ok(PageResult {
            items,
            total,
            page: resolved.page,
            page_size: resolved.size.reported(),
        })
    }
}

/// Total pages, rounding up; 0 for an empty collection
fn total_pages(total: u64, size: u64) -> u64 {
    let size = size.max(1);
    total.saturating_add(size).saturating_sub(1) / size
}
