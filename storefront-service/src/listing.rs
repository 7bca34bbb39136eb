//! The paginated-listing contract shared by every entity kind
//!
//! Listing requests are validated and normalized here before any storage
//! call happens. External page numbering is 1-based; the offset handed to
//! storage is 0-based. Page statistics (total elements, total pages, last
//! page flag) are computed by the storage layer and copied into the
//! response envelope untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which entity collection a listing operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Category,
    Product,
}

impl EntityKind {
    /// Singular name, used in messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Category => "category",
            Self::Product => "product",
        }
    }

    /// Plural name, used for storage subdirectories
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Category => "categories",
            Self::Product => "products",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for listing queries
///
/// The ascending sentinel is the literal string `asc`, compared
/// case-insensitively. Every other value (including garbage) means
/// descending; callers must not rely on any particular spelling for
/// descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse a raw direction value
    ///
    /// # Example
    ///
    /// ```rust
    /// use storefront_service::listing::SortDirection;
    ///
    /// assert_eq!(SortDirection::parse("ASC"), SortDirection::Ascending);
    /// assert_eq!(SortDirection::parse("desc"), SortDirection::Descending);
    /// assert_eq!(SortDirection::parse("foo"), SortDirection::Descending);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("asc") {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Convert to a SQL ORDER BY fragment
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Raw listing query parameters as they arrive from the HTTP layer
///
/// All fields are optional; missing values are filled from the per-kind
/// [`ListingDefaults`] during [`PageRequest::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// Per-kind listing defaults, supplied by configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDefaults {
    #[serde(default = "default_page_number")]
    pub page_number: i64,

    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Default sort field for the kind (name for users, title otherwise)
    pub sort_by: String,

    #[serde(default = "default_sort_dir")]
    pub sort_dir: String,
}

impl ListingDefaults {
    pub fn new(sort_by: impl Into<String>) -> Self {
        Self {
            page_number: default_page_number(),
            page_size: default_page_size(),
            sort_by: sort_by.into(),
            sort_dir: default_sort_dir(),
        }
    }
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

fn default_sort_dir() -> String {
    "asc".to_string()
}

/// A validated listing request
///
/// Construction through [`PageRequest::resolve`] guarantees
/// `page_number >= 1` and `page_size >= 1`. The sort field is carried as
/// requested; resolving it against the kind's column whitelist happens at
/// the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: i64,
    pub page_size: i64,
    pub sort_field: String,
    pub direction: SortDirection,
}

impl PageRequest {
    /// Merge raw query parameters with the kind's defaults and validate
    ///
    /// Non-positive page parameters are rejected before any storage call.
    pub fn resolve(kind: EntityKind, query: &PageQuery, defaults: &ListingDefaults) -> Result<Self> {
        let page_number = query.page_number.unwrap_or(defaults.page_number);
        let page_size = query.page_size.unwrap_or(defaults.page_size);

        if page_number < 1 || page_size < 1 {
            return Err(Error::InvalidPaging(kind));
        }

        // the storage offset must fit in an i64
        if page_number
            .checked_sub(1)
            .and_then(|n| n.checked_mul(page_size))
            .is_none()
        {
            return Err(Error::InvalidPaging(kind));
        }

        let sort_field = query
            .sort_by
            .clone()
            .unwrap_or_else(|| defaults.sort_by.clone());
        let direction =
            SortDirection::parse(query.sort_dir.as_deref().unwrap_or(&defaults.sort_dir));

        Ok(Self {
            page_number,
            page_size,
            sort_field,
            direction,
        })
    }

    /// Zero-based offset for the storage query
    ///
    /// [`PageRequest::resolve`] rejects requests whose offset would not
    /// fit in an `i64`, so the saturation here is never reached for a
    /// resolved request.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.page_number
            .saturating_sub(1)
            .saturating_mul(self.page_size)
    }
}

/// Page statistics, owned by the storage layer
///
/// The listing engine copies these into the envelope without recomputing
/// them, so the response cannot drift from the storage layer's accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageStats {
    pub total_elements: i64,
    pub total_pages: i64,
    pub last_page: bool,
}

impl PageStats {
    /// Derive statistics from a total count and the request that produced it
    ///
    /// `total_pages` is ceiling division; an empty collection yields zero
    /// pages and `last_page == true`.
    #[must_use]
    pub fn new(total_elements: i64, request: &PageRequest) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + request.page_size - 1) / request.page_size
        };
        let last_page = total_pages == 0 || request.page_number >= total_pages;

        Self {
            total_elements,
            total_pages,
            last_page,
        }
    }
}

/// One page of storage records plus the statistics that came with it
#[derive(Debug, Clone)]
pub struct Page<E> {
    pub items: Vec<E>,
    pub stats: PageStats,
}

impl<E> Page<E> {
    pub fn new(items: Vec<E>, stats: PageStats) -> Self {
        Self { items, stats }
    }

    /// Map each record to its public representation, keeping the stats
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(E) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            stats: self.stats,
        }
    }
}

/// The uniform listing response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub last_page: bool,
}

impl<T> PageResponse<T> {
    /// Assemble the envelope from a validated request and a storage page
    pub fn from_page(request: &PageRequest, page: Page<T>) -> Self {
        Self {
            content: page.items,
            page_number: request.page_number,
            page_size: request.page_size,
            total_elements: page.stats.total_elements,
            total_pages: page.stats.total_pages,
            last_page: page.stats.last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_defaults() -> ListingDefaults {
        ListingDefaults::new("name")
    }

    #[test]
    fn test_direction_asc_is_case_insensitive() {
        assert_eq!(SortDirection::parse("asc"), SortDirection::Ascending);
        assert_eq!(SortDirection::parse("ASC"), SortDirection::Ascending);
        assert_eq!(SortDirection::parse("Asc"), SortDirection::Ascending);
    }

    #[test]
    fn test_direction_anything_else_is_descending() {
        assert_eq!(SortDirection::parse("desc"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("foo"), SortDirection::Descending);
        assert_eq!(SortDirection::parse(""), SortDirection::Descending);
        assert_eq!(SortDirection::parse("ascending"), SortDirection::Descending);
    }

    #[test]
    fn test_direction_as_sql() {
        assert_eq!(SortDirection::Ascending.as_sql(), "ASC");
        assert_eq!(SortDirection::Descending.as_sql(), "DESC");
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let request =
            PageRequest::resolve(EntityKind::User, &PageQuery::default(), &user_defaults())
                .unwrap();
        assert_eq!(request.page_number, 1);
        assert_eq!(request.page_size, 10);
        assert_eq!(request.sort_field, "name");
        assert_eq!(request.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_resolve_keeps_explicit_values() {
        let query = PageQuery {
            page_number: Some(3),
            page_size: Some(25),
            sort_by: Some("email".to_string()),
            sort_dir: Some("whatever".to_string()),
        };
        let request = PageRequest::resolve(EntityKind::User, &query, &user_defaults()).unwrap();
        assert_eq!(request.page_number, 3);
        assert_eq!(request.page_size, 25);
        assert_eq!(request.sort_field, "email");
        assert_eq!(request.direction, SortDirection::Descending);
    }

    #[test]
    fn test_resolve_rejects_zero_page_number() {
        let query = PageQuery {
            page_number: Some(0),
            ..PageQuery::default()
        };
        let err = PageRequest::resolve(EntityKind::User, &query, &user_defaults()).unwrap_err();
        assert!(matches!(err, Error::InvalidPaging(EntityKind::User)));
    }

    #[test]
    fn test_resolve_rejects_negative_page_size() {
        let query = PageQuery {
            page_size: Some(-1),
            ..PageQuery::default()
        };
        let err =
            PageRequest::resolve(EntityKind::Product, &query, &user_defaults()).unwrap_err();
        assert!(matches!(err, Error::InvalidPaging(EntityKind::Product)));
    }

    #[test]
    fn test_resolve_rejects_offset_overflow() {
        let query = PageQuery {
            page_number: Some(i64::MAX),
            page_size: Some(10),
            ..PageQuery::default()
        };
        let err = PageRequest::resolve(EntityKind::User, &query, &user_defaults()).unwrap_err();
        assert!(matches!(err, Error::InvalidPaging(EntityKind::User)));
    }

    #[test]
    fn test_offset_is_zero_based() {
        let query = PageQuery {
            page_number: Some(1),
            page_size: Some(10),
            ..PageQuery::default()
        };
        let request = PageRequest::resolve(EntityKind::User, &query, &user_defaults()).unwrap();
        assert_eq!(request.offset(), 0);

        let query = PageQuery {
            page_number: Some(3),
            page_size: Some(10),
            ..PageQuery::default()
        };
        let request = PageRequest::resolve(EntityKind::User, &query, &user_defaults()).unwrap();
        assert_eq!(request.offset(), 20);
    }

    fn request(page_number: i64, page_size: i64) -> PageRequest {
        PageRequest {
            page_number,
            page_size,
            sort_field: "name".to_string(),
            direction: SortDirection::Ascending,
        }
    }

    #[test]
    fn test_stats_ceiling_division() {
        assert_eq!(PageStats::new(100, &request(1, 20)).total_pages, 5);
        assert_eq!(PageStats::new(101, &request(1, 20)).total_pages, 6);
        assert_eq!(PageStats::new(1, &request(1, 20)).total_pages, 1);
        assert_eq!(PageStats::new(45, &request(1, 20)).total_pages, 3);
    }

    #[test]
    fn test_stats_empty_collection() {
        let stats = PageStats::new(0, &request(1, 10));
        assert_eq!(stats.total_elements, 0);
        assert_eq!(stats.total_pages, 0);
        assert!(stats.last_page);
    }

    #[test]
    fn test_stats_last_page_flag() {
        assert!(!PageStats::new(3, &request(1, 2)).last_page);
        assert!(PageStats::new(3, &request(2, 2)).last_page);
    }

    #[test]
    fn test_page_map_keeps_stats() {
        let page = Page::new(vec![1, 2, 3], PageStats::new(3, &request(1, 10)));
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.items, vec!["1", "2", "3"]);
        assert_eq!(mapped.stats.total_elements, 3);
        assert_eq!(mapped.stats.total_pages, 1);
    }

    #[test]
    fn test_envelope_copies_stats_untouched() {
        let req = request(2, 2);
        let page = Page::new(vec!["c"], PageStats::new(3, &req));
        let response = PageResponse::from_page(&req, page);
        assert_eq!(response.page_number, 2);
        assert_eq!(response.page_size, 2);
        assert_eq!(response.total_elements, 3);
        assert_eq!(response.total_pages, 2);
        assert!(response.last_page);
        assert_eq!(response.content, vec!["c"]);
    }

    #[test]
    fn test_envelope_field_names() {
        let req = request(1, 10);
        let page: Page<i32> = Page::new(vec![], PageStats::new(0, &req));
        let response = PageResponse::from_page(&req, page);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("pageNumber").is_some());
        assert!(json.get("pageSize").is_some());
        assert!(json.get("totalElements").is_some());
        assert!(json.get("totalPages").is_some());
        assert!(json.get("lastPage").is_some());
        assert!(json.get("content").is_some());
    }
}
