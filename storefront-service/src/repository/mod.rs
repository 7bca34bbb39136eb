//! Storage access for the three entity collections
//!
//! Each collection implements [`PageSource`] so the listing engine in
//! [`list_page`] can serve any kind through one code path. Repositories
//! use RPITIT futures with `Send` bounds so they stay mockable in tests
//! without boxing.

pub mod categories;
pub mod error;
pub mod products;
pub mod users;

pub use categories::CategoryRepository;
pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation, RepositoryResult};
pub use products::ProductRepository;
pub use users::UserRepository;

use std::future::Future;

use crate::error::{Error, Result};
use crate::listing::{EntityKind, Page, PageRequest};

/// One pageable entity collection
///
/// `sort_column` is the whitelist that turns a requested sort field into
/// a real column name; everything else in the request (direction, offset,
/// size) is already validated by the time a fetch runs.
pub trait PageSource {
    type Record: Send;

    fn kind(&self) -> EntityKind;

    /// Resolve a requested sort field to a column, or reject it
    fn sort_column(&self, field: &str) -> Option<&'static str>;

    /// Fetch one page of the full collection
    fn fetch_page(
        &self,
        column: &'static str,
        request: &PageRequest,
    ) -> impl Future<Output = RepositoryResult<Page<Self::Record>>> + Send;

    /// Fetch one page of records whose searchable field contains `keyword`
    /// as a case-sensitive substring
    fn fetch_page_by_keyword(
        &self,
        keyword: &str,
        column: &'static str,
        request: &PageRequest,
    ) -> impl Future<Output = RepositoryResult<Page<Self::Record>>> + Send;
}

/// Produce one page over `source` under the listing error policy
///
/// The sort field is resolved before any storage call; an unknown field
/// and a storage fault both surface as the same invalid-listing error.
/// No retries: paging is idempotent and the caller can simply re-issue
/// the request.
pub async fn list_page<S>(
    source: &S,
    request: &PageRequest,
    keyword: Option<&str>,
) -> Result<Page<S::Record>>
where
    S: PageSource + Sync,
{
    let column = source.sort_column(&request.sort_field).ok_or_else(|| {
        tracing::warn!(
            kind = %source.kind(),
            field = %request.sort_field,
            "Unknown sort field in listing request"
        );
        Error::InvalidPaging(source.kind())
    })?;

    let fetched = match keyword {
        Some(keyword) => source.fetch_page_by_keyword(keyword, column, request).await,
        None => source.fetch_page(column, request).await,
    };

    fetched.map_err(|err| paging_fault(source.kind(), err))
}

/// Fold a storage fault during page resolution into the listing error
pub fn paging_fault(kind: EntityKind, err: RepositoryError) -> Error {
    tracing::error!(kind = %kind, error = %err, "Page fetch failed");
    Error::InvalidPaging(kind)
}

/// Build a `%keyword%` LIKE pattern that matches the keyword literally
///
/// `\`, `%`, and `_` in the keyword are escaped so they never act as
/// wildcards; the queries using this pattern carry `ESCAPE '\'`.
pub(crate) fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{PageQuery, PageStats, SortDirection};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Record {
        title: String,
    }

    /// In-memory collection that pages and sorts like the real storage
    struct MemorySource {
        titles: Vec<&'static str>,
        fail: bool,
    }

    impl MemorySource {
        fn new(titles: Vec<&'static str>) -> Self {
            Self {
                titles,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                titles: Vec::new(),
                fail: true,
            }
        }

        fn select(
            &self,
            keyword: Option<&str>,
            request: &PageRequest,
        ) -> RepositoryResult<Page<Record>> {
            if self.fail {
                return Err(RepositoryError::database_error(
                    RepositoryOperation::FindPage,
                    "storage unavailable",
                ));
            }

            let mut matched: Vec<&str> = self
                .titles
                .iter()
                .copied()
                .filter(|t| keyword.is_none_or(|kw| t.contains(kw)))
                .collect();
            matched.sort_unstable();
            if request.direction == SortDirection::Descending {
                matched.reverse();
            }

            let total = matched.len() as i64;
            let items: Vec<Record> = matched
                .into_iter()
                .skip(request.offset() as usize)
                .take(request.page_size as usize)
                .map(|t| Record {
                    title: t.to_string(),
                })
                .collect();

            Ok(Page::new(items, PageStats::new(total, request)))
        }
    }

    impl PageSource for MemorySource {
        type Record = Record;

        fn kind(&self) -> EntityKind {
            EntityKind::Product
        }

        fn sort_column(&self, field: &str) -> Option<&'static str> {
            match field {
                "title" => Some("title"),
                "id" => Some("id"),
                _ => None,
            }
        }

        async fn fetch_page(
            &self,
            _column: &'static str,
            request: &PageRequest,
        ) -> RepositoryResult<Page<Record>> {
            self.select(None, request)
        }

        async fn fetch_page_by_keyword(
            &self,
            keyword: &str,
            _column: &'static str,
            request: &PageRequest,
        ) -> RepositoryResult<Page<Record>> {
            self.select(Some(keyword), request)
        }
    }

    fn request(query: PageQuery) -> PageRequest {
        let defaults = crate::listing::ListingDefaults::new("title");
        PageRequest::resolve(EntityKind::Product, &query, &defaults).unwrap()
    }

    fn titles(page: &Page<Record>) -> Vec<&str> {
        page.items.iter().map(|r| r.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_page_content_never_exceeds_page_size() {
        let source = MemorySource::new(vec!["a", "b", "c", "d", "e"]);
        let req = request(PageQuery {
            page_size: Some(2),
            ..PageQuery::default()
        });
        let page = list_page(&source, &req, None).await.unwrap();
        assert!(page.items.len() <= 2);
    }

    #[tokio::test]
    async fn test_three_records_page_size_two() {
        let source = MemorySource::new(vec!["a", "b", "c"]);

        let first = request(PageQuery {
            page_number: Some(1),
            page_size: Some(2),
            ..PageQuery::default()
        });
        let page = list_page(&source, &first, None).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.stats.total_elements, 3);
        assert_eq!(page.stats.total_pages, 2);
        assert!(!page.stats.last_page);

        let second = request(PageQuery {
            page_number: Some(2),
            page_size: Some(2),
            ..PageQuery::default()
        });
        let page = list_page(&source, &second, None).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.stats.last_page);
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let source = MemorySource::new(vec![]);
        let req = request(PageQuery::default());
        let page = list_page(&source, &req, None).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.stats.total_elements, 0);
        assert_eq!(page.stats.total_pages, 0);
        assert!(page.stats.last_page);
    }

    #[tokio::test]
    async fn test_garbage_direction_sorts_descending() {
        let source = MemorySource::new(vec!["b", "a", "c"]);

        let asc = request(PageQuery {
            sort_dir: Some("asc".to_string()),
            ..PageQuery::default()
        });
        let page = list_page(&source, &asc, None).await.unwrap();
        assert_eq!(titles(&page), vec!["a", "b", "c"]);

        let garbage = request(PageQuery {
            sort_dir: Some("foo".to_string()),
            ..PageQuery::default()
        });
        let page = list_page(&source, &garbage, None).await.unwrap();
        assert_eq!(titles(&page), vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_keyword_is_case_sensitive_substring() {
        let source = MemorySource::new(vec!["Beauty Products", "Gadgets"]);
        let req = request(PageQuery::default());

        let page = list_page(&source, &req, Some("eauty")).await.unwrap();
        assert_eq!(titles(&page), vec!["Beauty Products"]);

        let page = list_page(&source, &req, Some("beauty")).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.stats.total_elements, 0);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("eauty"), "%eauty%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }

    #[tokio::test]
    async fn test_unknown_sort_field_is_rejected_before_storage() {
        let source = MemorySource::new(vec!["a"]);
        let req = PageRequest {
            page_number: 1,
            page_size: 10,
            sort_field: "doesNotExist".to_string(),
            direction: SortDirection::Ascending,
        };
        let err = list_page(&source, &req, None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPaging(EntityKind::Product)));
    }

    #[tokio::test]
    async fn test_storage_fault_surfaces_as_invalid_paging() {
        let source = MemorySource::failing();
        let req = request(PageQuery::default());
        let err = list_page(&source, &req, None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPaging(EntityKind::Product)));
    }
}
