use crate::core::filter::apply_filter;
use crate::core::pagination::{paginate, validate_page_request};
use crate::core::{
    Olympiad, OlympiadDataSource, OlympiadFilter, OlympiadRepository, PageRequest,
    PaginatedResponse, Resource, ResourceStream, Subject,
};
use crate::utils::error::{AppError, SourceError};
use async_stream::stream;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

/// Record counts above this are filtered on the blocking pool.
const BLOCKING_FILTER_THRESHOLD: usize = 10_000;

/// Repository over a single data source strategy. Every call fetches afresh;
/// nothing is cached between requests.
pub struct CatalogRepository<D: OlympiadDataSource + 'static> {
    source: Arc<D>,
}

impl<D: OlympiadDataSource + 'static> CatalogRepository<D> {
    pub fn new(source: D) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_shared(source: Arc<D>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &D {
        &self.source
    }
}

fn classify_logged(operation: &str, err: SourceError) -> AppError {
    let classified = AppError::classify(&err);
    tracing::warn!("❌ {} failed: {} (classified as {:?})", operation, err, classified);
    classified
}

async fn load_olympiads<D: OlympiadDataSource + ?Sized>(
    source: &D,
) -> Result<Vec<Olympiad>, AppError> {
    let records = source
        .fetch_all()
        .await
        .map_err(|e| classify_logged("fetch_all", e))?;

    tracing::debug!("Fetched {} olympiad records", records.len());
    Ok(records.into_iter().map(Olympiad::from).collect())
}

/// Distinct subjects by id, in the order they first appear.
pub fn distinct_subjects(olympiads: &[Olympiad]) -> Vec<Subject> {
    let mut seen = HashSet::new();
    olympiads
        .iter()
        .flat_map(|o| o.subjects.iter())
        .filter(|s| seen.insert(s.id))
        .cloned()
        .collect()
}

fn filter_and_paginate(
    olympiads: Vec<Olympiad>,
    filter: &OlympiadFilter,
    page: usize,
    page_size: usize,
) -> Result<PaginatedResponse<Olympiad>, AppError> {
    let filtered = apply_filter(olympiads, filter);
    tracing::debug!("{} olympiads left after filtering", filtered.len());
    paginate(filtered, page, page_size)
}

async fn query_page<D: OlympiadDataSource + ?Sized>(
    source: &D,
    request: PageRequest,
) -> Result<PaginatedResponse<Olympiad>, AppError> {
    let all = load_olympiads(source).await?;
    let PageRequest {
        page,
        page_size,
        filter,
    } = request;

    if all.len() <= BLOCKING_FILTER_THRESHOLD {
        return filter_and_paginate(all, &filter, page, page_size);
    }

    tracing::debug!("Filtering {} olympiads on the blocking pool", all.len());
    tokio::task::spawn_blocking(move || filter_and_paginate(all, &filter, page, page_size))
        .await
        .map_err(|e| AppError::unknown(format!("filter task failed: {}", e)))?
}

#[async_trait]
impl<D: OlympiadDataSource + 'static> OlympiadRepository for CatalogRepository<D> {
    fn get_all_olympiads(&self) -> ResourceStream<Vec<Olympiad>> {
        let source = Arc::clone(&self.source);

        Box::pin(stream! {
            yield Resource::Loading;
            yield Resource::from(load_olympiads(source.as_ref()).await);
        })
    }

    async fn get_olympiad_by_id(&self, id: i64) -> Resource<Olympiad> {
        tracing::debug!("Looking up olympiad {}", id);

        match self.source.fetch_by_id(id).await {
            Ok(Some(record)) => Resource::success(Olympiad::from(record)),
            Ok(None) => {
                tracing::debug!("Olympiad {} not found", id);
                Resource::failed(AppError::NotFoundError)
            }
            Err(e) => Resource::failed(classify_logged("fetch_by_id", e)),
        }
    }

    async fn get_available_subjects(&self) -> Resource<Vec<Subject>> {
        load_olympiads(self.source.as_ref())
            .await
            .map(|olympiads| distinct_subjects(&olympiads))
            .into()
    }

    fn get_paginated_olympiads(
        &self,
        request: PageRequest,
    ) -> ResourceStream<PaginatedResponse<Olympiad>> {
        let source = Arc::clone(&self.source);

        Box::pin(stream! {
            yield Resource::Loading;

            // 先驗證參數，避免無謂的資料來源請求
            if let Err(e) = validate_page_request(request.page, request.page_size) {
                tracing::debug!("Rejected page request: {}", e);
                yield Resource::failed(e);
                return;
            }

            tracing::debug!(
                "Querying page {} (size {}) with filter {:?}",
                request.page,
                request.page_size,
                request.filter
            );
            yield Resource::from(query_page(source.as_ref(), request).await);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{OlympiadRecord, SubjectRecord};
    use futures::StreamExt;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticSource {
        records: Vec<OlympiadRecord>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn new(records: Vec<OlympiadRecord>) -> Self {
            Self {
                records,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OlympiadDataSource for StaticSource {
        async fn fetch_all(&self) -> Result<Vec<OlympiadRecord>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }

        async fn fetch_by_id(&self, id: i64) -> Result<Option<OlympiadRecord>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.iter().find(|r| r.id == id).cloned())
        }
    }

    struct FailingSource {
        make_error: fn() -> SourceError,
    }

    #[async_trait]
    impl OlympiadDataSource for FailingSource {
        async fn fetch_all(&self) -> Result<Vec<OlympiadRecord>, SourceError> {
            Err((self.make_error)())
        }

        async fn fetch_by_id(&self, _id: i64) -> Result<Option<OlympiadRecord>, SourceError> {
            Err((self.make_error)())
        }
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    struct HangingSource {
        dropped: Arc<AtomicBool>,
    }

    #[async_trait]
    impl OlympiadDataSource for HangingSource {
        async fn fetch_all(&self) -> Result<Vec<OlympiadRecord>, SourceError> {
            let _guard = DropFlag(Arc::clone(&self.dropped));
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(vec![])
        }

        async fn fetch_by_id(&self, _id: i64) -> Result<Option<OlympiadRecord>, SourceError> {
            Ok(None)
        }
    }

    fn record(
        id: i64,
        name: &str,
        min: Option<u32>,
        max: Option<u32>,
        subjects: &[(i64, &str)],
    ) -> OlympiadRecord {
        OlympiadRecord {
            id,
            name: name.to_string(),
            subjects: Some(
                subjects
                    .iter()
                    .map(|(id, name)| SubjectRecord {
                        id: *id,
                        name: name.to_string(),
                    })
                    .collect(),
            ),
            min_grade: min,
            max_grade: max,
            stages: None,
            link: None,
            description: None,
            keywords: None,
        }
    }

    fn numbered(count: i64) -> Vec<OlympiadRecord> {
        (1..=count)
            .map(|i| {
                let name = format!("Olympiad {}", i);
                record(i, &name, Some(5), Some(11), &[(1, "Mathematics")])
            })
            .collect()
    }

    async fn terminal<T>(stream: ResourceStream<T>) -> Vec<Resource<T>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_paginated_stream_emits_loading_then_success() {
        let repo = CatalogRepository::new(StaticSource::new(numbered(23)));

        let emitted = terminal(repo.get_paginated_olympiads(PageRequest::new(3, 10))).await;

        assert_eq!(emitted.len(), 2);
        assert!(emitted[0].is_loading());
        let page = emitted[1].data().unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.total_items, 23);
        assert_eq!(page.items[0].id, 21);
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty_success() {
        let repo = CatalogRepository::new(StaticSource::new(numbered(23)));

        let emitted = terminal(repo.get_paginated_olympiads(PageRequest::new(4, 10))).await;
        let page = emitted[1].data().unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.meta.current_page, 4);
        assert_eq!(page.meta.total_pages, 3);
    }

    #[tokio::test]
    async fn test_invalid_page_fails_without_fetching() {
        let repo = CatalogRepository::new(StaticSource::new(numbered(5)));

        for request in [PageRequest::new(0, 10), PageRequest::new(1, 0)] {
            let emitted = terminal(repo.get_paginated_olympiads(request)).await;
            assert_eq!(emitted.len(), 2);
            assert!(emitted[0].is_loading());
            assert!(matches!(emitted[1].error(), Some(AppError::DataError { .. })));
        }
        assert_eq!(repo.source().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_filters_flow_through_to_page() {
        let repo = CatalogRepository::new(StaticSource::new(vec![
            record(1, "Math Sprint", Some(5), Some(8), &[(1, "Mathematics")]),
            record(2, "Math Masters", Some(9), Some(11), &[(1, "Mathematics")]),
            record(3, "Physics Cup", Some(6), Some(9), &[(2, "Physics")]),
        ]));
        let filter = OlympiadFilter::default().with_query("math").with_grades([7]);

        let emitted =
            terminal(repo.get_paginated_olympiads(PageRequest::new(1, 10).with_filter(filter)))
                .await;
        let page = emitted[1].data().unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, 1);
        assert_eq!(page.meta.total_items, 1);
    }

    #[tokio::test]
    async fn test_each_subscription_reruns_the_query() {
        let repo = CatalogRepository::new(StaticSource::new(numbered(3)));

        let first = repo.get_paginated_olympiads(PageRequest::new(1, 10));
        let second = repo.get_paginated_olympiads(PageRequest::new(1, 10));
        assert_eq!(repo.source().calls.load(Ordering::SeqCst), 0);

        terminal(first).await;
        terminal(second).await;
        assert_eq!(repo.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_source_failure_is_classified() {
        let repo = CatalogRepository::new(FailingSource {
            make_error: || SourceError::Connection("refused".to_string()),
        });

        let emitted = terminal(repo.get_paginated_olympiads(PageRequest::new(1, 10))).await;
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[1].error(), Some(&AppError::NetworkError));

        let emitted = terminal(repo.get_all_olympiads()).await;
        assert_eq!(emitted[1].error(), Some(&AppError::NetworkError));

        let repo = CatalogRepository::new(FailingSource {
            make_error: || SourceError::Status {
                status: 500,
                message: None,
            },
        });
        assert_eq!(
            repo.get_available_subjects().await,
            Resource::failed(AppError::server("HTTP 500"))
        );
    }

    #[tokio::test]
    async fn test_get_by_id_found_and_missing() {
        let repo = CatalogRepository::new(StaticSource::new(numbered(3)));

        let found = repo.get_olympiad_by_id(2).await;
        assert_eq!(found.data().map(|o| o.id), Some(2));

        let missing = repo.get_olympiad_by_id(99).await;
        assert_eq!(missing, Resource::failed(AppError::NotFoundError));
    }

    #[tokio::test]
    async fn test_available_subjects_are_distinct_in_first_seen_order() {
        let repo = CatalogRepository::new(StaticSource::new(vec![
            record(1, "A", None, None, &[(3, "Chemistry"), (1, "Mathematics")]),
            record(2, "B", None, None, &[(1, "Mathematics"), (2, "Physics")]),
            record(3, "C", None, None, &[]),
            record(4, "D", None, None, &[(3, "Chemistry")]),
        ]));

        let subjects = repo.get_available_subjects().await;
        let ids: Vec<i64> = subjects.data().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_get_all_returns_unfiltered_snapshot() {
        let repo = CatalogRepository::new(StaticSource::new(numbered(12)));

        let emitted = terminal(repo.get_all_olympiads()).await;
        assert!(emitted[0].is_loading());
        assert_eq!(emitted[1].data().map(Vec::len), Some(12));
    }

    #[tokio::test]
    async fn test_large_catalog_uses_blocking_pool() {
        let repo = CatalogRepository::new(StaticSource::new(numbered(
            BLOCKING_FILTER_THRESHOLD as i64 + 5,
        )));

        let emitted = terminal(repo.get_paginated_olympiads(PageRequest::new(2, 1000))).await;
        let page = emitted[1].data().unwrap();
        assert_eq!(page.items.len(), 1000);
        assert_eq!(page.items[0].id, 1001);
        assert_eq!(page.meta.total_pages, 11);
    }

    #[tokio::test]
    async fn test_dropping_subscription_cancels_fetch() {
        let dropped = Arc::new(AtomicBool::new(false));
        let repo = CatalogRepository::new(HangingSource {
            dropped: Arc::clone(&dropped),
        });

        let mut stream = repo.get_paginated_olympiads(PageRequest::new(1, 10));
        assert!(stream.next().await.unwrap().is_loading());

        let pending = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
        assert!(pending.is_err());
        assert!(!dropped.load(Ordering::SeqCst));

        drop(stream);
        assert!(dropped.load(Ordering::SeqCst));
    }
}
