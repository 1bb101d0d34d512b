use crate::domain::model::{Olympiad, PaginatedResponse, Subject};
use crate::domain::record::OlympiadRecord;
use crate::domain::resource::Resource;
use crate::utils::error::{AppError, SourceError};
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cold stream of resource states: `Loading` first, then one terminal value.
pub type ResourceStream<T> = BoxStream<'static, Resource<T>>;

/// Text, grade and subject restrictions for a catalog query. The default
/// restricts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OlympiadFilter {
    pub query: Option<String>,
    pub grades: Vec<u32>,
    pub subject_ids: Vec<i64>,
}

impl OlympiadFilter {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_grades(mut self, grades: impl IntoIterator<Item = u32>) -> Self {
        self.grades = grades.into_iter().collect();
        self
    }

    pub fn with_subjects(mut self, subject_ids: impl IntoIterator<Item = i64>) -> Self {
        self.subject_ids = subject_ids.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_query().is_none() && self.grades.is_empty() && self.subject_ids.is_empty()
    }

    /// Trimmed query text, `None` when absent or whitespace-only.
    pub fn normalized_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
    pub filter: OlympiadFilter,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            filter: OlympiadFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: OlympiadFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Read access to the olympiad catalog. Implementations own filtering and
/// pagination; callers only forward the resulting `Resource` values.
#[async_trait]
pub trait OlympiadRepository: Send + Sync {
    /// Full unfiltered snapshot.
    fn get_all_olympiads(&self) -> ResourceStream<Vec<Olympiad>>;

    /// Fails with `AppError::NotFoundError` when no record carries `id`.
    async fn get_olympiad_by_id(&self, id: i64) -> Resource<Olympiad>;

    /// Distinct subjects in first-seen order.
    async fn get_available_subjects(&self) -> Resource<Vec<Subject>>;

    fn get_paginated_olympiads(
        &self,
        request: PageRequest,
    ) -> ResourceStream<PaginatedResponse<Olympiad>>;
}

/// Raw record provider behind a repository.
#[async_trait]
pub trait OlympiadDataSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<OlympiadRecord>, SourceError>;

    /// `Ok(None)` when the source answers that the record does not exist.
    async fn fetch_by_id(&self, id: i64) -> Result<Option<OlympiadRecord>, SourceError>;
}

/// Reactive user preferences. Every stream replays the current value on
/// subscription; dropping the stream unsubscribes.
pub trait SettingsProvider: Send + Sync {
    fn page_size(&self) -> BoxStream<'static, usize>;
    fn current_page_size(&self) -> usize;
    fn set_page_size(&self, page_size: usize) -> Result<(), AppError>;

    fn dark_theme(&self) -> BoxStream<'static, bool>;
    fn set_dark_theme(&self, enabled: bool);

    fn font_scale(&self) -> BoxStream<'static, f32>;
    fn set_font_scale(&self, scale: f32) -> Result<(), AppError>;

    fn animations_enabled(&self) -> BoxStream<'static, bool>;
    fn set_animations_enabled(&self, enabled: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Http,
    Fixture,
}

impl SourceKind {
    pub const ALL: [&'static str; 2] = ["http", "fixture"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Http => "http",
            SourceKind::Fixture => "fixture",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(SourceKind::Http),
            "fixture" => Ok(SourceKind::Fixture),
            other => Err(format!(
                "unknown source type '{}', expected one of: {}",
                other,
                SourceKind::ALL.join(", ")
            )),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn source_kind(&self) -> SourceKind;
    fn api_endpoint(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
    fn fixture_count(&self) -> usize;
    fn default_page_size(&self) -> usize;
}
