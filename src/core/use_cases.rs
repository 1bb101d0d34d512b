use crate::core::{
    Olympiad, OlympiadFilter, OlympiadRepository, PageRequest, PaginatedResponse, Resource,
    ResourceStream, SettingsProvider, Subject,
};
use crate::utils::error::AppError;
use futures::stream::BoxStream;
use std::sync::Arc;

// Use cases forward repository and settings results unchanged.

#[derive(Clone)]
pub struct GetAllOlympiadsUseCase {
    repository: Arc<dyn OlympiadRepository>,
}

impl GetAllOlympiadsUseCase {
    pub fn new(repository: Arc<dyn OlympiadRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(&self) -> ResourceStream<Vec<Olympiad>> {
        self.repository.get_all_olympiads()
    }
}

#[derive(Clone)]
pub struct GetOlympiadByIdUseCase {
    repository: Arc<dyn OlympiadRepository>,
}

impl GetOlympiadByIdUseCase {
    pub fn new(repository: Arc<dyn OlympiadRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: i64) -> Resource<Olympiad> {
        self.repository.get_olympiad_by_id(id).await
    }
}

#[derive(Clone)]
pub struct GetAvailableSubjectsUseCase {
    repository: Arc<dyn OlympiadRepository>,
}

impl GetAvailableSubjectsUseCase {
    pub fn new(repository: Arc<dyn OlympiadRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Resource<Vec<Subject>> {
        self.repository.get_available_subjects().await
    }
}

/// Page query with optional restrictions. Omitted restrictions default to an
/// empty query and no grade or subject filter.
#[derive(Clone)]
pub struct GetPaginatedOlympiadsUseCase {
    repository: Arc<dyn OlympiadRepository>,
}

impl GetPaginatedOlympiadsUseCase {
    pub fn new(repository: Arc<dyn OlympiadRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(
        &self,
        page: usize,
        page_size: usize,
        filter: Option<OlympiadFilter>,
    ) -> ResourceStream<PaginatedResponse<Olympiad>> {
        let request = PageRequest::new(page, page_size).with_filter(filter.unwrap_or_default());
        self.repository.get_paginated_olympiads(request)
    }
}

#[derive(Clone)]
pub struct ObservePageSizeUseCase {
    settings: Arc<dyn SettingsProvider>,
}

impl ObservePageSizeUseCase {
    pub fn new(settings: Arc<dyn SettingsProvider>) -> Self {
        Self { settings }
    }

    pub fn execute(&self) -> BoxStream<'static, usize> {
        self.settings.page_size()
    }

    pub fn current(&self) -> usize {
        self.settings.current_page_size()
    }
}

#[derive(Clone)]
pub struct UpdatePageSizeUseCase {
    settings: Arc<dyn SettingsProvider>,
}

impl UpdatePageSizeUseCase {
    pub fn new(settings: Arc<dyn SettingsProvider>) -> Self {
        Self { settings }
    }

    pub fn execute(&self, page_size: usize) -> Result<(), AppError> {
        self.settings.set_page_size(page_size)
    }
}
