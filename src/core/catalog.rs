use crate::adapters::settings::SettingsDefaults;
use crate::adapters::{FixtureDataSource, HttpDataSource, InMemorySettings};
use crate::core::repository::CatalogRepository;
use crate::core::use_cases::{
    GetAllOlympiadsUseCase, GetAvailableSubjectsUseCase, GetOlympiadByIdUseCase,
    GetPaginatedOlympiadsUseCase, ObservePageSizeUseCase, UpdatePageSizeUseCase,
};
use crate::core::{ConfigProvider, OlympiadRepository, SettingsProvider, SourceKind};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;

/// Composition root: one repository strategy, one settings provider and the
/// use cases wired over them.
#[derive(Clone)]
pub struct Catalog {
    pub repository: Arc<dyn OlympiadRepository>,
    pub settings: Arc<dyn SettingsProvider>,
    pub get_all_olympiads: GetAllOlympiadsUseCase,
    pub get_olympiad_by_id: GetOlympiadByIdUseCase,
    pub get_available_subjects: GetAvailableSubjectsUseCase,
    pub get_paginated_olympiads: GetPaginatedOlympiadsUseCase,
    pub observe_page_size: ObservePageSizeUseCase,
    pub update_page_size: UpdatePageSizeUseCase,
}

impl Catalog {
    pub fn new(
        repository: Arc<dyn OlympiadRepository>,
        settings: Arc<dyn SettingsProvider>,
    ) -> Self {
        Self {
            get_all_olympiads: GetAllOlympiadsUseCase::new(repository.clone()),
            get_olympiad_by_id: GetOlympiadByIdUseCase::new(repository.clone()),
            get_available_subjects: GetAvailableSubjectsUseCase::new(repository.clone()),
            get_paginated_olympiads: GetPaginatedOlympiadsUseCase::new(repository.clone()),
            observe_page_size: ObservePageSizeUseCase::new(settings.clone()),
            update_page_size: UpdatePageSizeUseCase::new(settings.clone()),
            repository,
            settings,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let repository = build_repository(config)?;
        let settings = Arc::new(InMemorySettings::new(SettingsDefaults {
            page_size: config.default_page_size(),
            ..SettingsDefaults::default()
        }));
        Ok(Self::new(repository, settings))
    }

    pub fn with_settings_defaults<C: ConfigProvider>(
        config: &C,
        defaults: SettingsDefaults,
    ) -> Result<Self> {
        let repository = build_repository(config)?;
        Ok(Self::new(repository, Arc::new(InMemorySettings::new(defaults))))
    }
}

/// Picks the data source strategy named by the configuration.
pub fn build_repository<C: ConfigProvider>(config: &C) -> Result<Arc<dyn OlympiadRepository>> {
    match config.source_kind() {
        SourceKind::Http => {
            tracing::info!("🌐 Using remote catalog at {}", config.api_endpoint());
            let source = HttpDataSource::new(
                config.api_endpoint(),
                Duration::from_secs(config.request_timeout_seconds()),
            )?;
            Ok(Arc::new(CatalogRepository::new(source)))
        }
        SourceKind::Fixture => {
            tracing::info!(
                "🧪 Using generated fixture catalog with {} olympiads",
                config.fixture_count()
            );
            let source = FixtureDataSource::generate(config.fixture_count());
            Ok(Arc::new(CatalogRepository::new(source)))
        }
    }
}
