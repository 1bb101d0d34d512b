pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{FixtureDataSource, HttpDataSource, InMemorySettings};
pub use crate::core::{
    catalog::Catalog, repository::CatalogRepository, OlympiadFilter, OlympiadRepository,
    PageRequest, Resource,
};
pub use crate::domain::model::{Olympiad, PaginatedResponse, PaginationMetadata, Stage, Subject};
pub use crate::utils::error::{AppError, CatalogError, Result, SourceError};
