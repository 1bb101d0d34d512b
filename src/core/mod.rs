pub mod catalog;
pub mod filter;
pub mod pagination;
pub mod repository;
pub mod use_cases;

pub use crate::domain::model::{Olympiad, PaginatedResponse, PaginationMetadata, Stage, Subject};
pub use crate::domain::ports::{
    ConfigProvider, OlympiadDataSource, OlympiadFilter, OlympiadRepository, PageRequest,
    ResourceStream, SettingsProvider, SourceKind,
};
pub use crate::domain::resource::Resource;
pub use crate::utils::error::Result;
