// Adapters layer: concrete implementations of the domain ports (http, fixture, settings).

pub mod fixture;
pub mod http;
pub mod settings;

pub use fixture::FixtureDataSource;
pub use http::HttpDataSource;
pub use settings::{InMemorySettings, Preference, SettingsDefaults};
