use crate::domain::ports::SettingsProvider;
use crate::utils::error::AppError;
use futures::stream::{BoxStream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;
pub const MIN_FONT_SCALE: f32 = 0.5;
pub const MAX_FONT_SCALE: f32 = 2.0;

/// Observable value with last-value replay.
#[derive(Debug)]
pub struct Preference<T> {
    sender: watch::Sender<T>,
}

impl<T> Preference<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Stores `value`; subscribers are only woken when it differs.
    pub fn set(&self, value: T) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    /// Current value first, then every change until the stream is dropped.
    pub fn subscribe(&self) -> BoxStream<'static, T> {
        WatchStream::new(self.sender.subscribe()).boxed()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingsDefaults {
    pub page_size: usize,
    pub dark_theme: bool,
    pub font_scale: f32,
    pub animations_enabled: bool,
}

impl Default for SettingsDefaults {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            dark_theme: false,
            font_scale: 1.0,
            animations_enabled: true,
        }
    }
}

/// Process-local settings store; values live as long as the provider.
#[derive(Debug)]
pub struct InMemorySettings {
    page_size: Preference<usize>,
    dark_theme: Preference<bool>,
    font_scale: Preference<f32>,
    animations_enabled: Preference<bool>,
}

impl InMemorySettings {
    pub fn new(defaults: SettingsDefaults) -> Self {
        Self {
            page_size: Preference::new(defaults.page_size),
            dark_theme: Preference::new(defaults.dark_theme),
            font_scale: Preference::new(defaults.font_scale),
            animations_enabled: Preference::new(defaults.animations_enabled),
        }
    }

    pub fn page_size_preference(&self) -> &Preference<usize> {
        &self.page_size
    }
}

impl Default for InMemorySettings {
    fn default() -> Self {
        Self::new(SettingsDefaults::default())
    }
}

impl SettingsProvider for InMemorySettings {
    fn page_size(&self) -> BoxStream<'static, usize> {
        self.page_size.subscribe()
    }

    fn current_page_size(&self) -> usize {
        self.page_size.get()
    }

    fn set_page_size(&self, page_size: usize) -> Result<(), AppError> {
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::data(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }
        if self.page_size.set(page_size) {
            tracing::debug!("Page size preference changed to {}", page_size);
        }
        Ok(())
    }

    fn dark_theme(&self) -> BoxStream<'static, bool> {
        self.dark_theme.subscribe()
    }

    fn set_dark_theme(&self, enabled: bool) {
        self.dark_theme.set(enabled);
    }

    fn font_scale(&self) -> BoxStream<'static, f32> {
        self.font_scale.subscribe()
    }

    fn set_font_scale(&self, scale: f32) -> Result<(), AppError> {
        if !(MIN_FONT_SCALE..=MAX_FONT_SCALE).contains(&scale) {
            return Err(AppError::data(format!(
                "font scale must be between {} and {}, got {}",
                MIN_FONT_SCALE, MAX_FONT_SCALE, scale
            )));
        }
        self.font_scale.set(scale);
        Ok(())
    }

    fn animations_enabled(&self) -> BoxStream<'static, bool> {
        self.animations_enabled.subscribe()
    }

    fn set_animations_enabled(&self, enabled: bool) {
        self.animations_enabled.set(enabled);
    }
}
