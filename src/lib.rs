pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use config::DashboardConfig;
pub use crate::core::{
    assets::AssetLoader,
    cache::{CacheEntry, CacheKey, ResultCache},
    dashboard::{Dashboard, RenderedPage, Trigger},
    document::{DocumentExtractor, PaginatedDocument, PdfDocument},
    router::{PageContent, PageRouter, RenderCallback},
    tabular::{DeclaredFormat, Origin, TabularSource},
};
pub use domain::model::{Destination, ExtractedDocument, NavigationState, Table, Value};
pub use utils::error::{AssetError, DashError, DocumentError, IngestError, Result};
