pub mod assets;
pub mod cache;
pub mod dashboard;
pub mod document;
pub mod router;
pub mod tabular;

pub use crate::domain::model::{ExtractedDocument, Record, Table};
pub use crate::domain::ports::{ConfigProvider, Storage};
