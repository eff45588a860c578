// Adapters layer: concrete implementations for external systems (file storage).

pub mod storage;

pub use storage::LocalStorage;
