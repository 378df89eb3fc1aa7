//! File-backed storage primitives.

pub mod atomic_file;
pub mod file_store;

pub use atomic_file::{AtomicFile, FileFormat};
pub use file_store::FileKeyValueStore;
