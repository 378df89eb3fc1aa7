//! Domain types and ports of the ToWork marketplace client.
//!
//! Nothing here performs I/O: storage, HTTP and navigation are reached
//! through the [`session::KeyValueStore`] and [`navigation::Navigator`]
//! traits, implemented by the outer crates.

pub mod ai;
pub mod auth;
pub mod candidature;
pub mod catalog;
pub mod config;
pub mod conversation;
pub mod envelope;
pub mod error;
pub mod feedback;
pub mod lenient;
pub mod milestone;
pub mod mission;
pub mod navigation;
pub mod profile;
pub mod session;
pub mod status;
pub mod validation;
pub mod wallet;

pub use error::{Result, ToworkError};
