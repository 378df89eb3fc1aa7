//! Application layer for towork.
//!
//! Wires the typed clients, the session and the router into an
//! [`AppContext`], and exposes one view-model per screen on top of it.

pub mod auth_service;
pub mod cache;
pub mod context;
pub mod navigation;
pub mod view_model;

pub use auth_service::AuthService;
pub use cache::MissionCache;
pub use context::{AppContext, Apis};
pub use navigation::{AppRouter, GuardDecision, NavEntry, RouteGuard, nav_entries};
