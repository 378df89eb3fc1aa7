pub mod admin;
pub mod ai;
pub mod auth;
pub mod candidatures;
pub mod catalog;
pub mod config;
pub mod conversations;
pub mod logging;
pub mod milestones;
pub mod missions;
pub mod profile;
pub mod utils;
pub mod wallet;
