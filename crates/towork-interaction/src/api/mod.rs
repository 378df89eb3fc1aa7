//! Typed clients, one per backend resource.
//!
//! Every client unwraps the response envelope and surfaces the backend
//! message on failure. Pagination is passed through unchanged and nothing
//! is cached here.

mod ai;
mod auth;
mod candidature;
mod catalog;
mod feedback;
mod message;
mod milestone;
mod mission;
mod profile;
mod wallet;

pub use ai::AiApi;
pub use auth::AuthApi;
pub use candidature::CandidatureApi;
pub use catalog::{CompetenceApi, DomaineApi};
pub use feedback::FeedbackApi;
pub use message::{ConversationApi, MessageApi};
pub use milestone::MilestoneApi;
pub use mission::MissionApi;
pub use profile::ProfileApi;
pub use wallet::{PaymentApi, PortfolioApi, WalletApi};
