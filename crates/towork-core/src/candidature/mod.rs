//! Candidature (application) domain module.

mod model;

pub use model::{
    Candidature, CandidatureMessage, CandidatureMessageRequest, CandidatureStatus, ClientNote,
    CreateCandidatureRequest, FreelancerSummary, MessageAuthor, MissionRef,
};
