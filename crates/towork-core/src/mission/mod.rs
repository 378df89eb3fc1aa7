//! Mission domain module.
//!
//! - `model`: mission DTOs, the creation form and its wire body
//! - `status`: backend mission status and the freelancer board stage

mod model;
mod status;

pub use model::{
    BudgetType, ExperienceLevel, FreelancerMatch, FreelancerMilestone,
    FreelancerMissionWithMilestones, IdRef, Mission, MissionForm, MissionPayload, WorkMode,
};
pub use status::{BoardStage, MissionStatus};
