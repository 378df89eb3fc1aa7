//! Milestone domain module.

mod model;

pub use model::{
    DeliverableUpload, Milestone, MilestoneDeliverable, MilestoneMissionRef, MilestonePayment,
    MilestoneStatus, NewMilestone,
};
