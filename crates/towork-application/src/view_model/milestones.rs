use super::{ListState, record};
use crate::AppContext;
use std::sync::Arc;
use towork_core::milestone::{
    DeliverableUpload, Milestone, MilestonePayment, MilestoneStatus, NewMilestone,
};
use towork_core::session::SessionStore;
use towork_core::status::{StatusLabel, Tone};
use towork_core::wallet::{DEFAULT_CURRENCY, format_money};
use towork_core::{Result, ToworkError};
use towork_interaction::api::MilestoneApi;
use tracing::info;

const LOAD_FAILED: &str = "Impossible de charger les jalons";

/// Which side of the mission is looking at the milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneAudience {
    Client,
    Freelancer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneView {
    pub id: Option<i64>,
    pub title: String,
    pub amount: String,
    pub status_label: &'static str,
    pub tone: Tone,
    pub can_deliver: bool,
    pub awaits_review: bool,
    pub can_pay: bool,
    pub due_date: Option<String>,
}

impl From<&Milestone> for MilestoneView {
    fn from(milestone: &Milestone) -> Self {
        let status = milestone.status();
        Self {
            id: milestone.id,
            title: milestone.title.clone(),
            amount: format_money(milestone.amount, DEFAULT_CURRENCY),
            status_label: status.label(),
            tone: status.tone(),
            can_deliver: status.can_deliver(),
            awaits_review: status.awaits_review(),
            can_pay: status.can_pay(),
            due_date: milestone.due_date.clone(),
        }
    }
}

/// Milestones of one mission.
///
/// Every successful action reloads the list so statuses always mirror the
/// backend.
pub struct MilestonesViewModel {
    api: MilestoneApi,
    session: Arc<SessionStore>,
    mission_id: i64,
    audience: MilestoneAudience,
    pub state: ListState<Milestone>,
}

impl MilestonesViewModel {
    pub fn new(
        api: MilestoneApi,
        session: Arc<SessionStore>,
        mission_id: i64,
        audience: MilestoneAudience,
    ) -> Self {
        Self {
            api,
            session,
            mission_id,
            audience,
            state: ListState::default(),
        }
    }

    pub fn from_context(context: &AppContext, mission_id: i64, audience: MilestoneAudience) -> Self {
        Self::new(
            context.api().milestones.clone(),
            context.session().clone(),
            mission_id,
            audience,
        )
    }

    pub fn mission_id(&self) -> i64 {
        self.mission_id
    }

    pub async fn load(&mut self) -> Result<()> {
        self.state.begin();
        let result = match self.audience {
            MilestoneAudience::Client => self.api.list_for_client(self.mission_id).await,
            MilestoneAudience::Freelancer => self.api.list_for_freelancer(self.mission_id).await,
        }
        .map(|mut milestones| {
            milestones.sort_by_key(|m| m.order_index.unwrap_or(i32::MAX));
            milestones
        });
        self.state.apply(result, LOAD_FAILED)
    }

    /// Adds a milestone. Invalid input, such as an amount below 1, fails
    /// before any request.
    pub async fn create(&mut self, milestone: &NewMilestone) -> Result<()> {
        if let Err(err) = milestone.validate() {
            self.state.error = Some(err.user_message("Formulaire invalide"));
            return Err(err);
        }
        let result = self.api.create(self.mission_id, milestone).await;
        let created = record(&mut self.state.error, result, "Impossible de créer le jalon")?;
        info!(mission_id = self.mission_id, milestone_id = ?created.id, "Milestone created");
        self.load().await
    }

    pub async fn deliver(&mut self, milestone_id: i64, notes: Option<&str>) -> Result<()> {
        let result = self.api.deliver(milestone_id, notes).await;
        record(&mut self.state.error, result, "Impossible de livrer le jalon")?;
        self.load().await
    }

    pub async fn upload_deliverable(&mut self, milestone_id: i64, upload: DeliverableUpload) -> Result<()> {
        let result = self.api.upload_deliverable(milestone_id, upload).await;
        record(&mut self.state.error, result, "Envoi du livrable impossible")?;
        self.load().await
    }

    pub async fn revert(&mut self, milestone_id: i64) -> Result<()> {
        let result = self.api.revert(milestone_id).await;
        record(&mut self.state.error, result, "Impossible de rouvrir le jalon")?;
        self.load().await
    }

    pub async fn accept(&mut self, milestone_id: i64, notes: Option<&str>) -> Result<()> {
        let result = self.api.accept(milestone_id, notes).await;
        record(&mut self.state.error, result, "Impossible de valider le jalon")?;
        self.load().await
    }

    pub async fn reject(&mut self, milestone_id: i64, reason: Option<&str>) -> Result<()> {
        let result = self.api.reject(milestone_id, reason).await;
        record(&mut self.state.error, result, "Impossible de refuser le jalon")?;
        self.load().await
    }

    /// Releases the payment of a validated milestone to the freelancer.
    pub async fn pay(&mut self, milestone_id: i64, freelancer_id: i64) -> Result<String> {
        let result = self.pay_inner(milestone_id, freelancer_id).await;
        let message = record(&mut self.state.error, result, "Paiement impossible")?;
        self.load().await?;
        Ok(message)
    }

    async fn pay_inner(&self, milestone_id: i64, freelancer_id: i64) -> Result<String> {
        let client_id = self
            .session
            .snapshot()
            .user_id()
            .ok_or(ToworkError::NotAuthenticated)?;
        let payment = MilestonePayment {
            client_id,
            freelancer_id,
            payment_method: None,
            description: None,
        };
        self.api.pay(milestone_id, &payment).await
    }

    pub fn can_deliver(&self, milestone_id: i64) -> bool {
        self.state
            .find(milestone_id)
            .is_some_and(|m| m.status().can_deliver())
    }

    pub fn views(&self) -> Vec<MilestoneView> {
        self.state.items.iter().map(MilestoneView::from).collect()
    }

    pub fn total_amount(&self) -> f64 {
        self.state.items.iter().map(|m| m.amount).sum()
    }

    pub fn paid_amount(&self) -> f64 {
        self.state
            .items
            .iter()
            .filter(|m| m.status() == MilestoneStatus::Paid)
            .map(|m| m.amount)
            .sum()
    }

    /// Share of milestones already paid, 0..=100.
    pub fn progress_percent(&self) -> u8 {
        let total = self.state.items.len();
        if total == 0 {
            return 0;
        }
        let paid = self
            .state
            .items
            .iter()
            .filter(|m| m.status() == MilestoneStatus::Paid)
            .count();
        ((paid * 100) / total) as u8
    }
}
