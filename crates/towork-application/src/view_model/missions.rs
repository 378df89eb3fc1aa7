use super::board::format_budget;
use super::{ListState, record};
use crate::AppContext;
use std::sync::Arc;
use towork_core::mission::{Mission, MissionForm, MissionStatus};
use towork_core::session::SessionStore;
use towork_core::status::{StatusLabel, Tone};
use towork_core::{Result, ToworkError};
use towork_interaction::api::MissionApi;
use tracing::info;

const LOAD_FAILED: &str = "Impossible de charger vos missions";

/// One line of the client's mission table.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionRow {
    pub id: i64,
    pub title: String,
    pub domaine: String,
    pub budget: String,
    pub status_label: &'static str,
    pub tone: Tone,
    pub created_at: Option<String>,
}

impl From<&Mission> for MissionRow {
    fn from(mission: &Mission) -> Self {
        let status = mission.status();
        Self {
            id: mission.id,
            title: mission.title.clone(),
            domaine: mission
                .domaine_name
                .clone()
                .unwrap_or_else(|| "Général".to_string()),
            budget: format_budget(mission.budget_min, mission.budget_max, mission.budget_type),
            status_label: status.label(),
            tone: status.tone(),
            created_at: mission.created_at.clone(),
        }
    }
}

/// The client's own missions.
pub struct ClientMissionsViewModel {
    api: MissionApi,
    session: Arc<SessionStore>,
    pub state: ListState<Mission>,
}

impl ClientMissionsViewModel {
    pub fn new(api: MissionApi, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            state: ListState::default(),
        }
    }

    pub fn from_context(context: &AppContext) -> Self {
        Self::new(context.api().missions.clone(), context.session().clone())
    }

    pub async fn load(&mut self) -> Result<()> {
        self.state.begin();
        let result = self.api.mine().await;
        self.state.apply(result, LOAD_FAILED)
    }

    /// Publishes a mission owned by the logged-in client.
    ///
    /// The form is validated before anything is sent; the owner id is the
    /// session's user id.
    pub async fn create(&mut self, form: &MissionForm) -> Result<Mission> {
        let result = self.create_inner(form).await;
        let mission = record(&mut self.state.error, result, "Impossible de créer la mission")?;
        info!(mission_id = mission.id, "Mission created");
        self.state.upsert(mission.clone());
        Ok(mission)
    }

    async fn create_inner(&self, form: &MissionForm) -> Result<Mission> {
        form.validate()?;
        let client_id = self
            .session
            .snapshot()
            .user_id()
            .ok_or(ToworkError::NotAuthenticated)?;
        let payload = form.to_payload(client_id)?;
        self.api.create(&payload).await
    }

    pub async fn update_status(&mut self, id: i64, status: &MissionStatus) -> Result<()> {
        let result = self.api.update_status(id, status).await;
        let updated = record(&mut self.state.error, result, "Impossible de changer le statut")?;
        self.state.upsert(updated);
        Ok(())
    }

    /// Closes a mission pending closure. The backend may answer without a
    /// body; the row is then reloaded.
    pub async fn close(&mut self, id: i64) -> Result<()> {
        let result = self.api.close(id).await;
        match record(&mut self.state.error, result, "Impossible de clôturer la mission")? {
            Some(mission) => self.state.upsert(mission),
            None => {
                let result = self.api.get(id).await;
                let mission = record(&mut self.state.error, result, LOAD_FAILED)?;
                self.state.upsert(mission);
            }
        }
        Ok(())
    }

    pub async fn delete(&mut self, id: i64) -> Result<String> {
        let result = self.api.delete(id).await;
        let message = record(&mut self.state.error, result, "Suppression impossible")?;
        self.state.remove(id);
        Ok(message)
    }

    pub fn rows(&self) -> Vec<MissionRow> {
        self.state.items.iter().map(MissionRow::from).collect()
    }
}
