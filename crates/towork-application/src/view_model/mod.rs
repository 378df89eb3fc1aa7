//! Per-screen state holders.
//!
//! A view-model owns the state a screen renders and the typed clients it
//! needs. Writes touch local state only after the backend accepted them;
//! a failure records the message in `error` and leaves the items as they
//! were.

mod admin_users;
mod board;
mod candidatures;
mod catalog;
mod conversations;
mod draft_assistant;
mod feedback;
mod milestones;
mod missions;
mod portfolio;
mod profile;
mod wallet;

pub use admin_users::{AdminUsersViewModel, PieSegment, RoleShare, StatCard, role_color};
pub use board::{BoardMessage, FreelancerBoard, MissionCard, format_budget, format_duration};
pub use candidatures::{
    CandidatureBoard, RecommendationBadge, RecommendationView, decision_message,
};
pub use catalog::CatalogViewModel;
pub use conversations::{
    ConversationDetailViewModel, ConversationListViewModel, ConversationPoller, MessageView,
};
pub use draft_assistant::{MissionDraftAssistant, apply_draft};
pub use feedback::{FeedbackViewModel, summary_line};
pub use milestones::{MilestoneAudience, MilestoneView, MilestonesViewModel};
pub use missions::{ClientMissionsViewModel, MissionRow};
pub use portfolio::PortfolioViewModel;
pub use profile::{NOTHING_TO_SAVE, PROFILE_SAVED, ProfileData, ProfileViewModel};
pub use wallet::WalletViewModel;

use towork_core::Result;
use towork_core::candidature::Candidature;
use towork_core::catalog::{Competence, Domaine};
use towork_core::conversation::ConversationSummary;
use towork_core::milestone::Milestone;
use towork_core::mission::Mission;
use towork_core::profile::ManagedUser;
use tracing::warn;

/// Items that can be addressed by backend id.
pub trait Identified {
    fn id(&self) -> Option<i64>;
}

impl Identified for Mission {
    fn id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Identified for Candidature {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Identified for Milestone {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Identified for Domaine {
    fn id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Identified for Competence {
    fn id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Identified for ManagedUser {
    fn id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Identified for ConversationSummary {
    fn id(&self) -> Option<i64> {
        Some(self.id)
    }
}

/// List screen state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected_id: Option<i64>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            selected_id: None,
        }
    }
}

impl<T> ListState<T> {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Replaces the items on success; keeps them and records the message on
    /// failure.
    pub fn apply(&mut self, result: Result<Vec<T>>, fallback: &str) -> Result<()> {
        self.loading = false;
        let items = record(&mut self.error, result, fallback)?;
        self.items = items;
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Identified> ListState<T> {
    pub fn find(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected_id.and_then(|id| self.find(id))
    }

    pub fn select(&mut self, id: Option<i64>) {
        self.selected_id = id;
    }

    /// Swaps the item with the same id, or prepends it when absent.
    pub fn upsert(&mut self, item: T) {
        match item
            .id()
            .and_then(|id| self.items.iter().position(|i| i.id() == Some(id)))
        {
            Some(index) => self.items[index] = item,
            None => self.items.insert(0, item),
        }
    }

    pub fn remove(&mut self, id: i64) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == Some(id))?;
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        Some(self.items.remove(index))
    }
}

/// Stores a failure's user message in `error` before passing the result on.
pub(crate) fn record<T>(error: &mut Option<String>, result: Result<T>, fallback: &str) -> Result<T> {
    match result {
        Ok(value) => {
            *error = None;
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "{fallback}");
            *error = Some(err.user_message(fallback));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use towork_core::ToworkError;

    fn mission(id: i64, title: &str) -> Mission {
        Mission {
            id,
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn failed_load_keeps_items() {
        let mut state = ListState::default();
        state.apply(Ok(vec![mission(1, "Site")]), "x").unwrap();

        state.begin();
        let err = state
            .apply(Err(ToworkError::api(Some(500), "Serveur indisponible")), "Erreur")
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Serveur indisponible"));
        assert!(!state.loading);
    }

    #[test]
    fn upsert_patches_in_place_and_remove_clears_selection() {
        let mut state = ListState::default();
        state.items = vec![mission(1, "Site"), mission(2, "Logo")];
        state.select(Some(2));

        state.upsert(mission(2, "Logo v2"));
        assert_eq!(state.items[1].title, "Logo v2");
        state.upsert(mission(3, "App"));
        assert_eq!(state.items[0].id, 3);

        state.remove(2);
        assert!(state.selected().is_none());
        assert_eq!(state.items.len(), 2);
    }
}
