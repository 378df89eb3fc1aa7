//! Client side review of the candidatures received per mission.

use super::{ListState, record};
use crate::AppContext;
use crate::cache::MissionCache;
use towork_core::Result;
use towork_core::candidature::{Candidature, CandidatureStatus, ClientNote};
use towork_core::mission::{FreelancerMatch, Mission, MissionStatus};
use towork_interaction::api::{CandidatureApi, MissionApi};
use tracing::{info, warn};

const RECOMMENDATION_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationBadge {
    Recommended,
    Relevant,
    WeakMatch,
    Unscored,
}

impl RecommendationBadge {
    pub fn from_score(score: Option<f64>) -> Self {
        match score.map(|s| s.clamp(0.0, 1.0)) {
            None => RecommendationBadge::Unscored,
            Some(s) if s >= 0.07 => RecommendationBadge::Recommended,
            Some(s) if s >= 0.04 => RecommendationBadge::Relevant,
            Some(_) => RecommendationBadge::WeakMatch,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecommendationBadge::Recommended => "Recommandé",
            RecommendationBadge::Relevant => "Pertinent",
            RecommendationBadge::WeakMatch => "Faible match",
            RecommendationBadge::Unscored => "À vérifier",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationView {
    pub freelancer: FreelancerMatch,
    pub score_percent: Option<u8>,
    pub badge: RecommendationBadge,
}

impl From<FreelancerMatch> for RecommendationView {
    fn from(freelancer: FreelancerMatch) -> Self {
        let score = freelancer.score.map(|s| s.clamp(0.0, 1.0));
        Self {
            score_percent: score.map(|s| (s * 100.0).round() as u8),
            badge: RecommendationBadge::from_score(score),
            freelancer,
        }
    }
}

/// The client's missions with their candidatures and suggested freelancers.
pub struct CandidatureBoard {
    missions_api: MissionApi,
    candidatures_api: CandidatureApi,
    pub missions: ListState<Mission>,
    candidatures: MissionCache<Candidature>,
    recommendations: MissionCache<FreelancerMatch>,
    pub selected_candidature: Option<i64>,
    pub candidatures_error: Option<String>,
    pub recommendations_error: Option<String>,
}

impl CandidatureBoard {
    pub fn new(missions_api: MissionApi, candidatures_api: CandidatureApi) -> Self {
        Self {
            missions_api,
            candidatures_api,
            missions: ListState::default(),
            candidatures: MissionCache::new(),
            recommendations: MissionCache::new(),
            selected_candidature: None,
            candidatures_error: None,
            recommendations_error: None,
        }
    }

    pub fn from_context(context: &AppContext) -> Self {
        Self::new(
            context.api().missions.clone(),
            context.api().candidatures.clone(),
        )
    }

    /// Loads the client's missions and opens the first one.
    pub async fn load_missions(&mut self) -> Result<()> {
        self.missions.begin();
        let result = self.missions_api.mine().await;
        self.missions
            .apply(result, "Impossible de récupérer vos missions.")?;
        if let Some(first) = self.missions.items.first().map(|m| m.id) {
            self.select_mission(first).await?;
        }
        Ok(())
    }

    /// Opens a mission: its candidatures and recommendations come from the
    /// cache when already fetched.
    pub async fn select_mission(&mut self, mission_id: i64) -> Result<()> {
        if self.missions.selected_id == Some(mission_id) {
            return Ok(());
        }
        self.missions.select(Some(mission_id));
        self.selected_candidature = None;
        self.ensure_candidatures(mission_id, false).await?;
        self.ensure_recommendations(mission_id, false).await;
        Ok(())
    }

    /// Refetches the selected mission's lists.
    pub async fn refresh(&mut self) -> Result<()> {
        let Some(mission_id) = self.missions.selected_id else {
            return Ok(());
        };
        self.ensure_candidatures(mission_id, true).await?;
        self.ensure_recommendations(mission_id, true).await;
        Ok(())
    }

    pub async fn ensure_candidatures(&mut self, mission_id: i64, force: bool) -> Result<Vec<Candidature>> {
        if !force {
            if let Some(cached) = self.candidatures.get(mission_id).await {
                self.selected_candidature = cached.first().and_then(|c| c.id);
                return Ok(cached);
            }
        }

        let result = self
            .candidatures_api
            .list_by_mission(mission_id)
            .await
            .map(|list| list.into_iter().filter(|c| c.id.is_some()).collect::<Vec<_>>());
        let list = match record(
            &mut self.candidatures_error,
            result,
            "Impossible de charger les candidatures.",
        ) {
            Ok(list) => list,
            Err(err) => {
                self.candidatures.insert(mission_id, Vec::new()).await;
                return Err(err);
            }
        };
        self.selected_candidature = list.first().and_then(|c| c.id);
        self.candidatures.insert(mission_id, list.clone()).await;
        Ok(list)
    }

    /// Suggestions are advisory: a failure is recorded and yields an empty
    /// list.
    pub async fn ensure_recommendations(&mut self, mission_id: i64, force: bool) -> Vec<RecommendationView> {
        if force || !self.recommendations.contains(mission_id).await {
            let result = self
                .missions_api
                .recommendations(mission_id, Some(RECOMMENDATION_LIMIT))
                .await;
            let list = record(
                &mut self.recommendations_error,
                result,
                "Impossible de charger les suggestions.",
            )
            .unwrap_or_default();
            self.recommendations.insert(mission_id, list).await;
        }
        self.recommendations_for(mission_id).await
    }

    pub async fn candidatures_for(&self, mission_id: i64) -> Vec<Candidature> {
        self.candidatures.get(mission_id).await.unwrap_or_default()
    }

    pub async fn recommendations_for(&self, mission_id: i64) -> Vec<RecommendationView> {
        self.recommendations
            .get(mission_id)
            .await
            .unwrap_or_default()
            .into_iter()
            .map(RecommendationView::from)
            .collect()
    }

    pub async fn selected(&self) -> Option<Candidature> {
        let mission_id = self.missions.selected_id?;
        let id = self.selected_candidature?;
        self.candidatures_for(mission_id)
            .await
            .into_iter()
            .find(|c| c.id == Some(id))
    }

    /// Accepts, rejects or withdraws a candidature.
    ///
    /// The cached entry is patched with the backend answer. Accepting also
    /// moves the mission to `IN_PROGRESS`.
    ///
    /// # Returns
    ///
    /// The confirmation text to show.
    pub async fn decide(
        &mut self,
        candidature_id: i64,
        status: &CandidatureStatus,
        client_message: Option<&str>,
    ) -> Result<String> {
        let updated = self.update_status(candidature_id, status, client_message).await?;
        let name = updated.freelancer_name();
        if *status == CandidatureStatus::Accepted {
            self.mark_mission_started().await;
        }
        info!(candidature_id, status = status.as_str(), "Candidature decided");
        Ok(decision_message(status, &name))
    }

    /// Sends a note to the freelancer without changing the status.
    pub async fn send_message(&mut self, candidature_id: i64, message: &str) -> Result<String> {
        let note = ClientNote::new(message);
        note.validate()?;
        let current = self
            .selected()
            .await
            .filter(|c| c.id == Some(candidature_id))
            .map(|c| c.status())
            .unwrap_or(CandidatureStatus::Pending);
        let updated = self
            .update_status(candidature_id, &current, Some(note.message.as_str()))
            .await?;
        Ok(format!("Message envoyé à {}.", updated.freelancer_name()))
    }

    async fn update_status(
        &mut self,
        candidature_id: i64,
        status: &CandidatureStatus,
        client_message: Option<&str>,
    ) -> Result<Candidature> {
        let result = self
            .candidatures_api
            .update_status(candidature_id, status, client_message)
            .await;
        let updated = record(
            &mut self.candidatures_error,
            result,
            "Impossible de mettre à jour la candidature.",
        )?;
        if let Some(mission_id) = self.missions.selected_id.or(updated.mission_id()) {
            let patched = updated.clone();
            self.candidatures
                .update(mission_id, move |list| {
                    match list.iter().position(|c| c.id == patched.id) {
                        Some(index) => list[index] = patched,
                        None => list.insert(0, patched),
                    }
                })
                .await;
        }
        Ok(updated)
    }

    async fn mark_mission_started(&mut self) {
        let Some(mission_id) = self.missions.selected_id else {
            return;
        };
        match self
            .missions_api
            .update_status(mission_id, &MissionStatus::InProgress)
            .await
        {
            Ok(mission) => self.missions.upsert(mission),
            Err(err) => {
                warn!(mission_id, error = %err, "Mission status not updated after acceptance");
                self.missions.error = Some(err.user_message("Impossible de mettre à jour la mission."));
            }
        }
    }
}

pub fn decision_message(status: &CandidatureStatus, freelancer_name: &str) -> String {
    match status {
        CandidatureStatus::Accepted => format!("{freelancer_name} a été accepté pour la mission."),
        CandidatureStatus::Rejected => format!("{freelancer_name} a été informé de votre décision."),
        CandidatureStatus::Withdrawn => format!("{freelancer_name} a été marqué comme retiré."),
        _ => format!("Message envoyé à {freelancer_name}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_thresholds() {
        assert_eq!(RecommendationBadge::from_score(Some(0.07)).label(), "Recommandé");
        assert_eq!(RecommendationBadge::from_score(Some(0.05)).label(), "Pertinent");
        assert_eq!(RecommendationBadge::from_score(Some(0.01)).label(), "Faible match");
        assert_eq!(RecommendationBadge::from_score(None).label(), "À vérifier");
    }

    #[test]
    fn score_is_clamped_to_percent() {
        let view = RecommendationView::from(FreelancerMatch {
            freelancer_id: 1,
            score: Some(1.4),
            ..Default::default()
        });
        assert_eq!(view.score_percent, Some(100));
        assert_eq!(view.badge, RecommendationBadge::Recommended);
    }
}
