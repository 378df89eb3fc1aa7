use super::record;
use super::milestones::MilestoneAudience;
use crate::AppContext;
use towork_core::Result;
use towork_core::feedback::{
    Feedback, FeedbackDirection, FeedbackSummary, NewFeedback, stars,
};
use towork_core::mission::MissionStatus;
use towork_interaction::api::FeedbackApi;
use tracing::info;

/// Feedback of one mission, given once it is completed.
pub struct FeedbackViewModel {
    api: FeedbackApi,
    mission_id: i64,
    audience: MilestoneAudience,
    pub mine: Option<Feedback>,
    pub loading: bool,
    pub saving: bool,
    pub error: Option<String>,
}

impl FeedbackViewModel {
    pub fn new(api: FeedbackApi, mission_id: i64, audience: MilestoneAudience) -> Self {
        Self {
            api,
            mission_id,
            audience,
            mine: None,
            loading: false,
            saving: false,
            error: None,
        }
    }

    pub fn from_context(context: &AppContext, mission_id: i64, audience: MilestoneAudience) -> Self {
        Self::new(context.api().feedback.clone(), mission_id, audience)
    }

    /// Feedback is only offered on completed missions.
    pub fn is_open(status: &MissionStatus) -> bool {
        *status == MissionStatus::Completed
    }

    pub fn direction(&self) -> FeedbackDirection {
        match self.audience {
            MilestoneAudience::Client => FeedbackDirection::ClientToFreelancer,
            MilestoneAudience::Freelancer => FeedbackDirection::FreelancerToClient,
        }
    }

    /// Loads the viewer's feedback. A 404 means none was given yet.
    pub async fn load(&mut self) -> Result<Option<&Feedback>> {
        self.loading = true;
        let result = match self.api.mine(self.mission_id).await {
            Err(err) if err.is_not_found() => Ok(None),
            other => other,
        };
        self.loading = false;
        self.mine = record(&mut self.error, result, "Impossible de charger le feedback")?;
        Ok(self.mine.as_ref())
    }

    /// Submits a rating of 1 to 5 with a comment of at least 10 characters.
    pub async fn submit(&mut self, rating: u8, comment: &str) -> Result<&Feedback> {
        let feedback = NewFeedback {
            rating,
            comment: Some(comment.trim().to_string()).filter(|c| !c.is_empty()),
            direction: Some(self.direction()),
        };
        self.saving = true;
        let result = match feedback.validate() {
            Ok(()) => self.api.create(self.mission_id, &feedback).await,
            Err(err) => Err(err),
        };
        self.saving = false;
        let saved = record(&mut self.error, result, "Impossible d'envoyer le feedback")?;
        info!(mission_id = self.mission_id, rating, "Feedback sent");
        Ok(self.mine.insert(saved))
    }

    pub fn has_given(&self) -> bool {
        self.mine.is_some()
    }

    pub fn my_stars(&self) -> Option<String> {
        self.mine.as_ref().map(|f| stars(f64::from(f.rating)))
    }
}

/// `4.3 ★★★★☆ (12 avis)`, or a placeholder when nobody rated yet.
pub fn summary_line(summary: &FeedbackSummary) -> String {
    if summary.count == 0 {
        return "Aucun avis pour le moment".to_string();
    }
    format!(
        "{:.1} {} ({} avis)",
        summary.average_rating,
        stars(summary.average_rating),
        summary.count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line_formats_average() {
        let summary = FeedbackSummary {
            average_rating: 4.3,
            count: 12,
        };
        assert_eq!(summary_line(&summary), "4.3 ★★★★☆ (12 avis)");
        assert_eq!(
            summary_line(&FeedbackSummary::default()),
            "Aucun avis pour le moment"
        );
    }
}
