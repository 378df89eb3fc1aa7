//! "My profile" screen for clients and freelancers.

use super::feedback::summary_line;
use super::record;
use crate::AppContext;
use std::sync::Arc;
use towork_core::auth::{Role, join_name};
use towork_core::feedback::{Feedback, FeedbackSummary};
use towork_core::profile::{
    ClientProfile, ClientProfileUpdate, FreelancerProfile, FreelancerProfileUpdate,
};
use towork_core::session::SessionStore;
use towork_core::{Result, ToworkError};
use towork_interaction::api::{FeedbackApi, ProfileApi};
use tracing::{debug, info};

pub const NOTHING_TO_SAVE: &str = "Aucune modification à enregistrer pour le moment.";
pub const PROFILE_SAVED: &str = "Vos informations ont été mises à jour avec succès.";

/// The loaded profile, shaped by the viewer's role.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileData {
    Client(ClientProfile),
    Freelancer(FreelancerProfile),
}

impl ProfileData {
    pub fn id(&self) -> i64 {
        match self {
            ProfileData::Client(client) => client.id,
            ProfileData::Freelancer(freelancer) => freelancer.id,
        }
    }

    pub fn full_name(&self) -> String {
        let (first, last) = match self {
            ProfileData::Client(c) => (c.first_name.as_deref(), c.last_name.as_deref()),
            ProfileData::Freelancer(f) => (f.first_name.as_deref(), f.last_name.as_deref()),
        };
        join_name(first, last).unwrap_or_else(|| "Profil".to_string())
    }

    pub fn email(&self) -> &str {
        match self {
            ProfileData::Client(c) => &c.email,
            ProfileData::Freelancer(f) => &f.email,
        }
    }

    pub fn is_verified(&self) -> bool {
        match self {
            ProfileData::Client(c) => c.is_verified.unwrap_or(false),
            ProfileData::Freelancer(f) => f.is_verified.unwrap_or(false),
        }
    }
}

pub struct ProfileViewModel {
    profiles: ProfileApi,
    feedback: FeedbackApi,
    session: Arc<SessionStore>,
    pub profile: Option<ProfileData>,
    pub feedback_summary: Option<FeedbackSummary>,
    pub feedbacks: Vec<Feedback>,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl ProfileViewModel {
    pub fn new(profiles: ProfileApi, feedback: FeedbackApi, session: Arc<SessionStore>) -> Self {
        Self {
            profiles,
            feedback,
            session,
            profile: None,
            feedback_summary: None,
            feedbacks: Vec::new(),
            loading: false,
            error: None,
            notice: None,
        }
    }

    pub fn from_context(context: &AppContext) -> Self {
        Self::new(
            context.api().profiles.clone(),
            context.api().feedback.clone(),
            context.session().clone(),
        )
    }

    /// Loads the profile matching the session role, then its ratings.
    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        self.feedback_summary = None;
        self.feedbacks.clear();
        let result = self.fetch_profile().await;
        self.loading = false;
        let profile = record(&mut self.error, result, "Impossible de charger votre profil.")?;
        self.load_ratings(&profile).await;
        self.profile = Some(profile);
        Ok(())
    }

    async fn fetch_profile(&self) -> Result<ProfileData> {
        match self.session.role() {
            Some(Role::Freelancer) => self
                .profiles
                .freelancer_me()
                .await
                .map(ProfileData::Freelancer),
            Some(Role::Client) => self.profiles.client_me().await.map(ProfileData::Client),
            Some(other) => Err(ToworkError::internal(format!(
                "no profile screen for role {other}"
            ))),
            None => Err(ToworkError::NotAuthenticated),
        }
    }

    /// Ratings are secondary; a failure leaves them empty.
    async fn load_ratings(&mut self, profile: &ProfileData) {
        match profile {
            ProfileData::Client(client) => match self.feedback.user_summary(client.id).await {
                Ok(summary) => self.feedback_summary = Some(summary),
                Err(err) => debug!(error = %err, "Feedback summary unavailable"),
            },
            ProfileData::Freelancer(freelancer) => {
                match self.feedback.freelancer_feedbacks(freelancer.id).await {
                    Ok(aggregate) => {
                        self.feedback_summary = Some(aggregate.summary);
                        self.feedbacks = aggregate.feedbacks;
                    }
                    Err(err) => debug!(error = %err, "Freelancer feedbacks unavailable"),
                }
            }
        }
    }

    pub fn rating_line(&self) -> Option<String> {
        self.feedback_summary.as_ref().map(summary_line)
    }

    /// The edit form prefilled from the loaded client profile.
    pub fn client_form(&self) -> Option<ClientProfileUpdate> {
        match &self.profile {
            Some(ProfileData::Client(client)) => Some(client_update_from(client)),
            _ => None,
        }
    }

    pub fn freelancer_form(&self) -> Option<FreelancerProfileUpdate> {
        match &self.profile {
            Some(ProfileData::Freelancer(freelancer)) => Some(freelancer_update_from(freelancer)),
            _ => None,
        }
    }

    /// Saves the client form.
    ///
    /// # Returns
    ///
    /// `false` when the form equals the stored profile; nothing is sent.
    pub async fn save_client(&mut self, update: ClientProfileUpdate) -> Result<bool> {
        let update = normalize_client(update);
        if self.client_form().as_ref() == Some(&update) {
            self.notice = Some(NOTHING_TO_SAVE.to_string());
            return Ok(false);
        }
        let result = match update.validate() {
            Ok(()) => self.profiles.update_client_me(&update).await,
            Err(err) => Err(err),
        };
        let saved = record(&mut self.error, result, "Erreur lors de la mise à jour.")?;
        info!(client_id = saved.id, "Client profile updated");
        self.profile = Some(ProfileData::Client(saved));
        self.notice = Some(PROFILE_SAVED.to_string());
        Ok(true)
    }

    pub async fn save_freelancer(&mut self, update: FreelancerProfileUpdate) -> Result<bool> {
        let update = normalize_freelancer(update);
        if self.freelancer_form().as_ref() == Some(&update) {
            self.notice = Some(NOTHING_TO_SAVE.to_string());
            return Ok(false);
        }
        let result = match update.validate() {
            Ok(()) => self.profiles.update_freelancer_me(&update).await,
            Err(err) => Err(err),
        };
        let saved = record(&mut self.error, result, "Erreur lors de la mise à jour.")?;
        info!(freelancer_id = saved.id, "Freelancer profile updated");
        self.profile = Some(ProfileData::Freelancer(saved));
        self.notice = Some(PROFILE_SAVED.to_string());
        Ok(true)
    }
}

/// Trims text and turns blanks into `None`.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_client(update: ClientProfileUpdate) -> ClientProfileUpdate {
    ClientProfileUpdate {
        first_name: normalize(update.first_name),
        last_name: normalize(update.last_name),
        phone: normalize(update.phone),
        company_name: normalize(update.company_name),
        company_size: normalize(update.company_size),
        industry: normalize(update.industry),
        website: normalize(update.website),
        address: normalize(update.address),
        city: normalize(update.city),
        country: normalize(update.country),
        postal_code: normalize(update.postal_code),
        profile_picture: normalize(update.profile_picture),
        bio: normalize(update.bio),
    }
}

fn normalize_freelancer(update: FreelancerProfileUpdate) -> FreelancerProfileUpdate {
    FreelancerProfileUpdate {
        first_name: normalize(update.first_name),
        last_name: normalize(update.last_name),
        phone: normalize(update.phone),
        title: normalize(update.title),
        bio: normalize(update.bio),
        skills: update.skills.map(|skills| {
            skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }),
        availability: normalize(update.availability),
        address: normalize(update.address),
        city: normalize(update.city),
        country: normalize(update.country),
        postal_code: normalize(update.postal_code),
        profile_picture: normalize(update.profile_picture),
        portfolio_url: normalize(update.portfolio_url),
        linkedin_url: normalize(update.linkedin_url),
        github_url: normalize(update.github_url),
        date_of_birth: normalize(update.date_of_birth),
        gender: normalize(update.gender),
        ..update
    }
}

fn client_update_from(client: &ClientProfile) -> ClientProfileUpdate {
    normalize_client(ClientProfileUpdate {
        first_name: client.first_name.clone(),
        last_name: client.last_name.clone(),
        phone: client.phone.clone(),
        company_name: client.company_name.clone(),
        company_size: client.company_size.clone(),
        industry: client.industry.clone(),
        website: client.website.clone(),
        address: client.address.clone(),
        city: client.city.clone(),
        country: client.country.clone(),
        postal_code: client.postal_code.clone(),
        profile_picture: client.profile_picture.clone(),
        bio: client.bio.clone(),
    })
}

fn freelancer_update_from(freelancer: &FreelancerProfile) -> FreelancerProfileUpdate {
    normalize_freelancer(FreelancerProfileUpdate {
        first_name: freelancer.first_name.clone(),
        last_name: freelancer.last_name.clone(),
        phone: freelancer.phone.clone(),
        title: freelancer.title.clone(),
        bio: freelancer.bio.clone(),
        skills: freelancer.skills.clone(),
        hourly_rate: freelancer.hourly_rate,
        daily_rate: freelancer.daily_rate,
        availability: freelancer.availability.clone(),
        address: freelancer.address.clone(),
        city: freelancer.city.clone(),
        country: freelancer.country.clone(),
        postal_code: freelancer.postal_code.clone(),
        profile_picture: freelancer.profile_picture.clone(),
        portfolio_url: freelancer.portfolio_url.clone(),
        linkedin_url: freelancer.linkedin_url.clone(),
        github_url: freelancer.github_url.clone(),
        date_of_birth: freelancer.date_of_birth.clone(),
        gender: freelancer.gender.clone(),
        is_available: freelancer.is_available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_form_matches_stored_profile() {
        let client = ClientProfile {
            id: 3,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: "ada@towork.io".into(),
            city: Some("  ".into()),
            ..Default::default()
        };
        let edited = ClientProfileUpdate {
            first_name: Some(" Ada ".into()),
            last_name: Some("Lovelace".into()),
            ..Default::default()
        };
        assert_eq!(normalize_client(edited), client_update_from(&client));
        assert_eq!(ProfileData::Client(client).full_name(), "Ada Lovelace");
    }
}
