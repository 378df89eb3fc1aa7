//! The freelancer's mission board.
//!
//! Backend missions are turned into display cards, then enriched with the
//! freelancer's own candidatures: stage, application date and the message
//! thread with the client.

use super::{Identified, ListState, record};
use crate::AppContext;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;
use towork_core::candidature::{
    Candidature, CandidatureMessage, CandidatureMessageRequest, CandidatureStatus,
    CreateCandidatureRequest, MessageAuthor,
};
use towork_core::envelope::PageRequest;
use towork_core::mission::{BoardStage, BudgetType, ExperienceLevel, Mission, MissionStatus, WorkMode};
use towork_core::session::SessionStore;
use towork_core::wallet::group_thousands;
use towork_core::{Result, ToworkError};
use towork_interaction::api::{CandidatureApi, MissionApi};
use tracing::{debug, info, warn};

const BOARD_PAGE_SIZE: u32 = 100;
const BOARD_SORT: &str = "createdAt,DESC";
const SUMMARY_LIMIT: usize = 220;

#[derive(Debug, Clone, PartialEq)]
pub struct BoardMessage {
    pub id: Option<i64>,
    pub author: MessageAuthor,
    pub content: String,
    pub sent_at: String,
}

impl BoardMessage {
    fn from_dto(dto: &CandidatureMessage, now: &str) -> Self {
        Self {
            id: dto.id,
            author: match dto.author {
                Some(MessageAuthor::Client) => MessageAuthor::Client,
                _ => MessageAuthor::Freelancer,
            },
            content: dto.content.clone().unwrap_or_default(),
            sent_at: dto.created_at.clone().unwrap_or_else(|| now.to_string()),
        }
    }
}

/// A mission as the board shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionCard {
    pub id: i64,
    pub client_id: Option<i64>,
    pub domaine_id: Option<i64>,
    pub backend_status: Option<MissionStatus>,
    pub candidature_id: Option<i64>,
    pub title: String,
    pub client_name: String,
    pub domaine: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub budget: String,
    pub posted_at: String,
    pub deadline: String,
    pub stage: BoardStage,
    pub urgent: bool,
    pub experience_level: &'static str,
    pub work_model: &'static str,
    pub duration: String,
    pub weekly_rhythm: &'static str,
    pub deliverables: Vec<String>,
    pub tags: Vec<String>,
    pub requirements: Vec<String>,
    pub tools: Vec<String>,
    pub is_saved: bool,
    pub applied_at: Option<String>,
    pub conversation: Vec<BoardMessage>,
}

impl MissionCard {
    pub fn from_mission(mission: &Mission, now: &str) -> Self {
        let requirements = parse_list(mission.requirements.as_deref());
        let skills = parse_list(mission.skills_required.as_deref());
        let tags = parse_tags(mission.skills_required.as_deref());
        let posted_at = mission.created_at.clone().unwrap_or_else(|| now.to_string());

        Self {
            id: mission.id,
            client_id: mission.client_id,
            domaine_id: mission.domaine_id,
            backend_status: mission.status.clone(),
            candidature_id: None,
            title: mission.title.clone(),
            client_name: mission
                .client_name
                .clone()
                .or_else(|| mission.client_company_name.clone())
                .unwrap_or_else(|| "Client confidentiel".to_string()),
            domaine: mission
                .domaine_name
                .clone()
                .unwrap_or_else(|| "Général".to_string()),
            summary: format_summary(mission.description.as_deref()),
            description: mission.description.clone().unwrap_or_default(),
            location: format_location(
                mission.client_city.as_deref(),
                mission.client_country.as_deref(),
                mission.type_travail,
            ),
            budget: format_budget(mission.budget_min, mission.budget_max, mission.budget_type),
            deadline: mission.deadline.clone().unwrap_or_else(|| posted_at.clone()),
            posted_at,
            stage: BoardStage::from_backend(mission.status.as_ref()),
            urgent: mission.is_urgent.unwrap_or(false),
            experience_level: experience_label(mission.niveau_experience),
            work_model: work_model_label(mission.type_travail),
            duration: format_duration(mission.estimated_duration),
            weekly_rhythm: weekly_rhythm(mission.type_travail),
            deliverables: requirements.iter().take(3).cloned().collect(),
            tags: if tags.is_empty() {
                skills.iter().take(5).cloned().collect()
            } else {
                tags.clone()
            },
            requirements: if requirements.is_empty() {
                skills
            } else {
                requirements
            },
            tools: if tags.is_empty() {
                vec!["Communication".to_string(), "Collaboration".to_string()]
            } else {
                tags
            },
            is_saved: false,
            applied_at: None,
            conversation: Vec::new(),
        }
    }

    pub fn urgency_label(&self) -> &'static str {
        if self.urgent { "Urgent" } else { "Standard" }
    }

    fn push_message(&mut self, message: BoardMessage) {
        self.conversation.push(message);
        self.conversation.sort_by_key(|m| parse_time(&m.sent_at));
    }
}

impl Identified for MissionCard {
    fn id(&self) -> Option<i64> {
        Some(self.id)
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Euros without decimals, fr-FR grouping: `1 500 €`.
fn euros(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}\u{a0}€", group_thousands(value.abs().round() as u64))
}

/// Budget range with a suffix per budget type.
pub fn format_budget(min: Option<f64>, max: Option<f64>, kind: Option<BudgetType>) -> String {
    let range = match (min, max) {
        (None, None) => return "Budget à définir".to_string(),
        (Some(min), Some(max)) => format!("{} - {}", euros(min), euros(max)),
        (Some(min), None) => format!("À partir de {}", euros(min)),
        (None, Some(max)) => format!("Jusqu'à {}", euros(max)),
    };
    match kind {
        Some(BudgetType::Hourly) => format!("{range} / heure"),
        Some(BudgetType::Negotiable) => format!("{range} (négociable)"),
        _ => format!("{range} / mission"),
    }
}

pub fn format_duration(days: Option<u32>) -> String {
    match days {
        None | Some(0) => "Durée flexible".to_string(),
        Some(days) if days < 30 => format!("≈ {days} jours"),
        Some(days) => {
            let months = (f64::from(days) / 30.0).round() as u32;
            if months <= 1 {
                "≈ 1 mois".to_string()
            } else {
                format!("≈ {months} mois")
            }
        }
    }
}

fn format_summary(description: Option<&str>) -> String {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return "Mission publiée par nos clients".to_string();
    };
    let clean = description.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.chars().count() > SUMMARY_LIMIT {
        let cut: String = clean.chars().take(SUMMARY_LIMIT - 3).collect();
        format!("{cut}...")
    } else {
        clean
    }
}

fn format_location(city: Option<&str>, country: Option<&str>, mode: Option<WorkMode>) -> String {
    let parts: Vec<&str> = [city, country]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();
    if !parts.is_empty() {
        return parts.join(", ");
    }
    match mode {
        Some(WorkMode::Remote) => "Remote",
        Some(WorkMode::Hybrid) => "Hybride",
        _ => "Sur site",
    }
    .to_string()
}

fn weekly_rhythm(mode: Option<WorkMode>) -> &'static str {
    match mode {
        Some(WorkMode::Remote) => "Mode remote",
        Some(WorkMode::Hybrid) => "Mode hybride",
        _ => "Présence sur site",
    }
}

fn experience_label(level: Option<ExperienceLevel>) -> &'static str {
    match level {
        Some(ExperienceLevel::Beginner) => "Junior",
        Some(ExperienceLevel::Intermediate) => "Intermédiaire",
        _ => "Senior",
    }
}

fn work_model_label(mode: Option<WorkMode>) -> &'static str {
    match mode {
        Some(WorkMode::Remote) => "Remote",
        Some(WorkMode::Hybrid) => "Hybrid",
        _ => "On-site",
    }
}

/// Bullet or line separated list.
fn parse_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(['\n', '•', '-'])
        .map(|item| {
            item.trim_start_matches(|c: char| c.is_whitespace() || c == '•' || c == '-')
                .trim()
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Orders RFC 3339 and zone-less timestamps; unreadable ones sort first.
fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|t| t.and_utc())
        })
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

// ============================================================================
// Board
// ============================================================================

/// What a candidature contributes to its mission's card.
struct ApplicationSnapshot {
    mission_id: i64,
    candidature_id: i64,
    created_at: Option<String>,
    messages: Vec<BoardMessage>,
}

impl ApplicationSnapshot {
    /// Without a thread, the cover letter stands in as the first message.
    fn from_candidature(candidature: &Candidature, now: &str) -> Option<Self> {
        let mission_id = candidature.mission_id()?;
        let candidature_id = candidature.id?;
        let messages = match candidature.messages.as_deref() {
            Some(messages) if !messages.is_empty() => messages
                .iter()
                .map(|dto| BoardMessage::from_dto(dto, now))
                .collect(),
            _ => vec![BoardMessage {
                id: None,
                author: MessageAuthor::Freelancer,
                content: candidature.cover_letter.clone().unwrap_or_default(),
                sent_at: candidature
                    .created_at
                    .clone()
                    .unwrap_or_else(|| now.to_string()),
            }],
        };
        Some(Self {
            mission_id,
            candidature_id,
            created_at: candidature.created_at.clone(),
            messages,
        })
    }
}

pub struct FreelancerBoard {
    missions: MissionApi,
    candidatures: CandidatureApi,
    session: Arc<SessionStore>,
    pub state: ListState<MissionCard>,
    applications_loaded: bool,
}

impl FreelancerBoard {
    pub fn new(missions: MissionApi, candidatures: CandidatureApi, session: Arc<SessionStore>) -> Self {
        Self {
            missions,
            candidatures,
            session,
            state: ListState::default(),
            applications_loaded: false,
        }
    }

    pub fn from_context(context: &AppContext) -> Self {
        Self::new(
            context.api().missions.clone(),
            context.api().candidatures.clone(),
            context.session().clone(),
        )
    }

    pub fn get(&self, id: i64) -> Option<&MissionCard> {
        self.state.find(id)
    }

    fn card_mut(&mut self, id: i64) -> Option<&mut MissionCard> {
        self.state.items.iter_mut().find(|card| card.id == id)
    }

    /// Loads the open missions, then the freelancer's candidatures.
    ///
    /// Without `force`, an already filled board only refreshes the
    /// candidatures, and only if they were never loaded.
    pub async fn load(&mut self, force: bool) -> Result<()> {
        if self.state.loading {
            return Ok(());
        }
        if !force && !self.state.is_empty() {
            self.sync_applications(false).await;
            return Ok(());
        }

        self.state.begin();
        let now = now();
        let result = self
            .missions
            .list(PageRequest::new(0, BOARD_PAGE_SIZE), BOARD_SORT)
            .await
            .map(|missions| {
                missions
                    .iter()
                    .map(|mission| MissionCard::from_mission(mission, &now))
                    .collect()
            });
        self.state
            .apply(result, "Impossible de récupérer les missions")?;
        self.sync_applications(true).await;
        Ok(())
    }

    /// Fetches the freelancer's candidatures once per session unless forced.
    /// Failures leave the cards as they are.
    pub async fn sync_applications(&mut self, force: bool) {
        let Some(freelancer_id) = self.session.snapshot().user_id() else {
            return;
        };
        if self.applications_loaded && !force {
            return;
        }
        let result = self.candidatures.list_by_freelancer(freelancer_id).await;
        self.applications_loaded = true;
        match result {
            Ok(candidatures) => self.hydrate(&candidatures),
            Err(err) => warn!(error = %err, "Could not load candidatures"),
        }
    }

    /// Applies the freelancer's candidatures to the matching cards.
    pub fn hydrate(&mut self, candidatures: &[Candidature]) {
        let now = now();
        for snapshot in candidatures
            .iter()
            .filter_map(|c| ApplicationSnapshot::from_candidature(c, &now))
        {
            self.sync_snapshot(snapshot, &now);
        }

        for candidature in candidatures {
            let Some(mission_id) = candidature.mission_id() else {
                continue;
            };
            let Some(card) = self.card_mut(mission_id) else {
                continue;
            };
            if let Some(status) = &candidature.status {
                match status {
                    CandidatureStatus::Accepted => card.stage = BoardStage::InProgress,
                    CandidatureStatus::Pending => card.stage = BoardStage::Applied,
                    CandidatureStatus::Rejected => card.stage = BoardStage::Open,
                    _ => {}
                }
            }
            if let Some(message) = candidature.client_message.as_deref() {
                let sent_at = candidature
                    .updated_at
                    .clone()
                    .or_else(|| candidature.created_at.clone())
                    .unwrap_or_else(|| now.clone());
                append_client_message(card, message, sent_at);
            }
        }
        debug!(count = candidatures.len(), "Board hydrated");
    }

    fn sync_snapshot(&mut self, snapshot: ApplicationSnapshot, now: &str) -> Option<MissionCard> {
        let card = self.card_mut(snapshot.mission_id)?;
        card.candidature_id = Some(snapshot.candidature_id);
        if card.stage == BoardStage::Open {
            card.stage = BoardStage::Applied;
        }
        if card.applied_at.is_none() {
            card.applied_at = Some(snapshot.created_at.unwrap_or_else(|| now.to_string()));
        }
        if !snapshot.messages.is_empty() {
            card.conversation = snapshot.messages;
        }
        Some(card.clone())
    }

    /// Returns the card, fetching and caching it when not on the board.
    pub async fn fetch_mission(&mut self, id: i64) -> Result<MissionCard> {
        if let Some(card) = self.get(id) {
            return Ok(card.clone());
        }
        let result = self.missions.get(id).await;
        let mission = record(&mut self.state.error, result, "Mission introuvable")?;
        let card = MissionCard::from_mission(&mission, &now());
        self.state.upsert(card.clone());
        self.sync_applications(false).await;
        Ok(self.get(id).cloned().unwrap_or(card))
    }

    pub fn mark_as_applied(&mut self, id: i64) -> Option<&MissionCard> {
        let card = self.card_mut(id)?;
        if card.stage == BoardStage::Open {
            card.stage = BoardStage::Applied;
        }
        if card.applied_at.is_none() {
            card.applied_at = Some(now());
        }
        Some(card)
    }

    pub fn toggle_saved(&mut self, id: i64) -> Option<&MissionCard> {
        let card = self.card_mut(id)?;
        card.is_saved = !card.is_saved;
        Some(card)
    }

    /// Writes to the client about a mission.
    ///
    /// The first message creates the candidature with it as cover letter;
    /// later ones go to the candidature thread. A blank message sends
    /// nothing and returns the card unchanged.
    ///
    /// # Arguments
    ///
    /// * `mission_id` - Mission on the board
    /// * `content` - Message text
    /// * `resume_url` - Optional resume link
    /// * `proposed_price` - Offer sent with a new candidature
    /// * `proposed_duration` - Days, sent with a new candidature
    pub async fn apply(
        &mut self,
        mission_id: i64,
        content: &str,
        resume_url: Option<&str>,
        proposed_price: Option<f64>,
        proposed_duration: Option<u32>,
    ) -> Result<Option<MissionCard>> {
        let message = content.trim();
        if message.is_empty() {
            return Ok(self.get(mission_id).cloned());
        }
        let result = self
            .send_application(mission_id, message, resume_url, proposed_price, proposed_duration)
            .await;
        record(&mut self.state.error, result, "Impossible d'envoyer le message")
    }

    async fn send_application(
        &mut self,
        mission_id: i64,
        message: &str,
        resume_url: Option<&str>,
        proposed_price: Option<f64>,
        proposed_duration: Option<u32>,
    ) -> Result<Option<MissionCard>> {
        let freelancer_id = self
            .session
            .snapshot()
            .user_id()
            .ok_or(ToworkError::NotAuthenticated)?;
        let resume_url = resume_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        let now = now();

        if let Some(candidature_id) = self.get(mission_id).and_then(|card| card.candidature_id) {
            let request = CandidatureMessageRequest::new(MessageAuthor::Freelancer, message)
                .with_resume_url(resume_url);
            request.validate()?;
            let sent = self.candidatures.send_message(candidature_id, &request).await?;
            let Some(card) = self.card_mut(mission_id) else {
                return Ok(None);
            };
            card.push_message(BoardMessage::from_dto(&sent, &now));
            return Ok(Some(card.clone()));
        }

        let request = CreateCandidatureRequest {
            freelancer_id,
            mission_id,
            cover_letter: message.to_string(),
            proposed_price,
            proposed_duration,
            resume_url,
        };
        request.validate()?;
        let candidature = self.candidatures.create(&request).await?;
        info!(mission_id, candidature_id = ?candidature.id, "Candidature sent");
        Ok(ApplicationSnapshot::from_candidature(&candidature, &now)
            .and_then(|snapshot| self.sync_snapshot(snapshot, &now)))
    }

    /// Hands the final delivery over to the client.
    pub async fn submit_final(&mut self, mission_id: i64) -> Result<()> {
        let result = self.missions.submit_final(mission_id).await;
        let mission = record(&mut self.state.error, result, "Impossible de soumettre la mission")?;
        if let Some(card) = self.card_mut(mission_id) {
            let status = mission
                .and_then(|m| m.status)
                .unwrap_or(MissionStatus::PendingClosure);
            card.stage = BoardStage::from_backend(Some(&status));
            card.backend_status = Some(status);
        }
        Ok(())
    }

    pub fn stage_label(stage: BoardStage) -> &'static str {
        stage.label()
    }

    /// Cards at a given stage, in board order.
    pub fn by_stage(&self, stage: BoardStage) -> impl Iterator<Item = &MissionCard> {
        self.state.items.iter().filter(move |card| card.stage == stage)
    }
}

/// Adds the client's answer unless the same one is already in the thread.
fn append_client_message(card: &mut MissionCard, message: &str, sent_at: String) {
    let content = message.trim();
    if content.is_empty() {
        return;
    }
    let exists = card.conversation.iter().any(|existing| {
        existing.author == MessageAuthor::Client
            && existing.content == content
            && existing.sent_at == sent_at
    });
    if !exists {
        card.push_message(BoardMessage {
            id: None,
            author: MessageAuthor::Client,
            content: content.to_string(),
            sent_at,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use towork_core::candidature::MissionRef;

    fn mission() -> Mission {
        Mission {
            id: 7,
            title: "Refonte du site".into(),
            description: Some("Une   refonte\ncomplète".into()),
            requirements: Some("• Maquettes\n• Intégration\n• Recette\n• Mise en ligne".into()),
            skills_required: Some("Angular, Rust ,".into()),
            budget_min: Some(1500.0),
            budget_max: Some(3000.0),
            budget_type: Some(BudgetType::Fixed),
            type_travail: Some(WorkMode::Remote),
            niveau_experience: Some(ExperienceLevel::Beginner),
            estimated_duration: Some(45),
            status: Some(MissionStatus::Published),
            created_at: Some("2024-05-01T10:00:00Z".into()),
            ..Default::default()
        }
    }

    #[test]
    fn card_mapping() {
        let card = MissionCard::from_mission(&mission(), "2024-06-01T00:00:00Z");
        assert_eq!(card.client_name, "Client confidentiel");
        assert_eq!(card.domaine, "Général");
        assert_eq!(card.summary, "Une refonte complète");
        assert_eq!(card.location, "Remote");
        assert_eq!(card.budget, "1\u{202f}500\u{a0}€ - 3\u{202f}000\u{a0}€ / mission");
        assert_eq!(card.duration, "≈ 2 mois");
        assert_eq!(card.deliverables, ["Maquettes", "Intégration", "Recette"]);
        assert_eq!(card.tags, ["Angular", "Rust"]);
        assert_eq!(card.tools, card.tags);
        assert_eq!(card.experience_level, "Junior");
        assert_eq!(card.deadline, "2024-05-01T10:00:00Z");
        assert_eq!(card.stage, BoardStage::Open);
    }

    #[test]
    fn budget_and_duration_variants() {
        assert_eq!(format_budget(None, None, Some(BudgetType::Hourly)), "Budget à définir");
        assert_eq!(
            format_budget(Some(50.0), None, Some(BudgetType::Hourly)),
            "À partir de 50\u{a0}€ / heure"
        );
        assert_eq!(
            format_budget(None, Some(800.0), Some(BudgetType::Negotiable)),
            "Jusqu'à 800\u{a0}€ (négociable)"
        );
        assert_eq!(format_duration(Some(0)), "Durée flexible");
        assert_eq!(format_duration(Some(12)), "≈ 12 jours");
        assert_eq!(format_duration(Some(40)), "≈ 1 mois");
    }

    #[test]
    fn long_summary_is_cut() {
        let text = "a".repeat(300);
        let summary = format_summary(Some(&text));
        assert_eq!(summary.chars().count(), 220);
        assert!(summary.ends_with("..."));
        assert_eq!(format_summary(None), "Mission publiée par nos clients");
    }

    #[test]
    fn skills_fill_in_for_missing_requirements() {
        let mut bare = mission();
        bare.requirements = None;
        bare.skills_required = None;
        let card = MissionCard::from_mission(&bare, "now");
        assert!(card.requirements.is_empty());
        assert_eq!(card.tools, ["Communication", "Collaboration"]);
    }

    #[test]
    fn client_message_appended_once_in_time_order() {
        let mut card = MissionCard::from_mission(&mission(), "now");
        card.conversation.push(BoardMessage {
            id: Some(1),
            author: MessageAuthor::Freelancer,
            content: "Bonjour".into(),
            sent_at: "2024-05-02T09:00:00Z".into(),
        });
        append_client_message(&mut card, " Merci ", "2024-05-01T12:00:00Z".into());
        append_client_message(&mut card, "Merci", "2024-05-01T12:00:00Z".into());

        assert_eq!(card.conversation.len(), 2);
        assert_eq!(card.conversation[0].author, MessageAuthor::Client);
    }

    #[test]
    fn cover_letter_stands_in_for_empty_thread() {
        let candidature = Candidature {
            id: Some(4),
            mission: Some(MissionRef {
                id: Some(7),
                title: None,
            }),
            cover_letter: Some("Je suis intéressé".into()),
            created_at: Some("2024-05-03T08:00:00Z".into()),
            ..Default::default()
        };
        let snapshot = ApplicationSnapshot::from_candidature(&candidature, "now").unwrap();
        assert_eq!(snapshot.mission_id, 7);
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.messages[0].content, "Je suis intéressé");
        assert_eq!(snapshot.messages[0].author, MessageAuthor::Freelancer);
    }
}
