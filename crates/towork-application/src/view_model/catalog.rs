//! Admin catalog screen: domains and skills.

use super::{ListState, record};
use crate::AppContext;
use futures::future::join;
use towork_core::Result;
use towork_core::catalog::{Certification, Competence, CompetenceDraft, Domaine, DomaineDraft};
use towork_core::envelope::{Page, PageRequest};
use towork_interaction::api::{CompetenceApi, DomaineApi};
use tracing::info;

pub struct CatalogViewModel {
    domaines_api: DomaineApi,
    competences_api: CompetenceApi,
    pub domaines: ListState<Domaine>,
    pub competences: ListState<Competence>,
    pub page: PageRequest,
    pub total_domaines: u64,
    pub total_competences: u64,
}

impl CatalogViewModel {
    pub fn new(domaines_api: DomaineApi, competences_api: CompetenceApi) -> Self {
        Self {
            domaines_api,
            competences_api,
            domaines: ListState::default(),
            competences: ListState::default(),
            page: PageRequest::default(),
            total_domaines: 0,
            total_competences: 0,
        }
    }

    pub fn from_context(context: &AppContext) -> Self {
        Self::new(
            context.api().domaines.clone(),
            context.api().competences.clone(),
        )
    }

    /// Loads the current page of both lists. Each list records its own
    /// failure; the first one is returned.
    pub async fn load(&mut self) -> Result<()> {
        self.domaines.begin();
        self.competences.begin();
        let (domaines, competences) = join(
            self.domaines_api.list_paged(self.page),
            self.competences_api.list_paged(self.page),
        )
        .await;

        let domaines = self.apply_domaines(domaines);
        let competences = self.apply_competences(competences);
        domaines.and(competences)
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<()> {
        self.page.page = page;
        self.load().await
    }

    fn apply_domaines(&mut self, result: Result<Page<Domaine>>) -> Result<()> {
        let result = result.map(|page| {
            self.total_domaines = page.total_elements;
            page.content
        });
        self.domaines
            .apply(result, "Impossible de charger les domaines")
    }

    fn apply_competences(&mut self, result: Result<Page<Competence>>) -> Result<()> {
        let result = result.map(|page| {
            self.total_competences = page.total_elements;
            page.content
        });
        self.competences
            .apply(result, "Impossible de charger les compétences")
    }

    /// Active domains only, as offered in the mission form.
    pub async fn load_active(&mut self) -> Result<()> {
        self.domaines.begin();
        let result = self.domaines_api.list_active().await;
        self.domaines
            .apply(result, "Impossible de charger les domaines")
    }

    /// Keyword search; a blank keyword reloads the current page.
    pub async fn search(&mut self, keyword: &str) -> Result<()> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            self.domaines.begin();
            let result = self.domaines_api.list_paged(self.page).await;
            return self.apply_domaines(result);
        }
        self.domaines.begin();
        let result = self.domaines_api.search(keyword).await;
        self.domaines.apply(result, "Recherche impossible")
    }

    // ============================================================================
    // Domaines
    // ============================================================================

    pub async fn create_domaine(&mut self, draft: &DomaineDraft) -> Result<()> {
        let result = match draft.validate() {
            Ok(()) => self.domaines_api.create(draft).await,
            Err(err) => Err(err),
        };
        let created = record(&mut self.domaines.error, result, "Impossible de créer le domaine")?;
        info!(domaine_id = created.id, name = %created.name, "Domaine created");
        self.domaines.upsert(created);
        self.total_domaines += 1;
        Ok(())
    }

    pub async fn update_domaine(&mut self, id: i64, draft: &DomaineDraft) -> Result<()> {
        let result = match draft.validate() {
            Ok(()) => self.domaines_api.update(id, draft).await,
            Err(err) => Err(err),
        };
        let updated = record(
            &mut self.domaines.error,
            result,
            "Impossible de mettre à jour le domaine",
        )?;
        self.domaines.upsert(updated);
        Ok(())
    }

    /// Flips the active flag of a domain.
    pub async fn toggle_domaine(&mut self, id: i64) -> Result<()> {
        let active = self.domaines.find(id).is_some_and(|d| d.is_active);
        let result = if active {
            self.domaines_api.deactivate(id).await
        } else {
            self.domaines_api.activate(id).await
        };
        let updated = record(&mut self.domaines.error, result, "Erreur API")?;
        self.domaines.upsert(updated);
        Ok(())
    }

    pub async fn delete_domaine(&mut self, id: i64) -> Result<String> {
        let result = self.domaines_api.delete(id).await;
        let message = record(&mut self.domaines.error, result, "Impossible de supprimer le domaine")?;
        if self.domaines.remove(id).is_some() {
            self.total_domaines = self.total_domaines.saturating_sub(1);
        }
        Ok(message)
    }

    // ============================================================================
    // Competences
    // ============================================================================

    pub async fn create_competence(&mut self, draft: &CompetenceDraft) -> Result<()> {
        let result = match draft.validate() {
            Ok(()) => self.competences_api.create(draft).await,
            Err(err) => Err(err),
        };
        let created = record(
            &mut self.competences.error,
            result,
            "Impossible de créer la compétence",
        )?;
        self.competences.upsert(created);
        self.total_competences += 1;
        Ok(())
    }

    pub async fn update_competence(&mut self, id: i64, draft: &CompetenceDraft) -> Result<()> {
        let result = match draft.validate() {
            Ok(()) => self.competences_api.update(id, draft).await,
            Err(err) => Err(err),
        };
        let updated = record(
            &mut self.competences.error,
            result,
            "Impossible de mettre à jour la compétence",
        )?;
        self.competences.upsert(updated);
        Ok(())
    }

    pub async fn certify_competence(&mut self, id: i64, certification_name: &str) -> Result<()> {
        let certification = Certification::new(certification_name);
        let result = match certification.validate() {
            Ok(()) => self.competences_api.certify(id, &certification.name).await,
            Err(err) => Err(err),
        };
        let updated = record(
            &mut self.competences.error,
            result,
            "Impossible de certifier la compétence",
        )?;
        self.competences.upsert(updated);
        Ok(())
    }

    pub async fn toggle_competence(&mut self, id: i64) -> Result<()> {
        let active = self.competences.find(id).is_some_and(|c| c.is_active);
        let result = if active {
            self.competences_api.deactivate(id).await
        } else {
            self.competences_api.activate(id).await
        };
        let updated = record(&mut self.competences.error, result, "Erreur API")?;
        self.competences.upsert(updated);
        Ok(())
    }

    pub async fn delete_competence(&mut self, id: i64) -> Result<String> {
        let result = self.competences_api.delete(id).await;
        let message = record(
            &mut self.competences.error,
            result,
            "Impossible de supprimer la compétence",
        )?;
        if self.competences.remove(id).is_some() {
            self.total_competences = self.total_competences.saturating_sub(1);
        }
        Ok(message)
    }

    /// Skills attached to one domain.
    pub fn competences_of(&self, domaine_id: i64) -> Vec<&Competence> {
        self.competences
            .items
            .iter()
            .filter(|c| c.domaine_id == Some(domaine_id))
            .collect()
    }
}
