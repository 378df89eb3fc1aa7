use crate::client::ApiClient;
use towork_core::Result;
use towork_core::ai::{DomainSuggestion, DomainSuggestionRequest};
use towork_core::catalog::{Competence, CompetenceDraft, Domaine, DomaineDraft};
use towork_core::envelope::{Page, PageRequest};

/// `/domaines` endpoints.
#[derive(Clone)]
pub struct DomaineApi {
    client: ApiClient,
}

impl DomaineApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, draft: &DomaineDraft) -> Result<Domaine> {
        let call = self.client.post("/domaines").json(draft)?;
        self.client
            .fetch(call, "Impossible de créer le domaine")
            .await
    }

    pub async fn update(&self, id: i64, draft: &DomaineDraft) -> Result<Domaine> {
        let call = self.client.put(&format!("/domaines/{id}")).json(draft)?;
        self.client
            .fetch(call, "Impossible de mettre à jour le domaine")
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<String> {
        let call = self.client.delete(&format!("/domaines/{id}"));
        self.client.execute(call, "Domaine supprimé").await
    }

    pub async fn get(&self, id: i64) -> Result<Domaine> {
        let call = self.client.get(&format!("/domaines/{id}"));
        self.client.fetch(call, "Domaine introuvable").await
    }

    pub async fn list_paged(&self, page: PageRequest) -> Result<Page<Domaine>> {
        let call = self.client.get("/domaines").queries(page.to_query());
        Ok(self
            .client
            .fetch_optional(call, "Impossible de charger les domaines")
            .await?
            .unwrap_or_default())
    }

    pub async fn list_active(&self) -> Result<Vec<Domaine>> {
        Ok(self
            .client
            .fetch_optional(
                self.client.get("/domaines/active"),
                "Impossible de charger les domaines",
            )
            .await?
            .unwrap_or_default())
    }

    pub async fn search(&self, keyword: &str) -> Result<Vec<Domaine>> {
        let call = self.client.get("/domaines/search").query("keyword", keyword);
        Ok(self
            .client
            .fetch_optional(call, "Recherche impossible")
            .await?
            .unwrap_or_default())
    }

    pub async fn activate(&self, id: i64) -> Result<Domaine> {
        let call = self
            .client
            .put(&format!("/domaines/{id}/activate"))
            .empty_object();
        self.client
            .fetch(call, "Impossible d'activer le domaine")
            .await
    }

    pub async fn deactivate(&self, id: i64) -> Result<Domaine> {
        let call = self
            .client
            .put(&format!("/domaines/{id}/deactivate"))
            .empty_object();
        self.client
            .fetch(call, "Impossible de désactiver le domaine")
            .await
    }

    /// AI domain suggestions for a mission draft.
    pub async fn suggest(&self, request: &DomainSuggestionRequest) -> Result<Vec<DomainSuggestion>> {
        let call = self.client.post("/domaines/suggest").json(request)?;
        Ok(self
            .client
            .fetch_optional(call, "Suggestion indisponible")
            .await?
            .unwrap_or_default())
    }
}

/// `/competences` endpoints.
#[derive(Clone)]
pub struct CompetenceApi {
    client: ApiClient,
}

impl CompetenceApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_paged(&self, page: PageRequest) -> Result<Page<Competence>> {
        let call = self.client.get("/competences").queries(page.to_query());
        Ok(self
            .client
            .fetch_optional(call, "Impossible de charger les compétences")
            .await?
            .unwrap_or_default())
    }

    pub async fn create(&self, draft: &CompetenceDraft) -> Result<Competence> {
        let call = self.client.post("/competences").json(draft)?;
        self.client
            .fetch(call, "Impossible de créer la compétence")
            .await
    }

    pub async fn update(&self, id: i64, draft: &CompetenceDraft) -> Result<Competence> {
        let call = self
            .client
            .put(&format!("/competences/{id}"))
            .json(draft)?;
        self.client
            .fetch(call, "Impossible de mettre à jour la compétence")
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<String> {
        let call = self.client.delete(&format!("/competences/{id}"));
        self.client.execute(call, "Compétence supprimée").await
    }

    pub async fn certify(&self, id: i64, certification_name: &str) -> Result<Competence> {
        let call = self
            .client
            .put(&format!("/competences/{id}/certify"))
            .query("certificationName", certification_name);
        self.client
            .fetch(call, "Impossible de certifier la compétence")
            .await
    }

    pub async fn activate(&self, id: i64) -> Result<Competence> {
        let call = self
            .client
            .put(&format!("/competences/{id}/activate"))
            .empty_object();
        self.client
            .fetch(call, "Impossible d'activer la compétence")
            .await
    }

    pub async fn deactivate(&self, id: i64) -> Result<Competence> {
        let call = self
            .client
            .put(&format!("/competences/{id}/deactivate"))
            .empty_object();
        self.client
            .fetch(call, "Impossible de désactiver la compétence")
            .await
    }
}
