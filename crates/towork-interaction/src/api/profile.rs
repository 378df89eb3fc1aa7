use crate::client::ApiClient;
use serde_json::Value;
use towork_core::Result;
use towork_core::auth::Role;
use towork_core::envelope::{Page, PageRequest};
use towork_core::profile::{
    AdminUserUpdate, ClientProfile, ClientProfileUpdate, FreelancerProfile,
    FreelancerProfileUpdate,
};

const PROFILE_FAILED: &str = "Impossible de charger le profil";
const USERS_FAILED: &str = "Impossible de charger les utilisateurs";

/// `/clients` and `/freelancers` endpoints.
#[derive(Clone)]
pub struct ProfileApi {
    client: ApiClient,
}

impl ProfileApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn client_me(&self) -> Result<ClientProfile> {
        self.client
            .fetch(self.client.get("/clients/me"), PROFILE_FAILED)
            .await
    }

    pub async fn update_client_me(&self, update: &ClientProfileUpdate) -> Result<ClientProfile> {
        let call = self.client.put("/clients/me/profile").json(update)?;
        self.client
            .fetch(call, "Impossible d'enregistrer le profil")
            .await
    }

    pub async fn freelancer_me(&self) -> Result<FreelancerProfile> {
        self.client
            .fetch(self.client.get("/freelancers/me"), PROFILE_FAILED)
            .await
    }

    pub async fn update_freelancer_me(
        &self,
        update: &FreelancerProfileUpdate,
    ) -> Result<FreelancerProfile> {
        let call = self.client.put("/freelancers/me/profile").json(update)?;
        self.client
            .fetch(call, "Impossible d'enregistrer le profil")
            .await
    }

    pub async fn clients(&self, page: PageRequest) -> Result<Page<ClientProfile>> {
        let call = self.client.get("/clients").queries(page.to_query());
        Ok(self
            .client
            .fetch_optional(call, USERS_FAILED)
            .await?
            .unwrap_or_default())
    }

    pub async fn freelancers(&self, page: PageRequest) -> Result<Page<FreelancerProfile>> {
        let call = self.client.get("/freelancers").queries(page.to_query());
        Ok(self
            .client
            .fetch_optional(call, USERS_FAILED)
            .await?
            .unwrap_or_default())
    }

    pub async fn search_clients(&self, keyword: &str) -> Result<Vec<ClientProfile>> {
        let call = self.client.get("/clients/search").query("keyword", keyword);
        Ok(self
            .client
            .fetch_optional(call, USERS_FAILED)
            .await?
            .unwrap_or_default())
    }

    pub async fn delete_client(&self, id: i64) -> Result<String> {
        self.delete_user(&Role::Client, id).await
    }

    /// Admin edit of any account, routed by role.
    pub async fn update_user(
        &self,
        role: &Role,
        id: i64,
        update: &AdminUserUpdate,
    ) -> Result<Option<Value>> {
        let call = self
            .client
            .put(&format!("/{}/{id}", role_base_path(role)))
            .json(update)?;
        self.client
            .fetch_value(call, "Modification impossible")
            .await
    }

    pub async fn delete_user(&self, role: &Role, id: i64) -> Result<String> {
        let call = self
            .client
            .delete(&format!("/{}/{id}", role_base_path(role)));
        self.client.execute(call, "Utilisateur supprimé").await
    }
}

/// Admins have no resource of their own; they go through `/users`.
fn role_base_path(role: &Role) -> &'static str {
    match role {
        Role::Client => "clients",
        Role::Freelancer => "freelancers",
        _ => "users",
    }
}
