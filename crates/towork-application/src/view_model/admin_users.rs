//! Admin user management: merged client and freelancer directory.

use super::{ListState, record};
use crate::AppContext;
use chrono::{DateTime, NaiveDateTime, Utc};
use towork_core::auth::{RegisterKind, RegisterRequest, Role, Session, join_name};
use towork_core::envelope::PageRequest;
use towork_core::profile::{AdminUserUpdate, ManagedStatus, ManagedUser, NewManagedUser};
use towork_core::{Result, ToworkError};
use towork_interaction::api::{AuthApi, ProfileApi};
use tracing::info;

const DIRECTORY_PAGE: PageRequest = PageRequest { page: 0, size: 100 };
const HIGHLIGHTED: usize = 5;

pub const ADMIN_COLOR: &str = "#a855f7";
pub const CLIENT_COLOR: &str = "#3b82f6";
pub const FREELANCER_COLOR: &str = "#10b981";
pub const TOTAL_COLOR: &str = "#7c3aed";
pub const INACTIVE_COLOR: &str = "#f97316";

pub fn role_color(role: &Role) -> &'static str {
    match role {
        Role::Client => CLIENT_COLOR,
        Role::Freelancer => FREELANCER_COLOR,
        _ => ADMIN_COLOR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleShare {
    pub admins: usize,
    pub clients: usize,
    pub freelancers: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub key: &'static str,
    pub label: &'static str,
    pub value: usize,
    pub color: &'static str,
}

/// Slice of the role pie, in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSegment {
    pub role: Role,
    pub color: &'static str,
    pub start: f64,
    pub end: f64,
}

pub struct AdminUsersViewModel {
    profiles: ProfileApi,
    auth: AuthApi,
    pub state: ListState<ManagedUser>,
    pub creating: bool,
}

impl AdminUsersViewModel {
    pub fn new(profiles: ProfileApi, auth: AuthApi) -> Self {
        Self {
            profiles,
            auth,
            state: ListState::default(),
            creating: false,
        }
    }

    pub fn from_context(context: &AppContext) -> Self {
        Self::new(context.api().profiles.clone(), context.api().auth.clone())
    }

    /// Fetches clients and freelancers together and merges them, newest
    /// first.
    pub async fn load(&mut self) -> Result<()> {
        self.state.begin();
        let result = tokio::try_join!(
            self.profiles.clients(DIRECTORY_PAGE),
            self.profiles.freelancers(DIRECTORY_PAGE)
        )
        .map(|(clients, freelancers)| {
            let mut users: Vec<ManagedUser> = clients
                .content
                .into_iter()
                .map(ManagedUser::from)
                .chain(freelancers.content.into_iter().map(ManagedUser::from))
                .collect();
            sort_by_join_date(&mut users);
            users
        });
        self.state
            .apply(result, "Impossible de récupérer les utilisateurs.")
    }

    /// Creates an account through the registration endpoint of its role.
    ///
    /// The new row is added from the backend echo; without one the directory
    /// is reloaded.
    pub async fn create(&mut self, input: NewManagedUser) -> Result<()> {
        self.creating = true;
        let result = self.register(&input).await;
        self.creating = false;
        match record(&mut self.state.error, result, "Création impossible.")? {
            Some(account) => {
                let user = managed_from_account(&account, &input);
                info!(user_id = user.id, role = %user.role.as_str(), "User created");
                self.state.items.insert(0, user);
                Ok(())
            }
            None => self.load().await,
        }
    }

    async fn register(&self, input: &NewManagedUser) -> Result<Option<Session>> {
        input.validate()?;
        let kind = match input.role {
            Role::Client => RegisterKind::Client,
            Role::Freelancer => RegisterKind::Freelancer,
            Role::Admin => RegisterKind::Admin,
            Role::Other(_) => return Err(ToworkError::internal("unsupported role")),
        };
        let request = RegisterRequest {
            first_name: input
                .first_name
                .clone()
                .unwrap_or_else(|| input.role.label().to_string()),
            last_name: input.last_name.clone().unwrap_or_default(),
            email: input.email.trim().to_string(),
            password: input.password.clone(),
            confirm_password: input.password.clone(),
            accept_terms: true,
            ..Default::default()
        };
        self.auth.register_account(kind, request).await
    }

    /// Saves an admin edit and patches the row once accepted.
    pub async fn update(&mut self, id: i64, name: &str, email: &str, status: ManagedStatus) -> Result<()> {
        let Some(role) = self.state.find(id).map(|u| u.role.clone()) else {
            return Err(ToworkError::not_found("user", id.to_string()));
        };
        let update = AdminUserUpdate::new(&role, name, email.trim(), status);
        let result = match update.validate() {
            Ok(()) => self.profiles.update_user(&role, id, &update).await,
            Err(err) => Err(err),
        };
        record(&mut self.state.error, result, "Erreur API")?;
        if let Some(user) = self.state.items.iter_mut().find(|u| u.id == id) {
            user.name = name.trim().to_string();
            user.email = update.email;
            user.status = status;
        }
        Ok(())
    }

    pub async fn delete(&mut self, id: i64) -> Result<String> {
        let Some(role) = self.state.find(id).map(|u| u.role.clone()) else {
            return Err(ToworkError::not_found("user", id.to_string()));
        };
        let result = self.profiles.delete_user(&role, id).await;
        let message = record(&mut self.state.error, result, "Erreur API")?;
        self.state.remove(id);
        Ok(message)
    }

    /// The five most recent accounts.
    pub fn highlighted(&self) -> &[ManagedUser] {
        let end = self.state.items.len().min(HIGHLIGHTED);
        &self.state.items[..end]
    }

    pub fn total(&self) -> usize {
        self.state.items.len()
    }

    pub fn inactive(&self) -> usize {
        self.state
            .items
            .iter()
            .filter(|u| u.status == ManagedStatus::Inactive)
            .count()
    }

    pub fn distribution(&self) -> RoleShare {
        self.state
            .items
            .iter()
            .fold(RoleShare::default(), |mut share, user| {
                match user.role {
                    Role::Client => share.clients += 1,
                    Role::Freelancer => share.freelancers += 1,
                    _ => share.admins += 1,
                }
                share
            })
    }

    pub fn stat_cards(&self) -> Vec<StatCard> {
        let share = self.distribution();
        vec![
            StatCard {
                key: "total",
                label: "Utilisateurs",
                value: self.total(),
                color: TOTAL_COLOR,
            },
            StatCard {
                key: "clients",
                label: "Clients",
                value: share.clients,
                color: CLIENT_COLOR,
            },
            StatCard {
                key: "freelancers",
                label: "Freelances",
                value: share.freelancers,
                color: FREELANCER_COLOR,
            },
            StatCard {
                key: "admins",
                label: "Admins",
                value: share.admins,
                color: ADMIN_COLOR,
            },
            StatCard {
                key: "inactive",
                label: "Inactifs",
                value: self.inactive(),
                color: INACTIVE_COLOR,
            },
        ]
    }

    /// Consecutive pie slices for admins, clients and freelancers.
    pub fn pie_segments(&self) -> Vec<PieSegment> {
        let share = self.distribution();
        let total = self.total().max(1) as f64;
        let mut start = 0.0;
        [
            (Role::Admin, share.admins),
            (Role::Client, share.clients),
            (Role::Freelancer, share.freelancers),
        ]
        .into_iter()
        .map(|(role, count)| {
            let end = start + count as f64 * 360.0 / total;
            let segment = PieSegment {
                color: role_color(&role),
                role,
                start,
                end,
            };
            start = end;
            segment
        })
        .collect()
    }
}

fn parse_joined(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|t| t.and_utc())
        })
}

/// Newest first; rows without a readable date go last.
fn sort_by_join_date(users: &mut [ManagedUser]) {
    users.sort_by(|a, b| parse_joined(&b.joined).cmp(&parse_joined(&a.joined)));
}

fn managed_from_account(account: &Session, input: &NewManagedUser) -> ManagedUser {
    let name = join_name(account.first_name.as_deref(), account.last_name.as_deref())
        .or_else(|| join_name(input.first_name.as_deref(), input.last_name.as_deref()))
        .unwrap_or_else(|| input.role.label().to_string());
    ManagedUser {
        id: account.user_id,
        name,
        email: if account.email.is_empty() {
            input.email.clone()
        } else {
            account.email.clone()
        },
        role: input.role.clone(),
        status: input.status,
        missions: 0,
        joined: Utc::now().to_rfc3339(),
        phone: None,
        address: None,
        city: None,
        country: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: Role, joined: &str, status: ManagedStatus) -> ManagedUser {
        ManagedUser {
            id,
            name: format!("u{id}"),
            email: format!("u{id}@towork.io"),
            role,
            status,
            missions: 0,
            joined: joined.to_string(),
            phone: None,
            address: None,
            city: None,
            country: None,
        }
    }

    #[test]
    fn sorted_newest_first_with_undated_last() {
        let mut users = vec![
            user(1, Role::Client, "2024-01-01T00:00:00Z", ManagedStatus::Active),
            user(2, Role::Client, "", ManagedStatus::Active),
            user(3, Role::Freelancer, "2024-03-01T00:00:00", ManagedStatus::Active),
        ];
        sort_by_join_date(&mut users);
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, [3, 1, 2]);
    }

    #[test]
    fn pie_covers_full_circle() {
        let mut vm = AdminUsersViewModel::new(
            ProfileApi::new(dummy_client()),
            AuthApi::new(dummy_client()),
        );
        vm.state.items = vec![
            user(1, Role::Client, "", ManagedStatus::Active),
            user(2, Role::Client, "", ManagedStatus::Inactive),
            user(3, Role::Freelancer, "", ManagedStatus::Active),
            user(4, Role::Admin, "", ManagedStatus::Active),
        ];

        let segments = vm.pie_segments();
        assert_eq!(segments[0].end, 90.0);
        assert_eq!(segments[1].start, 90.0);
        assert_eq!(segments[1].end, 270.0);
        assert_eq!(segments[2].end, 360.0);
        assert_eq!(segments[1].color, CLIENT_COLOR);

        let cards = vm.stat_cards();
        assert_eq!(cards[0].value, 4);
        assert_eq!(cards[4].value, 1);
        assert_eq!(vm.highlighted().len(), 4);
    }

    fn dummy_client() -> towork_interaction::ApiClient {
        let transport = std::sync::Arc::new(towork_interaction::testing::MockTransport::new());
        towork_interaction::ApiClient::new("http://localhost:9020", transport)
    }
}
