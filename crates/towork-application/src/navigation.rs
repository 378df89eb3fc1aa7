//! In-process router: route table, guards and the role-filtered menu.

use std::sync::Mutex;
use towork_core::auth::Role;
use towork_core::navigation::{Navigator, href};
use towork_core::session::SessionState;
use tracing::debug;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const RETURN_URL_PARAM: &str = "returnUrl";

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Public,
    Authenticated,
    Client,
    Freelancer,
    Admin,
}

impl Audience {
    fn admits(&self, role: Option<&Role>) -> bool {
        match self {
            Audience::Public | Audience::Authenticated => true,
            Audience::Client => role.is_some_and(Role::is_client),
            Audience::Freelancer => role.is_some_and(Role::is_freelancer),
            Audience::Admin => role.is_some_and(Role::is_admin),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub pattern: &'static str,
    pub audience: Audience,
}

const fn route(pattern: &'static str, audience: Audience) -> Route {
    Route { pattern, audience }
}

pub const ROUTES: &[Route] = &[
    route("/login", Audience::Public),
    route("/register", Audience::Public),
    route("/", Audience::Authenticated),
    route("/dashboard", Audience::Authenticated),
    route("/profile", Audience::Authenticated),
    route("/messages", Audience::Authenticated),
    route("/messages/:conversationId", Audience::Authenticated),
    route("/feedback", Audience::Authenticated),
    route("/feedback/missions/:missionId", Audience::Authenticated),
    route("/missions", Audience::Client),
    route("/missions/create", Audience::Client),
    route("/missions/:missionId/milestones", Audience::Client),
    route("/client/missions/:missionId/candidatures", Audience::Client),
    route("/client/wallet", Audience::Client),
    route("/candidatures", Audience::Client),
    route("/discussions", Audience::Client),
    route("/freelancer/dashboard", Audience::Freelancer),
    route("/freelancer/missions", Audience::Freelancer),
    route("/freelancer/missions/:id", Audience::Freelancer),
    route("/freelancer/candidatures", Audience::Freelancer),
    route("/freelancer/portfolio", Audience::Freelancer),
    route("/admin", Audience::Admin),
    route("/admin/users", Audience::Admin),
    route("/admin/domaines", Audience::Admin),
];

/// Path part of a URL, without query or fragment.
fn path_of(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl Route {
    /// Matches `path` segment by segment; `:name` accepts any segment.
    pub fn matches(&self, path: &str) -> bool {
        let mut wanted = segments(self.pattern);
        let mut actual = segments(path);
        loop {
            match (wanted.next(), actual.next()) {
                (None, None) => return true,
                (Some(p), Some(a)) if p.starts_with(':') || p == a => continue,
                _ => return false,
            }
        }
    }

    /// Value of the `:name` segment in `path`.
    pub fn param<'a>(&self, path: &'a str, name: &str) -> Option<&'a str> {
        if !self.matches(path) {
            return None;
        }
        segments(self.pattern)
            .zip(segments(path))
            .find(|(p, _)| p.strip_prefix(':') == Some(name))
            .map(|(_, a)| a)
    }
}

/// Finds the route for `url`. Literal segments win over parameters, so
/// `/missions/create` never resolves to a `:missionId` pattern.
pub fn resolve(url: &str) -> Option<&'static Route> {
    let path = path_of(url);
    ROUTES
        .iter()
        .filter(|route| route.matches(path))
        .max_by_key(|route| segments(route.pattern).filter(|s| !s.starts_with(':')).count())
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

pub struct RouteGuard;

impl RouteGuard {
    /// Decides whether `url` may be opened with the given session.
    ///
    /// Anonymous visitors of a protected route are sent to the login page
    /// with the requested URL as `returnUrl`; a logged-in user lacking the
    /// route's role goes to the login page without one. Unknown URLs fall
    /// back to the home page.
    pub fn check(url: &str, state: &SessionState) -> GuardDecision {
        let Some(route) = resolve(url) else {
            return GuardDecision::Redirect(HOME_PATH.to_string());
        };
        if route.audience == Audience::Public {
            return GuardDecision::Allow;
        }
        if !state.is_logged_in() {
            return GuardDecision::Redirect(href(LOGIN_PATH, &[(RETURN_URL_PARAM, url)]));
        }
        if route.audience.admits(state.role.as_ref()) {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(LOGIN_PATH.to_string())
        }
    }
}

#[derive(Debug, Default)]
struct RouterState {
    current: String,
    history: Vec<String>,
}

/// Router standing in for the browser location.
#[derive(Debug)]
pub struct AppRouter {
    state: Mutex<RouterState>,
}

impl AppRouter {
    pub fn new() -> Self {
        Self::starting_at(HOME_PATH)
    }

    pub fn starting_at(url: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(RouterState {
                current: url.into(),
                history: Vec::new(),
            }),
        }
    }

    /// Every URL visited since construction, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.history.clone())
            .unwrap_or_default()
    }

    /// Opens `url` if the guard allows it, else follows the redirect.
    ///
    /// # Returns
    ///
    /// The URL actually reached.
    pub fn navigate_guarded(&self, url: &str, session: &SessionState) -> String {
        let target = match RouteGuard::check(url, session) {
            GuardDecision::Allow => url.to_string(),
            GuardDecision::Redirect(to) => {
                debug!(from = url, to = %to, "Route guard redirect");
                to
            }
        };
        self.go(target.clone());
        target
    }

    fn go(&self, url: String) {
        if let Ok(mut state) = self.state.lock() {
            state.history.push(url.clone());
            state.current = url;
        }
    }
}

impl Default for AppRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for AppRouter {
    fn current_url(&self) -> String {
        self.state
            .lock()
            .map(|state| state.current.clone())
            .unwrap_or_else(|_| HOME_PATH.to_string())
    }

    fn navigate(&self, path: &str, query: &[(&str, &str)]) {
        self.go(href(path, query));
    }
}

// ============================================================================
// Menu
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub label: &'static str,
    pub path: &'static str,
    pub audience: Audience,
}

const fn entry(label: &'static str, path: &'static str, audience: Audience) -> NavEntry {
    NavEntry {
        label,
        path,
        audience,
    }
}

const MENU: &[NavEntry] = &[
    entry("Tableau de bord", "/dashboard", Audience::Authenticated),
    entry("Créer une mission", "/missions/create", Audience::Client),
    entry("Mes missions", "/missions", Audience::Client),
    entry("Candidatures", "/candidatures", Audience::Client),
    entry("Discussions", "/discussions", Audience::Client),
    entry("Portefeuille", "/client/wallet", Audience::Client),
    entry("Espace freelance", "/freelancer/dashboard", Audience::Freelancer),
    entry("Trouver une mission", "/freelancer/missions", Audience::Freelancer),
    entry("Mes candidatures", "/freelancer/candidatures", Audience::Freelancer),
    entry("Portfolio", "/freelancer/portfolio", Audience::Freelancer),
    entry("Administration", "/admin", Audience::Admin),
    entry("Utilisateurs", "/admin/users", Audience::Admin),
    entry("Domaines", "/admin/domaines", Audience::Admin),
    entry("Messages", "/messages", Audience::Authenticated),
    entry("Avis", "/feedback", Audience::Authenticated),
    entry("Profil", "/profile", Audience::Authenticated),
];

/// Menu entries visible for the session. Anonymous visitors get none.
pub fn nav_entries(state: &SessionState) -> Vec<NavEntry> {
    if !state.is_logged_in() {
        return Vec::new();
    }
    MENU.iter()
        .filter(|entry| entry.audience.admits(state.role.as_ref()))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use towork_core::navigation::query_param;

    fn state(role: Option<Role>) -> SessionState {
        SessionState {
            token: role.as_ref().map(|_| "tok".to_string()),
            role,
            user: None,
        }
    }

    #[test]
    fn literal_segments_win_over_params() {
        assert_eq!(resolve("/missions/create").unwrap().pattern, "/missions/create");
        let milestones = resolve("/missions/42/milestones?tab=open").unwrap();
        assert_eq!(milestones.param("/missions/42/milestones", "missionId"), Some("42"));
        assert!(resolve("/nowhere").is_none());
    }

    #[test]
    fn anonymous_visitor_keeps_return_url() {
        let decision = RouteGuard::check("/client/wallet", &state(None));
        assert_eq!(
            decision,
            GuardDecision::Redirect("/login?returnUrl=%2Fclient%2Fwallet".to_string())
        );
        assert_eq!(RouteGuard::check("/register", &state(None)), GuardDecision::Allow);
    }

    #[test]
    fn return_url_keeps_its_own_query() {
        let decision = RouteGuard::check("/missions?sort=a&page=2", &state(None));
        let GuardDecision::Redirect(to) = decision else {
            panic!("expected a redirect");
        };
        assert_eq!(to, "/login?returnUrl=%2Fmissions%3Fsort%3Da%26page%3D2");
        assert_eq!(
            query_param(&to, RETURN_URL_PARAM).as_deref(),
            Some("/missions?sort=a&page=2")
        );
        assert_eq!(query_param(&to, "page"), None);
    }

    #[test]
    fn wrong_role_goes_to_login() {
        let freelancer = state(Some(Role::Freelancer));
        assert_eq!(
            RouteGuard::check("/admin/users", &freelancer),
            GuardDecision::Redirect("/login".to_string())
        );
        assert_eq!(RouteGuard::check("/freelancer/missions/3", &freelancer), GuardDecision::Allow);
        assert_eq!(RouteGuard::check("/messages/9", &freelancer), GuardDecision::Allow);
    }

    #[test]
    fn menu_is_role_specific() {
        let client: Vec<_> = nav_entries(&state(Some(Role::Client)))
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert!(client.contains(&"/client/wallet"));
        assert!(!client.iter().any(|p| p.starts_with("/freelancer") || p.starts_with("/admin")));

        let freelancer: Vec<_> = nav_entries(&state(Some(Role::Freelancer)))
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert!(freelancer.contains(&"/freelancer/portfolio"));
        assert!(!freelancer.contains(&"/missions/create"));
        assert!(nav_entries(&state(None)).is_empty());
    }

    #[test]
    fn router_records_history() {
        let router = AppRouter::new();
        let reached = router.navigate_guarded("/admin", &state(Some(Role::Client)));
        assert_eq!(reached, "/login");
        router.navigate("/login", &[("returnUrl", "/missions")]);
        assert_eq!(router.current_url(), "/login?returnUrl=%2Fmissions");
        assert_eq!(router.history().len(), 2);
    }
}
