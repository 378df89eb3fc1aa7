use super::request::ApiRequest;
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use towork_core::navigation::Navigator;
use towork_core::session::SessionStore;

/// Hook run around every request issued by the `ApiClient`.
///
/// Interceptors run in registration order.
pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, _request: &mut ApiRequest) {}

    fn on_response(&self, _request: &ApiRequest, _status: StatusCode) {}
}

/// Adds `Authorization: Bearer <token>` to calls aimed at the backend.
///
/// Requests to other origins, and `OPTIONS` preflights, go out untouched.
pub struct BearerTokenInterceptor {
    session: Arc<SessionStore>,
    origin: String,
}

impl BearerTokenInterceptor {
    pub fn new(session: Arc<SessionStore>, origin: impl Into<String>) -> Self {
        Self {
            session,
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    /// `url` is the origin itself or lies below it. A longer port or host
    /// sharing the same prefix does not count.
    fn targets_backend(&self, url: &str) -> bool {
        url.strip_prefix(&self.origin)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
    }
}

impl RequestInterceptor for BearerTokenInterceptor {
    fn on_request(&self, request: &mut ApiRequest) {
        if request.method == Method::OPTIONS || !self.targets_backend(&request.url) {
            return;
        }
        if request.header_value("Authorization").is_some() {
            return;
        }
        if let Some(token) = self.session.token() {
            request
                .headers
                .push(("Authorization".to_string(), format!("Bearer {token}")));
        }
    }
}

/// Ends the session on 401/403 and sends the user to the login page.
///
/// The failed request is not retried.
pub struct AuthErrorInterceptor {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl AuthErrorInterceptor {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl RequestInterceptor for AuthErrorInterceptor {
    fn on_response(&self, request: &ApiRequest, status: StatusCode) {
        if status != StatusCode::UNAUTHORIZED && status != StatusCode::FORBIDDEN {
            return;
        }

        tracing::warn!(
            "{} {} answered {}; ending session",
            request.method,
            request.path(),
            status.as_u16()
        );
        if let Err(e) = self.session.logout() {
            tracing::error!("Failed to clear session: {}", e);
        }

        let return_url = self.navigator.current_url();
        self.navigator
            .navigate("/login", &[("returnUrl", return_url.as_str())]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use towork_core::auth::{Role, Session};
    use towork_core::session::MemoryKeyValueStore;

    fn interceptor() -> BearerTokenInterceptor {
        let session = SessionStore::restore(
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(MemoryKeyValueStore::new()),
        )
        .unwrap();
        session
            .persist_session(
                &Session {
                    token: "tok".into(),
                    token_type: "Bearer".into(),
                    user_id: 1,
                    email: "a@towork.io".into(),
                    role: Role::Client,
                    first_name: None,
                    last_name: None,
                },
                false,
            )
            .unwrap();
        BearerTokenInterceptor::new(Arc::new(session), "http://localhost:9020/")
    }

    fn authorization(url: &str) -> Option<String> {
        let mut request = ApiRequest::new(Method::GET, url);
        interceptor().on_request(&mut request);
        request.header_value("Authorization").map(str::to_string)
    }

    #[test]
    fn token_only_goes_to_the_backend_origin() {
        assert_eq!(authorization("http://localhost:9020/missions").as_deref(), Some("Bearer tok"));
        assert!(authorization("http://localhost:9020").is_some());
        assert!(authorization("http://localhost:90201/missions").is_none());
        assert!(authorization("http://localhost:9020.evil/missions").is_none());
        assert!(authorization("https://cdn.example.com/a.png").is_none());
    }
}
