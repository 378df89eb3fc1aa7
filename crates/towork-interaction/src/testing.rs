//! Mock transport for tests.

use crate::http::{ApiRequest, HttpTransport, Method, RawResponse};
use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use towork_core::{Result, ToworkError};

mock! {
    pub Http {}

    #[async_trait]
    impl HttpTransport for Http {
        async fn execute(&self, request: &ApiRequest) -> Result<RawResponse>;
    }
}

type RouteKey = (Method, String);

/// Shared handle over a [`MockHttp`] with canned answers.
///
/// Responses registered with [`on`](Self::on) answer the matching method
/// and path (query excluded) every time; the first registration for a route
/// wins. [`push`](Self::push) queues one-off answers for unrouted requests,
/// consumed in order. Anything else is a transport error.
pub struct MockTransport {
    mock: AsyncMutex<MockHttp>,
    routes: Arc<Mutex<Vec<RouteKey>>>,
    pending: Arc<AtomicUsize>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        let routes: Arc<Mutex<Vec<RouteKey>>> = Arc::default();
        let pending: Arc<AtomicUsize> = Arc::default();

        let mut mock = MockHttp::new();
        let (known, queued) = (routes.clone(), pending.clone());
        mock.expect_execute()
            .withf(move |request| {
                !is_routed(&known, request) && queued.load(Ordering::SeqCst) == 0
            })
            .returning(|request| {
                Err(ToworkError::transport(format!(
                    "No mock response for {} {}",
                    request.method,
                    path_only(request)
                )))
            });

        Self {
            mock: AsyncMutex::new(mock),
            routes,
            pending,
            requests: Mutex::default(),
        }
    }

    fn configure(&self, setup: impl FnOnce(&mut MockHttp)) -> &Self {
        let mut mock = self
            .mock
            .try_lock()
            .expect("mock transport is configured between requests");
        setup(&mut mock);
        self
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        let response = RawResponse::new(status, body.to_string());
        if let Ok(mut routes) = self.routes.lock() {
            routes.push((method.clone(), path.to_string()));
        }
        let path = path.to_string();
        self.configure(move |mock| {
            mock.expect_execute()
                .withf(move |request| request.method == method && path_only(request) == path)
                .returning(move |_| Ok(response.clone()));
        })
    }

    pub fn push(&self, status: u16, body: Value) -> &Self {
        let response = RawResponse::new(status, body.to_string());
        self.pending.fetch_add(1, Ordering::SeqCst);
        let (known, queued) = (self.routes.clone(), self.pending.clone());
        self.configure(move |mock| {
            mock.expect_execute()
                .times(0..=1)
                .withf(move |request| !is_routed(&known, request))
                .returning(move |_| {
                    queued.fetch_sub(1, Ordering::SeqCst);
                    Ok(response.clone())
                });
        })
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or(0)
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests().pop()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn path_only(request: &ApiRequest) -> &str {
    let path = request.path();
    path.split('?').next().unwrap_or(path)
}

fn is_routed(routes: &Mutex<Vec<RouteKey>>, request: &ApiRequest) -> bool {
    let path = path_only(request);
    routes
        .lock()
        .map(|routes| {
            routes
                .iter()
                .any(|(method, route)| *method == request.method && route == path)
        })
        .unwrap_or(false)
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let mock = self.mock.lock().await;
        mock.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn get(path: &str) -> ApiRequest {
        ApiRequest::new(Method::GET, format!("http://localhost:9020{path}"))
    }

    #[tokio::test]
    async fn routes_win_over_the_queue() {
        let transport = MockTransport::new();
        transport.push(200, json!({"queued": true}));
        transport.on(Method::GET, "/missions/me", 200, json!({"routed": true}));

        let routed = transport.execute(&get("/missions/me?page=0")).await.unwrap();
        assert!(routed.body.contains("routed"));
        let queued = transport.execute(&get("/wallet")).await.unwrap();
        assert!(queued.body.contains("queued"));
        assert!(transport.execute(&get("/wallet")).await.is_err());
        assert_eq!(transport.request_count(), 3);
    }
}
