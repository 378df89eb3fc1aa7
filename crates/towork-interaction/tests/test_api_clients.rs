use serde_json::json;
use std::sync::{Arc, Mutex};
use towork_core::auth::{LoginRequest, RegisterKind, RegisterRequest, Role, Session};
use towork_core::candidature::CandidatureStatus;
use towork_core::envelope::PageRequest;
use towork_core::milestone::DeliverableUpload;
use towork_core::navigation::{Navigator, href};
use towork_core::session::{MemoryKeyValueStore, SessionStore};
use towork_interaction::ApiClient;
use towork_interaction::api::{
    AuthApi, CandidatureApi, ConversationApi, MilestoneApi, MissionApi, WalletApi,
};
use towork_interaction::http::{
    AuthErrorInterceptor, BearerTokenInterceptor, Method, RequestBody,
};
use towork_interaction::testing::MockTransport;

const BASE: &str = "http://localhost:9020";

#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn current_url(&self) -> String {
        "/missions/12".to_string()
    }

    fn navigate(&self, path: &str, query: &[(&str, &str)]) {
        self.visits.lock().unwrap().push(href(path, query));
    }
}

fn session_store() -> Arc<SessionStore> {
    Arc::new(
        SessionStore::restore(
            Arc::new(MemoryKeyValueStore::new()),
            Arc::new(MemoryKeyValueStore::new()),
        )
        .unwrap(),
    )
}

fn logged_in(store: &SessionStore) {
    let session = Session {
        token: "tok-1".into(),
        token_type: "Bearer".into(),
        user_id: 3,
        email: "c@towork.io".into(),
        role: Role::Client,
        first_name: None,
        last_name: None,
    };
    store.persist_session(&session, false).unwrap();
}

fn client(transport: &Arc<MockTransport>) -> ApiClient {
    ApiClient::new(BASE, transport.clone())
}

#[tokio::test]
async fn test_login_returns_session() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::POST,
        "/auth/login",
        200,
        json!({"success": true, "message": "ok", "data": {
            "token": "abc", "userId": 9, "email": "f@towork.io", "role": "ROLE_FREELANCER"
        }}),
    );

    let api = AuthApi::new(client(&transport));
    let session = api
        .login(&LoginRequest::new("f@towork.io", "secret1"))
        .await
        .expect("login should succeed");

    assert_eq!(session.role, Role::Freelancer);
    assert_eq!(session.token_type, "Bearer");
    let request = transport.last_request().unwrap();
    assert_eq!(
        request.json_body().unwrap(),
        &json!({"email": "f@towork.io", "password": "secret1"})
    );
}

#[tokio::test]
async fn test_failed_login_surfaces_backend_message() {
    let transport = Arc::new(MockTransport::new());
    transport.push(
        200,
        json!({"success": false, "message": "Mot de passe incorrect", "data": null}),
    );

    let error = AuthApi::new(client(&transport))
        .login(&LoginRequest::new("f@towork.io", "wrong!"))
        .await
        .unwrap_err();
    assert_eq!(error.user_message("fallback"), "Mot de passe incorrect");
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_register_freelancer_body_defaults() {
    let transport = Arc::new(MockTransport::new());
    transport.push(200, json!({"success": true, "message": "Compte créé"}));

    let request = RegisterRequest {
        first_name: "Ada".into(),
        last_name: "L".into(),
        email: "ada@towork.io".into(),
        password: "secret1".into(),
        phone: Some("  ".into()),
        ..Default::default()
    };
    let message = AuthApi::new(client(&transport))
        .register(RegisterKind::Freelancer, request)
        .await
        .unwrap();

    assert_eq!(message, "Compte créé");
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.url, format!("{BASE}/auth/register/freelancer"));
    let body = sent.json_body().unwrap();
    assert_eq!(body["hourlyRate"], json!(0.0));
    assert_eq!(body["availability"], json!("Disponible"));
    assert!(body["phone"].is_null());
}

#[tokio::test]
async fn test_bearer_token_only_for_backend_origin() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/missions/me", 200, json!({"success": true, "data": []}));
    let store = session_store();
    logged_in(&store);

    let api_client = client(&transport)
        .with_interceptor(Arc::new(BearerTokenInterceptor::new(store.clone(), BASE)));
    MissionApi::new(api_client.clone()).mine().await.unwrap();
    assert_eq!(
        transport.last_request().unwrap().header_value("Authorization"),
        Some("Bearer tok-1")
    );

    let foreign = ApiClient::new("https://cdn.example.com", transport.clone())
        .with_interceptor(Arc::new(BearerTokenInterceptor::new(store, BASE)));
    transport.push(200, json!({"success": true, "data": []}));
    MissionApi::new(foreign).mine().await.unwrap();
    assert!(
        transport
            .last_request()
            .unwrap()
            .header_value("Authorization")
            .is_none()
    );
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_redirects() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/missions/me", 401, json!({"message": "Token expiré"}));
    let store = session_store();
    logged_in(&store);
    let navigator = Arc::new(RecordingNavigator::default());

    let api_client = client(&transport).with_interceptor(Arc::new(AuthErrorInterceptor::new(
        store.clone(),
        navigator.clone(),
    )));
    let error = MissionApi::new(api_client).mine().await.unwrap_err();

    assert!(error.is_unauthorized());
    assert!(!store.is_logged_in());
    assert_eq!(
        navigator.visits.lock().unwrap().as_slice(),
        ["/login?returnUrl=%2Fmissions%2F12".to_string()]
    );
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_mission_list_accepts_page_payload() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::GET,
        "/missions",
        200,
        json!({"success": true, "data": {"content": [{"id": 1, "title": "Site"}], "totalElements": 1}}),
    );

    let missions = MissionApi::new(client(&transport))
        .list(PageRequest::new(0, 100), "createdAt,DESC")
        .await
        .unwrap();
    assert_eq!(missions.len(), 1);

    let request = transport.last_request().unwrap();
    assert_eq!(request.query_value("size"), Some("100"));
    assert_eq!(request.query_value("sort"), Some("createdAt,DESC"));
}

#[tokio::test]
async fn test_candidature_status_skips_blank_message() {
    let transport = Arc::new(MockTransport::new());
    transport.push(200, json!({"success": true, "data": {"id": 5, "status": "ACCEPTED"}}));

    let candidature = CandidatureApi::new(client(&transport))
        .update_status(5, &CandidatureStatus::Accepted, Some("  "))
        .await
        .unwrap();
    assert_eq!(candidature.status(), CandidatureStatus::Accepted);

    let request = transport.last_request().unwrap();
    assert_eq!(request.query_value("status"), Some("ACCEPTED"));
    assert!(request.query_value("clientMessage").is_none());
}

#[tokio::test]
async fn test_deliverable_upload_accepts_bare_milestone() {
    let transport = Arc::new(MockTransport::new());
    transport.push(200, json!({"id": 8, "title": "Maquettes", "status": "SUBMITTED"}));

    let upload = DeliverableUpload::new("maquette.png", vec![1, 2, 3]).with_comment("v1");
    let milestone = MilestoneApi::new(client(&transport))
        .upload_deliverable(8, upload)
        .await
        .unwrap();
    assert_eq!(milestone.id, Some(8));

    let request = transport.last_request().unwrap();
    assert_eq!(request.path(), "/api/milestones/8/deliverable");
    match request.body {
        RequestBody::Multipart(form) => {
            let file = form.file.as_ref().unwrap();
            assert_eq!(file.field, "file");
            assert_eq!(file.mime_type(), "image/png");
            assert_eq!(form.text("comment"), Some("v1"));
        }
        other => panic!("expected multipart body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wallet_payload_mapped_leniently() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::GET,
        "/api/freelancer/wallet/me",
        200,
        json!({"success": true, "data": {"wallet": {"id": 2, "solde": "120.5", "devise": "EUR",
            "transactions": [{"id": 1, "type": "PAYOUT", "montant": 40}, {"type": "DEBIT"}]}}}),
    );

    let wallet = WalletApi::new(client(&transport))
        .my_wallet(&Role::Freelancer)
        .await
        .unwrap();
    assert_eq!(wallet.balance, 120.5);
    assert_eq!(wallet.transactions.len(), 1);
}

#[tokio::test]
async fn test_conversations_from_page_with_aliases() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::GET,
        "/conversations/mine",
        200,
        json!({"success": true, "data": {"content": [
            {"conversationId": 4, "otherUserName": "Eve"},
            {"missionTitle": "sans id"}
        ]}}),
    );

    let conversations = ConversationApi::new(client(&transport))
        .list_mine()
        .await
        .unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].counterpart_name.as_deref(), Some("Eve"));
}
