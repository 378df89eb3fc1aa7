use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use towork_application::navigation::{AppRouter, LOGIN_PATH, nav_entries};
use towork_application::view_model::{
    AdminUsersViewModel, CandidatureBoard, ConversationPoller, FreelancerBoard,
    MilestoneAudience, MilestonesViewModel, WalletViewModel,
};
use towork_application::{AppContext, AuthService};
use towork_core::auth::{Role, Session};
use towork_core::config::ClientConfig;
use towork_core::milestone::NewMilestone;
use towork_core::mission::BoardStage;
use towork_core::navigation::Navigator;
use towork_core::session::MemoryKeyValueStore;
use towork_interaction::http::Method;
use towork_interaction::testing::MockTransport;

fn context(transport: &Arc<MockTransport>) -> AppContext {
    AppContext::new(
        ClientConfig::default(),
        Arc::new(MemoryKeyValueStore::new()),
        Arc::new(MemoryKeyValueStore::new()),
        transport.clone(),
    )
    .expect("context should build")
}

fn log_in(ctx: &AppContext, user_id: i64, role: Role) {
    let session = Session {
        token: format!("tok-{user_id}"),
        token_type: "Bearer".into(),
        user_id,
        email: format!("user{user_id}@towork.io"),
        role,
        first_name: None,
        last_name: None,
    };
    ctx.session()
        .persist_session(&session, false)
        .expect("session should persist");
}

fn ok(data: serde_json::Value) -> serde_json::Value {
    json!({"success": true, "message": "ok", "data": data})
}

#[tokio::test]
async fn test_freelancer_login_is_kept_out_of_admin_routes() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::POST,
        "/auth/login",
        200,
        ok(json!({"token": "abc", "userId": 9, "email": "f@towork.io", "role": "ROLE_FREELANCER"})),
    );
    let ctx = context(&transport);
    let auth = AuthService::from_context(&ctx);

    let session = auth
        .login("f@towork.io", "secret1", false)
        .await
        .expect("login should succeed");
    assert_eq!(session.role, Role::Freelancer);

    let state = ctx.session_state();
    let reached = ctx.router().navigate_guarded("/admin/users", &state);
    assert_eq!(reached, LOGIN_PATH);
    let reached = ctx.router().navigate_guarded("/freelancer/missions", &state);
    assert_eq!(reached, "/freelancer/missions");
}

#[tokio::test]
async fn test_invalid_login_form_sends_nothing() {
    let transport = Arc::new(MockTransport::new());
    let ctx = context(&transport);
    let auth = AuthService::from_context(&ctx);

    let err = auth.login("not-an-email", "x", true).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(transport.request_count(), 0);
    assert!(!ctx.session().is_logged_in());
}

#[tokio::test]
async fn test_logout_returns_to_login() {
    let transport = Arc::new(MockTransport::new());
    let ctx = context(&transport);
    log_in(&ctx, 3, Role::Client);

    AuthService::from_context(&ctx).logout().unwrap();
    assert!(!ctx.session().is_logged_in());
    assert_eq!(ctx.router().current_url(), LOGIN_PATH);
}

#[test]
fn test_anonymous_visitor_gets_return_url() {
    let router = AppRouter::new();
    let reached = router.navigate_guarded("/client/wallet", &Default::default());
    assert_eq!(reached, "/login?returnUrl=%2Fclient%2Fwallet");
}

#[tokio::test]
async fn test_menu_follows_role() {
    let transport = Arc::new(MockTransport::new());
    let ctx = context(&transport);
    assert!(nav_entries(&ctx.session_state()).is_empty());

    log_in(&ctx, 3, Role::Client);
    let paths: Vec<&str> = nav_entries(&ctx.session_state())
        .iter()
        .map(|entry| entry.path)
        .collect();
    assert!(paths.contains(&"/client/wallet"));
    assert!(paths.contains(&"/profile"));
    assert!(!paths.contains(&"/freelancer/missions"));
    assert!(!paths.contains(&"/admin"));

    log_in(&ctx, 1, Role::Admin);
    let paths: Vec<&str> = nav_entries(&ctx.session_state())
        .iter()
        .map(|entry| entry.path)
        .collect();
    assert!(paths.contains(&"/admin/users"));
    assert!(!paths.contains(&"/missions/create"));
}

#[tokio::test]
async fn test_unauthorized_answer_logs_out() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "/missions/me", 401, json!({"message": "expired"}));
    let ctx = context(&transport);
    log_in(&ctx, 3, Role::Client);

    let mut board = CandidatureBoard::from_context(&ctx);
    assert!(board.load_missions().await.is_err());
    assert!(!ctx.session().is_logged_in());
    assert!(ctx.router().current_url().starts_with(LOGIN_PATH));
}

#[tokio::test]
async fn test_milestone_amount_below_one_is_rejected_locally() {
    let transport = Arc::new(MockTransport::new());
    let ctx = context(&transport);
    log_in(&ctx, 3, Role::Client);
    let mut milestones = MilestonesViewModel::from_context(&ctx, 12, MilestoneAudience::Client);

    let err = milestones
        .create(&NewMilestone::new("Maquettes", 0.0))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(milestones.state.error.is_some());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_milestones_sorted_and_reloaded_after_create() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::POST,
        "/missions/12/milestones",
        200,
        ok(json!({"id": 7, "title": "Recette", "amount": 300.0, "orderIndex": 1})),
    );
    transport.on(
        Method::GET,
        "/api/client/missions/12/milestones",
        200,
        ok(json!([
            {"id": 7, "title": "Recette", "amount": 300.0, "orderIndex": 1, "status": "PENDING"},
            {"id": 6, "title": "Maquettes", "amount": 200.0, "orderIndex": 0, "status": "PAID"}
        ])),
    );
    let ctx = context(&transport);
    log_in(&ctx, 3, Role::Client);
    let mut milestones = MilestonesViewModel::from_context(&ctx, 12, MilestoneAudience::Client);

    milestones
        .create(&NewMilestone::new("Recette", 300.0))
        .await
        .expect("create should succeed");

    let titles: Vec<&str> = milestones
        .state
        .items
        .iter()
        .map(|m| m.title.as_str())
        .collect();
    assert_eq!(titles, ["Maquettes", "Recette"]);
    assert_eq!(milestones.total_amount(), 500.0);
    assert_eq!(milestones.paid_amount(), 200.0);
    assert_eq!(milestones.progress_percent(), 50);
}

#[tokio::test]
async fn test_board_hydrates_candidatures_and_applies() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::GET,
        "/missions",
        200,
        ok(json!([
            {"id": 1, "title": "Site vitrine", "status": "PUBLISHED"},
            {"id": 2, "title": "Application mobile", "status": "PUBLISHED"},
            {"id": 3, "title": "Logo", "status": "PUBLISHED"}
        ])),
    );
    transport.on(
        Method::GET,
        "/candidatures/freelancer/9",
        200,
        ok(json!([
            {"id": 40, "missionId": 1, "status": "ACCEPTED", "coverLetter": "Bonjour, disponible",
             "clientMessage": "Bienvenue !"},
            {"id": 41, "missionId": 2, "status": "PENDING", "coverLetter": "Je suis intéressé"}
        ])),
    );
    transport.on(
        Method::POST,
        "/candidatures",
        200,
        ok(json!({"id": 42, "missionId": 3, "status": "PENDING", "coverLetter": "Proposition logo"})),
    );
    let ctx = context(&transport);
    log_in(&ctx, 9, Role::Freelancer);
    let mut board = FreelancerBoard::from_context(&ctx);

    board.load(true).await.expect("board should load");
    assert_eq!(board.get(1).unwrap().stage, BoardStage::InProgress);
    assert_eq!(board.get(2).unwrap().stage, BoardStage::Applied);
    assert_eq!(board.get(3).unwrap().stage, BoardStage::Open);
    let thread = &board.get(1).unwrap().conversation;
    assert_eq!(thread.last().unwrap().content, "Bienvenue !");

    let unchanged = board.apply(3, "   ", None, None, None).await.unwrap();
    assert_eq!(unchanged.unwrap().stage, BoardStage::Open);
    let sent_before = transport.request_count();

    let card = board
        .apply(3, "Proposition logo", None, Some(450.0), Some(5))
        .await
        .expect("apply should succeed")
        .expect("card should exist");
    assert_eq!(card.stage, BoardStage::Applied);
    assert_eq!(card.candidature_id, Some(42));
    assert_eq!(transport.request_count(), sent_before + 1);
}

#[tokio::test]
async fn test_candidatures_are_cached_per_mission() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::GET,
        "/missions/me",
        200,
        ok(json!([{"id": 5, "title": "API"}, {"id": 6, "title": "Front"}])),
    );
    transport.on(
        Method::GET,
        "/candidatures/mission/5",
        200,
        ok(json!([{"id": 50, "missionId": 5, "status": "PENDING"}])),
    );
    transport.on(
        Method::GET,
        "/candidatures/mission/6",
        200,
        ok(json!([])),
    );
    transport.on(Method::GET, "/missions/5/recommendations", 500, json!({"message": "down"}));
    transport.on(Method::GET, "/missions/6/recommendations", 200, ok(json!([])));
    let ctx = context(&transport);
    log_in(&ctx, 3, Role::Client);
    let mut board = CandidatureBoard::from_context(&ctx);

    board.load_missions().await.expect("missions should load");
    assert_eq!(board.missions.selected_id, Some(5));
    assert_eq!(board.selected_candidature, Some(50));
    assert!(board.recommendations_for(5).await.is_empty());
    assert!(board.recommendations_error.is_some());

    board.select_mission(6).await.unwrap();
    let before = transport.request_count();
    board.select_mission(5).await.unwrap();
    assert_eq!(transport.request_count(), before);
    assert_eq!(board.candidatures_for(5).await.len(), 1);
}

#[tokio::test]
async fn test_wallet_loads_balance_and_ledger() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::GET,
        "/api/client/wallet/me",
        200,
        ok(json!({"wallet": {"id": 2, "balance": 1250.5, "currency": "EUR"},
                  "transactions": [
                      {"id": 1, "type": "RECHARGE", "amount": 1500.0},
                      {"id": 2, "type": "PAYMENT", "amount": -249.5}
                  ]})),
    );
    transport.on(
        Method::GET,
        "/payments/transactions/client/3",
        200,
        ok(json!([{"id": 11, "amount": 249.5, "status": "COMPLETED"}])),
    );
    let ctx = context(&transport);
    log_in(&ctx, 3, Role::Client);
    let mut wallet = WalletViewModel::from_context(&ctx);

    wallet.load().await.expect("wallet should load");
    assert_eq!(wallet.balance(), 1250.5);
    assert_eq!(wallet.payments.len(), 1);
    assert_eq!(wallet.total_debited(), 249.5);
    assert_eq!(transport.request_count(), 2);

    let err = wallet.recharge(0.5).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_admin_directory_merges_and_sorts() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::GET,
        "/clients",
        200,
        ok(json!({"content": [
            {"id": 1, "firstName": "Ada", "lastName": "Lovelace", "email": "ada@towork.io",
             "createdAt": "2024-01-10T09:00:00"},
            {"id": 2, "email": "old@towork.io", "isActive": false, "createdAt": "2023-05-01T09:00:00"}
        ], "totalElements": 2})),
    );
    transport.on(
        Method::GET,
        "/freelancers",
        200,
        ok(json!({"content": [
            {"id": 3, "firstName": "Linus", "email": "linus@towork.io", "createdAt": "2024-06-01T09:00:00"}
        ], "totalElements": 1})),
    );
    transport.on(Method::DELETE, "/freelancers/3", 200, json!({"success": true, "message": "Utilisateur supprimé."}));
    let ctx = context(&transport);
    log_in(&ctx, 1, Role::Admin);
    let mut admin = AdminUsersViewModel::from_context(&ctx);

    admin.load().await.expect("directory should load");
    let ids: Vec<i64> = admin.state.items.iter().map(|u| u.id).collect();
    assert_eq!(ids, [3, 1, 2]);
    assert_eq!(admin.inactive(), 1);
    assert_eq!(admin.state.items[2].name, "Client");

    let pie = admin.pie_segments();
    assert_eq!(pie[0].end, 0.0);
    assert_eq!(pie[1].end, 240.0);
    assert_eq!(pie[2].end, 360.0);

    let message = admin.delete(3).await.expect("delete should succeed");
    assert_eq!(message, "Utilisateur supprimé.");
    assert_eq!(admin.total(), 2);
    assert!(admin.highlighted().iter().all(|u| u.id != 3));
}

#[tokio::test(start_paused = true)]
async fn test_poller_delivers_updates_and_stops_on_drop() {
    let transport = Arc::new(MockTransport::new());
    transport.on(
        Method::GET,
        "/conversations/4/messages",
        200,
        ok(json!([{"id": 1, "content": "Salut", "author": "CLIENT"}])),
    );
    let ctx = context(&transport);
    log_in(&ctx, 3, Role::Client);

    let mut poller =
        ConversationPoller::spawn(ctx.api().conversations.clone(), 4, Duration::from_secs(7));
    let first = poller.changed().await.expect("first poll");
    assert_eq!(first[0].content, "Salut");

    tokio::time::sleep(Duration::from_secs(15)).await;
    let polled = transport.request_count();
    assert!(polled >= 2);

    drop(poller);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(transport.request_count(), polled);
}
