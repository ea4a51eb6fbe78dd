// Integration tests for usermgmt-tui: the controller against a fake API.

use std::net::TcpListener;

use serde_json::json;
use tokio::runtime::Handle;
use url::Url;
use usermgmt_tui::{ApiClient, Controller, NewUser};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn controller_for(base: &str) -> Controller {
    let client = ApiClient::new(Url::parse(base).expect("base url")).expect("client");
    Controller::new(client, Handle::current(), 6)
}

async fn mount_startup(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "positions": [{"id": 1, "name": "Dev"}]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "1"))
        .and(query_param("count", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": 1, "name": "A"}]
        })))
        .mount(server)
        .await;
}

// 1) Startup loads token, positions and the first page concurrently
#[tokio::test]
async fn startup_loads_token_positions_and_first_page() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    mount_startup(&server).await;

    let mut controller = controller_for(&server.uri());
    controller.start();
    assert_eq!(controller.state().in_flight, 3);
    controller.settle().await;

    let state = controller.state();
    assert_eq!(state.token.as_deref(), Some("abc"));
    assert_eq!(
        state.visible_positions(),
        Some(&json!([{"id": 1, "name": "Dev"}]))
    );
    assert_eq!(state.users, vec![json!({"id": 1, "name": "A"})]);
    assert_eq!(state.page, 1);
    assert!(!state.error.visible);
}

// 2) Show more appends the next page and advances the counter
#[tokio::test]
async fn show_more_appends_second_page() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    mount_startup(&server).await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .and(query_param("count", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": 2, "name": "B"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller_for(&server.uri());
    controller.start();
    controller.settle().await;
    controller.show_more();
    assert_eq!(controller.state().page, 2);
    controller.settle().await;

    assert_eq!(
        controller.state().users,
        vec![json!({"id": 1, "name": "A"}), json!({"id": 2, "name": "B"})]
    );
    assert_eq!(controller.state().page, 2);
}

// 3) A failed page still leaves the counter advanced
#[tokio::test]
async fn show_more_failure_keeps_page_advanced() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    mount_startup(&server).await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server.uri());
    controller.start();
    controller.settle().await;
    controller.show_more();
    controller.settle().await;

    let state = controller.state();
    assert_eq!(state.page, 2);
    assert_eq!(state.users, vec![json!({"id": 1, "name": "A"})]);
    assert!(state.error.visible);
    assert!(state.error.message.contains("Error fetching users"));
    assert!(state.error.message.contains("500 - Internal Server Error"));
    assert!(state.error.message.contains("\"message\": \"db down\""));
}

// 4) Unknown user id surfaces 404 and the body, selection untouched
#[tokio::test]
async fn user_lookup_404_reports_status_and_body() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": {"id": 7, "name": "Seven"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server.uri());
    controller.fetch_user_by_id("7");
    controller.settle().await;
    assert_eq!(
        controller.state().selected_user,
        Some(json!({"id": 7, "name": "Seven"}))
    );

    controller.fetch_user_by_id("99");
    controller.settle().await;
    let state = controller.state();
    assert_eq!(state.selected_user, Some(json!({"id": 7, "name": "Seven"})));
    assert!(state.error.visible);
    assert!(state.error.message.contains("Error fetching user by ID"));
    assert!(state.error.message.contains("404"));
    assert!(state.error.message.contains("\"error\": \"not found\""));
}

// 5) Create sends the token only as a header and reloads page 1
#[tokio::test]
async fn create_user_sends_token_header_and_reloads() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    mount_startup(&server).await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("token", "tok-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "user_id": 23,
            "message": "New user successfully registered"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut photo = std::env::temp_dir();
    photo.push(format!("usermgmt_photo_{}.jpg", std::process::id()));
    std::fs::write(&photo, b"\xff\xd8\xff\xe0fake-jpeg").expect("write photo");

    let mut controller = controller_for(&server.uri());
    controller.start();
    controller.settle().await;
    controller.show_more();
    controller.settle().await;
    controller.dismiss_error_banner();

    let user = NewUser {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        phone: "+380501234567".into(),
        position_id: "1".into(),
        photo: Some(photo.clone()),
    };
    controller.submit_new_user(user, "tok-1".into());
    controller.settle().await;

    let state = controller.state();
    assert_eq!(
        state.notice.as_deref(),
        Some("User added: New user successfully registered")
    );
    assert_eq!(state.page, 1);
    assert_eq!(state.users, vec![json!({"id": 1, "name": "A"})]);

    let requests = server.received_requests().await.expect("recording enabled");
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("POST /users received");
    let body = String::from_utf8_lossy(&post.body);
    assert!(body.contains("name=\"name\""));
    assert!(body.contains("Ann"));
    assert!(body.contains("name=\"position_id\""));
    assert!(body.contains(&format!(
        "filename=\"usermgmt_photo_{}.jpg\"",
        std::process::id()
    )));
    assert!(!body.contains("name=\"token\""));
    assert!(!body.contains("tok-1"));

    controller.acknowledge_notice();
    assert!(controller.state().notice.is_none());

    let _ = std::fs::remove_file(&photo);
}

// 6) Rejected create reports the validation body, nothing reloads
#[tokio::test]
async fn create_user_rejection_raises_banner() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "The token expired."
        })))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server.uri());
    controller.submit_new_user(NewUser::default(), String::new());
    controller.settle().await;

    let state = controller.state();
    assert!(state.notice.is_none());
    assert!(state.error.message.starts_with("Error adding user:"));
    assert!(state.error.message.contains("401 - Unauthorized"));
    assert!(state.error.message.contains("The token expired."));
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(1));
}

// 7) Missing photo file fails before anything is sent
#[tokio::test]
async fn unreadable_photo_is_reported_without_request() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    let mut controller = controller_for(&server.uri());
    let user = NewUser {
        photo: Some("/nonexistent/usermgmt/photo.png".into()),
        ..Default::default()
    };
    controller.submit_new_user(user, "tok".into());
    controller.settle().await;

    let message = &controller.state().error.message;
    assert!(message.starts_with("Error adding user:"));
    assert!(message.contains("/nonexistent/usermgmt/photo.png"));
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(0));
}

// 8) Nobody listening: transport failure, no status line, UI state intact
#[tokio::test]
async fn transport_failure_has_context_but_no_status() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    // Grab a free port, then release it so the connection is refused.
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("free port");

    let mut controller = controller_for(&format!("http://127.0.0.1:{port}"));
    controller.request_token();
    controller.settle().await;

    let state = controller.state();
    assert!(state.token.is_none());
    assert!(state.error.visible);
    let lines: Vec<&str> = state.error.message.lines().collect();
    assert_eq!(lines.first().copied(), Some("Error fetching token:"));
    let has_status_line = lines.iter().any(|l| {
        l.split(" - ")
            .next()
            .is_some_and(|code| code.len() == 3 && code.chars().all(|c| c.is_ascii_digit()))
    });
    assert!(!has_status_line, "unexpected banner: {:?}", state.error.message);
    assert_eq!(state.in_flight, 0);
}

// 9) Successful 2xx with the wrong shape is a decode failure
#[tokio::test]
async fn malformed_token_body_is_reported() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tok": "abc"})))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server.uri());
    controller.request_token();
    controller.settle().await;

    let message = &controller.state().error.message;
    assert!(message.contains("Error fetching token"));
    assert!(message.contains("200 - OK"));
    assert!(controller.state().token.is_none());
}

// 10) Positions with an unexpected shape are stored, just not shown
#[tokio::test]
async fn positions_with_null_list_are_not_an_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "positions": null,
            "message": "Positions not found"
        })))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server.uri());
    controller.request_positions();
    controller.settle().await;

    let state = controller.state();
    assert!(!state.error.visible);
    assert!(state.error.message.is_empty());
    let stored = state.positions.as_ref().expect("positions stored");
    assert_eq!(
        stored.extra.get("message"),
        Some(&json!("Positions not found"))
    );
    assert!(state.visible_positions().is_none());
}
