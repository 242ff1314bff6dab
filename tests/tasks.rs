use std::net::TcpListener;
use std::sync::Arc;

use actix_web::{rt, test, web, App, HttpServer};
use serde_json::json;

use tasklane::auth::{AuthService, TokenManager, TokenPair};
use tasklane::models::{Task, TaskPriority, TaskStatus};
use tasklane::routes;
use tasklane::store::{MemStore, Store};

const TEST_SECRET: &str = "integration_test_secret";

fn test_store() -> Arc<dyn Store> {
    Arc::new(MemStore::new())
}

fn test_tokens() -> TokenManager {
    TokenManager::new(TEST_SECRET, 30, 7)
}

macro_rules! test_app {
    ($store:expr, $tokens:expr) => {{
        let store_data: web::Data<dyn Store> = web::Data::from($store.clone());
        let auth_service = web::Data::new(AuthService::new($store.clone(), $tokens.clone()));
        let tokens = $tokens.clone();
        test::init_service(
            App::new()
                .app_data(store_data)
                .app_data(auth_service)
                .service(routes::health::health)
                .service(web::scope("/api").configure(|cfg| routes::config(cfg, &tokens))),
        )
        .await
    }};
}

/// Registers a user and logs them in, returning their bearer header value.
async fn register_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    username: &str,
) -> (TokenPair, String) {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": email,
            "username": username,
            "full_name": "Test User",
            "password": "password123"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": "password123" }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200);
    let pair: TokenPair = test::read_body_json(resp).await;

    let bearer = format!("Bearer {}", pair.access_token);
    (pair, bearer)
}

async fn create_task(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    bearer: &str,
    payload: serde_json::Value,
) -> Task {
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(("Authorization", bearer.to_string()))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    test::read_body_json(resp).await
}

#[actix_rt::test]
async fn test_task_operations_require_a_bearer_token() {
    let (store, tokens) = (test_store(), test_tokens());
    let app = test_app!(store, tokens);

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(json!({ "title": "No auth" }))
        .to_request();
    let resp = test::try_call_service(&app, req).await;
    assert_eq!(resp.unwrap_err().error_response().status(), 401);

    let req = test::TestRequest::get().uri("/api/tasks").to_request();
    let resp = test::try_call_service(&app, req).await;
    assert_eq!(resp.unwrap_err().error_response().status(), 401);
}

#[actix_rt::test]
async fn test_refresh_token_is_not_a_bearer_credential() {
    let (store, tokens) = (test_store(), test_tokens());
    let app = test_app!(store, tokens);

    let (pair, _) = register_and_login(&app, "alice@example.com", "alice").await;

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(("Authorization", format!("Bearer {}", pair.refresh_token)))
        .to_request();
    let resp = test::try_call_service(&app, req).await;
    assert_eq!(resp.unwrap_err().error_response().status(), 401);
}

#[actix_rt::test]
async fn test_create_stamps_owner_and_defaults() {
    let (store, tokens) = (test_store(), test_tokens());
    let app = test_app!(store, tokens);

    let (_, bearer) = register_and_login(&app, "alice@example.com", "alice").await;

    let task = create_task(&app, &bearer, json!({ "title": "First task" })).await;
    assert_eq!(task.title, "First task");
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert!(task.description.is_none());

    // The caller cannot pick the owner; an owner_id in the payload is ignored
    let foreign_owner = uuid::Uuid::new_v4();
    let planted = create_task(
        &app,
        &bearer,
        json!({ "title": "Planted owner", "owner_id": foreign_owner }),
    )
    .await;
    assert_eq!(planted.owner_id, task.owner_id);
    assert_ne!(planted.owner_id, foreign_owner);
}

#[actix_rt::test]
async fn test_update_is_a_partial_patch() {
    let (store, tokens) = (test_store(), test_tokens());
    let app = test_app!(store, tokens);

    let (_, bearer) = register_and_login(&app, "alice@example.com", "alice").await;
    let task = create_task(
        &app,
        &bearer,
        json!({ "title": "Original", "description": "Keep me", "priority": "high" }),
    )
    .await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task.id))
        .insert_header(("Authorization", bearer))
        .set_json(json!({ "status": "in_progress" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let updated: Task = test::read_body_json(resp).await;
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.title, "Original");
    assert_eq!(updated.description.as_deref(), Some("Keep me"));
    assert_eq!(updated.priority, TaskPriority::High);
    assert_eq!(updated.owner_id, task.owner_id);
}

#[actix_rt::test]
async fn test_cross_user_access_is_masked_as_not_found() {
    let (store, tokens) = (test_store(), test_tokens());
    let app = test_app!(store, tokens);

    let (_, alice) = register_and_login(&app, "alice@example.com", "alice").await;
    let (_, bob) = register_and_login(&app, "bob@example.com", "bob").await;

    let task = create_task(&app, &alice, json!({ "title": "Alice's task" })).await;
    let task_uri = format!("/api/tasks/{}", task.id);

    // Bob cannot get, update, or delete Alice's task; every attempt looks
    // like a missing id
    let req = test::TestRequest::get()
        .uri(&task_uri)
        .insert_header(("Authorization", bob.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::put()
        .uri(&task_uri)
        .insert_header(("Authorization", bob.clone()))
        .set_json(json!({ "title": "Hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::delete()
        .uri(&task_uri)
        .insert_header(("Authorization", bob.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    // Bob's listing never includes it
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(("Authorization", bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let listed: Vec<Task> = test::read_body_json(resp).await;
    assert!(listed.is_empty());

    // And Alice's task is untouched
    let req = test::TestRequest::get()
        .uri(&task_uri)
        .insert_header(("Authorization", alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let fetched: Task = test::read_body_json(resp).await;
    assert_eq!(fetched.title, "Alice's task");
}

#[actix_rt::test]
async fn test_listing_supports_status_filter_and_pagination() {
    let (store, tokens) = (test_store(), test_tokens());
    let app = test_app!(store, tokens);

    let (_, bearer) = register_and_login(&app, "alice@example.com", "alice").await;

    for n in 0..5 {
        create_task(&app, &bearer, json!({ "title": format!("task {}", n) })).await;
    }
    let done = create_task(&app, &bearer, json!({ "title": "finished one" })).await;
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", done.id))
        .insert_header(("Authorization", bearer.clone()))
        .set_json(json!({ "status": "completed" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    // Newest first
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    let listed: Vec<Task> = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(listed.len(), 6);
    assert_eq!(listed[0].title, "finished one");
    assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    // Status filter
    let req = test::TestRequest::get()
        .uri("/api/tasks?status=completed")
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    let completed: Vec<Task> = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, done.id);

    // Pagination
    let req = test::TestRequest::get()
        .uri("/api/tasks?skip=2&limit=2")
        .insert_header(("Authorization", bearer.clone()))
        .to_request();
    let page: Vec<Task> = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].title, "task 3");
    assert_eq!(page[1].title, "task 2");

    // Limit bounds are validated
    let req = test::TestRequest::get()
        .uri("/api/tasks?limit=0")
        .insert_header(("Authorization", bearer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);
}

#[actix_rt::test]
async fn test_unknown_task_id_is_not_found() {
    let (store, tokens) = (test_store(), test_tokens());
    let app = test_app!(store, tokens);

    let (_, bearer) = register_and_login(&app, "alice@example.com", "alice").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", uuid::Uuid::new_v4()))
        .insert_header(("Authorization", bearer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[test_log::test(actix_rt::test)]
async fn test_full_lifecycle_register_to_delete() {
    let (store, tokens) = (test_store(), test_tokens());
    let app = test_app!(store, tokens);

    // register + login
    let (pair, bearer) = register_and_login(&app, "alice@example.com", "alice").await;

    // create task
    let task = create_task(
        &app,
        &bearer,
        json!({ "title": "Lifecycle task", "priority": "low" }),
    )
    .await;

    // refresh the token pair, then continue with the new access token
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": pair.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let rotated: TokenPair = test::read_body_json(resp).await;
    let new_bearer = format!("Bearer {}", rotated.access_token);

    // update with the new access token
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task.id))
        .insert_header(("Authorization", new_bearer.clone()))
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: Task = test::read_body_json(resp).await;
    assert_eq!(updated.status, TaskStatus::Completed);

    // delete
    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", task.id))
        .insert_header(("Authorization", new_bearer.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    // a subsequent get fails as not-found
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", task.id))
        .insert_header(("Authorization", new_bearer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn test_unauthorized_request_over_a_real_socket() {
    // Same assertion as the in-process 401 tests, but through a bound
    // listener so the middleware error is exercised as an actual HTTP
    // response body.
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let store = test_store();
    let tokens = test_tokens();
    let store_data: web::Data<dyn Store> = web::Data::from(store.clone());
    let auth_service = web::Data::new(AuthService::new(store, tokens.clone()));

    let server = HttpServer::new(move || {
        let tokens = tokens.clone();
        App::new()
            .app_data(store_data.clone())
            .app_data(auth_service.clone())
            .service(web::scope("/api").configure(move |cfg| routes::config(cfg, &tokens)))
    })
    .bind(("127.0.0.1", port))
    .expect("Failed to bind test server")
    .workers(1)
    .run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/tasks", port))
        .json(&json!({ "title": "No auth" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.expect("body should be json");
    assert_eq!(body["error"], "Missing bearer token");

    handle.stop(false).await;
}
