mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use common::TestContext;
use workon_server::config::EmployeeLookup;
use workon_server::db::Collection;

fn dates(tasks: &[Value]) -> Vec<&str> {
    tasks.iter().map(|t| t["date"].as_str().unwrap()).collect()
}

async fn seed_march(ctx: &TestContext) {
    for (name, email, date) in [
        ("Alice", "alice@workon.io", "2024-02-29"),
        ("Alice", "alice@workon.io", "2024-03-01"),
        ("Bob", "bob@workon.io", "2024-03-15T10:00:00Z"),
        ("Alice", "alice@workon.io", "2024-03-31"),
        ("Alice", "alice@workon.io", "2024-04-01"),
    ] {
        ctx.seed(
            Collection::Tasks,
            json!({ "name": name, "email": email, "task": "Sales", "hoursWorked": 8, "date": date }),
        )
        .await;
    }
}

#[actix_web::test]
async fn month_filter_is_half_open() {
    let ctx = TestContext::new();
    seed_march(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/work-records?month=2024-03").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(dates(&tasks), vec!["2024-03-31", "2024-03-15T10:00:00Z", "2024-03-01"]);
}

#[actix_web::test]
async fn employee_and_month_filters_combine() {
    let ctx = TestContext::new();
    seed_march(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get()
        .uri("/work-records?employeeName=Alice&month=2024-03")
        .to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(dates(&tasks), vec!["2024-03-31", "2024-03-01"]);
    assert!(tasks.iter().all(|t| t["email"] == "alice@workon.io"));

    let req = test::TestRequest::get().uri("/work-records?employeeName=Bob").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks.len(), 1);

    let req = test::TestRequest::get().uri("/work-records").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks.len(), 5);
}

#[actix_web::test]
async fn unknown_employee_and_bad_month_are_rejected() {
    let ctx = TestContext::new();
    seed_march(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/work-records?employeeName=Zed").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Employee not found");

    let req = test::TestRequest::get().uri("/work-records?month=2024-13").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn employee_names_resolve_through_configured_collection() {
    for (lookup, expected) in [(EmployeeLookup::Tasks, StatusCode::NOT_FOUND), (EmployeeLookup::Users, StatusCode::OK)] {
        let ctx = TestContext::with_lookup(lookup);
        ctx.seed(Collection::Users, json!({ "email": "carol@workon.io", "name": "Carol" })).await;
        ctx.seed(Collection::Tasks, json!({ "email": "carol@workon.io", "date": "2024-03-02" })).await;
        let app = test::init_service(ctx.app()).await;

        let req = test::TestRequest::get().uri("/work-records?employeeName=Carol").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected, "lookup via {:?}", lookup);
    }
}

#[actix_web::test]
async fn tasks_by_email_are_latest_first() {
    let ctx = TestContext::new();
    seed_march(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::get().uri("/tasks/alice@workon.io").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(dates(&tasks), vec!["2024-04-01", "2024-03-31", "2024-03-01", "2024-02-29"]);

    let req = test::TestRequest::get().uri("/tasks").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        dates(&tasks),
        vec!["2024-04-01", "2024-03-31", "2024-03-15T10:00:00Z", "2024-03-01", "2024-02-29"]
    );
}

#[actix_web::test]
async fn create_keeps_free_form_fields_and_allows_duplicates() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let draft = json!({
        "email": "dan@workon.io",
        "name": "Dan",
        "task": "Support",
        "hoursWorked": 6.5,
        "date": "2024-05-02",
        "notes": "night shift"
    });
    for _ in 0..2 {
        let req = test::TestRequest::post().uri("/tasks").set_json(&draft).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    assert_eq!(ctx.count(Collection::Tasks).await, 2);

    let req = test::TestRequest::get().uri("/tasks/dan@workon.io").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks[0]["notes"], "night shift");
    assert_eq!(tasks[0]["hoursWorked"], 6.5);

    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(json!({ "email": "dan@workon.io", "date": "02/05/2024" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn partial_task_update_reports_raw_outcome() {
    let ctx = TestContext::new();
    let id = ctx
        .seed(Collection::Tasks, json!({ "email": "eli@workon.io", "task": "Sales", "date": "2024-03-05" }))
        .await;
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/work-records/{}", id))
        .set_json(json!({ "task": "Marketing", "hoursWorked": 4 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["matchedCount"], 1);
    assert_eq!(body["modifiedCount"], 1);

    let req = test::TestRequest::get().uri("/tasks/eli@workon.io").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks[0]["task"], "Marketing");
    assert_eq!(tasks[0]["date"], "2024-03-05");

    let req = test::TestRequest::patch()
        .uri(&format!("/work-records/{}", uuid::Uuid::new_v4()))
        .set_json(json!({ "task": "Marketing" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["matchedCount"], 0);
}

#[actix_web::test]
async fn free_form_fields_can_be_updated() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(json!({
            "email": "fay@workon.io",
            "name": "Fay",
            "task": "Support",
            "hoursWorked": 8,
            "date": "2024-05-03",
            "notes": "night shift"
        }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["insertedId"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/work-records/{}", id))
        .set_json(json!({ "notes": "day shift" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["modifiedCount"], 1);

    let req = test::TestRequest::get().uri("/tasks/fay@workon.io").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks[0]["notes"], "day shift");
    assert_eq!(tasks[0]["task"], "Support");

    for body in [json!({ "email": "other@workon.io" }), json!({ "_id": "x", "notes": "n" })] {
        let req = test::TestRequest::patch()
            .uri(&format!("/work-records/{}", id))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "accepted {}", body);
    }

    let req = test::TestRequest::get().uri("/tasks/fay@workon.io").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["_id"], id.as_str());
}

#[actix_web::test]
async fn offset_timestamps_are_filed_under_their_utc_month() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(json!({
            "email": "gus@workon.io",
            "name": "Gus",
            "task": "Sales",
            "hoursWorked": 2,
            "date": "2024-04-01T01:00:00+05:00"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/work-records?month=2024-03").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(dates(&tasks), vec!["2024-03-31T20:00:00.000000Z"]);

    let req = test::TestRequest::get().uri("/work-records?month=2024-04").to_request();
    let tasks: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(tasks.is_empty());
}
