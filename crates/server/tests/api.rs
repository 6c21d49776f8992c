use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, FixedClock};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .clock(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()))
        .build()
        .await
        .unwrap();
    server::router(Arc::new(engine))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, uri: &str, body: Value) -> String {
    let (status, value) = send(app, "POST", uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{uri}: {value}");
    value["id"].as_str().unwrap().to_string()
}

async fn seed_pledge(app: &Router, total: i64) -> (String, String) {
    let member = create(app, "/members", json!({ "name": "Ana Gómez" })).await;
    let committee = create(app, "/committees", json!({ "name": "Jóvenes" })).await;
    let pledge = create(
        app,
        "/pledges",
        json!({
            "debtor_id": member,
            "amount_total_minor": total,
            "due_date": "2026-12-31",
            "purpose": "building fund",
            "committee_id": committee,
            "created_by": "treasurer",
        }),
    )
    .await;
    (committee, pledge)
}

fn payment(pledge: &str, amount_minor: i64, amount_total_minor: i64) -> Value {
    json!({
        "pledge_id": pledge,
        "amount_minor": amount_minor,
        "date": "2026-10-15",
        "registered_by": "treasurer",
        "amount_total_minor": amount_total_minor,
    })
}

async fn post_payment(
    app: &Router,
    pledge: &str,
    amount_minor: i64,
    amount_total_minor: i64,
) -> (StatusCode, Value) {
    let body = payment(pledge, amount_minor, amount_total_minor);
    send(app, "POST", "/payments", Some(body)).await
}

#[tokio::test]
async fn payments_walk_a_pledge_to_completion() {
    let app = app().await;
    let (_, pledge) = seed_pledge(&app, 100_000).await;

    let (status, body) = post_payment(&app, &pledge, 30_000, 100_000).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["amount_collected_minor"], 30_000);
    assert_eq!(body["status"], "active");

    let (status, body) = post_payment(&app, &pledge, 70_000, 100_000).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount_collected_minor"], 100_000);
    assert_eq!(body["status"], "completed");

    let (status, body) = send(&app, "GET", &format!("/pledges/{pledge}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pending_minor"], 0);
    assert_eq!(body["state"], "completed");
}

#[tokio::test]
async fn overshooting_payment_is_unprocessable() {
    let app = app().await;
    let (_, pledge) = seed_pledge(&app, 50_000).await;

    let (status, body) = post_payment(&app, &pledge, 50_001, 50_000).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (_, body) = send(&app, "GET", &format!("/pledges/{pledge}"), None).await;
    assert_eq!(body["amount_collected_minor"], 0);
}

#[tokio::test]
async fn stale_total_is_a_conflict() {
    let app = app().await;
    let (_, pledge) = seed_pledge(&app, 50_000).await;

    let mut body = payment(&pledge, 10_000, 50_000);
    body["amount_total_minor"] = json!(40_000);
    let (status, _) = send(&app, "POST", "/payments", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn payment_without_total_snapshot_is_rejected() {
    let app = app().await;
    let (_, pledge) = seed_pledge(&app, 50_000).await;

    let mut body = payment(&pledge, 10_000, 50_000);
    body.as_object_mut().unwrap().remove("amount_total_minor");
    let (status, _) = send(&app, "POST", "/payments", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, "GET", &format!("/pledges/{pledge}"), None).await;
    assert_eq!(body["amount_collected_minor"], 0);
}

#[tokio::test]
async fn unknown_pledge_is_not_found() {
    let app = app().await;
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, _) = post_payment(&app, &missing, 1_000, 1_000).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &format!("/pledges/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancelled_pledge_rejects_payments() {
    let app = app().await;
    let (_, pledge) = seed_pledge(&app, 50_000).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/pledges/{pledge}/cancel"),
        Some(json!({ "actor": "pastor" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["last_updated_by"], "pastor");

    let (status, _) = post_payment(&app, &pledge, 1_000, 50_000).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn committee_balance_combines_both_ledgers() {
    let app = app().await;
    let (committee, pledge) = seed_pledge(&app, 500_000).await;

    create(
        &app,
        &format!("/committees/{committee}/offerings"),
        json!({
            "amount_minor": 500_000,
            "date": "2026-10-04",
            "concept": "Sunday offering",
            "registered_by": "treasurer",
        }),
    )
    .await;
    create(
        &app,
        &format!("/committees/{committee}/expenses"),
        json!({
            "amount_minor": 120_000,
            "date": "2026-10-06",
            "concept": "Chairs",
            "registered_by": "treasurer",
        }),
    )
    .await;
    let (status, _) = post_payment(&app, &pledge, 200_000, 500_000).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", &format!("/committees/{committee}/balance"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offering_income_minor"], 500_000);
    assert_eq!(body["pledge_income_minor"], 200_000);
    assert_eq!(body["total_income_minor"], 700_000);
    assert_eq!(body["total_expense_minor"], 120_000);
    assert_eq!(body["balance_minor"], 580_000);
}

#[tokio::test]
async fn expense_can_be_corrected_and_removed() {
    let app = app().await;
    let committee = create(&app, "/committees", json!({ "name": "Damas" })).await;
    let expense = create(
        &app,
        &format!("/committees/{committee}/expenses"),
        json!({
            "amount_minor": 30_000,
            "date": "2026-10-01",
            "concept": "Flowers",
            "payment_method": "transfer",
            "registered_by": "treasurer",
        }),
    )
    .await;

    let uri = format!("/committees/{committee}/expenses/{expense}");
    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "amount_minor": 25_000 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount_minor"], 25_000);
    assert_eq!(body["payment_method"], "transfer");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", &format!("/committees/{committee}/balance"), None).await;
    assert_eq!(body["total_expense_minor"], 0);
}

#[tokio::test]
async fn payments_page_through_newest_first() {
    let app = app().await;
    let (_, pledge) = seed_pledge(&app, 100_000).await;
    for amount in [1_000, 2_000, 3_000] {
        let (status, _) = post_payment(&app, &pledge, amount, 100_000).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, first) = send(&app, "GET", &format!("/pledges/{pledge}/payments?limit=2"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["payments"].as_array().unwrap().len(), 2);
    let cursor = first["next_cursor"].as_str().unwrap().to_string();

    let (status, second) = send(
        &app,
        "GET",
        &format!("/pledges/{pledge}/payments?limit=2&cursor={cursor}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["payments"].as_array().unwrap().len(), 1);
    assert!(second["next_cursor"].is_null());

    let (status, _) = send(
        &app,
        "GET",
        &format!("/pledges/{pledge}/payments?cursor=not-a-cursor"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn pledges_filter_by_derived_state() {
    let app = app().await;
    let member = create(&app, "/members", json!({ "name": "Luis Pérez" })).await;
    for due_date in ["2026-09-30", "2026-11-30"] {
        create(
            &app,
            "/pledges",
            json!({
                "debtor_id": member,
                "amount_total_minor": 10_000,
                "due_date": due_date,
                "created_by": "treasurer",
            }),
        )
        .await;
    }

    let (status, body) = send(&app, "GET", "/pledges?state=overdue", None).await;
    assert_eq!(status, StatusCode::OK);
    let pledges = body["pledges"].as_array().unwrap();
    assert_eq!(pledges.len(), 1);
    assert_eq!(pledges[0]["due_date"], "2026-09-30");
    assert_eq!(pledges[0]["status"], "active");

    let (_, body) = send(&app, "GET", &format!("/members/{member}/summary"), None).await;
    assert_eq!(body["pledge_count"], 2);
    assert_eq!(body["overdue_count"], 1);
    assert_eq!(body["pending_minor"], 20_000);
}
