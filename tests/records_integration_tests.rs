//! Integration tests for patient and transaction record routes

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header::CONTENT_TYPE},
};
use chrono::Utc;
use patient_ledger::database::TransactionQuery;
use patient_ledger::database::entities::TransactionStatus;
use patient_ledger::test_utils::{TestServerBuilder, create_test_patient, create_test_transaction};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn create_test_server() -> patient_ledger::server::Server {
    TestServerBuilder::new().build().await
}

async fn send(
    app: axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

#[tokio::test]
async fn test_create_and_get_patient() {
    let server = create_test_server().await;

    let (status, created) = send(
        server.create_app(),
        Method::POST,
        "/api/patients",
        Some(json!({
            "name": "Ada Example",
            "date_of_birth": "1980-04-02",
            "contact": "ada@example.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Ada Example");
    let mrn = created["medical_record_number"].as_str().unwrap();
    assert!(mrn.starts_with("MRN-"));

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(
        server.create_app(),
        Method::GET,
        &format!("/api/patients/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["medical_record_number"], mrn);
}

#[tokio::test]
async fn test_create_patient_rejects_empty_name() {
    let server = create_test_server().await;

    let (status, json_body) = send(
        server.create_app(),
        Method::POST,
        "/api/patients",
        Some(json!({
            "name": "   ",
            "date_of_birth": "1980-04-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body["error"], "Bad request");
}

#[tokio::test]
async fn test_create_patient_duplicate_mrn_conflicts() {
    let server = create_test_server().await;

    let body = json!({
        "name": "First Patient",
        "date_of_birth": "1970-01-01",
        "medical_record_number": "MRN-1700000000-deadbeef"
    });
    let (status, _) = send(server.create_app(), Method::POST, "/api/patients", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json_body) = send(
        server.create_app(),
        Method::POST,
        "/api/patients",
        Some(json!({
            "name": "Second Patient",
            "date_of_birth": "1971-02-02",
            "medical_record_number": "MRN-1700000000-deadbeef"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json_body["error"], "Conflict");
}

#[tokio::test]
async fn test_update_patient_demographics() {
    let server = create_test_server().await;
    let patient_id = create_test_patient(&server.database).await;

    let (status, updated) = send(
        server.create_app(),
        Method::PUT,
        &format!("/api/patients/{}", patient_id),
        Some(json!({ "name": "Renamed Patient" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Renamed Patient");

    let (status, _) = send(
        server.create_app(),
        Method::PUT,
        "/api/patients/9999",
        Some(json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_patient_cascades_to_transactions() {
    let server = create_test_server().await;
    let doomed = create_test_patient(&server.database).await;
    let survivor = create_test_patient(&server.database).await;

    let now = Utc::now();
    create_test_transaction(&server.database, doomed, 10_00, now, TransactionStatus::Paid).await;
    create_test_transaction(&server.database, doomed, 20_00, now, TransactionStatus::Unpaid).await;
    create_test_transaction(&server.database, survivor, 30_00, now, TransactionStatus::Paid).await;

    let (status, _) = send(
        server.create_app(),
        Method::DELETE,
        &format!("/api/patients/{}", doomed),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The patient's transactions are gone; the other patient's survive
    let remaining = server
        .database
        .transactions()
        .get_records(&TransactionQuery::default())
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].patient_id, survivor);

    let (status, _) = send(
        server.create_app(),
        Method::GET,
        &format!("/api/patients/{}", doomed),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_transaction() {
    let server = create_test_server().await;
    let patient_id = create_test_patient(&server.database).await;

    let (status, created) = send(
        server.create_app(),
        Method::POST,
        "/api/transactions",
        Some(json!({
            "patient_id": patient_id,
            "service_type": "Lab Work",
            "amount": "42.50",
            "transaction_date": Utc::now().to_rfc3339(),
            "status": "unpaid"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["service_type"], "Lab Work");
    assert_eq!(created["status"], "unpaid");
    assert!(created["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_create_transaction_unknown_patient_is_not_found() {
    let server = create_test_server().await;

    let (status, json_body) = send(
        server.create_app(),
        Method::POST,
        "/api/transactions",
        Some(json!({
            "patient_id": 777,
            "service_type": "Lab Work",
            "amount": "42.50",
            "transaction_date": Utc::now().to_rfc3339(),
            "status": "paid"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body["error"], "Not found");
}

#[tokio::test]
async fn test_create_transaction_rejects_negative_amount() {
    let server = create_test_server().await;
    let patient_id = create_test_patient(&server.database).await;

    let (status, json_body) = send(
        server.create_app(),
        Method::POST,
        "/api/transactions",
        Some(json!({
            "patient_id": patient_id,
            "service_type": "Lab Work",
            "amount": "-1.00",
            "transaction_date": Utc::now().to_rfc3339(),
            "status": "paid"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body["error"], "Bad request");
}

#[tokio::test]
async fn test_create_transaction_rejects_unknown_status() {
    let server = create_test_server().await;
    let patient_id = create_test_patient(&server.database).await;

    // The status set is closed; anything else never reaches the store
    let (status, _) = send(
        server.create_app(),
        Method::POST,
        "/api/transactions",
        Some(json!({
            "patient_id": patient_id,
            "service_type": "Lab Work",
            "amount": "42.50",
            "transaction_date": Utc::now().to_rfc3339(),
            "status": "pending"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_transactions_with_filters() {
    let server = create_test_server().await;
    let patient1 = create_test_patient(&server.database).await;
    let patient2 = create_test_patient(&server.database).await;

    let now = Utc::now();
    create_test_transaction(&server.database, patient1, 10_00, now, TransactionStatus::Paid).await;
    create_test_transaction(&server.database, patient1, 20_00, now, TransactionStatus::Unpaid)
        .await;
    create_test_transaction(&server.database, patient2, 30_00, now, TransactionStatus::Paid).await;

    let (status, json_body) = send(
        server.create_app(),
        Method::GET,
        &format!("/api/transactions?patient_id={}", patient1),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body["records"].as_array().unwrap().len(), 2);
    assert_eq!(json_body["total"], 2);

    let (status, json_body) = send(
        server.create_app(),
        Method::GET,
        "/api/transactions?status=paid",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body["records"].as_array().unwrap().len(), 2);

    let (status, json_body) = send(
        server.create_app(),
        Method::GET,
        "/api/transactions?limit=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body["records"].as_array().unwrap().len(), 1);
    assert_eq!(json_body["total"], 3);
}

#[tokio::test]
async fn test_update_transaction_status_stamps_updated_at() {
    let server = create_test_server().await;
    let patient_id = create_test_patient(&server.database).await;
    let record =
        create_test_transaction(&server.database, patient_id, 10_00, Utc::now(), TransactionStatus::Unpaid)
            .await;
    assert!(record.updated_at.is_none());

    let (status, updated) = send(
        server.create_app(),
        Method::PUT,
        &format!("/api/transactions/{}", record.id),
        Some(json!({ "status": "paid" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "paid");
    assert!(!updated["updated_at"].is_null());
}

#[tokio::test]
async fn test_update_transaction_revalidates_changed_patient() {
    let server = create_test_server().await;
    let patient_id = create_test_patient(&server.database).await;
    let record =
        create_test_transaction(&server.database, patient_id, 10_00, Utc::now(), TransactionStatus::Paid)
            .await;

    let (status, _) = send(
        server.create_app(),
        Method::PUT,
        &format!("/api/transactions/{}", record.id),
        Some(json!({ "patient_id": 8888 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Updates that keep the same patient do not re-check the reference
    let (status, _) = send(
        server.create_app(),
        Method::PUT,
        &format!("/api/transactions/{}", record.id),
        Some(json!({ "patient_id": patient_id, "amount": "11.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_transaction() {
    let server = create_test_server().await;
    let patient_id = create_test_patient(&server.database).await;
    let record =
        create_test_transaction(&server.database, patient_id, 10_00, Utc::now(), TransactionStatus::Paid)
            .await;

    let (status, _) = send(
        server.create_app(),
        Method::DELETE,
        &format!("/api/transactions/{}", record.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        server.create_app(),
        Method::DELETE,
        &format!("/api/transactions/{}", record.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
