use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use taxtrack_core::calculations::{FlatRatePolicy, TaxCalculator};
use taxtrack_core::{
    IncomeId, IncomeRecord, IncomeType, LedgerConfig, LedgerError, LedgerStore, NewIncomeRecord,
    TaxSummary,
};
use taxtrack_server::error::ErrorBody;
use taxtrack_server::{AppState, open_state, serve};
use tokio::net::TcpListener;

struct TestServer {
    base: String,
    client: Client,
}

impl TestServer {
    fn url(
        &self,
        path: &str,
    ) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post_income(
        &self,
        body: Value,
    ) -> reqwest::Response {
        self.client
            .post(self.url("/incomes"))
            .json(&body)
            .send()
            .await
            .expect("request failed")
    }

    async fn list(&self) -> Vec<IncomeRecord> {
        self.client
            .get(self.url("/incomes"))
            .send()
            .await
            .expect("request failed")
            .json()
            .await
            .expect("body is not an income list")
    }

    async fn summary(&self) -> TaxSummary {
        self.client
            .get(self.url("/tax-summary"))
            .send()
            .await
            .expect("request failed")
            .json()
            .await
            .expect("body is not a tax summary")
    }
}

async fn spawn_with(
    ledger_config: LedgerConfig,
    calculator: TaxCalculator,
) -> TestServer {
    let state = open_state(&ledger_config, calculator)
        .await
        .expect("Failed to open ledger");
    spawn_state(state).await
}

async fn spawn_state(state: AppState) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, state, std::future::pending()));

    TestServer {
        base: format!("http://{addr}"),
        client: Client::new(),
    }
}

async fn spawn_memory() -> TestServer {
    let flat = FlatRatePolicy::new(dec!(0.15)).unwrap();
    spawn_with(
        LedgerConfig::new("memory", ""),
        TaxCalculator::new(Arc::new(flat)),
    )
    .await
}

fn acme() -> Value {
    json!({
        "job_name": "Acme",
        "amount": 1000.0,
        "federal_amount": 100.0,
        "date": "2024-03-01",
        "income_type": "W2"
    })
}

#[tokio::test]
async fn create_returns_created_record_with_numeric_amounts() {
    let server = spawn_memory().await;

    let response = server.post_income(acme()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert!(body["id"].is_i64());
    assert_eq!(body["job_name"], "Acme");
    assert_eq!(body["amount"].as_f64(), Some(1000.0));
    assert_eq!(body["federal_amount"].as_f64(), Some(100.0));
    assert_eq!(body["date"], "2024-03-01");
    assert_eq!(body["income_type"], "W2");
}

#[tokio::test]
async fn list_returns_records_in_insertion_order() {
    let server = spawn_memory().await;
    server.post_income(acme()).await;
    let mut second = acme();
    second["job_name"] = json!("Freelance");
    second["income_type"] = json!("1099");
    server.post_income(second).await;

    let records = server.list().await;

    let names: Vec<_> = records.iter().map(|r| r.job_name.as_str()).collect();
    assert_eq!(names, vec!["Acme", "Freelance"]);
    assert_eq!(records[1].income_type, IncomeType::Form1099);
}

#[tokio::test]
async fn invalid_entries_are_rejected_and_not_stored() {
    let server = spawn_memory().await;
    let mut negative = acme();
    negative["amount"] = json!(-5);
    let mut missing = acme();
    missing.as_object_mut().unwrap().remove("job_name");
    let mut text_amount = acme();
    text_amount["amount"] = json!("lots");
    let mut bad_type = acme();
    bad_type["income_type"] = json!("K1");

    for body in [negative, missing, text_amount, bad_type] {
        let response = server.post_income(body.clone()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "accepted {body}");
        let error: ErrorBody = response.json().await.unwrap();
        assert!(!error.error.is_empty());
    }

    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn unparseable_body_is_bad_request() {
    let server = spawn_memory().await;

    let response = server
        .client
        .post(server.url("/incomes"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn delete_removes_only_the_named_record() {
    let server = spawn_memory().await;
    let first: IncomeRecord = server.post_income(acme()).await.json().await.unwrap();
    let second: IncomeRecord = server.post_income(acme()).await.json().await.unwrap();

    let response = server
        .client
        .delete(server.url(&format!("/incomes/{}", first.id)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(server.list().await, vec![second]);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let server = spawn_memory().await;
    server.post_income(acme()).await;

    let response = server
        .client
        .delete(server.url("/incomes/999"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(server.list().await.len(), 1);
}

#[tokio::test]
async fn delete_with_non_numeric_id_is_bad_request() {
    let server = spawn_memory().await;

    let response = server
        .client
        .delete(server.url("/incomes/abc"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summary_of_empty_ledger_is_all_zero() {
    let server = spawn_memory().await;

    let summary = server.summary().await;

    assert_eq!(summary.total_income, Decimal::ZERO);
    assert_eq!(summary.estimated_tax, Decimal::ZERO);
    assert_eq!(summary.paid_tax, Decimal::ZERO);
    assert_eq!(summary.effective_rate, Decimal::ZERO);
}

#[tokio::test]
async fn summary_totals_the_ledger() {
    let server = spawn_memory().await;
    server.post_income(acme()).await;
    server
        .post_income(json!({
            "job_name": "Freelance",
            "amount": 2000,
            "federal_amount": 300,
            "date": "2024-05-01",
            "income_type": "1099"
        }))
        .await;

    let summary = server.summary().await;

    assert_eq!(summary.total_income, dec!(3000));
    assert_eq!(summary.paid_tax, dec!(400));
    assert_eq!(summary.estimated_tax, dec!(450));
    assert_eq!(summary.effective_rate, dec!(15));
}

#[tokio::test]
async fn largest_amounts_are_recorded_and_summarized() {
    let server = spawn_memory().await;
    let mut large = acme();
    large["amount"] = json!(1e15);
    large["federal_amount"] = json!(0);

    for _ in 0..2 {
        let response = server.post_income(large.clone()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let summary = server.summary().await;

    assert_eq!(summary.total_income, dec!(2000000000000000));
    assert_eq!(summary.estimated_tax, dec!(300000000000000));
    assert_eq!(summary.effective_rate, dec!(15));
}

#[tokio::test]
async fn amounts_beyond_the_cap_are_bad_request() {
    let server = spawn_memory().await;
    let mut huge = acme();
    huge["amount"] = json!(5e28);

    let response = server.post_income(huge).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorBody = response.json().await.unwrap();
    assert!(error.error.contains("amount"), "{}", error.error);
    assert!(server.list().await.is_empty());
}

/// Serves records whose totals do not fit in a `Decimal`, as a database
/// edited outside the service could.
struct OverflowingLedger;

#[async_trait]
impl LedgerStore for OverflowingLedger {
    async fn insert(
        &self,
        _record: NewIncomeRecord,
    ) -> Result<IncomeRecord, LedgerError> {
        Err(LedgerError::Database("read only".to_string()))
    }

    async fn remove(
        &self,
        id: IncomeId,
    ) -> Result<(), LedgerError> {
        Err(LedgerError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<IncomeRecord>, LedgerError> {
        let record = |id| IncomeRecord {
            id,
            job_name: "Acme".to_string(),
            amount: Decimal::MAX,
            federal_amount: Decimal::ZERO,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            income_type: IncomeType::W2,
        };
        Ok(vec![record(1), record(2)])
    }
}

#[tokio::test]
async fn summary_overflow_is_a_structured_server_error() {
    let server = spawn_state(AppState::new(
        Arc::new(OverflowingLedger),
        TaxCalculator::default(),
    ))
    .await;

    let response = server
        .client
        .get(server.url("/tax-summary"))
        .send()
        .await
        .expect("connection dropped");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorBody = response.json().await.unwrap();
    assert!(error.error.contains("total income"), "{}", error.error);

    // The server keeps serving after the failed summary
    let listed = server.client.get(server.url("/incomes")).send().await.unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
}

#[tokio::test]
async fn routes_are_also_served_under_api_prefix() {
    let server = spawn_memory().await;
    server.post_income(acme()).await;

    let response = server.client.get(server.url("/api/incomes")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let records: Vec<IncomeRecord> = response.json().await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn responses_allow_cross_origin_requests() {
    let server = spawn_memory().await;

    let response = server.client.get(server.url("/incomes")).send().await.unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );

    let preflight = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/incomes"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert_eq!(preflight.status(), StatusCode::NO_CONTENT);
    assert!(
        preflight.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .contains("DELETE")
    );
}

#[tokio::test]
async fn sqlite_backend_serves_the_same_api() {
    let server = spawn_with(
        LedgerConfig::new("sqlite", ":memory:"),
        TaxCalculator::default(),
    )
    .await;

    let created: IncomeRecord = server.post_income(acme()).await.json().await.unwrap();

    assert_eq!(created.amount, dec!(1000));
    assert_eq!(server.list().await, vec![created]);
    assert_eq!(server.summary().await.estimated_tax, Decimal::ZERO);
}
