use actix_web::{http::StatusCode, web, web::ServiceConfig};
use dataplug_engine::{
    db_types::{OrderStatusType, TransactionPurpose, TransactionStatus},
    AgentApi,
    OrderFlowApi,
};
use serde_json::json;

use super::{
    helpers::{get_request, post_request},
    mocks::{test_order, test_transaction, MockShopDb},
};
use crate::routes::{PaystackWebhookRoute, VerifyPaymentRoute};

// The verify handlers extract both APIs, but these tests only ever drive the order flow, so the agent API gets
// a mock with no expectations.
fn configure_with(db: MockShopDb, cfg: &mut ServiceConfig) {
    cfg.service(VerifyPaymentRoute::<MockShopDb>::new())
        .service(PaystackWebhookRoute::<MockShopDb>::new())
        .app_data(web::Data::new(OrderFlowApi::new(db)))
        .app_data(web::Data::new(AgentApi::new(MockShopDb::new())));
}

#[actix_web::test]
async fn verify_unknown_reference_is_404() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_transaction_by_reference().returning(|_| Ok(None));
        configure_with(db, cfg);
    }
    let (status, body) = get_request("/payments/verify/order_000_none", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Payment reference"));
}

// A completed transaction returns the recorded outcome. No gateway call is made: the mock gateway client in the
// test app points at an unroutable default URL, so any attempt to verify again would fail the test.
#[actix_web::test]
async fn verify_is_idempotent_for_completed_payments() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_transaction_by_reference()
            .returning(|_| Ok(Some(test_transaction(TransactionStatus::Completed, TransactionPurpose::Order))));
        db.expect_fetch_order_by_order_id().returning(|_| Ok(Some(test_order(OrderStatusType::Completed))));
        configure_with(db, cfg);
    }
    let (status, body) =
        get_request("/payments/verify/order_1715000000000_ref001", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"status\":\"COMPLETED\""));
    assert!(body.contains("already been processed"));
}

#[actix_web::test]
async fn verify_reports_recorded_failures() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_transaction_by_reference()
            .returning(|_| Ok(Some(test_transaction(TransactionStatus::Failed, TransactionPurpose::Order))));
        db.expect_fetch_order_by_order_id().returning(|_| Ok(Some(test_order(OrderStatusType::Failed))));
        configure_with(db, cfg);
    }
    let (status, body) =
        get_request("/payments/verify/order_1715000000000_ref001", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"status\":\"FAILED\""));
}

// A transport failure talking to the gateway is not a payment outcome. The test app's gateway client points at
// an unusable default URL, so the verify call fails; the handler must answer 502 and write nothing — the mock
// carries no expectations beyond the lookup, so any attempt to fail or settle the order aborts the test.
#[actix_web::test]
async fn verify_gateway_outage_is_502_and_records_nothing() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_transaction_by_reference()
            .returning(|_| Ok(Some(test_transaction(TransactionStatus::Pending, TransactionPurpose::Order))));
        configure_with(db, cfg);
    }
    let (status, body) =
        get_request("/payments/verify/order_1715000000000_ref001", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("payment gateway"));
}

#[actix_web::test]
async fn webhook_ignores_unrelated_events() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        configure_with(MockShopDb::new(), cfg);
    }
    let payload = json!({ "event": "transfer.success", "data": { "reference": "order_123" } });
    let (status, body) = post_request("/webhook/paystack", payload, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Event ignored"));
}

#[actix_web::test]
async fn webhook_without_reference_is_400() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        configure_with(MockShopDb::new(), cfg);
    }
    let payload = json!({ "event": "charge.success", "data": { "amount": 600 } });
    let (status, body) = post_request("/webhook/paystack", payload, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("No payment reference"));
}

#[actix_web::test]
async fn webhook_replays_for_settled_payments_are_acknowledged() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_transaction_by_reference()
            .returning(|_| Ok(Some(test_transaction(TransactionStatus::Completed, TransactionPurpose::Order))));
        db.expect_fetch_order_by_order_id().returning(|_| Ok(Some(test_order(OrderStatusType::Completed))));
        configure_with(db, cfg);
    }
    let payload = json!({ "event": "charge.success", "data": { "reference": "order_1715000000000_ref001" } });
    let (status, body) = post_request("/webhook/paystack", payload, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"success\":true"));
}
