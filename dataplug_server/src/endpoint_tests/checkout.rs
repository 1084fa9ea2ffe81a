use actix_web::{http::StatusCode, web, web::ServiceConfig};
use dataplug_engine::{db_types::AgentStatus, OrderFlowApi};
use serde_json::json;

use super::{
    helpers::post_request,
    mocks::{test_agent, test_package, MockShopDb},
};
use crate::routes::CheckoutRoute;

fn checkout_body(slug: &str, package: &str, phone: &str) -> serde_json::Value {
    json!({ "agent_slug": slug, "package_id": package, "customer_phone": phone })
}

#[actix_web::test]
async fn checkout_rejects_bad_phone_numbers() {
    let _ = env_logger::try_init().ok();
    let body = checkout_body("ama-data-hub-x1y2", "mtn-1gb", "12345");
    let (status, body) = post_request("/checkout", body, configure_no_calls).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("not a valid mobile number"));
}

#[actix_web::test]
async fn checkout_for_unknown_shop_is_404() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_agent_by_slug().returning(|_| Ok(None));
        cfg.service(CheckoutRoute::<MockShopDb>::new()).app_data(web::Data::new(OrderFlowApi::new(db)));
    }
    let body = checkout_body("no-such-shop", "mtn-1gb", "0551234567");
    let (status, body) = post_request("/checkout", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("No shop exists at 'no-such-shop'"));
}

#[actix_web::test]
async fn checkout_at_pending_shop_is_forbidden() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_agent_by_slug().returning(|_| Ok(Some(test_agent(AgentStatus::Pending))));
        cfg.service(CheckoutRoute::<MockShopDb>::new()).app_data(web::Data::new(OrderFlowApi::new(db)));
    }
    let body = checkout_body("ama-data-hub-x1y2", "mtn-1gb", "0551234567");
    let (status, body) = post_request("/checkout", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("not open for sales"));
}

#[actix_web::test]
async fn checkout_for_unknown_package_is_404() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_agent_by_slug().returning(|_| Ok(Some(test_agent(AgentStatus::Activated))));
        db.expect_fetch_package().returning(|_| Ok(None));
        cfg.service(CheckoutRoute::<MockShopDb>::new()).app_data(web::Data::new(OrderFlowApi::new(db)));
    }
    let body = checkout_body("ama-data-hub-x1y2", "no-such-package", "0551234567");
    let (status, body) = post_request("/checkout", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("not available"));
}

#[actix_web::test]
async fn checkout_for_inactive_package_is_404() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_agent_by_slug().returning(|_| Ok(Some(test_agent(AgentStatus::Activated))));
        db.expect_fetch_package().returning(|_| {
            let mut p = test_package("mtn-1gb", 400);
            p.active = false;
            Ok(Some(p))
        });
        cfg.service(CheckoutRoute::<MockShopDb>::new()).app_data(web::Data::new(OrderFlowApi::new(db)));
    }
    let body = checkout_body("ama-data-hub-x1y2", "mtn-1gb", "0551234567");
    let (status, _) = post_request("/checkout", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// A mock with no expectations: the handler must bail out before touching the database.
fn configure_no_calls(cfg: &mut ServiceConfig) {
    let db = MockShopDb::new();
    cfg.service(CheckoutRoute::<MockShopDb>::new()).app_data(web::Data::new(OrderFlowApi::new(db)));
}
