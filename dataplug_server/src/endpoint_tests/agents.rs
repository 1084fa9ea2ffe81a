use actix_web::{http::StatusCode, web, web::ServiceConfig};
use dataplug_engine::{db_types::AgentStatus, AgentApi, CatalogApi};
use serde_json::json;

use super::{
    helpers::{get_request, get_request_with_auth, post_request, put_request},
    mocks::{test_agent, test_package, MockShopDb},
};
use crate::agent_routes::{MyAccountRoute, PackagesRoute, RegisterAgentRoute, ShopProfileRoute, UpdatePricingRoute};

#[actix_web::test]
async fn register_creates_a_pending_agent() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_insert_agent().returning(|_| Ok(test_agent(AgentStatus::Pending)));
        cfg.service(RegisterAgentRoute::<MockShopDb>::new()).app_data(web::Data::new(AgentApi::new(db)));
    }
    let body = json!({
        "auth_uid": "uid-1",
        "email": "ama@example.com",
        "name": "Ama Mensah",
        "business_name": "Ama Data Hub",
        "phone": "0244000001"
    });
    let (status, body) = post_request("/agents/register", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.contains("\"status\":\"PENDING\""));
    assert!(body.contains("\"slug\":\"ama-data-hub-x1y2\""));
}

#[actix_web::test]
async fn register_rejects_invalid_email() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        cfg.service(RegisterAgentRoute::<MockShopDb>::new())
            .app_data(web::Data::new(AgentApi::new(MockShopDb::new())));
    }
    let body = json!({
        "auth_uid": "uid-1",
        "email": "not-an-email",
        "name": "Ama Mensah",
        "business_name": "Ama Data Hub",
        "phone": "0244000001"
    });
    let (status, body) = post_request("/agents/register", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("valid email"));
}

#[actix_web::test]
async fn account_endpoints_require_auth_header() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        cfg.service(MyAccountRoute::<MockShopDb>::new()).app_data(web::Data::new(AgentApi::new(MockShopDb::new())));
    }
    let (status, body) = get_request("/agents/me", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("auth identifier"));
}

#[actix_web::test]
async fn my_account_returns_summary_in_ghs() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_agent_by_auth_uid().returning(|_| {
            let mut agent = test_agent(AgentStatus::Activated);
            agent.total_earned = dp_common::Cedis::from(1250);
            agent.balance = dp_common::Cedis::from(1250);
            agent.total_orders = 7;
            Ok(Some(agent))
        });
        cfg.service(MyAccountRoute::<MockShopDb>::new()).app_data(web::Data::new(AgentApi::new(db)));
    }
    let (status, body) = get_request_with_auth("/agents/me", "uid-1", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"total_earned\":12.5"));
    assert!(body.contains("\"total_orders\":7"));
}

#[actix_web::test]
async fn pricing_below_the_floor_is_rejected() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_agent_by_auth_uid().returning(|_| Ok(Some(test_agent(AgentStatus::Activated))));
        db.expect_fetch_package().returning(|_| Ok(Some(test_package("mtn-1gb", 400))));
        // No expect_update_price_overrides: the handler must reject before writing anything.
        cfg.service(UpdatePricingRoute::<MockShopDb>::new()).app_data(web::Data::new(AgentApi::new(db)));
    }
    let body = json!({ "prices": { "mtn-1gb": 3.0 } });
    let (status, body) = put_request("/agents/me/pricing", "uid-1", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("below the minimum"));
}

#[actix_web::test]
async fn pricing_rejects_negative_prices() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        cfg.service(UpdatePricingRoute::<MockShopDb>::new())
            .app_data(web::Data::new(AgentApi::new(MockShopDb::new())));
    }
    let body = json!({ "prices": { "mtn-1gb": -1.0 } });
    let (status, body) = put_request("/agents/me/pricing", "uid-1", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("mtn-1gb"));
}

#[actix_web::test]
async fn pricing_from_pending_agents_is_forbidden() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_agent_by_auth_uid().returning(|_| Ok(Some(test_agent(AgentStatus::Pending))));
        cfg.service(UpdatePricingRoute::<MockShopDb>::new()).app_data(web::Data::new(AgentApi::new(db)));
    }
    let body = json!({ "prices": { "mtn-1gb": 6.0 } });
    let (status, _) = put_request("/agents/me/pricing", "uid-1", body, configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn shop_profile_shows_effective_prices() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_agent_by_slug().returning(|_| {
            let mut agent = test_agent(AgentStatus::Activated);
            agent.price_overrides.insert("mtn-1gb".to_string(), dp_common::Cedis::from(600));
            Ok(Some(agent))
        });
        db.expect_fetch_active_packages()
            .returning(|| Ok(vec![test_package("mtn-1gb", 400), test_package("mtn-2gb", 750)]));
        cfg.service(ShopProfileRoute::<MockShopDb>::new()).app_data(web::Data::new(AgentApi::new(db)));
    }
    let (status, body) = get_request("/shops/ama-data-hub-x1y2", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"business_name\":\"Ama Data Hub\""));
    // Overridden package at GH₵6.00; the untouched one at its base price
    assert!(body.contains("\"price\":6.0"));
    assert!(body.contains("\"price\":7.5"));
}

#[actix_web::test]
async fn shop_profile_for_unknown_slug_is_404() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_agent_by_slug().returning(|_| Ok(None));
        cfg.service(ShopProfileRoute::<MockShopDb>::new()).app_data(web::Data::new(AgentApi::new(db)));
    }
    let (status, _) = get_request("/shops/ghost-shop", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn catalog_lists_base_prices() {
    let _ = env_logger::try_init().ok();
    fn configure(cfg: &mut ServiceConfig) {
        let mut db = MockShopDb::new();
        db.expect_fetch_active_packages()
            .returning(|| Ok(vec![test_package("mtn-1gb", 400), test_package("mtn-2gb", 750)]));
        cfg.service(PackagesRoute::<MockShopDb>::new()).app_data(web::Data::new(CatalogApi::new(db)));
    }
    let (status, body) = get_request("/packages", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"price\":4.0"));
    assert!(body.contains("\"price\":7.5"));
}
