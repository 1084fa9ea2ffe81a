use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use datamart_tools::{DataMartApi, DataMartConfig};
use log::debug;
use paystack_tools::{PaystackApi, PaystackConfig};

use crate::config::ServerConfig;

/// Registers the app data every handler expects: the server config and the (never-invoked) gateway clients.
/// Tests that would actually reach a gateway are not written here; the clients exist only so extraction works.
fn base_app_data(cfg: &mut ServiceConfig) {
    let paystack = PaystackApi::new(PaystackConfig::default()).expect("paystack client");
    let datamart = DataMartApi::new(DataMartConfig::default()).expect("datamart client");
    cfg.app_data(web::Data::new(paystack))
        .app_data(web::Data::new(datamart))
        .app_data(web::Data::new(ServerConfig::default()));
}

async fn run_request(
    req: TestRequest,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let app = App::new().configure(base_app_data).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req.to_request()).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::get().uri(path), configure).await
}

pub async fn post_request(
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::post().uri(path).set_json(body), configure).await
}

pub async fn put_request(
    path: &str,
    auth_uid: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::put().uri(path).insert_header(("dpg-auth-uid", auth_uid)).set_json(body);
    run_request(req, configure).await
}

pub async fn get_request_with_auth(
    path: &str,
    auth_uid: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    run_request(TestRequest::get().uri(path).insert_header(("dpg-auth-uid", auth_uid)), configure).await
}
