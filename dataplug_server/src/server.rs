use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use dataplug_engine::{run_migrations, AgentApi, CatalogApi, OrderFlowApi, SqliteDatabase};
use datamart_tools::DataMartApi;
use log::info;
use paystack_tools::PaystackApi;

use crate::{
    agent_routes::{
        InitActivationRoute,
        MyAccountRoute,
        MyOrdersRoute,
        PackagesRoute,
        RegisterAgentRoute,
        ShopProfileRoute,
        UpdatePricingRoute,
    },
    config::ServerConfig,
    errors::ServerError,
    fulfillment_worker::start_fulfillment_worker,
    routes::{health, CheckoutRoute, PaystackWebhookRoute, VerifyPaymentRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    run_migrations(db.pool()).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let datamart = DataMartApi::new(config.datamart.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let worker =
        start_fulfillment_worker(db.clone(), datamart.clone(), config.fulfillment_retry_secs, config.fulfillment_batch);
    let srv = create_server_instance(config, db)?;
    let result = srv.await.map_err(|e| ServerError::InitializeError(e.to_string()));
    worker.abort();
    result
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let paystack = PaystackApi::new(config.paystack.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let datamart = DataMartApi::new(config.datamart.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone());
        let agents_api = AgentApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("dpg::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(agents_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(paystack.clone()))
            .app_data(web::Data::new(datamart.clone()))
            .app_data(web::Data::new(config.clone()));
        let api_scope = web::scope("/api")
            .service(CheckoutRoute::<SqliteDatabase>::new())
            .service(VerifyPaymentRoute::<SqliteDatabase>::new())
            .service(RegisterAgentRoute::<SqliteDatabase>::new())
            .service(MyAccountRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(InitActivationRoute::<SqliteDatabase>::new())
            .service(UpdatePricingRoute::<SqliteDatabase>::new())
            .service(ShopProfileRoute::<SqliteDatabase>::new())
            .service(PackagesRoute::<SqliteDatabase>::new());
        app.service(health).service(api_scope).service(PaystackWebhookRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    info!("🚀️ DataPlug server listening on {host}:{port}");
    Ok(srv)
}
