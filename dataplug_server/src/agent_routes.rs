//! Agent-facing and public catalog route handlers.
//!
//! Agent identity rides in the `dpg-auth-uid` header, which the deployment's auth proxy verifies and injects
//! upstream of this server. The handlers here trust it and nothing else.
use actix_web::{web, HttpRequest, HttpResponse};
use dataplug_engine::{
    db_types::TransactionPurpose,
    traits::{CatalogManagement, StorefrontDatabase},
    AgentApi,
    CatalogApi,
    NewAgentRequest,
    ShopPackage,
};
use dp_common::{Cedis, GHS_CURRENCY_CODE};
use log::*;
use paystack_tools::{ChargeMetadata, InitializeTransactionRequest, PaystackApi};

use crate::{
    config::ServerConfig,
    data_objects::{ActivationInitResponse, AgentAccountSummary, PricingUpdateRequest},
    errors::ServerError,
    route,
};

pub const AUTH_UID_HEADER: &str = "dpg-auth-uid";

fn auth_uid(req: &HttpRequest) -> Result<String, ServerError> {
    req.headers()
        .get(AUTH_UID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .ok_or(ServerError::MissingAuthId)
}

//----------------------------------------------   Registration  ----------------------------------------------------
route!(register_agent => Post "/agents/register" impl StorefrontDatabase);
/// Registers a new agent. The account starts out `PENDING`; the shop only goes live once the activation fee has
/// been paid.
pub async fn register_agent<B: StorefrontDatabase>(
    body: web::Json<NewAgentRequest>,
    api: web::Data<AgentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let agent = api.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(AgentAccountSummary::from(&agent)))
}

//----------------------------------------------   Account  ----------------------------------------------------
route!(my_account => Get "/agents/me" impl StorefrontDatabase);
pub async fn my_account<B: StorefrontDatabase>(
    req: HttpRequest,
    api: web::Data<AgentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let uid = auth_uid(&req)?;
    let agent = api.agent_by_auth_uid(&uid).await?;
    Ok(HttpResponse::Ok().json(AgentAccountSummary::from(&agent)))
}

route!(my_orders => Get "/agents/me/orders" impl StorefrontDatabase);
pub async fn my_orders<B: StorefrontDatabase>(
    req: HttpRequest,
    api: web::Data<AgentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let uid = auth_uid(&req)?;
    let orders = api.orders(&uid).await?;
    Ok(HttpResponse::Ok().json(orders))
}

//----------------------------------------------   Activation  ----------------------------------------------------
route!(init_activation => Post "/agents/activate" impl StorefrontDatabase);
/// Starts the activation payment for a pending agent and returns where to pay. The account flips to `ACTIVATED`
/// when the payment is verified, not here.
pub async fn init_activation<B: StorefrontDatabase>(
    req: HttpRequest,
    api: web::Data<AgentApi<B>>,
    paystack: web::Data<PaystackApi>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    let uid = auth_uid(&req)?;
    let (agent, transaction) = api.init_activation(&uid, config.activation_fee).await?;
    let reference = transaction.reference.clone();
    let init = InitializeTransactionRequest {
        email: agent.email.clone(),
        amount: transaction.amount.value(),
        currency: GHS_CURRENCY_CODE.to_string(),
        reference: reference.clone(),
        callback_url: Some(format!("{}/payments/callback", config.base_url)),
        metadata: ChargeMetadata {
            purpose: TransactionPurpose::Activation.to_string(),
            order_id: None,
            agent_slug: Some(agent.slug.clone()),
        },
    };
    let auth = match paystack.initialize_transaction(init).await {
        Ok(auth) => auth,
        Err(e) => {
            warn!("💳️ Could not initialize activation payment for {reference}: {e}");
            if let Err(e2) = api.fail_activation(&reference).await {
                error!("💻️ Could not mark activation payment as failed: {e2}");
            }
            return Err(ServerError::PaymentGatewayError(e.to_string()));
        },
    };
    let response = ActivationInitResponse {
        reference,
        amount: transaction.amount.to_ghs(),
        authorization_url: auth.authorization_url,
        access_code: auth.access_code,
    };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Pricing  ----------------------------------------------------
route!(update_pricing => Put "/agents/me/pricing" impl StorefrontDatabase);
/// Replaces the agent's shop prices. Prices arrive in GHS; every one is checked against the catalog floor
/// before anything is stored, so a rejected update leaves the shop exactly as it was.
pub async fn update_pricing<B: StorefrontDatabase>(
    req: HttpRequest,
    body: web::Json<PricingUpdateRequest>,
    api: web::Data<AgentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let uid = auth_uid(&req)?;
    let mut prices = std::collections::BTreeMap::new();
    for (package_id, ghs) in body.into_inner().prices {
        let price = Cedis::from_ghs(ghs)
            .map_err(|e| ServerError::InvalidRequestBody(format!("Price for '{package_id}': {e}")))?;
        prices.insert(package_id, price);
    }
    let agent = api.set_prices(&uid, prices).await?;
    info!("💻️ Agent '{}' saved {} price override(s)", agent.slug, agent.price_overrides.len());
    Ok(HttpResponse::Ok().json(AgentAccountSummary::from(&agent)))
}

//----------------------------------------------   Shops  ----------------------------------------------------
route!(shop_profile => Get "/shops/{slug}" impl StorefrontDatabase);
/// The public shop page data: the storefront identity and the catalog at the shop's prices.
pub async fn shop_profile<B: StorefrontDatabase>(
    path: web::Path<String>,
    api: web::Data<AgentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let slug = path.into_inner();
    let profile = api
        .shop_profile(&slug)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No shop exists at '{slug}'.")))?;
    Ok(HttpResponse::Ok().json(profile))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(packages => Get "/packages" impl CatalogManagement);
/// The shared catalog at base prices, for the registration and pricing screens.
pub async fn packages<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let packages =
        api.active_packages().await?.iter().map(|p| ShopPackage::from_package(p, None)).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(packages))
}
