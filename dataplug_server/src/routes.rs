//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. I/O, database operations,
//! etc.) should be expressed as futures or asynchronous functions.
use actix_web::{get, web, HttpResponse, Responder};
use dataplug_engine::{
    db_types::TransactionPurpose,
    traits::StorefrontDatabase,
    CheckoutRequest,
    OrderFlowApi,
    AgentApi,
};
use datamart_tools::DataMartApi;
use dp_common::GHS_CURRENCY_CODE;
use log::*;
use paystack_tools::{ChargeMetadata, InitializeTransactionRequest, PaystackApi};
use serde_json::Value;

use crate::{
    config::ServerConfig,
    data_objects::{CheckoutResponse, JsonResponse, PaymentStatusResponse},
    errors::ServerError,
    fulfillment_worker::forward_to_datamart,
    helpers::{email_or_placeholder, is_valid_msisdn},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(checkout => Post "/checkout" impl StorefrontDatabase);
/// Route handler for customer checkouts.
///
/// Creates the order and its payment transaction, then initializes the charge with the payment gateway and
/// returns the authorization URL the customer must visit to pay. The sale price comes from the shop's pricing,
/// never from the client.
///
/// If the gateway cannot be reached, the freshly created order is marked as failed and a 502 is returned, so no
/// order is left pointing at a payment that was never started.
pub async fn checkout<B: StorefrontDatabase>(
    body: web::Json<CheckoutRequest>,
    api: web::Data<OrderFlowApi<B>>,
    paystack: web::Data<PaystackApi>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    let phone = request.customer_phone.trim().to_string();
    if !is_valid_msisdn(&phone) {
        return Err(ServerError::InvalidRequestBody(format!("'{phone}' is not a valid mobile number")));
    }
    let shop_slug = request.agent_slug.clone();
    let pending = api.initiate_checkout(request).await?;
    let reference = pending.transaction.reference.clone();
    let init = InitializeTransactionRequest {
        email: email_or_placeholder(pending.order.customer_email.as_deref(), &phone),
        amount: pending.transaction.amount.value(),
        currency: GHS_CURRENCY_CODE.to_string(),
        reference: reference.clone(),
        callback_url: Some(format!("{}/payments/callback", config.base_url)),
        metadata: ChargeMetadata {
            purpose: TransactionPurpose::Order.to_string(),
            order_id: Some(pending.order.order_id.to_string()),
            agent_slug: Some(shop_slug),
        },
    };
    let auth = match paystack.initialize_transaction(init).await {
        Ok(auth) => auth,
        Err(e) => {
            warn!("💳️ Could not initialize payment for {reference}: {e}");
            if let Err(e2) = api.record_payment_failure(&reference).await {
                error!("🛒️ Could not mark order as failed after gateway error: {e2}");
            }
            return Err(ServerError::PaymentGatewayError(e.to_string()));
        },
    };
    let response = CheckoutResponse {
        order_id: pending.order.order_id.to_string(),
        reference,
        amount: pending.order.sale_price.to_ghs(),
        authorization_url: auth.authorization_url,
        access_code: auth.access_code,
    };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Verify  ----------------------------------------------------
route!(verify_payment => Get "/payments/verify/{reference}" impl StorefrontDatabase);
/// Route handler for payment verification.
///
/// The customer's browser lands here after the gateway redirect (and the webhook drives the same logic), so the
/// outcome recorded by this handler must be correct no matter how many times it runs. Terminal transactions
/// return the recorded outcome without consulting the gateway again.
pub async fn verify_payment<B: StorefrontDatabase>(
    path: web::Path<String>,
    orders: web::Data<OrderFlowApi<B>>,
    agents: web::Data<AgentApi<B>>,
    paystack: web::Data<PaystackApi>,
    datamart: web::Data<DataMartApi>,
) -> Result<HttpResponse, ServerError> {
    let reference = path.into_inner();
    let response =
        process_payment_by_reference(&reference, orders.as_ref(), agents.as_ref(), &paystack, &datamart).await?;
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Webhook  ----------------------------------------------------
route!(paystack_webhook => Post "/webhook/paystack" impl StorefrontDatabase);
/// Route handler for Paystack webhook events.
///
/// Only `charge.success` (and bare payloads carrying a reference) are acted on. The webhook and the browser
/// verify race each other by design; the settlement layer guarantees only one of them credits the commission.
pub async fn paystack_webhook<B: StorefrontDatabase>(
    body: web::Json<Value>,
    orders: web::Data<OrderFlowApi<B>>,
    agents: web::Data<AgentApi<B>>,
    paystack: web::Data<PaystackApi>,
    datamart: web::Data<DataMartApi>,
) -> Result<HttpResponse, ServerError> {
    let payload = body.into_inner();
    if let Some(event) = payload["event"].as_str() {
        if !event.starts_with("charge.") {
            debug!("💳️ Ignoring webhook event '{event}'");
            return Ok(HttpResponse::Ok().json(JsonResponse::success("Event ignored")));
        }
    }
    let reference = payload["data"]["reference"]
        .as_str()
        .or_else(|| payload["reference"].as_str())
        .ok_or_else(|| ServerError::InvalidRequestBody("No payment reference in webhook payload".to_string()))?
        .to_string();
    debug!("💳️ Webhook received for reference {reference}");
    match process_payment_by_reference(&reference, orders.as_ref(), agents.as_ref(), &paystack, &datamart).await {
        Ok(response) => Ok(HttpResponse::Ok().json(JsonResponse::success(response.message))),
        // Webhook deliveries are retried by the gateway. Respond 200 so a permanently failed payment does not
        // get redelivered forever; the failure is already recorded on our side.
        Err(ServerError::PaymentNotCompleted(m)) => Ok(HttpResponse::Ok().json(JsonResponse::failure(m))),
        Err(e) => Err(e),
    }
}

/// The single path that turns a gateway reference into a recorded outcome: verify with the gateway, then either
/// fail, fulfill-and-settle, or park the order; or activate the agent for activation payments.
pub async fn process_payment_by_reference<B: StorefrontDatabase>(
    reference: &str,
    orders: &OrderFlowApi<B>,
    agents: &AgentApi<B>,
    paystack: &PaystackApi,
    datamart: &DataMartApi,
) -> Result<PaymentStatusResponse, ServerError> {
    let transaction = orders
        .transaction_by_reference(reference)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Payment reference '{reference}'.")))?;
    if transaction.status.is_terminal() {
        debug!("💳️ Reference {reference} is already {}. Returning the recorded outcome.", transaction.status);
        let order = orders.order_for_transaction(&transaction).await?;
        let status = order.as_ref().map(|o| o.status.to_string()).unwrap_or_else(|| transaction.status.to_string());
        return Ok(PaymentStatusResponse {
            reference: reference.to_string(),
            purpose: transaction.purpose,
            status,
            message: "This payment has already been processed.".to_string(),
            order,
        });
    }
    let charge = paystack.verify_transaction(reference).await.map_err(|e| {
        warn!("💳️ Could not verify payment {reference}: {e}");
        ServerError::PaymentGatewayError(e.to_string())
    })?;
    match transaction.purpose {
        TransactionPurpose::Activation => {
            if charge.status.is_success() {
                let agent = agents.complete_activation(reference).await?;
                Ok(PaymentStatusResponse {
                    reference: reference.to_string(),
                    purpose: transaction.purpose,
                    status: agent.status.to_string(),
                    message: format!("Account activated. Your shop is live at /shops/{}", agent.slug),
                    order: None,
                })
            } else {
                agents.fail_activation(reference).await?;
                Err(ServerError::PaymentNotCompleted("The activation payment was not successful.".to_string()))
            }
        },
        TransactionPurpose::Order => {
            if !charge.status.is_success() {
                orders.record_payment_failure(reference).await?;
                return Err(ServerError::PaymentNotCompleted("The payment was not successful.".to_string()));
            }
            let order = orders
                .order_for_transaction(&transaction)
                .await?
                .ok_or_else(|| ServerError::NoRecordFound(format!("Order for reference '{reference}'.")))?;
            match forward_to_datamart(datamart, &order).await {
                Ok(fulfillment) => {
                    let outcome = orders.confirm_and_settle(reference, fulfillment).await?;
                    let order = outcome.order().clone();
                    Ok(PaymentStatusResponse {
                        reference: reference.to_string(),
                        purpose: transaction.purpose,
                        status: order.status.to_string(),
                        message: format!("{} is on its way to {}", order.package_name, order.customer_phone),
                        order: Some(order),
                    })
                },
                Err(e) => {
                    warn!("📡️ Fulfillment for order [{}] failed: {e}. Parking the order.", order.order_id);
                    let order = orders.park_order(reference).await?;
                    Ok(PaymentStatusResponse {
                        reference: reference.to_string(),
                        purpose: transaction.purpose,
                        status: order.status.to_string(),
                        message: "Payment received. Your bundle is being processed.".to_string(),
                        order: Some(order),
                    })
                },
            }
        },
    }
}
