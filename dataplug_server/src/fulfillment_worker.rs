use dataplug_engine::{db_types::Order, traits::ProviderFulfillment, OrderFlowApi, SqliteDatabase};
use datamart_tools::{DataMartApi, DataMartApiError, NewDataMartOrder};
use log::*;
use tokio::task::JoinHandle;

/// Submits an order to DataMart at the wholesale (base) price and maps the provider's answer into the
/// identifiers the settlement records.
pub async fn forward_to_datamart(
    api: &DataMartApi,
    order: &Order,
) -> Result<ProviderFulfillment, DataMartApiError> {
    let request = NewDataMartOrder {
        network: order.network.clone(),
        phone_number: order.customer_phone.clone(),
        amount: order.base_price.to_ghs(),
        capacity: order.capacity.clone(),
        reference: order.order_id.to_string(),
    };
    let accepted = api.create_order(request).await?;
    Ok(ProviderFulfillment { provider_order_id: Some(accepted.id), provider_status: accepted.status })
}

/// Starts the fulfillment retry worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Every `interval_secs` the worker sweeps up orders that were paid but never accepted by the provider, retries
/// the provider call, and settles those that go through. Orders that fail again simply wait for the next sweep.
pub fn start_fulfillment_worker(
    db: SqliteDatabase,
    datamart: DataMartApi,
    interval_secs: u64,
    batch_size: i64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        let api = OrderFlowApi::new(db);
        info!("🕰️ Fulfillment retry worker started (every {interval_secs}s, batches of {batch_size})");
        loop {
            timer.tick().await;
            let waiting = match api.orders_awaiting_fulfillment(batch_size).await {
                Ok(orders) => orders,
                Err(e) => {
                    error!("🕰️ Could not fetch orders awaiting fulfillment: {e}");
                    continue;
                },
            };
            if waiting.is_empty() {
                continue;
            }
            info!("🕰️ Retrying fulfillment for {} order(s)", waiting.len());
            for order in waiting {
                let reference = match api.transaction_for_order(&order).await {
                    Ok(Some(tx)) => tx.reference,
                    Ok(None) => {
                        error!("🕰️ Order [{}] has no payment transaction. Skipping.", order.order_id);
                        continue;
                    },
                    Err(e) => {
                        error!("🕰️ Could not load transaction for order [{}]: {e}", order.order_id);
                        continue;
                    },
                };
                match forward_to_datamart(&datamart, &order).await {
                    Ok(fulfillment) => match api.confirm_and_settle(&reference, fulfillment).await {
                        Ok(outcome) if outcome.is_settled() => {
                            info!("🕰️ Order [{}] fulfilled on retry and settled", order.order_id);
                        },
                        Ok(_) => {
                            debug!("🕰️ Order [{}] was already settled elsewhere", order.order_id);
                        },
                        Err(e) => {
                            error!("🕰️ Fulfilled order [{}] but could not settle it: {e}", order.order_id);
                        },
                    },
                    Err(e) => {
                        warn!("🕰️ Fulfillment retry for order [{}] failed: {e}", order.order_id);
                    },
                }
            }
        }
    })
}
