use inventory_view::api::HttpProductApi;
use inventory_view::config::InventoryConfig;
use inventory_view::controller::Outcome;
use inventory_view::lifecycle::{setup_tracing, InventorySystem};
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = InventoryConfig::from_env().map_err(|e| e.to_string())?;
    info!(api_url = %config.api_url, "Starting inventory view");

    let api = HttpProductApi::new(&config).map_err(|e| e.to_string())?;
    let system = InventorySystem::new(Arc::new(api), config.channel_capacity);

    let span = tracing::info_span!("initial_load");
    let outcome = async {
        info!("Loading catalog");
        system.client.load().await.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    let view = system.client.view();
    match outcome {
        Outcome::Applied => {
            info!(
                total_products = view.stats.total_products,
                total_stock = view.stats.total_stock,
                "Dashboard"
            );
            for product in view.visible.iter() {
                info!(
                    id = %product.id,
                    name = %product.name,
                    stock = %product.stock_label(),
                    where_to_buy = %product.where_to_buy_label(),
                    "Product"
                );
            }
        }
        Outcome::Failed(kind) => warn!(%kind, message = kind.message(), "Load failed"),
        other => warn!(?other, "Unexpected load outcome"),
    }

    if let Err(e) = system.shutdown().await {
        error!("Shutdown failed: {}", e);
        return Err(e.to_string());
    }
    Ok(())
}
