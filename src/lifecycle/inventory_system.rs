use crate::api::ProductApi;
use crate::controller::{InventoryClient, InventoryController};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Owns the running controller task and the client used to reach it.
///
/// # Example
///
/// ```ignore
/// let config = InventoryConfig::from_env()?;
/// let api = HttpProductApi::new(&config)?;
/// let system = InventorySystem::new(Arc::new(api), config.channel_capacity);
///
/// system.client.load().await?;
/// println!("{} products", system.client.view().stats.total_products);
///
/// system.shutdown().await?;
/// ```
pub struct InventorySystem {
    /// Client for dispatching intents and reading the view. Clone it freely.
    pub client: InventoryClient,

    handle: JoinHandle<()>,
}

impl InventorySystem {
    /// Spawns the controller on the current Tokio runtime.
    pub fn new(api: Arc<dyn ProductApi>, capacity: usize) -> Self {
        let (controller, client) = InventoryController::new(capacity);
        let handle = tokio::spawn(controller.run(api));
        Self { client, handle }
    }

    /// Drops the client and waits for the controller to drain.
    ///
    /// Calls still in flight are reconciled before the task exits. Clones of the client held
    /// elsewhere keep the controller alive, so drop them first.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down inventory controller...");
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!("Controller task failed: {:?}", e);
            return Err(e);
        }

        info!("Shutdown complete.");
        Ok(())
    }
}
