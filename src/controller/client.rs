use super::error::ControllerError;
use super::intent::{Intent, Outcome};
use super::message::ControllerRequest;
use crate::edit::FieldEdit;
use crate::model::{NewProduct, ProductId, SortOption, StockFilter};
use crate::view::InventoryView;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

/// Handle for talking to an [`InventoryController`](super::InventoryController).
///
/// Cloning is cheap. The controller keeps running for as long as one clone is alive.
#[derive(Clone)]
pub struct InventoryClient {
    sender: mpsc::Sender<ControllerRequest>,
    view: watch::Receiver<InventoryView>,
}

impl InventoryClient {
    pub(crate) fn new(
        sender: mpsc::Sender<ControllerRequest>,
        view: watch::Receiver<InventoryView>,
    ) -> Self {
        Self { sender, view }
    }

    /// Sends `intent` and waits until it has been fully reconciled, including its network call.
    pub async fn dispatch(&self, intent: Intent) -> Result<Outcome, ControllerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ControllerRequest::Dispatch {
                intent,
                respond_to: Some(respond_to),
            })
            .await
            .map_err(|_| ControllerError::Closed)?;
        response.await.map_err(|_| ControllerError::Dropped)
    }

    /// Enqueues `intent` without waiting for its outcome.
    pub async fn send(&self, intent: Intent) -> Result<(), ControllerError> {
        self.sender
            .send(ControllerRequest::Dispatch {
                intent,
                respond_to: None,
            })
            .await
            .map_err(|_| ControllerError::Closed)
    }

    /// The most recently published view.
    pub fn view(&self) -> InventoryView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InventoryView> {
        self.view.clone()
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Outcome, ControllerError> {
        debug!("Sending request");
        self.dispatch(Intent::Load).await
    }

    #[instrument(skip(self))]
    pub async fn create(&self, product: NewProduct) -> Result<Outcome, ControllerError> {
        debug!("Sending request");
        self.dispatch(Intent::Create(product)).await
    }

    #[instrument(skip(self))]
    pub async fn change_create_field(&self, edit: FieldEdit) -> Result<Outcome, ControllerError> {
        self.dispatch(Intent::ChangeCreateField(edit)).await
    }

    #[instrument(skip(self))]
    pub async fn set_stock(&self, id: ProductId, stock: i64) -> Result<Outcome, ControllerError> {
        debug!("Sending request");
        self.dispatch(Intent::SetStock { id, stock }).await
    }

    #[instrument(skip(self))]
    pub async fn increment(&self, id: ProductId) -> Result<Outcome, ControllerError> {
        self.dispatch(Intent::AdjustStock { id, delta: 1 }).await
    }

    #[instrument(skip(self))]
    pub async fn decrement(&self, id: ProductId) -> Result<Outcome, ControllerError> {
        self.dispatch(Intent::AdjustStock { id, delta: -1 }).await
    }

    #[instrument(skip(self))]
    pub async fn begin_edit(&self, id: ProductId) -> Result<Outcome, ControllerError> {
        self.dispatch(Intent::BeginEdit(id)).await
    }

    #[instrument(skip(self))]
    pub async fn change_edit_field(&self, edit: FieldEdit) -> Result<Outcome, ControllerError> {
        self.dispatch(Intent::ChangeEditField(edit)).await
    }

    #[instrument(skip(self))]
    pub async fn commit_edit(&self) -> Result<Outcome, ControllerError> {
        debug!("Sending request");
        self.dispatch(Intent::CommitEdit).await
    }

    #[instrument(skip(self))]
    pub async fn cancel_edit(&self) -> Result<Outcome, ControllerError> {
        self.dispatch(Intent::CancelEdit).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<Outcome, ControllerError> {
        debug!("Sending request");
        self.dispatch(Intent::Delete(id)).await
    }

    #[instrument(skip(self))]
    pub async fn set_search(&self, query: String) -> Result<Outcome, ControllerError> {
        self.dispatch(Intent::SetSearch(query)).await
    }

    #[instrument(skip(self))]
    pub async fn set_stock_filter(&self, filter: StockFilter) -> Result<Outcome, ControllerError> {
        self.dispatch(Intent::SetStockFilter(filter)).await
    }

    #[instrument(skip(self))]
    pub async fn set_sort(&self, sort: SortOption) -> Result<Outcome, ControllerError> {
        self.dispatch(Intent::SetSort(sort)).await
    }
}
