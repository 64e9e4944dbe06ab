use super::client::InventoryClient;
use super::intent::{Intent, Outcome};
use super::message::{Completion, ControllerRequest, Response};
use crate::api::ProductApi;
use crate::catalog::{CatalogStore, ErrorKind, StockChange, StockReconcile};
use crate::edit::{CreateForm, EditSession, FieldEdit, FormStatus};
use crate::model::{Criteria, NewProduct, ProductId, StockPatch};
use crate::view::InventoryView;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// A reply that is sent only after the new view has been published.
type Reply = Option<(Response<Outcome>, Outcome)>;

/// A backend call that has been issued but not yet started.
type Call = Pin<Box<dyn Future<Output = ()> + Send>>;

/// The single owner of the catalog, the criteria, the edit session and the create form.
///
/// Messages are processed one at a time, so none of the state needs a lock. Network calls never
/// block the loop: each one runs in its own task and posts a [`Completion`] back into the same
/// channel, where it is reconciled like any other message. Calls start only after the view
/// carrying their optimistic change has been published.
///
/// The controller holds only a weak handle to its own channel. Once every
/// [`InventoryClient`] is dropped and no call is in flight, the channel closes and
/// [`run`](Self::run) returns.
pub struct InventoryController {
    receiver: mpsc::Receiver<ControllerRequest>,
    sender: mpsc::WeakSender<ControllerRequest>,
    publisher: watch::Sender<InventoryView>,
    store: CatalogStore,
    criteria: Criteria,
    session: EditSession,
    form: CreateForm,
    loads_in_flight: usize,
    outbox: Vec<Call>,
}

impl InventoryController {
    pub fn new(buffer_size: usize) -> (Self, InventoryClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (publisher, view) = watch::channel(InventoryView::default());
        let controller = Self {
            receiver,
            sender: sender.downgrade(),
            publisher,
            store: CatalogStore::new(),
            criteria: Criteria::default(),
            session: EditSession::new(),
            form: CreateForm::default(),
            loads_in_flight: 0,
            outbox: Vec::new(),
        };
        let client = InventoryClient::new(sender, view);
        (controller, client)
    }

    /// Runs the event loop until every client is gone and all calls have completed.
    ///
    /// The backing API is injected here rather than in [`new`](Self::new), so the client can be
    /// handed out before the transport exists.
    pub async fn run(mut self, api: Arc<dyn ProductApi>) {
        info!("Controller started");

        while let Some(msg) = self.receiver.recv().await {
            let reply = match msg {
                ControllerRequest::Dispatch { intent, respond_to } => {
                    self.handle_intent(intent, respond_to, &api)
                }
                ControllerRequest::Complete(completion) => self.handle_completion(completion),
            };

            self.publish();
            for call in self.outbox.drain(..) {
                tokio::spawn(call);
            }
            if let Some((respond_to, outcome)) = reply {
                let _ = respond_to.send(outcome);
            }
        }

        info!(size = self.store.len(), "Shutdown");
    }

    fn publish(&self) {
        self.publisher.send_replace(InventoryView::build(
            &self.store,
            &self.criteria,
            &self.session,
            &self.form,
            self.loads_in_flight > 0,
        ));
    }

    fn handle_intent(
        &mut self,
        intent: Intent,
        respond_to: Option<Response<Outcome>>,
        api: &Arc<dyn ProductApi>,
    ) -> Reply {
        debug!(intent = intent.name(), "Dispatch");
        match intent {
            Intent::Load => self.load(respond_to, api),
            Intent::Create(fields) => self.create(fields, respond_to, api),
            Intent::ChangeCreateField(edit) => {
                self.form.apply(edit);
                reply(respond_to, Outcome::Applied)
            }
            Intent::SetStock { id, stock } => self.update_stock(id, stock, respond_to, api),
            Intent::AdjustStock { id, delta } => {
                let Some(current) = self.store.get(&id).map(|product| product.stock) else {
                    warn!(%id, "Not found");
                    return reply(respond_to, Outcome::Ignored);
                };
                let proposed = i64::from(current).saturating_add(delta);
                self.update_stock(id, proposed, respond_to, api)
            }
            Intent::BeginEdit(id) => self.begin_edit(id, respond_to),
            Intent::ChangeEditField(edit) => self.change_edit_field(edit, respond_to),
            Intent::CommitEdit => self.commit_edit(respond_to, api),
            Intent::CancelEdit => {
                let outcome = match self.session.cancel() {
                    Some(draft) => {
                        debug!(id = %draft.id, "Edit cancelled");
                        Outcome::Applied
                    }
                    None => Outcome::Ignored,
                };
                reply(respond_to, outcome)
            }
            Intent::Delete(id) => self.delete(id, respond_to, api),
            Intent::SetSearch(query) => self.set_criteria(respond_to, |c| c.with_search(query)),
            Intent::SetStockFilter(filter) => {
                self.set_criteria(respond_to, |c| c.with_stock_filter(filter))
            }
            Intent::SetSort(sort) => self.set_criteria(respond_to, |c| c.with_sort(sort)),
        }
    }

    fn load(&mut self, respond_to: Option<Response<Outcome>>, api: &Arc<dyn ProductApi>) -> Reply {
        self.store.clear_error();
        self.loads_in_flight += 1;
        self.queue_call(api, move |api| async move {
            Completion::Loaded {
                result: api.list().await,
                respond_to,
            }
        });
        None
    }

    fn create(
        &mut self,
        fields: NewProduct,
        respond_to: Option<Response<Outcome>>,
        api: &Arc<dyn ProductApi>,
    ) -> Reply {
        let validated = fields.validate();
        self.form.submitted(fields);
        let payload = match validated {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "Create rejected");
                self.form.status = FormStatus::Invalid(e.clone());
                return reply(respond_to, Outcome::Rejected(e));
            }
        };

        self.form.status = FormStatus::Submitting;
        debug!(?payload, "Create");
        self.queue_call(api, move |api| async move {
            Completion::Created {
                result: api.create(payload).await,
                respond_to,
            }
        });
        None
    }

    fn update_stock(
        &mut self,
        id: ProductId,
        proposed: i64,
        respond_to: Option<Response<Outcome>>,
        api: &Arc<dyn ProductApi>,
    ) -> Reply {
        let ticket = match self.store.begin_stock_update(&id, proposed) {
            StockChange::Issued(ticket) => ticket,
            StockChange::Unchanged => {
                debug!(%id, proposed, "Stock unchanged");
                return reply(respond_to, Outcome::Ignored);
            }
            StockChange::Unknown => {
                warn!(%id, "Not found");
                return reply(respond_to, Outcome::Ignored);
            }
        };

        debug!(%id, rev = ticket.rev, stock = ticket.stock, "Stock update issued");
        self.queue_call(api, move |api| async move {
            let result = api
                .update_stock(id.clone(), StockPatch { stock: ticket.stock })
                .await;
            Completion::StockUpdated {
                id,
                ticket,
                result,
                respond_to,
            }
        });
        None
    }

    fn begin_edit(&mut self, id: ProductId, respond_to: Option<Response<Outcome>>) -> Reply {
        let Some(product) = self.store.get(&id) else {
            warn!(%id, "Not found");
            return reply(respond_to, Outcome::Ignored);
        };
        if let Some(previous) = self.session.begin(product) {
            debug!(previous = %previous.id, "Draft discarded");
        }
        debug!(%id, "Edit started");
        reply(respond_to, Outcome::Applied)
    }

    fn change_edit_field(
        &mut self,
        edit: FieldEdit,
        respond_to: Option<Response<Outcome>>,
    ) -> Reply {
        let outcome = match self.session.update_field(edit) {
            Ok(()) => Outcome::Applied,
            Err(e) => Outcome::Rejected(e),
        };
        reply(respond_to, outcome)
    }

    fn commit_edit(
        &mut self,
        respond_to: Option<Response<Outcome>>,
        api: &Arc<dyn ProductApi>,
    ) -> Reply {
        let pending = match self.session.prepare_commit() {
            Ok(pending) => pending,
            Err(e) => {
                debug!(error = %e, "Commit rejected");
                return reply(respond_to, Outcome::Rejected(e));
            }
        };

        debug!(id = %pending.product.id, generation = pending.generation, "Commit");
        self.queue_call(api, move |api| async move {
            let result = api.update(pending.product.clone()).await;
            Completion::Updated {
                generation: pending.generation,
                committed: pending.product,
                result,
                respond_to,
            }
        });
        None
    }

    fn delete(
        &mut self,
        id: ProductId,
        respond_to: Option<Response<Outcome>>,
        api: &Arc<dyn ProductApi>,
    ) -> Reply {
        if self.store.get(&id).is_none() {
            warn!(%id, "Not found");
            return reply(respond_to, Outcome::Ignored);
        }
        debug!(%id, "Delete");
        self.queue_call(api, move |api| async move {
            let result = api.delete(id.clone()).await;
            Completion::Deleted {
                id,
                result,
                respond_to,
            }
        });
        None
    }

    fn set_criteria(
        &mut self,
        respond_to: Option<Response<Outcome>>,
        change: impl FnOnce(Criteria) -> Criteria,
    ) -> Reply {
        self.criteria = change(std::mem::take(&mut self.criteria));
        reply(respond_to, Outcome::Applied)
    }

    fn handle_completion(&mut self, completion: Completion) -> Reply {
        match completion {
            Completion::Loaded { result, respond_to } => {
                self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
                let outcome = match result {
                    Ok(products) => {
                        self.store.replace(products);
                        info!(size = self.store.len(), "Loaded");
                        Outcome::Applied
                    }
                    Err(e) => self.fail(ErrorKind::FetchFailed, &e),
                };
                reply(respond_to, outcome)
            }
            Completion::Created { result, respond_to } => {
                let outcome = match result {
                    Ok(product) => {
                        let name = product.name.clone();
                        info!(id = %product.id, "Created");
                        self.store.apply_create(product);
                        self.form.created(name);
                        Outcome::Applied
                    }
                    Err(e) => {
                        self.form.status = FormStatus::Failed;
                        self.fail(ErrorKind::CreateFailed, &e)
                    }
                };
                reply(respond_to, outcome)
            }
            Completion::StockUpdated {
                id,
                ticket,
                result,
                respond_to,
            } => {
                if let Err(e) = &result {
                    warn!(%id, rev = ticket.rev, error = %e, "Stock update failed");
                }
                let outcome = match self.store.finish_stock_update(&id, ticket, result.is_ok()) {
                    StockReconcile::Confirmed => {
                        info!(%id, rev = ticket.rev, stock = ticket.stock, "Stock updated");
                        Outcome::Applied
                    }
                    StockReconcile::RolledBack { to } => {
                        warn!(%id, rev = ticket.rev, stock = to, "Rolled back");
                        Outcome::Failed(ErrorKind::UpdateFailed)
                    }
                    StockReconcile::Superseded | StockReconcile::Detached if result.is_err() => {
                        Outcome::Failed(ErrorKind::UpdateFailed)
                    }
                    StockReconcile::Superseded | StockReconcile::Detached => {
                        debug!(%id, rev = ticket.rev, "Stale completion");
                        Outcome::Ignored
                    }
                };
                reply(respond_to, outcome)
            }
            Completion::Updated {
                generation,
                committed,
                result,
                respond_to,
            } => {
                let outcome = match result {
                    Ok(body) => {
                        let product = match body {
                            Some(product) if product.id == committed.id => product,
                            _ => committed,
                        };
                        let id = product.id.clone();
                        if self.store.apply_full_update(product) {
                            info!(%id, "Updated");
                        } else {
                            warn!(%id, "Updated product no longer in catalog");
                        }
                        self.session.finish_commit(generation, true);
                        Outcome::Applied
                    }
                    Err(e) => {
                        self.session.finish_commit(generation, false);
                        self.fail(ErrorKind::UpdateFailed, &e)
                    }
                };
                reply(respond_to, outcome)
            }
            Completion::Deleted {
                id,
                result,
                respond_to,
            } => {
                let outcome = match result {
                    Ok(message) => {
                        if self.store.apply_delete(&id) {
                            info!(%id, ?message, size = self.store.len(), "Deleted");
                            Outcome::Applied
                        } else {
                            debug!(%id, "Already removed");
                            Outcome::Ignored
                        }
                    }
                    Err(e) => self.fail(ErrorKind::DeleteFailed, &e),
                };
                reply(respond_to, outcome)
            }
        }
    }

    fn fail(&mut self, kind: ErrorKind, error: &dyn std::fmt::Display) -> Outcome {
        warn!(%kind, error = %error, "Call failed");
        self.store.set_error(kind);
        Outcome::Failed(kind)
    }

    /// Queues `call` to run on its own task and feed its completion back into the loop.
    fn queue_call<F, Fut>(&mut self, api: &Arc<dyn ProductApi>, call: F)
    where
        F: FnOnce(Arc<dyn ProductApi>) -> Fut,
        Fut: Future<Output = Completion> + Send + 'static,
    {
        let Some(sender) = self.sender.upgrade() else {
            debug!("No clients left, call skipped");
            return;
        };
        let pending = call(api.clone());
        self.outbox.push(Box::pin(async move {
            let completion = pending.await;
            if sender
                .send(ControllerRequest::Complete(completion))
                .await
                .is_err()
            {
                debug!("Controller gone, completion dropped");
            }
        }));
    }
}

fn reply(respond_to: Option<Response<Outcome>>, outcome: Outcome) -> Reply {
    respond_to.map(|respond_to| (respond_to, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::api::ApiError;
    use crate::catalog::ValidationError;
    use crate::model::{Product, SortOption, StockFilter};

    fn start(api: MockApi) -> InventoryClient {
        let (controller, client) = InventoryController::new(8);
        tokio::spawn(controller.run(Arc::new(api)));
        client
    }

    #[tokio::test]
    async fn test_load_then_filter() {
        let api = MockApi::new();
        api.expect_list().return_ok(vec![
            Product::new("a", "Widget", 0, "Zio"),
            Product::new("b", "Gadget", 3, "Clicks"),
        ]);
        let client = start(api.clone());

        assert_eq!(client.dispatch(Intent::Load).await.unwrap(), Outcome::Applied);
        client
            .dispatch(Intent::SetStockFilter(StockFilter::InStock))
            .await
            .unwrap();
        client
            .dispatch(Intent::SetSort(SortOption::HighStock))
            .await
            .unwrap();

        let view = client.view();
        assert_eq!(view.stats.total_products, 2);
        assert_eq!(view.stats.total_stock, 3);
        assert_eq!(view.visible.len(), 1);
        assert_eq!(view.visible[0].name, "Gadget");
        assert!(!view.loading);
        api.verify();
    }

    #[tokio::test]
    async fn test_failed_load_sets_error_and_keeps_snapshot() {
        let api = MockApi::new();
        api.expect_list()
            .return_ok(vec![Product::new("a", "Widget", 1, "Zio")]);
        api.expect_list()
            .return_err(ApiError::Unavailable("down".into()));
        let client = start(api.clone());

        client.dispatch(Intent::Load).await.unwrap();
        assert_eq!(
            client.dispatch(Intent::Load).await.unwrap(),
            Outcome::Failed(ErrorKind::FetchFailed)
        );

        let view = client.view();
        assert_eq!(view.products.len(), 1);
        assert_eq!(view.error_message(), Some("Error fetching products"));
        api.verify();
    }

    #[tokio::test]
    async fn test_unknown_ids_are_ignored_without_calls() {
        let api = MockApi::new();
        let client = start(api.clone());

        for intent in [
            Intent::SetStock {
                id: "x".into(),
                stock: 3,
            },
            Intent::BeginEdit("x".into()),
            Intent::Delete("x".into()),
            Intent::CancelEdit,
        ] {
            assert_eq!(client.dispatch(intent).await.unwrap(), Outcome::Ignored);
        }
        assert_eq!(
            client.dispatch(Intent::CommitEdit).await.unwrap(),
            Outcome::Rejected(ValidationError::NoDraft)
        );
        assert!(api.calls().is_empty());
    }
}
