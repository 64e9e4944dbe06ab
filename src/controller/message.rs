//! Messages processed by the controller loop.
//!
//! Clients send [`ControllerRequest::Dispatch`]. Network tasks spawned by the controller send
//! [`ControllerRequest::Complete`] when their call returns; the responder of the originating
//! dispatch rides along so the caller is answered only after reconciliation.

use super::intent::{Intent, Outcome};
use crate::api::ApiResult;
use crate::catalog::StockTicket;
use crate::model::{Product, ProductId};
use tokio::sync::oneshot;

/// Type alias for the one-shot channel that answers a dispatch.
pub type Response<T> = oneshot::Sender<T>;

#[derive(Debug)]
pub enum ControllerRequest {
    Dispatch {
        intent: Intent,
        respond_to: Option<Response<Outcome>>,
    },
    Complete(Completion),
}

/// The result of one network call, tagged with what is needed to reconcile it.
#[derive(Debug)]
pub enum Completion {
    Loaded {
        result: ApiResult<Vec<Product>>,
        respond_to: Option<Response<Outcome>>,
    },
    Created {
        result: ApiResult<Product>,
        respond_to: Option<Response<Outcome>>,
    },
    StockUpdated {
        id: ProductId,
        ticket: StockTicket,
        result: ApiResult<Option<Product>>,
        respond_to: Option<Response<Outcome>>,
    },
    Updated {
        generation: u64,
        committed: Product,
        result: ApiResult<Option<Product>>,
        respond_to: Option<Response<Outcome>>,
    },
    Deleted {
        id: ProductId,
        result: ApiResult<Option<String>>,
        respond_to: Option<Response<Outcome>>,
    },
}
