//! # Test Doubles for the Collection API
//!
//! Two ways to stand in for the backend, both implementing [`ProductApi`]:
//!
//! | Feature | [`MockApi`] | [`channel_api`] |
//! |---------|-------------|-----------------|
//! | **Setup** | Queue responses up front | Answer each call as it arrives |
//! | **Completion order** | Call order | Chosen by the test |
//! | **Use Case** | Sequential flows, error injection | Races between in-flight calls |
//!
//! ## Fluent expectations
//!
//! ```rust
//! use inventory_view::api::mock::MockApi;
//! use inventory_view::api::{ApiError, ProductApi};
//! use inventory_view::model::Product;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockApi::new();
//!     mock.expect_list().return_ok(vec![Product::new("a", "Widget", 0, "Zio")]);
//!     mock.expect_delete("a").return_err(ApiError::Unavailable("down".into()));
//!
//!     assert_eq!(mock.list().await.unwrap().len(), 1);
//!     assert!(mock.delete("a".into()).await.is_err());
//!     mock.verify();
//! }
//! ```
//!
//! ## Answering by hand
//!
//! ```rust
//! use inventory_view::api::mock::{channel_api, expect_update_stock};
//! use inventory_view::api::ProductApi;
//! use inventory_view::model::StockPatch;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (api, mut calls) = channel_api(8);
//!     let call = tokio::spawn(async move { api.update_stock("a".into(), StockPatch { stock: 2 }).await });
//!
//!     let (id, patch, respond_to) = expect_update_stock(&mut calls).await.unwrap();
//!     assert_eq!((id.as_str(), patch.stock), ("a", 2));
//!     respond_to.send(Ok(None)).unwrap();
//!
//!     assert!(call.await.unwrap().is_ok());
//! }
//! ```

use super::{ApiError, ApiResult, ProductApi};
use crate::model::{Product, ProductCreate, ProductId, StockPatch};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};

/// A call as observed by a test double.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Create(ProductCreate),
    UpdateStock(ProductId, StockPatch),
    Update(Product),
    Delete(ProductId),
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation {
    List {
        response: ApiResult<Vec<Product>>,
    },
    Create {
        response: ApiResult<Product>,
    },
    UpdateStock {
        id: ProductId,
        response: ApiResult<Option<Product>>,
    },
    Update {
        id: ProductId,
        response: ApiResult<Option<Product>>,
    },
    Delete {
        id: ProductId,
        response: ApiResult<Option<String>>,
    },
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<ApiCall>,
    mismatches: Vec<String>,
}

/// A backend double that answers from a queue of expectations.
///
/// Calls that do not match the next expectation fail with [`ApiError::Unavailable`] and are
/// reported by [`MockApi::verify`].
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, expectation: Expectation) {
        self.lock().expectations.push_back(expectation);
    }

    pub fn expect_list(&self) -> ExpectationBuilder<'_, Vec<Product>> {
        ExpectationBuilder::new(self, |response| Expectation::List { response })
    }

    pub fn expect_create(&self) -> ExpectationBuilder<'_, Product> {
        ExpectationBuilder::new(self, |response| Expectation::Create { response })
    }

    pub fn expect_update_stock(
        &self,
        id: impl Into<ProductId>,
    ) -> ExpectationBuilder<'_, Option<Product>> {
        let id = id.into();
        ExpectationBuilder::new(self, move |response| Expectation::UpdateStock { id, response })
    }

    pub fn expect_update(&self, id: impl Into<ProductId>) -> ExpectationBuilder<'_, Option<Product>> {
        let id = id.into();
        ExpectationBuilder::new(self, move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&self, id: impl Into<ProductId>) -> ExpectationBuilder<'_, Option<String>> {
        let id = id.into();
        ExpectationBuilder::new(self, move |response| Expectation::Delete { id, response })
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Panics if an expectation was left unused or a call did not match.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.mismatches.is_empty() {
            panic!("Unexpected calls: {:?}", state.mismatches);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }

    fn answer<T>(
        &self,
        call: ApiCall,
        take: impl FnOnce(Expectation) -> Result<ApiResult<T>, Expectation>,
    ) -> ApiResult<T> {
        let mut state = self.lock();
        state.calls.push(call.clone());
        let Some(next) = state.expectations.pop_front() else {
            state.mismatches.push(format!("{:?} with no expectation left", call));
            return Err(ApiError::Unavailable("no expectation".to_string()));
        };
        match take(next) {
            Ok(response) => response,
            Err(unused) => {
                state.expectations.push_front(unused);
                state.mismatches.push(format!("{:?} did not match", call));
                Err(ApiError::Unavailable("unexpected call".to_string()))
            }
        }
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<'a, T> {
    mock: &'a MockApi,
    make: Box<dyn FnOnce(ApiResult<T>) -> Expectation + 'a>,
}

impl<'a, T> ExpectationBuilder<'a, T> {
    fn new(mock: &'a MockApi, make: impl FnOnce(ApiResult<T>) -> Expectation + 'a) -> Self {
        Self {
            mock,
            make: Box::new(make),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.mock.push((self.make)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ApiError) {
        self.mock.push((self.make)(Err(error)));
    }
}

#[async_trait]
impl ProductApi for MockApi {
    async fn list(&self) -> ApiResult<Vec<Product>> {
        self.answer(ApiCall::List, |next| match next {
            Expectation::List { response } => Ok(response),
            other => Err(other),
        })
    }

    async fn create(&self, product: ProductCreate) -> ApiResult<Product> {
        self.answer(ApiCall::Create(product), |next| match next {
            Expectation::Create { response } => Ok(response),
            other => Err(other),
        })
    }

    async fn update_stock(&self, id: ProductId, patch: StockPatch) -> ApiResult<Option<Product>> {
        let call = ApiCall::UpdateStock(id.clone(), patch);
        self.answer(call, |next| match next {
            Expectation::UpdateStock { id: expected, response } if expected == id => Ok(response),
            other => Err(other),
        })
    }

    async fn update(&self, product: Product) -> ApiResult<Option<Product>> {
        let id = product.id.clone();
        self.answer(ApiCall::Update(product), |next| match next {
            Expectation::Update { id: expected, response } if expected == id => Ok(response),
            other => Err(other),
        })
    }

    async fn delete(&self, id: ProductId) -> ApiResult<Option<String>> {
        let call = ApiCall::Delete(id.clone());
        self.answer(call, |next| match next {
            Expectation::Delete { id: expected, response } if expected == id => Ok(response),
            other => Err(other),
        })
    }
}

// =============================================================================
// CHANNEL-BACKED DOUBLE
// =============================================================================

/// One-shot reply channel for a call received through [`channel_api`].
pub type Responder<T> = oneshot::Sender<ApiResult<T>>;

/// A call waiting for the test to answer it.
#[derive(Debug)]
pub enum ApiRequest {
    List {
        respond_to: Responder<Vec<Product>>,
    },
    Create {
        product: ProductCreate,
        respond_to: Responder<Product>,
    },
    UpdateStock {
        id: ProductId,
        patch: StockPatch,
        respond_to: Responder<Option<Product>>,
    },
    Update {
        product: Product,
        respond_to: Responder<Option<Product>>,
    },
    Delete {
        id: ProductId,
        respond_to: Responder<Option<String>>,
    },
}

/// Backend double that forwards every call to the receiver returned by [`channel_api`].
#[derive(Clone)]
pub struct ChannelApi {
    sender: mpsc::Sender<ApiRequest>,
}

/// Creates a [`ChannelApi`] and the receiver on which its calls arrive.
///
/// A call fails with [`ApiError::Unavailable`] if the receiver is gone or the responder is
/// dropped without an answer.
pub fn channel_api(buffer_size: usize) -> (ChannelApi, mpsc::Receiver<ApiRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelApi { sender }, receiver)
}

impl ChannelApi {
    async fn call<T>(
        &self,
        build: impl FnOnce(Responder<T>) -> ApiRequest,
    ) -> ApiResult<T> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ApiError::Unavailable("receiver closed".to_string()))?;
        response
            .await
            .map_err(|_| ApiError::Unavailable("request dropped".to_string()))?
    }
}

#[async_trait]
impl ProductApi for ChannelApi {
    async fn list(&self) -> ApiResult<Vec<Product>> {
        self.call(|respond_to| ApiRequest::List { respond_to }).await
    }

    async fn create(&self, product: ProductCreate) -> ApiResult<Product> {
        self.call(|respond_to| ApiRequest::Create {
            product,
            respond_to,
        })
        .await
    }

    async fn update_stock(&self, id: ProductId, patch: StockPatch) -> ApiResult<Option<Product>> {
        self.call(|respond_to| ApiRequest::UpdateStock {
            id,
            patch,
            respond_to,
        })
        .await
    }

    async fn update(&self, product: Product) -> ApiResult<Option<Product>> {
        self.call(|respond_to| ApiRequest::Update {
            product,
            respond_to,
        })
        .await
    }

    async fn delete(&self, id: ProductId) -> ApiResult<Option<String>> {
        self.call(|respond_to| ApiRequest::Delete { id, respond_to })
            .await
    }
}

/// Helper to verify that the next call is a list request
pub async fn expect_list(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<Responder<Vec<Product>>> {
    match receiver.recv().await {
        Some(ApiRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next call is a create request
pub async fn expect_create(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(ProductCreate, Responder<Product>)> {
    match receiver.recv().await {
        Some(ApiRequest::Create {
            product,
            respond_to,
        }) => Some((product, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a stock-only update
pub async fn expect_update_stock(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(ProductId, StockPatch, Responder<Option<Product>>)> {
    match receiver.recv().await {
        Some(ApiRequest::UpdateStock {
            id,
            patch,
            respond_to,
        }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a full-record update
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(Product, Responder<Option<Product>>)> {
    match receiver.recv().await {
        Some(ApiRequest::Update {
            product,
            respond_to,
        }) => Some((product, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a delete request
pub async fn expect_delete(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(ProductId, Responder<Option<String>>)> {
    match receiver.recv().await {
        Some(ApiRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}
