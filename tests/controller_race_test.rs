//! Concurrent calls completing in an order chosen by the test.

use inventory_view::api::mock::{
    channel_api, expect_list, expect_update, expect_update_stock, ApiRequest,
};
use inventory_view::api::ApiError;
use inventory_view::catalog::ErrorKind;
use inventory_view::controller::{InventoryClient, Outcome};
use inventory_view::edit::FieldEdit;
use inventory_view::lifecycle::InventorySystem;
use inventory_view::model::{Product, ProductId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

type Pending = JoinHandle<Outcome>;

fn down() -> ApiError {
    ApiError::Unavailable("connection reset".into())
}

async fn loaded(products: Vec<Product>) -> (InventorySystem, mpsc::Receiver<ApiRequest>) {
    let (api, mut calls) = channel_api(8);
    let system = InventorySystem::new(Arc::new(api), 8);

    let load = spawn_load(&system.client);
    expect_list(&mut calls)
        .await
        .expect("list call")
        .send(Ok(products))
        .unwrap();
    assert_eq!(load.await.unwrap(), Outcome::Applied);

    (system, calls)
}

fn spawn_load(client: &InventoryClient) -> Pending {
    let client = client.clone();
    tokio::spawn(async move { client.load().await.unwrap() })
}

fn spawn_set_stock(client: &InventoryClient, id: &str, stock: i64) -> Pending {
    let client = client.clone();
    let id = ProductId::from(id);
    tokio::spawn(async move { client.set_stock(id, stock).await.unwrap() })
}

fn stock_of(client: &InventoryClient, id: &str) -> u32 {
    client.view().product(id).expect("product").stock
}

#[tokio::test]
async fn test_stale_success_does_not_overwrite_newer_value() {
    let (system, mut calls) = loaded(vec![Product::new("1", "Widget", 5, "Zio")]).await;
    let client = system.client.clone();

    let first = spawn_set_stock(&client, "1", 6);
    let (_, patch, first_reply) = expect_update_stock(&mut calls).await.unwrap();
    assert_eq!(patch.stock, 6);

    let second = spawn_set_stock(&client, "1", 7);
    let (_, patch, second_reply) = expect_update_stock(&mut calls).await.unwrap();
    assert_eq!(patch.stock, 7);
    assert_eq!(stock_of(&client, "1"), 7);

    // Second completes first.
    second_reply.send(Ok(None)).unwrap();
    assert_eq!(second.await.unwrap(), Outcome::Applied);

    first_reply.send(Ok(None)).unwrap();
    assert_eq!(first.await.unwrap(), Outcome::Ignored);
    assert_eq!(stock_of(&client, "1"), 7);

    drop(client);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rollback_restores_last_confirmed_value() {
    let (system, mut calls) = loaded(vec![Product::new("1", "Widget", 5, "Zio")]).await;
    let client = system.client.clone();

    let first = spawn_set_stock(&client, "1", 6);
    let (_, _, first_reply) = expect_update_stock(&mut calls).await.unwrap();
    let second = spawn_set_stock(&client, "1", 7);
    let (_, _, second_reply) = expect_update_stock(&mut calls).await.unwrap();

    // The older update is confirmed while the newer one is still in flight.
    first_reply.send(Ok(None)).unwrap();
    assert_eq!(first.await.unwrap(), Outcome::Ignored);
    assert_eq!(stock_of(&client, "1"), 7);

    second_reply.send(Err(down())).unwrap();
    assert_eq!(
        second.await.unwrap(),
        Outcome::Failed(ErrorKind::UpdateFailed)
    );
    assert_eq!(stock_of(&client, "1"), 6);
    assert_eq!(client.view().error, Some(ErrorKind::UpdateFailed));

    drop(client);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_newer_failure_then_older_success_keeps_accepted_value() {
    let (system, mut calls) = loaded(vec![Product::new("1", "Widget", 5, "Zio")]).await;
    let client = system.client.clone();

    let first = spawn_set_stock(&client, "1", 6);
    let (_, _, first_reply) = expect_update_stock(&mut calls).await.unwrap();
    let second = spawn_set_stock(&client, "1", 7);
    let (_, _, second_reply) = expect_update_stock(&mut calls).await.unwrap();

    second_reply.send(Err(down())).unwrap();
    assert_eq!(
        second.await.unwrap(),
        Outcome::Failed(ErrorKind::UpdateFailed)
    );
    assert_eq!(stock_of(&client, "1"), 6);

    // The server accepted 6, and the snapshot must agree.
    first_reply.send(Ok(None)).unwrap();
    assert_eq!(first.await.unwrap(), Outcome::Applied);
    assert_eq!(stock_of(&client, "1"), 6);
    assert_eq!(client.view().error, None);

    drop(client);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stale_failure_keeps_newer_value() {
    let (system, mut calls) = loaded(vec![Product::new("1", "Widget", 5, "Zio")]).await;
    let client = system.client.clone();

    let first = spawn_set_stock(&client, "1", 6);
    let (_, _, first_reply) = expect_update_stock(&mut calls).await.unwrap();
    let second = spawn_set_stock(&client, "1", 7);
    let (_, _, second_reply) = expect_update_stock(&mut calls).await.unwrap();

    first_reply.send(Err(down())).unwrap();
    assert_eq!(
        first.await.unwrap(),
        Outcome::Failed(ErrorKind::UpdateFailed)
    );
    assert_eq!(stock_of(&client, "1"), 7);

    second_reply.send(Ok(None)).unwrap();
    assert_eq!(second.await.unwrap(), Outcome::Applied);
    assert_eq!(stock_of(&client, "1"), 7);
    assert_eq!(client.view().error, None);

    drop(client);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_updates_for_different_products_are_independent() {
    let (system, mut calls) = loaded(vec![
        Product::new("1", "Widget", 5, "Zio"),
        Product::new("2", "Gadget", 1, "Clicks"),
    ])
    .await;
    let client = system.client.clone();

    let widget = spawn_set_stock(&client, "1", 4);
    let (_, _, widget_reply) = expect_update_stock(&mut calls).await.unwrap();
    let gadget = spawn_set_stock(&client, "2", 2);
    let (_, _, gadget_reply) = expect_update_stock(&mut calls).await.unwrap();

    gadget_reply.send(Err(down())).unwrap();
    widget_reply.send(Ok(None)).unwrap();

    assert_eq!(
        gadget.await.unwrap(),
        Outcome::Failed(ErrorKind::UpdateFailed)
    );
    assert_eq!(widget.await.unwrap(), Outcome::Applied);
    assert_eq!(stock_of(&client, "1"), 4);
    assert_eq!(stock_of(&client, "2"), 1);

    drop(client);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reload_wins_over_pending_stock_update() {
    let (system, mut calls) = loaded(vec![Product::new("1", "Widget", 5, "Zio")]).await;
    let client = system.client.clone();

    let update = spawn_set_stock(&client, "1", 6);
    let (_, _, update_reply) = expect_update_stock(&mut calls).await.unwrap();

    let reload = spawn_load(&client);
    expect_list(&mut calls)
        .await
        .unwrap()
        .send(Ok(vec![Product::new("1", "Widget", 9, "Zio")]))
        .unwrap();
    assert_eq!(reload.await.unwrap(), Outcome::Applied);
    assert_eq!(stock_of(&client, "1"), 9);

    // Nothing to roll back to: the reload replaced the entry.
    update_reply.send(Err(down())).unwrap();
    assert_eq!(
        update.await.unwrap(),
        Outcome::Failed(ErrorKind::UpdateFailed)
    );
    assert_eq!(stock_of(&client, "1"), 9);

    drop(client);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_overlapping_loads_last_completion_wins() {
    let (system, mut calls) = loaded(vec![]).await;
    let client = system.client.clone();

    let older = spawn_load(&client);
    let older_reply = expect_list(&mut calls).await.unwrap();
    let newer = spawn_load(&client);
    let newer_reply = expect_list(&mut calls).await.unwrap();
    assert!(client.view().loading);

    newer_reply
        .send(Ok(vec![Product::new("n", "Newer", 1, "")]))
        .unwrap();
    assert_eq!(newer.await.unwrap(), Outcome::Applied);
    assert!(client.view().loading);

    older_reply
        .send(Ok(vec![Product::new("o", "Older", 1, "")]))
        .unwrap();
    assert_eq!(older.await.unwrap(), Outcome::Applied);

    let view = client.view();
    assert!(!view.loading);
    assert_eq!(view.products.len(), 1);
    assert_eq!(view.products[0].name, "Older");

    drop(client);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_late_commit_does_not_clear_newer_draft() {
    let (system, mut calls) = loaded(vec![
        Product::new("a", "Widget", 1, "Zio"),
        Product::new("b", "Gadget", 2, "Clicks"),
    ])
    .await;
    let client = system.client.clone();

    client.begin_edit("a".into()).await.unwrap();
    client
        .change_edit_field(FieldEdit::Name("Widget Pro".into()))
        .await
        .unwrap();

    let committing = client.clone();
    let commit = tokio::spawn(async move { committing.commit_edit().await.unwrap() });
    let (product, commit_reply) = expect_update(&mut calls).await.unwrap();
    assert_eq!(product.name, "Widget Pro");
    assert!(client.view().committing);

    // The user moves on to another product before the commit lands.
    client.begin_edit("b".into()).await.unwrap();

    commit_reply.send(Ok(None)).unwrap();
    assert_eq!(commit.await.unwrap(), Outcome::Applied);

    let view = client.view();
    assert_eq!(view.product("a").unwrap().name, "Widget Pro");
    assert_eq!(view.draft.expect("newer draft").id.as_str(), "b");

    drop(client);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_view_reflects_optimistic_value_before_completion() {
    let (system, mut calls) = loaded(vec![Product::new("1", "Widget", 5, "Zio")]).await;
    let client = system.client.clone();
    let mut views = client.subscribe();

    let update = spawn_set_stock(&client, "1", 0);
    let (_, _, reply) = expect_update_stock(&mut calls).await.unwrap();

    let view = views
        .wait_for(|view| view.product("1").map(|p| p.stock) == Some(0))
        .await
        .unwrap()
        .clone();
    assert_eq!(view.product("1").unwrap().stock_label(), "Out of stock");

    reply.send(Ok(None)).unwrap();
    assert_eq!(update.await.unwrap(), Outcome::Applied);

    drop(views);
    drop(client);
    system.shutdown().await.unwrap();
}
