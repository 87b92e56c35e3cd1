//! PostgreSQL repository tests. Run with `DATABASE_URL` set and `--ignored`.

mod common;

use openfoodweb::domain::entities::{LineItem, NewDistributor, NewProduct, Order};
use openfoodweb::domain::repositories::{
    DistributorRepository, OrderRepository, ProductRepository,
};
use openfoodweb::error::AppError;
use openfoodweb::infrastructure::persistence::{
    PgDistributorRepository, PgOrderRepository, PgProductRepository,
};
use sqlx::PgPool;
use std::collections::BTreeSet;
use std::sync::Arc;

async fn seed(pool: &Arc<PgPool>, name: &str) -> (i64, i64) {
    let distributor = PgDistributorRepository::new(pool.clone())
        .create(NewDistributor {
            name: format!("{name} Hub"),
            description: None,
            email: None,
            pickup_address: None,
        })
        .await
        .unwrap();

    let product = PgProductRepository::new(pool.clone())
        .create(NewProduct {
            name: name.to_string(),
            description: None,
            supplier_id: None,
            distributor_ids: BTreeSet::from([distributor.id]),
        })
        .await
        .unwrap();

    (distributor.id, product.id)
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_save_draft_and_find_by_token(pool: PgPool) {
    let repo = PgOrderRepository::new(Arc::new(pool));

    let created = repo.save(&Order::draft("tok-1")).await.unwrap();
    assert!(created.is_stored());

    let found = repo.find_by_token("tok-1").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(found.distributor_id.is_none());
    assert!(found.line_items.is_empty());

    assert!(repo.find_by_token("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_token_conflicts(pool: PgPool) {
    let repo = PgOrderRepository::new(Arc::new(pool));

    repo.save(&Order::draft("tok-1")).await.unwrap();
    let result = repo.save(&Order::draft("tok-1")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_failed_first_save_leaves_no_order(pool: PgPool) {
    let pool = Arc::new(pool);
    let (d1, _) = seed(&pool, "Carrots").await;
    let repo = PgOrderRepository::new(pool.clone());

    let mut draft = Order::draft("tok-1");
    draft.distributor_id = Some(d1);
    draft.line_items.push(LineItem::new(i64::MAX, 1));

    assert!(repo.save(&draft).await.is_err());
    assert!(repo.find_by_token("tok-1").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_save_inserts_new_line_items(pool: PgPool) {
    let pool = Arc::new(pool);
    let (d1, p1) = seed(&pool, "Carrots").await;
    let repo = PgOrderRepository::new(pool.clone());

    let mut order = Order::draft("tok-1");
    order.distributor_id = Some(d1);
    order.line_items.push(LineItem::new(p1, 3));

    let saved = repo.save(&order).await.unwrap();

    assert_eq!(saved.distributor_id, Some(d1));
    assert_eq!(saved.line_items.len(), 1);
    assert!(saved.line_items[0].is_persisted());
    assert_eq!(saved.line_items[0].quantity, 3);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_save_refuses_to_rebind_stored_items(pool: PgPool) {
    let pool = Arc::new(pool);
    let (d1, p1) = seed(&pool, "Carrots").await;
    let (d2, p2) = seed(&pool, "Leeks").await;
    let repo = PgOrderRepository::new(pool.clone());

    let mut order = Order::draft("tok-1");
    order.distributor_id = Some(d1);
    order.line_items.push(LineItem::new(p1, 1));
    let saved = repo.save(&order).await.unwrap();

    // A stale copy that never saw the stored line item.
    let mut stale = Order::draft("tok-1");
    stale.id = saved.id;
    stale.distributor_id = Some(d2);
    stale.line_items.push(LineItem::new(p2, 1));

    let result = repo.save(&stale).await;
    assert!(matches!(
        result,
        Err(AppError::Rejected {
            reason: "distributor_mismatch",
            ..
        })
    ));

    let current = repo.find_by_token("tok-1").await.unwrap().unwrap();
    assert_eq!(current.distributor_id, Some(d1));
    assert_eq!(current.line_items.len(), 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_clear_releases_distributor(pool: PgPool) {
    let pool = Arc::new(pool);
    let (d1, p1) = seed(&pool, "Carrots").await;
    let repo = PgOrderRepository::new(pool.clone());

    let mut order = Order::draft("tok-1");
    order.distributor_id = Some(d1);
    order.line_items.push(LineItem::new(p1, 2));
    let saved = repo.save(&order).await.unwrap();

    let cleared = repo.clear(saved.id).await.unwrap();

    assert!(cleared.distributor_id.is_none());
    assert!(cleared.line_items.is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_products_listed_by_distributor(pool: PgPool) {
    let pool = Arc::new(pool);
    let (d1, p1) = seed(&pool, "Carrots").await;
    seed(&pool, "Leeks").await;
    let repo = PgProductRepository::new(pool.clone());

    let at_d1 = ProductRepository::list(&repo, Some(d1)).await.unwrap();

    assert_eq!(at_d1.len(), 1);
    assert_eq!(at_d1[0].id, p1);
    assert!(at_d1[0].distributor_ids.contains(&d1));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_distributor_with_orders_cannot_be_deleted(pool: PgPool) {
    let pool = Arc::new(pool);
    let (d1, p1) = seed(&pool, "Carrots").await;
    let orders = PgOrderRepository::new(pool.clone());
    let distributors = PgDistributorRepository::new(pool.clone());

    let mut order = Order::draft("tok-1");
    order.distributor_id = Some(d1);
    order.line_items.push(LineItem::new(p1, 1));
    orders.save(&order).await.unwrap();

    assert_eq!(distributors.count_orders(d1).await.unwrap(), 1);
    let result = DistributorRepository::delete(&distributors, d1).await;
    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_dropping_distributor_of_held_product_conflicts(pool: PgPool) {
    let pool = Arc::new(pool);
    let (d1, p1) = seed(&pool, "Carrots").await;
    let (d2, _) = seed(&pool, "Leeks").await;
    let orders = PgOrderRepository::new(pool.clone());
    let products = PgProductRepository::new(pool.clone());

    let mut order = Order::draft("tok-1");
    order.distributor_id = Some(d1);
    order.line_items.push(LineItem::new(p1, 1));
    orders.save(&order).await.unwrap();

    let result = products.set_distributors(p1, BTreeSet::from([d2])).await;
    assert!(matches!(result, Err(AppError::Conflict { .. })));

    let unchanged = ProductRepository::find_by_id(&products, p1)
        .await
        .unwrap()
        .unwrap();
    assert!(unchanged.distributor_ids.contains(&d1));

    let widened = products
        .set_distributors(p1, BTreeSet::from([d1, d2]))
        .await
        .unwrap();
    assert_eq!(widened.distributor_ids.len(), 2);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_save_rejects_product_not_at_distributor(pool: PgPool) {
    let pool = Arc::new(pool);
    let (d1, _) = seed(&pool, "Carrots").await;
    let (_, p2) = seed(&pool, "Leeks").await;
    let repo = PgOrderRepository::new(pool.clone());

    let mut draft = Order::draft("tok-1");
    draft.distributor_id = Some(d1);
    draft.line_items.push(LineItem::new(p2, 1));

    let result = repo.save(&draft).await;
    assert!(matches!(
        result,
        Err(AppError::Rejected {
            reason: "product_not_at_distributor",
            ..
        })
    ));
    assert!(repo.find_by_token("tok-1").await.unwrap().is_none());
}
