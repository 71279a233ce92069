use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    BottleState, CollectCmd, Engine, EngineError, PaymentMethod, RegisterSaleCmd, SaleItemInput,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

struct Seed {
    customer_id: Uuid,
    deliveryman_id: Uuid,
    full_id: Uuid,
    comodato_id: Uuid,
}

async fn seed_catalog(engine: &Engine) -> Seed {
    let customer_id = engine.new_customer("José da Silva", false).await.unwrap();
    let deliveryman_id = engine.new_deliveryman("Carlos").await.unwrap();
    let full_id = engine
        .new_product("Garrafão 20L", BottleState::Full, 1200, 10)
        .await
        .unwrap();
    engine
        .new_product("Garrafão 20L", BottleState::Empty, 1000, 0)
        .await
        .unwrap();
    let comodato_id = engine
        .new_product("Garrafão 20L", BottleState::Comodato, 1500, 0)
        .await
        .unwrap();
    Seed {
        customer_id,
        deliveryman_id,
        full_id,
        comodato_id,
    }
}

async fn loan_three_bottles(engine: &Engine, seed: &Seed) {
    let cmd = RegisterSaleCmd::new(
        seed.customer_id,
        seed.deliveryman_id,
        PaymentMethod::Dinheiro,
        Utc::now(),
    )
    .item(SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Comodato,
        3,
        1500,
    ));
    engine.register_sale(cmd).await.unwrap();
}

async fn quantity(engine: &Engine, product_id: Uuid) -> i64 {
    engine.product(product_id).await.unwrap().quantity
}

#[tokio::test]
async fn comodato_round_trip_returns_the_bottles() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;
    loan_three_bottles(&engine, &seed).await;
    assert_eq!(quantity(&engine, seed.full_id).await, 7);

    let collect_id = engine
        .collect(CollectCmd::new(
            seed.customer_id,
            seed.comodato_id,
            3,
            Utc::now(),
        ))
        .await
        .unwrap();

    let (account, lines) = engine.loan_account(seed.customer_id).await.unwrap();
    assert_eq!(account.total_quantity, 0);
    // A drained line stays on the account at zero.
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 0);

    assert_eq!(quantity(&engine, seed.full_id).await, 10);
    assert_eq!(quantity(&engine, seed.comodato_id).await, 0);

    let events = engine.list_collects(seed.customer_id).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, collect_id);
    assert_eq!(events[0].quantity, 3);
}

#[tokio::test]
async fn collecting_more_than_loaned_fails() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;
    loan_three_bottles(&engine, &seed).await;

    let err = engine
        .collect(CollectCmd::new(
            seed.customer_id,
            seed.comodato_id,
            5,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientLoanBalance(_)));

    let (account, _) = engine.loan_account(seed.customer_id).await.unwrap();
    assert_eq!(account.total_quantity, 3);
    assert_eq!(quantity(&engine, seed.full_id).await, 7);
    assert!(engine
        .list_collects(seed.customer_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn collect_requires_an_existing_ledger() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;

    let err = engine
        .collect(CollectCmd::new(
            seed.customer_id,
            seed.comodato_id,
            1,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn collect_rejects_non_comodato_variants() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;
    loan_three_bottles(&engine, &seed).await;

    let err = engine
        .collect(CollectCmd::new(
            seed.customer_id,
            seed.full_id,
            1,
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn loan_lines_accumulate_per_product() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;
    engine
        .new_product("Garrafão 10L", BottleState::Full, 900, 10)
        .await
        .unwrap();
    engine
        .new_product("Garrafão 10L", BottleState::Comodato, 1100, 0)
        .await
        .unwrap();

    loan_three_bottles(&engine, &seed).await;
    let cmd = RegisterSaleCmd::new(
        seed.customer_id,
        seed.deliveryman_id,
        PaymentMethod::Dinheiro,
        Utc::now(),
    )
    .item(SaleItemInput::new(
        "Garrafão 10L",
        BottleState::Comodato,
        2,
        1100,
    ))
    .item(SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Comodato,
        1,
        1500,
    ));
    engine.register_sale(cmd).await.unwrap();

    let (account, lines) = engine.loan_account(seed.customer_id).await.unwrap();
    assert_eq!(account.total_quantity, 6);
    assert_eq!(lines.len(), 2);
    let mut per_product: Vec<i64> = lines.iter().map(|line| line.quantity).collect();
    per_product.sort_unstable();
    assert_eq!(per_product, vec![2, 4]);
}

#[tokio::test]
async fn partial_collection_leaves_the_rest_on_loan() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;
    loan_three_bottles(&engine, &seed).await;

    engine
        .collect(CollectCmd::new(
            seed.customer_id,
            seed.comodato_id,
            2,
            Utc::now(),
        ))
        .await
        .unwrap();

    let (account, lines) = engine.loan_account(seed.customer_id).await.unwrap();
    assert_eq!(account.total_quantity, 1);
    assert_eq!(lines[0].quantity, 1);
    assert_eq!(quantity(&engine, seed.full_id).await, 9);
    assert_eq!(quantity(&engine, seed.comodato_id).await, 1);
}

#[tokio::test]
async fn deleting_a_sale_collects_without_an_event() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;

    let cmd = RegisterSaleCmd::new(
        seed.customer_id,
        seed.deliveryman_id,
        PaymentMethod::Dinheiro,
        Utc::now(),
    )
    .item(SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Comodato,
        3,
        1500,
    ));
    let sale_id = engine.register_sale(cmd).await.unwrap();

    engine.delete_sale(sale_id).await.unwrap();

    let (account, _) = engine.loan_account(seed.customer_id).await.unwrap();
    assert_eq!(account.total_quantity, 0);
    // The visit log only records explicit collections.
    assert!(engine
        .list_collects(seed.customer_id)
        .await
        .unwrap()
        .is_empty());
}
