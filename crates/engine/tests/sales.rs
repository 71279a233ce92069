use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    BottleState, Engine, EngineError, PaymentMethod, RegisterSaleCmd, SaleItemInput, SaleKind,
    UpdateSaleCmd,
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
    generic_id: Uuid,
    deliveryman_id: Uuid,
    full_id: Uuid,
    empty_id: Uuid,
    comodato_id: Uuid,
}

/// One product in its three states: 10 FULL on the shelf, nothing else.
async fn seed_catalog(engine: &Engine) -> Seed {
    let customer_id = engine.new_customer("José da Silva", false).await.unwrap();
    let generic_id = engine.new_customer("Balcão", true).await.unwrap();
    let deliveryman_id = engine.new_deliveryman("Carlos").await.unwrap();
    let full_id = engine
        .new_product("Garrafão 20L", BottleState::Full, 1200, 10)
        .await
        .unwrap();
    let empty_id = engine
        .new_product("Garrafão 20L", BottleState::Empty, 1000, 0)
        .await
        .unwrap();
    let comodato_id = engine
        .new_product("Garrafão 20L", BottleState::Comodato, 1500, 0)
        .await
        .unwrap();
    Seed {
        customer_id,
        generic_id,
        deliveryman_id,
        full_id,
        empty_id,
        comodato_id,
    }
}

async fn quantity(engine: &Engine, product_id: Uuid) -> i64 {
    engine.product(product_id).await.unwrap().quantity
}

#[tokio::test]
async fn empty_sale_swaps_empties_for_fulls() {
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
        BottleState::Empty,
        4,
        1000,
    ));
    engine.register_sale(cmd).await.unwrap();

    // Customer hands in 4 empties and takes 4 fulls away.
    assert_eq!(quantity(&engine, seed.full_id).await, 6);
    assert_eq!(quantity(&engine, seed.empty_id).await, 4);
    assert_eq!(quantity(&engine, seed.comodato_id).await, 0);
}

#[tokio::test]
async fn full_sale_drains_only_the_full_variant() {
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
        BottleState::Full,
        4,
        1200,
    ));
    engine.register_sale(cmd).await.unwrap();

    assert_eq!(quantity(&engine, seed.full_id).await, 6);
    assert_eq!(quantity(&engine, seed.empty_id).await, 0);
    assert_eq!(quantity(&engine, seed.comodato_id).await, 0);
}

#[tokio::test]
async fn oversold_sale_fails_without_partial_writes() {
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
        BottleState::Empty,
        12,
        1000,
    ));
    let err = engine.register_sale(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock(_)));

    // Nothing moved: not the empties that would have come in either.
    assert_eq!(quantity(&engine, seed.full_id).await, 10);
    assert_eq!(quantity(&engine, seed.empty_id).await, 0);
    let sales = engine.list_sales(&Default::default()).await.unwrap();
    assert!(sales.is_empty());
    let txs = engine.list_transactions(&Default::default()).await.unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn comodato_sale_moves_stock_on_loan() {
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

    assert_eq!(quantity(&engine, seed.full_id).await, 7);
    assert_eq!(quantity(&engine, seed.comodato_id).await, 3);

    let (account, lines) = engine.loan_account(seed.customer_id).await.unwrap();
    assert_eq!(account.total_quantity, 3);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 3);

    let sale = engine.sale(sale_id).await.unwrap();
    assert_eq!(sale.kind, SaleKind::Comodato);
}

#[tokio::test]
async fn generic_customer_cannot_take_comodato() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;

    let cmd = RegisterSaleCmd::new(
        seed.generic_id,
        seed.deliveryman_id,
        PaymentMethod::Dinheiro,
        Utc::now(),
    )
    .item(SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Comodato,
        1,
        1500,
    ));
    let err = engine.register_sale(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidComodatoCustomer(_)));

    assert_eq!(quantity(&engine, seed.full_id).await, 10);
    assert_eq!(quantity(&engine, seed.comodato_id).await, 0);
}

#[tokio::test]
async fn sale_total_is_recomputed_from_lines() {
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
        BottleState::Full,
        2,
        1200,
    ))
    .item(SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Empty,
        3,
        1000,
    ));
    let sale_id = engine.register_sale(cmd).await.unwrap();

    let sale = engine.sale(sale_id).await.unwrap();
    assert_eq!(sale.total_minor, 2 * 1200 + 3 * 1000);
    assert_eq!(sale.items.len(), 2);
    assert_eq!(sale.kind, SaleKind::Full);

    let txs = engine.list_transactions(&Default::default()).await.unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount_minor, sale.total_minor);
    assert_eq!(txs[0].reference_id, Some(sale_id));
}

#[tokio::test]
async fn sale_with_unknown_product_fails() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;

    let cmd = RegisterSaleCmd::new(
        seed.customer_id,
        seed.deliveryman_id,
        PaymentMethod::Dinheiro,
        Utc::now(),
    )
    .item(SaleItemInput::new(
        "Água Mineral 500ml",
        BottleState::Full,
        1,
        300,
    ));
    let err = engine.register_sale(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn register_then_delete_restores_everything() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;

    let cmd = RegisterSaleCmd::new(
        seed.customer_id,
        seed.deliveryman_id,
        PaymentMethod::Fiado,
        Utc::now(),
    )
    .item(SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Full,
        2,
        1200,
    ))
    .item(SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Comodato,
        3,
        1500,
    ));
    let sale_id = engine.register_sale(cmd).await.unwrap();

    let customer = engine.customer(seed.customer_id).await.unwrap();
    assert_eq!(customer.credit_balance_minor, 2 * 1200 + 3 * 1500);

    engine.delete_sale(sale_id).await.unwrap();

    assert_eq!(quantity(&engine, seed.full_id).await, 10);
    assert_eq!(quantity(&engine, seed.comodato_id).await, 0);

    let (account, _) = engine.loan_account(seed.customer_id).await.unwrap();
    assert_eq!(account.total_quantity, 0);

    let customer = engine.customer(seed.customer_id).await.unwrap();
    assert_eq!(customer.credit_balance_minor, 0);

    let err = engine.sale(sale_id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    let txs = engine.list_transactions(&Default::default()).await.unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn edit_shrinking_a_comodato_line_returns_stock() {
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

    let update = UpdateSaleCmd::new(sale_id).items(vec![SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Comodato,
        1,
        1500,
    )]);
    engine.update_sale(update).await.unwrap();

    // Two bottles come back: loan ledger down to 1, FULL up by 2.
    assert_eq!(quantity(&engine, seed.full_id).await, 9);
    assert_eq!(quantity(&engine, seed.comodato_id).await, 1);
    let (account, lines) = engine.loan_account(seed.customer_id).await.unwrap();
    assert_eq!(account.total_quantity, 1);
    assert_eq!(lines[0].quantity, 1);

    let sale = engine.sale(sale_id).await.unwrap();
    assert_eq!(sale.total_minor, 1500);
    assert_eq!(sale.items.len(), 1);
}

#[tokio::test]
async fn edit_dropping_a_line_reverses_it_fully() {
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
        BottleState::Full,
        2,
        1200,
    ))
    .item(SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Empty,
        3,
        1000,
    ));
    let sale_id = engine.register_sale(cmd).await.unwrap();
    assert_eq!(quantity(&engine, seed.full_id).await, 5);

    let update = UpdateSaleCmd::new(sale_id).items(vec![SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Full,
        2,
        1200,
    )]);
    engine.update_sale(update).await.unwrap();

    // The EMPTY line is gone: its exchange is undone, the FULL line stays.
    assert_eq!(quantity(&engine, seed.full_id).await, 8);
    assert_eq!(quantity(&engine, seed.empty_id).await, 0);

    let sale = engine.sale(sale_id).await.unwrap();
    assert_eq!(sale.total_minor, 2400);
    assert_eq!(sale.items.len(), 1);
}

#[tokio::test]
async fn edit_moves_the_loan_to_the_new_customer() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;
    let other_id = engine.new_customer("Maria Souza", false).await.unwrap();

    let cmd = RegisterSaleCmd::new(
        seed.customer_id,
        seed.deliveryman_id,
        PaymentMethod::Fiado,
        Utc::now(),
    )
    .item(SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Comodato,
        3,
        1500,
    ));
    let sale_id = engine.register_sale(cmd).await.unwrap();

    let update = UpdateSaleCmd::new(sale_id).customer_id(other_id);
    engine.update_sale(update).await.unwrap();

    let (old_account, _) = engine.loan_account(seed.customer_id).await.unwrap();
    assert_eq!(old_account.total_quantity, 0);
    let (new_account, new_lines) = engine.loan_account(other_id).await.unwrap();
    assert_eq!(new_account.total_quantity, 3);
    assert_eq!(new_lines[0].quantity, 3);

    // FIADO credit follows the sale too.
    let old_customer = engine.customer(seed.customer_id).await.unwrap();
    assert_eq!(old_customer.credit_balance_minor, 0);
    let new_customer = engine.customer(other_id).await.unwrap();
    assert_eq!(new_customer.credit_balance_minor, 4500);

    // Stock is untouched by a pure ownership change.
    assert_eq!(quantity(&engine, seed.full_id).await, 7);
    assert_eq!(quantity(&engine, seed.comodato_id).await, 3);
}

#[tokio::test]
async fn edit_cannot_hand_comodato_to_the_generic_customer() {
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

    let update = UpdateSaleCmd::new(sale_id).customer_id(seed.generic_id);
    let err = engine.update_sale(update).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidComodatoCustomer(_)));

    // Loan stays with the original customer.
    let (account, _) = engine.loan_account(seed.customer_id).await.unwrap();
    assert_eq!(account.total_quantity, 3);
}

#[tokio::test]
async fn edit_switching_payment_method_moves_the_credit() {
    let (engine, _db) = engine_with_db().await;
    let seed = seed_catalog(&engine).await;

    let cmd = RegisterSaleCmd::new(
        seed.customer_id,
        seed.deliveryman_id,
        PaymentMethod::Fiado,
        Utc::now(),
    )
    .item(SaleItemInput::new(
        "Garrafão 20L",
        BottleState::Full,
        2,
        1200,
    ));
    let sale_id = engine.register_sale(cmd).await.unwrap();
    let customer = engine.customer(seed.customer_id).await.unwrap();
    assert_eq!(customer.credit_balance_minor, 2400);

    let update = UpdateSaleCmd::new(sale_id).payment_method(PaymentMethod::Dinheiro);
    engine.update_sale(update).await.unwrap();

    let customer = engine.customer(seed.customer_id).await.unwrap();
    assert_eq!(customer.credit_balance_minor, 0);

    let sale = engine.sale(sale_id).await.unwrap();
    assert_eq!(sale.payment_method, PaymentMethod::Dinheiro);
}
