use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, bank_accounts, customers, deliverymen, payment::PaymentMethod,
    products, products::BottleState, sales, util,
};

use super::Engine;

/// Generates a `require_*` method that loads an entity by id or fails with
/// `NotFound`.
macro_rules! impl_require_by_id {
    ($require_fn:ident, $entity:path, $model:ty, $label:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            target_id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(target_id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("{} \"{}\"", $label, target_id)))
        }
    };
}

impl Engine {
    impl_require_by_id!(
        require_customer,
        customers::Entity,
        customers::Model,
        "customer"
    );

    impl_require_by_id!(
        require_deliveryman,
        deliverymen::Entity,
        deliverymen::Model,
        "deliveryman"
    );

    impl_require_by_id!(require_product, products::Entity, products::Model, "product");

    impl_require_by_id!(require_sale, sales::Entity, sales::Model, "sale");

    impl_require_by_id!(
        require_bank_account,
        bank_accounts::Entity,
        bank_accounts::Model,
        "bank account"
    );

    /// Look up the variant row for `(name, state)` via the normalized name.
    pub(super) async fn find_product_variant(
        &self,
        db: &DatabaseTransaction,
        name: &str,
        state: BottleState,
    ) -> ResultEngine<Option<products::Model>> {
        products::Entity::find()
            .filter(products::Column::NameNorm.eq(util::normalize_lookup_name(name)))
            .filter(products::Column::State.eq(state.as_str()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_product_variant(
        &self,
        db: &DatabaseTransaction,
        name: &str,
        state: BottleState,
    ) -> ResultEngine<products::Model> {
        self.find_product_variant(db, name, state)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("product \"{name}\" ({state})")))
    }

    /// Resolve the FULL sibling of a variant, the counterpart every paired
    /// stock movement runs against.
    pub(super) async fn require_full_sibling(
        &self,
        db: &DatabaseTransaction,
        variant: &products::Model,
    ) -> ResultEngine<products::Model> {
        if variant.state == BottleState::Full.as_str() {
            return Ok(variant.clone());
        }
        self.require_product_variant(db, &variant.name, BottleState::Full)
            .await
    }

    /// Resolve the bank account a payment method books against.
    ///
    /// Cash and on-credit sales carry no account. Every other method must
    /// have one configured, otherwise the operation fails before any write.
    pub(super) async fn resolve_bank_account(
        &self,
        db: &DatabaseTransaction,
        method: PaymentMethod,
    ) -> ResultEngine<Option<Uuid>> {
        if !method.requires_bank_account() {
            return Ok(None);
        }
        let model = bank_accounts::Entity::find()
            .filter(bank_accounts::Column::PaymentMethod.eq(method.as_str()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NoBankAccountConfigured(method.as_str().to_string()))?;
        util::parse_uuid(&model.id, "bank account").map(Some)
    }
}
