use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Product, ResultEngine, collects, loan_lines, products, products::BottleState,
    sale_items,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Register a new product variant for `(name, state)`.
    pub async fn new_product(
        &self,
        name: &str,
        state: BottleState,
        price_minor: i64,
        quantity: i64,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "product")?;
        with_tx!(self, |db_tx| {
            let exists = self
                .find_product_variant(&db_tx, &name, state)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingEntry(format!(
                    "product \"{name}\" ({state})"
                )));
            }

            let product = Product::new(name.clone(), state, quantity, price_minor)?;
            products::ActiveModel::from(&product).insert(&db_tx).await?;
            Ok(product.id)
        })
    }

    /// Change the catalog price of a variant. Prices already locked into
    /// sale items are unaffected.
    pub async fn set_product_price(
        &self,
        product_id: Uuid,
        price_minor: i64,
    ) -> ResultEngine<()> {
        if price_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "price_minor must be >= 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            self.require_product(&db_tx, product_id).await?;

            let active = products::ActiveModel {
                id: ActiveValue::Set(product_id.to_string()),
                price_minor: ActiveValue::Set(price_minor),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Return a product variant snapshot from DB.
    pub async fn product(&self, product_id: Uuid) -> ResultEngine<Product> {
        with_tx!(self, |db_tx| {
            let model = self.require_product(&db_tx, product_id).await?;
            let product = Product::try_from(model)?;
            Ok(product)
        })
    }

    /// Look up a variant by `(name, state)`.
    pub async fn find_product(&self, name: &str, state: BottleState) -> ResultEngine<Product> {
        let name = normalize_required_name(name, "product")?;
        with_tx!(self, |db_tx| {
            let model = self.require_product_variant(&db_tx, &name, state).await?;
            let product = Product::try_from(model)?;
            Ok(product)
        })
    }

    pub async fn list_products(&self) -> ResultEngine<Vec<Product>> {
        with_tx!(self, |db_tx| {
            let models = products::Entity::find()
                .order_by_asc(products::Column::NameNorm)
                .order_by_asc(products::Column::State)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Product::try_from(model)?);
            }
            Ok(out)
        })
    }

    /// Delete a variant. Refused while sale items, loan lines or collect
    /// events still reference it, so history never dangles.
    pub async fn delete_product(&self, product_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_product(&db_tx, product_id).await?;

            let referenced = sale_items::Entity::find()
                .filter(sale_items::Column::ProductId.eq(product_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some()
                || loan_lines::Entity::find()
                    .filter(loan_lines::Column::ProductId.eq(product_id.to_string()))
                    .one(&db_tx)
                    .await?
                    .is_some()
                || collects::Entity::find()
                    .filter(collects::Column::ProductId.eq(product_id.to_string()))
                    .one(&db_tx)
                    .await?
                    .is_some();
            if referenced {
                return Err(EngineError::ExistingEntry(format!(
                    "references to product \"{}\" ({})",
                    model.name, model.state
                )));
            }

            products::Entity::delete_by_id(product_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
