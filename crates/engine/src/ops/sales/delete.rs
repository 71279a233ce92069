use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    BottleState, EngineError, PaymentMethod, ResultEngine, customers, sale_items, sales,
    transactions, util,
};

use super::super::{Engine, with_tx};
use super::helpers::stock_deltas;

impl Engine {
    /// Delete a sale, restoring stock, loan ledger and FIADO credit to
    /// their pre-sale state. Reversal runs before any row is removed, so a
    /// failure part-way leaves the sale in place for inspection.
    pub async fn delete_sale(&self, sale_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let sale_model = self.require_sale(&db_tx, sale_id).await?;
            let customer_id = util::parse_uuid(&sale_model.customer_id, "customer")?;
            let payment_method = PaymentMethod::try_from(sale_model.payment_method.as_str())?;

            let item_models = self.load_sale_items(&db_tx, sale_id).await?;
            let resolved = self.resolve_stored_items(&db_tx, &item_models).await?;

            let mut deltas: Vec<(String, i64)> = Vec::new();
            for item in &resolved {
                deltas.extend(stock_deltas(item, -item.quantity));
            }
            let preview = self.preview_stock_deltas(&db_tx, &deltas).await?;
            self.persist_stock_quantities(&db_tx, preview).await?;

            for item in &resolved {
                if item.state == BottleState::Comodato {
                    let product_id = util::parse_uuid(&item.variant.id, "product")?;
                    self.record_collection(&db_tx, customer_id, product_id, item.quantity)
                        .await?;
                }
            }

            // A settled FIADO sale already drained its credit at settlement.
            if payment_method.is_on_credit() && sale_model.settled_at.is_none() {
                let customer_model = self.require_customer(&db_tx, customer_id).await?;
                let new_balance = customer_model.credit_balance_minor - sale_model.total_minor;
                if new_balance < 0 {
                    return Err(EngineError::InconsistentState(format!(
                        "customer \"{}\" credit balance would go below zero",
                        customer_model.name
                    )));
                }
                let customer_active = customers::ActiveModel {
                    id: ActiveValue::Set(customer_model.id),
                    credit_balance_minor: ActiveValue::Set(new_balance),
                    ..Default::default()
                };
                customer_active.update(&db_tx).await?;
            }

            if let Some(transaction_id) = sale_model.transaction_id.clone() {
                transactions::Entity::delete_by_id(transaction_id)
                    .exec(&db_tx)
                    .await?;
            }
            sale_items::Entity::delete_many()
                .filter(sale_items::Column::SaleId.eq(sale_id.to_string()))
                .exec(&db_tx)
                .await?;
            sales::Entity::delete_by_id(sale_id.to_string())
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }
}
