use std::collections::HashMap;

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    BottleState, EngineError, PaymentMethod, ResultEngine, SaleItem, SaleKind, UpdateSaleCmd,
    customers, sale_items, sales, transactions, util,
};

use super::super::{Engine, with_tx};
use super::helpers::{
    ResolvedItem, ensure_comodato_customer, items_total_minor, stock_deltas, validate_items,
};

impl Engine {
    /// Edit a sale in place, reconciling stock, loans and credit against
    /// the stored line items.
    ///
    /// New lines are matched to stored ones per variant; only the quantity
    /// difference moves stock and the loan ledger. Lines missing from the
    /// new set count as a full removal. FIADO credit follows the sale: the
    /// old total leaves the old customer's balance, the new total lands on
    /// the new one's.
    pub async fn update_sale(&self, cmd: UpdateSaleCmd) -> ResultEngine<()> {
        let UpdateSaleCmd {
            sale_id,
            customer_id,
            deliveryman_id,
            payment_method,
            occurred_at,
            items,
        } = cmd;
        if let Some(items) = &items {
            validate_items(items)?;
        }

        with_tx!(self, |db_tx| {
            let sale_model = self.require_sale(&db_tx, sale_id).await?;
            if sale_model.settled_at.is_some() {
                return Err(EngineError::InvalidAmount(
                    "cannot update a settled sale".to_string(),
                ));
            }

            let old_customer_id = util::parse_uuid(&sale_model.customer_id, "customer")?;
            let old_payment_method =
                PaymentMethod::try_from(sale_model.payment_method.as_str())?;

            let new_customer_id = customer_id.unwrap_or(old_customer_id);
            let new_deliveryman_id = match deliveryman_id {
                Some(id) => id,
                None => util::parse_uuid(&sale_model.deliveryman_id, "deliveryman")?,
            };
            let new_payment_method = payment_method.unwrap_or(old_payment_method);
            let new_occurred_at = occurred_at.unwrap_or(sale_model.occurred_at);

            let new_customer_model = self.require_customer(&db_tx, new_customer_id).await?;
            self.require_deliveryman(&db_tx, new_deliveryman_id).await?;

            let old_item_models = self.load_sale_items(&db_tx, sale_id).await?;
            let old_resolved = self.resolve_stored_items(&db_tx, &old_item_models).await?;
            let new_resolved = match &items {
                Some(inputs) => self.resolve_input_items(&db_tx, inputs).await?,
                None => self.resolve_stored_items(&db_tx, &old_item_models).await?,
            };
            ensure_comodato_customer(&new_customer_model, &new_resolved)?;

            // Per-variant (line, old qty, new qty), duplicates summed.
            let mut merged: HashMap<String, (&ResolvedItem, i64, i64)> = HashMap::new();
            for item in &old_resolved {
                let entry = merged.entry(item.variant.id.clone()).or_insert((item, 0, 0));
                entry.1 += item.quantity;
            }
            for item in &new_resolved {
                let entry = merged.entry(item.variant.id.clone()).or_insert((item, 0, 0));
                entry.2 += item.quantity;
            }

            let mut deltas: Vec<(String, i64)> = Vec::new();
            for (item, old_quantity, new_quantity) in merged.values() {
                let difference = new_quantity - old_quantity;
                if difference != 0 {
                    deltas.extend(stock_deltas(item, difference));
                }
            }
            let preview = self.preview_stock_deltas(&db_tx, &deltas).await?;

            if new_customer_id == old_customer_id {
                for (item, old_quantity, new_quantity) in merged.values() {
                    if item.state != BottleState::Comodato {
                        continue;
                    }
                    let product_id = util::parse_uuid(&item.variant.id, "product")?;
                    let difference = new_quantity - old_quantity;
                    if difference > 0 {
                        self.record_loan(&db_tx, new_customer_id, product_id, difference)
                            .await?;
                    } else if difference < 0 {
                        self.record_collection(&db_tx, new_customer_id, product_id, -difference)
                            .await?;
                    }
                }
            } else {
                // The sale changed hands: the old customer returns every
                // loaned bottle, the new one takes on the new lines.
                for (item, old_quantity, _) in merged.values() {
                    if item.state == BottleState::Comodato && *old_quantity > 0 {
                        let product_id = util::parse_uuid(&item.variant.id, "product")?;
                        self.record_collection(&db_tx, old_customer_id, product_id, *old_quantity)
                            .await?;
                    }
                }
                for (item, _, new_quantity) in merged.values() {
                    if item.state == BottleState::Comodato && *new_quantity > 0 {
                        let product_id = util::parse_uuid(&item.variant.id, "product")?;
                        self.record_loan(&db_tx, new_customer_id, product_id, *new_quantity)
                            .await?;
                    }
                }
            }

            let old_total = sale_model.total_minor;
            let new_total = items_total_minor(&new_resolved);

            let mut credit_deltas: HashMap<Uuid, i64> = HashMap::new();
            if old_payment_method.is_on_credit() {
                *credit_deltas.entry(old_customer_id).or_insert(0) -= old_total;
            }
            if new_payment_method.is_on_credit() {
                *credit_deltas.entry(new_customer_id).or_insert(0) += new_total;
            }
            for (credit_customer_id, delta) in credit_deltas {
                if delta == 0 {
                    continue;
                }
                let customer_model = self.require_customer(&db_tx, credit_customer_id).await?;
                let new_balance = customer_model.credit_balance_minor + delta;
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

            let bank_account_id = self
                .resolve_bank_account(&db_tx, new_payment_method)
                .await?;
            let transaction_id = sale_model.transaction_id.clone().ok_or_else(|| {
                EngineError::InconsistentState(format!(
                    "sale \"{}\" has no financial record",
                    sale_model.id
                ))
            })?;
            let tx_active = transactions::ActiveModel {
                id: ActiveValue::Set(transaction_id),
                amount_minor: ActiveValue::Set(new_total),
                deliveryman_id: ActiveValue::Set(new_deliveryman_id.to_string()),
                bank_account_id: ActiveValue::Set(bank_account_id.map(|id| id.to_string())),
                occurred_at: ActiveValue::Set(new_occurred_at),
                ..Default::default()
            };
            tx_active.update(&db_tx).await?;

            if items.is_some() {
                sale_items::Entity::delete_many()
                    .filter(sale_items::Column::SaleId.eq(sale_id.to_string()))
                    .exec(&db_tx)
                    .await?;
                for item in &new_resolved {
                    let product_id = util::parse_uuid(&item.variant.id, "product")?;
                    let sale_item = SaleItem::new(
                        sale_id,
                        product_id,
                        item.state,
                        item.quantity,
                        item.unit_price_minor,
                    )?;
                    sale_items::ActiveModel::from(&sale_item)
                        .insert(&db_tx)
                        .await?;
                }
            }

            let kind = SaleKind::from_states(new_resolved.iter().map(|item| item.state));
            let sale_active = sales::ActiveModel {
                id: ActiveValue::Set(sale_model.id.clone()),
                customer_id: ActiveValue::Set(new_customer_id.to_string()),
                deliveryman_id: ActiveValue::Set(new_deliveryman_id.to_string()),
                payment_method: ActiveValue::Set(new_payment_method.as_str().to_string()),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                total_minor: ActiveValue::Set(new_total),
                occurred_at: ActiveValue::Set(new_occurred_at),
                ..Default::default()
            };
            sale_active.update(&db_tx).await?;

            self.persist_stock_quantities(&db_tx, preview).await?;

            Ok(())
        })
    }
}
