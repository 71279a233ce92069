use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    BottleState, RegisterSaleCmd, ResultEngine, Sale, SaleItem, SaleKind, Transaction,
    TransactionCategory, TransactionDirection, customers, sale_items, sales, transactions, util,
};

use super::super::{Engine, with_tx};
use super::helpers::{ensure_comodato_customer, items_total_minor, stock_deltas, validate_items};

impl Engine {
    /// Register a sale. Stock movement, financial record, FIADO credit and
    /// loan ledger all commit together or not at all.
    pub async fn register_sale(&self, cmd: RegisterSaleCmd) -> ResultEngine<Uuid> {
        let RegisterSaleCmd {
            customer_id,
            deliveryman_id,
            payment_method,
            occurred_at,
            items,
        } = cmd;
        validate_items(&items)?;

        with_tx!(self, |db_tx| {
            let customer_model = self.require_customer(&db_tx, customer_id).await?;
            self.require_deliveryman(&db_tx, deliveryman_id).await?;

            let resolved = self.resolve_input_items(&db_tx, &items).await?;
            ensure_comodato_customer(&customer_model, &resolved)?;

            let mut deltas: Vec<(String, i64)> = Vec::new();
            for item in &resolved {
                deltas.extend(stock_deltas(item, item.quantity));
            }
            let preview = self.preview_stock_deltas(&db_tx, &deltas).await?;

            let bank_account_id = self.resolve_bank_account(&db_tx, payment_method).await?;

            let total_minor = items_total_minor(&resolved);
            let kind = SaleKind::from_states(resolved.iter().map(|item| item.state));
            let mut sale = Sale::new(
                customer_id,
                deliveryman_id,
                payment_method,
                kind,
                total_minor,
                occurred_at,
            )?;
            let mut transaction = Transaction::new(
                TransactionDirection::Exit,
                TransactionCategory::Sale,
                total_minor,
                deliveryman_id,
                occurred_at,
            )?;
            transaction.reference_id = Some(sale.id);
            transaction.bank_account_id = bank_account_id;
            sale.transaction_id = Some(transaction.id);

            sales::ActiveModel::from(&sale).insert(&db_tx).await?;
            for item in &resolved {
                let product_id = util::parse_uuid(&item.variant.id, "product")?;
                let sale_item = SaleItem::new(
                    sale.id,
                    product_id,
                    item.state,
                    item.quantity,
                    item.unit_price_minor,
                )?;
                sale_items::ActiveModel::from(&sale_item)
                    .insert(&db_tx)
                    .await?;
            }
            transactions::ActiveModel::from(&transaction)
                .insert(&db_tx)
                .await?;

            self.persist_stock_quantities(&db_tx, preview).await?;

            if payment_method.is_on_credit() {
                let customer_active = customers::ActiveModel {
                    id: ActiveValue::Set(customer_model.id.clone()),
                    credit_balance_minor: ActiveValue::Set(
                        customer_model.credit_balance_minor + total_minor,
                    ),
                    ..Default::default()
                };
                customer_active.update(&db_tx).await?;
            }

            for item in &resolved {
                if item.state == BottleState::Comodato {
                    let product_id = util::parse_uuid(&item.variant.id, "product")?;
                    self.record_loan(&db_tx, customer_id, product_id, item.quantity)
                        .await?;
                }
            }

            Ok(sale.id)
        })
    }
}
