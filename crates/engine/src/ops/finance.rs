//! Money side of the book: FIADO settlement, cash deposits and the
//! financial record listing.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    DepositCmd, EngineError, PaymentMethod, ResultEngine, Transaction, TransactionCategory,
    TransactionDirection, customers, sales, transactions, util,
};

use super::{Engine, with_tx};

/// Filters for listing financial records.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub deliveryman_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If present, acts as an allow-list of categories to return.
    pub categories: Option<Vec<TransactionCategory>>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidAmount(
            "invalid range: from must be < to".to_string(),
        ));
    }
    if filter.categories.as_ref().is_some_and(|c| c.is_empty()) {
        return Err(EngineError::InvalidAmount(
            "categories must not be empty".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(deliveryman_id) = filter.deliveryman_id {
            self = self.filter(
                transactions::Column::DeliverymanId.eq(deliveryman_id.to_string()),
            );
        }
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::OccurredAt.lt(to));
        }
        if let Some(categories) = &filter.categories {
            let categories: Vec<String> =
                categories.iter().map(|c| c.as_str().to_string()).collect();
            self = self.filter(transactions::Column::Category.is_in(categories));
        }

        self
    }
}

impl Engine {
    /// Mark one outstanding FIADO sale as settled and stamp the receiving
    /// bank account onto its financial record. Leaves the customer's credit
    /// balance patching to the caller so batch settlement nets one write.
    async fn settle_sale_in_tx(
        &self,
        db_tx: &DatabaseTransaction,
        sale_model: &sales::Model,
        bank_account_id: Uuid,
    ) -> ResultEngine<()> {
        if sale_model.payment_method != PaymentMethod::Fiado.as_str()
            || sale_model.settled_at.is_some()
        {
            return Err(EngineError::NotFound(format!(
                "outstanding fiado sale \"{}\"",
                sale_model.id
            )));
        }

        let transaction_id = sale_model.transaction_id.clone().ok_or_else(|| {
            EngineError::InconsistentState(format!(
                "sale \"{}\" has no financial record",
                sale_model.id
            ))
        })?;

        let tx_active = transactions::ActiveModel {
            id: ActiveValue::Set(transaction_id),
            bank_account_id: ActiveValue::Set(Some(bank_account_id.to_string())),
            ..Default::default()
        };
        tx_active.update(db_tx).await?;

        let sale_active = sales::ActiveModel {
            id: ActiveValue::Set(sale_model.id.clone()),
            settled_at: ActiveValue::Set(Some(Utc::now())),
            ..Default::default()
        };
        sale_active.update(db_tx).await?;

        Ok(())
    }

    async fn drain_customer_credit(
        &self,
        db_tx: &DatabaseTransaction,
        customer_model: &customers::Model,
        amount_minor: i64,
    ) -> ResultEngine<()> {
        let new_balance = customer_model.credit_balance_minor - amount_minor;
        if new_balance < 0 {
            return Err(EngineError::InconsistentState(format!(
                "customer \"{}\" credit balance would go below zero",
                customer_model.name
            )));
        }

        let customer_active = customers::ActiveModel {
            id: ActiveValue::Set(customer_model.id.clone()),
            credit_balance_minor: ActiveValue::Set(new_balance),
            ..Default::default()
        };
        customer_active.update(db_tx).await?;
        Ok(())
    }

    /// Settle a single FIADO sale into a bank account.
    pub async fn settle_sale(&self, sale_id: Uuid, bank_account_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let sale_model = self.require_sale(&db_tx, sale_id).await?;
            self.require_bank_account(&db_tx, bank_account_id).await?;
            self.settle_sale_in_tx(&db_tx, &sale_model, bank_account_id)
                .await?;

            let customer_id = util::parse_uuid(&sale_model.customer_id, "customer")?;
            let customer_model = self.require_customer(&db_tx, customer_id).await?;
            self.drain_customer_credit(&db_tx, &customer_model, sale_model.total_minor)
                .await?;
            Ok(())
        })
    }

    /// Settle every outstanding FIADO sale for one customer and return how
    /// many were settled.
    pub async fn settle_customer_sales(
        &self,
        customer_id: Uuid,
        bank_account_id: Uuid,
    ) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            let customer_model = self.require_customer(&db_tx, customer_id).await?;
            self.require_bank_account(&db_tx, bank_account_id).await?;

            let sale_models = sales::Entity::find()
                .filter(sales::Column::CustomerId.eq(customer_id.to_string()))
                .filter(sales::Column::PaymentMethod.eq(PaymentMethod::Fiado.as_str()))
                .filter(sales::Column::SettledAt.is_null())
                .all(&db_tx)
                .await?;

            let mut settled_total = 0i64;
            for sale_model in &sale_models {
                self.settle_sale_in_tx(&db_tx, sale_model, bank_account_id)
                    .await?;
                settled_total += sale_model.total_minor;
            }
            if settled_total > 0 {
                self.drain_customer_credit(&db_tx, &customer_model, settled_total)
                    .await?;
            }

            Ok(sale_models.len() as u64)
        })
    }

    /// Total of unsettled DINHEIRO sales minus total deposits, the cash a
    /// deliveryman is currently holding.
    pub(super) async fn cash_balance_in_tx(
        &self,
        db_tx: &DatabaseTransaction,
        deliveryman_id: Uuid,
    ) -> ResultEngine<i64> {
        let sale_models = sales::Entity::find()
            .filter(sales::Column::DeliverymanId.eq(deliveryman_id.to_string()))
            .filter(sales::Column::PaymentMethod.eq(PaymentMethod::Dinheiro.as_str()))
            .filter(sales::Column::SettledAt.is_null())
            .all(db_tx)
            .await?;
        let collected: i64 = sale_models.iter().map(|sale| sale.total_minor).sum();

        let deposit_models = transactions::Entity::find()
            .filter(transactions::Column::DeliverymanId.eq(deliveryman_id.to_string()))
            .filter(transactions::Column::Category.eq(TransactionCategory::Deposit.as_str()))
            .all(db_tx)
            .await?;
        let deposited: i64 = deposit_models.iter().map(|tx| tx.amount_minor).sum();

        Ok(collected - deposited)
    }

    pub async fn deliveryman_cash_balance(&self, deliveryman_id: Uuid) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            self.require_deliveryman(&db_tx, deliveryman_id).await?;
            let balance = self.cash_balance_in_tx(&db_tx, deliveryman_id).await?;
            Ok(balance)
        })
    }

    /// Book the cash a deliveryman hands over as an `Entry/Deposit` record.
    pub async fn register_deposit(&self, cmd: DepositCmd) -> ResultEngine<Uuid> {
        let DepositCmd {
            deliveryman_id,
            bank_account_id,
            amount_minor,
            occurred_at,
        } = cmd;

        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let deliveryman_model = self.require_deliveryman(&db_tx, deliveryman_id).await?;
            self.require_bank_account(&db_tx, bank_account_id).await?;

            let holding = self.cash_balance_in_tx(&db_tx, deliveryman_id).await?;
            if holding != amount_minor {
                tracing::warn!(
                    deliveryman = %deliveryman_model.name,
                    holding,
                    deposited = amount_minor,
                    "deposit does not match the cash held by the deliveryman"
                );
            }

            let mut transaction = Transaction::new(
                TransactionDirection::Entry,
                TransactionCategory::Deposit,
                amount_minor,
                deliveryman_id,
                occurred_at,
            )?;
            transaction.bank_account_id = Some(bank_account_id);
            transactions::ActiveModel::from(&transaction)
                .insert(&db_tx)
                .await?;
            Ok(transaction.id)
        })
    }

    /// Financial records, newest first.
    pub async fn list_transactions(
        &self,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            validate_list_filter(filter)?;

            let models = transactions::Entity::find()
                .apply_tx_filters(filter)
                .order_by_desc(transactions::Column::OccurredAt)
                .order_by_desc(transactions::Column::Id)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Transaction::try_from(model)?);
            }
            Ok(out)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_ranges() {
        let filter = TransactionListFilter {
            from: Some(Utc::now()),
            to: Some(Utc::now() - chrono::Duration::hours(1)),
            ..Default::default()
        };
        assert!(matches!(
            validate_list_filter(&filter),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_empty_category_lists() {
        let filter = TransactionListFilter {
            categories: Some(Vec::new()),
            ..Default::default()
        };
        assert!(matches!(
            validate_list_filter(&filter),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
