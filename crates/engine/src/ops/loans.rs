//! Loan ledger.
//!
//! Tracks how many bottles each customer holds in comodato, aggregated per
//! account and broken down per product. The ledger only moves inside the
//! DB transaction of the operation that causes the movement (sale register,
//! sale edit, sale delete, manual collection).

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, LoanAccount, LoanLine, ResultEngine, loan_accounts, loan_lines, util,
};

use super::{Engine, with_tx};

impl Engine {
    /// Load a customer's loan account with its lines, verifying that the
    /// denormalized total still equals the sum of the lines.
    pub(super) async fn load_loan_account(
        &self,
        db_tx: &DatabaseTransaction,
        customer_id: Uuid,
    ) -> ResultEngine<Option<(loan_accounts::Model, Vec<loan_lines::Model>)>> {
        let Some(account_model) = loan_accounts::Entity::find()
            .filter(loan_accounts::Column::CustomerId.eq(customer_id.to_string()))
            .one(db_tx)
            .await?
        else {
            return Ok(None);
        };

        let line_models = loan_lines::Entity::find()
            .filter(loan_lines::Column::AccountId.eq(account_model.id.clone()))
            .all(db_tx)
            .await?;

        let line_sum: i64 = line_models.iter().map(|line| line.quantity).sum();
        if account_model.total_quantity != line_sum
            || account_model.total_quantity < 0
            || line_models.iter().any(|line| line.quantity < 0)
        {
            return Err(EngineError::InconsistentState(format!(
                "loan account for customer \"{customer_id}\" is out of balance"
            )));
        }

        Ok(Some((account_model, line_models)))
    }

    /// Add `quantity` bottles of `product_id` to the customer's ledger,
    /// creating the account and the line on first use.
    pub(super) async fn record_loan(
        &self,
        db_tx: &DatabaseTransaction,
        customer_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> ResultEngine<()> {
        if quantity <= 0 {
            return Err(EngineError::InvalidQuantity(
                "loan quantity must be > 0".to_string(),
            ));
        }

        let (account_model, line_models) =
            match self.load_loan_account(db_tx, customer_id).await? {
                Some(loaded) => loaded,
                None => {
                    let account = LoanAccount::new(customer_id);
                    let model = loan_accounts::ActiveModel::from(&account)
                        .insert(db_tx)
                        .await?;
                    (model, Vec::new())
                }
            };

        match line_models
            .iter()
            .find(|line| line.product_id == product_id.to_string())
        {
            Some(line_model) => {
                let line_active = loan_lines::ActiveModel {
                    id: ActiveValue::Set(line_model.id.clone()),
                    quantity: ActiveValue::Set(line_model.quantity + quantity),
                    ..Default::default()
                };
                line_active.update(db_tx).await?;
            }
            None => {
                let account_id = util::parse_uuid(&account_model.id, "loan account")?;
                let line = LoanLine::new(account_id, product_id, quantity);
                loan_lines::ActiveModel::from(&line).insert(db_tx).await?;
            }
        }

        let account_active = loan_accounts::ActiveModel {
            id: ActiveValue::Set(account_model.id),
            total_quantity: ActiveValue::Set(account_model.total_quantity + quantity),
            ..Default::default()
        };
        account_active.update(db_tx).await?;

        Ok(())
    }

    /// Take `quantity` bottles of `product_id` off the customer's ledger.
    ///
    /// Fails with `InsufficientLoanBalance` when the per-product line holds
    /// fewer bottles than requested. Lines drained to zero stay in place.
    pub(super) async fn record_collection(
        &self,
        db_tx: &DatabaseTransaction,
        customer_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> ResultEngine<()> {
        if quantity <= 0 {
            return Err(EngineError::InvalidQuantity(
                "collection quantity must be > 0".to_string(),
            ));
        }

        let (account_model, line_models) = self
            .load_loan_account(db_tx, customer_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(format!("loan account for customer \"{customer_id}\""))
            })?;

        let line_model = line_models
            .iter()
            .find(|line| line.product_id == product_id.to_string())
            .ok_or_else(|| {
                EngineError::NotFound(format!("loan line for product \"{product_id}\""))
            })?;

        if line_model.quantity < quantity {
            return Err(EngineError::InsufficientLoanBalance(format!(
                "product \"{}\" has {} on loan, asked to collect {}",
                product_id, line_model.quantity, quantity
            )));
        }

        let line_active = loan_lines::ActiveModel {
            id: ActiveValue::Set(line_model.id.clone()),
            quantity: ActiveValue::Set(line_model.quantity - quantity),
            ..Default::default()
        };
        line_active.update(db_tx).await?;

        let account_active = loan_accounts::ActiveModel {
            id: ActiveValue::Set(account_model.id),
            total_quantity: ActiveValue::Set(account_model.total_quantity - quantity),
            ..Default::default()
        };
        account_active.update(db_tx).await?;

        Ok(())
    }

    /// Return a customer's loan account and its per-product lines.
    pub async fn loan_account(
        &self,
        customer_id: Uuid,
    ) -> ResultEngine<(LoanAccount, Vec<LoanLine>)> {
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;
            let (account_model, line_models) = self
                .load_loan_account(&db_tx, customer_id)
                .await?
                .ok_or_else(|| {
                    EngineError::NotFound(format!("loan account for customer \"{customer_id}\""))
                })?;

            let account = LoanAccount::try_from(account_model)?;
            let mut lines = Vec::with_capacity(line_models.len());
            for line_model in line_models {
                lines.push(LoanLine::try_from(line_model)?);
            }

            Ok((account, lines))
        })
    }
}
