use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{BankAccount, EngineError, PaymentMethod, ResultEngine, bank_accounts};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Register the receiving account for a payment method. One account
    /// per method; DINHEIRO and FIADO never settle into an account.
    pub async fn new_bank_account(
        &self,
        name: &str,
        payment_method: PaymentMethod,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "bank account")?;
        if !payment_method.requires_bank_account() {
            return Err(EngineError::InvalidAmount(format!(
                "payment method {payment_method} does not settle into a bank account"
            )));
        }

        with_tx!(self, |db_tx| {
            let exists = bank_accounts::Entity::find()
                .filter(bank_accounts::Column::PaymentMethod.eq(payment_method.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingEntry(format!(
                    "bank account for {payment_method}"
                )));
            }

            let account = BankAccount::new(name.clone(), payment_method);
            bank_accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(account.id)
        })
    }

    pub async fn list_bank_accounts(&self) -> ResultEngine<Vec<BankAccount>> {
        with_tx!(self, |db_tx| {
            let models = bank_accounts::Entity::find()
                .order_by_asc(bank_accounts::Column::PaymentMethod)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(BankAccount::try_from(model)?);
            }
            Ok(out)
        })
    }
}
