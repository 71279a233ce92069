use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Customer, EngineError, ResultEngine, collects, customers, loan_accounts, sales, util,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Register a new customer. `generic` marks the anonymous walk-in row.
    pub async fn new_customer(&self, name: &str, generic: bool) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "customer")?;
        with_tx!(self, |db_tx| {
            let exists = customers::Entity::find()
                .filter(customers::Column::NameNorm.eq(util::normalize_lookup_name(&name)))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingEntry(format!("customer \"{name}\"")));
            }

            let customer = Customer::new(name.clone(), generic);
            customers::ActiveModel::from(&customer).insert(&db_tx).await?;
            Ok(customer.id)
        })
    }

    /// Renames an existing customer.
    pub async fn rename_customer(&self, customer_id: Uuid, new_name: &str) -> ResultEngine<()> {
        let new_name = normalize_required_name(new_name, "customer")?;
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;

            let exists = customers::Entity::find()
                .filter(customers::Column::NameNorm.eq(util::normalize_lookup_name(&new_name)))
                .filter(customers::Column::Id.ne(customer_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingEntry(format!("customer \"{new_name}\"")));
            }

            let active = customers::ActiveModel {
                id: ActiveValue::Set(customer_id.to_string()),
                name: ActiveValue::Set(new_name.clone()),
                name_norm: ActiveValue::Set(util::normalize_lookup_name(&new_name)),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Return a customer snapshot from DB.
    pub async fn customer(&self, customer_id: Uuid) -> ResultEngine<Customer> {
        with_tx!(self, |db_tx| {
            let model = self.require_customer(&db_tx, customer_id).await?;
            let customer = Customer::try_from(model)?;
            Ok(customer)
        })
    }

    pub async fn list_customers(&self) -> ResultEngine<Vec<Customer>> {
        with_tx!(self, |db_tx| {
            let models = customers::Entity::find()
                .order_by_asc(customers::Column::NameNorm)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Customer::try_from(model)?);
            }
            Ok(out)
        })
    }

    /// Customers currently carrying FIADO debt.
    pub async fn credit_customers(&self) -> ResultEngine<Vec<Customer>> {
        with_tx!(self, |db_tx| {
            let models = customers::Entity::find()
                .filter(customers::Column::CreditBalanceMinor.gt(0))
                .order_by_asc(customers::Column::NameNorm)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Customer::try_from(model)?);
            }
            Ok(out)
        })
    }

    /// Delete a customer. Refused while sales, a loan account or collect
    /// events still reference them.
    pub async fn delete_customer(&self, customer_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_customer(&db_tx, customer_id).await?;

            let referenced = sales::Entity::find()
                .filter(sales::Column::CustomerId.eq(customer_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some()
                || loan_accounts::Entity::find()
                    .filter(loan_accounts::Column::CustomerId.eq(customer_id.to_string()))
                    .one(&db_tx)
                    .await?
                    .is_some()
                || collects::Entity::find()
                    .filter(collects::Column::CustomerId.eq(customer_id.to_string()))
                    .one(&db_tx)
                    .await?
                    .is_some();
            if referenced {
                return Err(EngineError::ExistingEntry(format!(
                    "references to customer \"{}\"",
                    model.name
                )));
            }

            customers::Entity::delete_by_id(customer_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
