//! Customer directory.
//!
//! A customer owns the credit balance accrued by FIADO sales and, unless
//! generic, a loan account for bottles handed out in comodato. The walk-in
//! counter customer is a regular row with the `generic` flag raised instead
//! of a magic name the code would have to compare against.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub generic: bool,
    pub credit_balance_minor: i64,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: String, generic: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            generic,
            credit_balance_minor: 0,
            created_at: Utc::now(),
        }
    }

    /// Generic customers are anonymous walk-ins; bottles lent to them could
    /// never be collected back, so comodato is refused for them.
    #[must_use]
    pub const fn can_hold_loans(&self) -> bool {
        !self.generic
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub name_norm: String,
    pub generic: bool,
    pub credit_balance_minor: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
    #[sea_orm(has_many = "super::loan_accounts::Entity")]
    LoanAccounts,
    #[sea_orm(has_many = "super::collects::Entity")]
    CollectEvents,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::loan_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanAccounts.def()
    }
}

impl Related<super::collects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Customer> for ActiveModel {
    fn from(customer: &Customer) -> Self {
        Self {
            id: ActiveValue::Set(customer.id.to_string()),
            name: ActiveValue::Set(customer.name.clone()),
            name_norm: ActiveValue::Set(util::normalize_lookup_name(&customer.name)),
            generic: ActiveValue::Set(customer.generic),
            credit_balance_minor: ActiveValue::Set(customer.credit_balance_minor),
            created_at: ActiveValue::Set(customer.created_at),
        }
    }
}

impl TryFrom<Model> for Customer {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("customer".to_string()))?,
            name: model.name,
            generic: model.generic,
            credit_balance_minor: model.credit_balance_minor,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_customers_cannot_hold_loans() {
        let walk_in = Customer::new("Cliente Genérico".to_string(), true);
        let named = Customer::new("Maria".to_string(), false);

        assert!(!walk_in.can_hold_loans());
        assert!(named.can_hold_loans());
        assert_eq!(named.credit_balance_minor, 0);
    }
}
