//! Loan ledger, aggregate side.
//!
//! One account per customer, created lazily on the first comodato sale. The
//! account keeps a denormalized bottle total that must always equal the sum
//! of its [`loan_lines`](crate::loan_lines) quantities; every mutation in the
//! engine updates both sides in the same DB transaction.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanAccount {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub total_quantity: i64,
}

impl LoanAccount {
    pub fn new(customer_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            total_quantity: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "loan_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub total_quantity: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Customers,
    #[sea_orm(has_many = "super::loan_lines::Entity")]
    LoanLines,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::loan_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LoanAccount> for ActiveModel {
    fn from(account: &LoanAccount) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            customer_id: ActiveValue::Set(account.customer_id.to_string()),
            total_quantity: ActiveValue::Set(account.total_quantity),
        }
    }
}

impl TryFrom<Model> for LoanAccount {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("loan account".to_string()))?,
            customer_id: Uuid::parse_str(&model.customer_id)
                .map_err(|_| EngineError::NotFound("customer".to_string()))?,
            total_quantity: model.total_quantity,
        })
    }
}
