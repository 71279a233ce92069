//! Bank accounts that non-cash payment methods book against.
//!
//! One account serves each payment method. DINHEIRO and FIADO never resolve
//! to an account: cash lives with the deliveryman and credit lives on the
//! customer until settlement.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, payment::PaymentMethod};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: Uuid,
    pub name: String,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl BankAccount {
    pub fn new(name: String, payment_method: PaymentMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            payment_method,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub payment_method: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BankAccount> for ActiveModel {
    fn from(account: &BankAccount) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            name: ActiveValue::Set(account.name.clone()),
            payment_method: ActiveValue::Set(account.payment_method.as_str().to_string()),
            created_at: ActiveValue::Set(account.created_at),
        }
    }
}

impl TryFrom<Model> for BankAccount {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("bank account".to_string()))?,
            name: model.name,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            created_at: model.created_at,
        })
    }
}
