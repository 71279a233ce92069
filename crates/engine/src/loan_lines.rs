//! Loan ledger, per-product side.
//!
//! One line per `(account, product)` pair, quantity never below zero. Lines
//! stay at zero after full collection so the history of a pairing remains
//! visible in reads.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanLine {
    pub id: Uuid,
    pub account_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
}

impl LoanLine {
    pub fn new(account_id: Uuid, product_id: Uuid, quantity: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            product_id,
            quantity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "loan_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::loan_accounts::Entity",
        from = "Column::AccountId",
        to = "super::loan_accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    LoanAccounts,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Products,
}

impl Related<super::loan_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanAccounts.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LoanLine> for ActiveModel {
    fn from(line: &LoanLine) -> Self {
        Self {
            id: ActiveValue::Set(line.id.to_string()),
            account_id: ActiveValue::Set(line.account_id.to_string()),
            product_id: ActiveValue::Set(line.product_id.to_string()),
            quantity: ActiveValue::Set(line.quantity),
        }
    }
}

impl TryFrom<Model> for LoanLine {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("invalid loan line id".to_string()))?,
            account_id: Uuid::parse_str(&model.account_id)
                .map_err(|_| EngineError::NotFound("loan account".to_string()))?,
            product_id: Uuid::parse_str(&model.product_id)
                .map_err(|_| EngineError::NotFound("product".to_string()))?,
            quantity: model.quantity,
        })
    }
}
