//! Financial transaction records.
//!
//! A `Transaction` mirrors money movement for the rest of the system: one
//! `Exit`/`Sale` row per registered sale (linked 1:1 through `reference_id`)
//! and one `Entry`/`Deposit` row each time a deliveryman hands cash over to
//! the company.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionDirection {
    Entry,
    Exit,
}

impl TransactionDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransactionDirection::Entry => "ENTRY",
            TransactionDirection::Exit => "EXIT",
        }
    }
}

impl TryFrom<&str> for TransactionDirection {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ENTRY" => Ok(TransactionDirection::Entry),
            "EXIT" => Ok(TransactionDirection::Exit),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction direction: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionCategory {
    Sale,
    Deposit,
}

impl TransactionCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransactionCategory::Sale => "SALE",
            TransactionCategory::Deposit => "DEPOSIT",
        }
    }
}

impl TryFrom<&str> for TransactionCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SALE" => Ok(TransactionCategory::Sale),
            "DEPOSIT" => Ok(TransactionCategory::Deposit),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub direction: TransactionDirection,
    pub category: TransactionCategory,
    pub amount_minor: i64,
    pub deliveryman_id: Uuid,
    pub reference_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        direction: TransactionDirection,
        category: TransactionCategory,
        amount_minor: i64,
        deliveryman_id: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            direction,
            category,
            amount_minor,
            deliveryman_id,
            reference_id: None,
            bank_account_id: None,
            occurred_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub direction: String,
    pub category: String,
    pub amount_minor: i64,
    pub deliveryman_id: String,
    pub reference_id: Option<String>,
    pub bank_account_id: Option<String>,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deliverymen::Entity",
        from = "Column::DeliverymanId",
        to = "super::deliverymen::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Deliverymen,
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    BankAccounts,
}

impl Related<super::deliverymen::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deliverymen.def()
    }
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            direction: ActiveValue::Set(tx.direction.as_str().to_string()),
            category: ActiveValue::Set(tx.category.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            deliveryman_id: ActiveValue::Set(tx.deliveryman_id.to_string()),
            reference_id: ActiveValue::Set(tx.reference_id.map(|id| id.to_string())),
            bank_account_id: ActiveValue::Set(tx.bank_account_id.map(|id| id.to_string())),
            occurred_at: ActiveValue::Set(tx.occurred_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("transaction".to_string()))?,
            direction: TransactionDirection::try_from(model.direction.as_str())?,
            category: TransactionCategory::try_from(model.category.as_str())?,
            amount_minor: model.amount_minor,
            deliveryman_id: Uuid::parse_str(&model.deliveryman_id)
                .map_err(|_| EngineError::NotFound("deliveryman".to_string()))?,
            reference_id: model.reference_id.and_then(|s| Uuid::parse_str(&s).ok()),
            bank_account_id: model.bank_account_id.and_then(|s| Uuid::parse_str(&s).ok()),
            occurred_at: model.occurred_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_and_category_round_trip() {
        assert_eq!(
            TransactionDirection::try_from("entry"),
            Ok(TransactionDirection::Entry)
        );
        assert_eq!(
            TransactionCategory::try_from("DEPOSIT"),
            Ok(TransactionCategory::Deposit)
        );
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let err = Transaction::new(
            TransactionDirection::Exit,
            TransactionCategory::Sale,
            -10,
            Uuid::new_v4(),
            Utc::now(),
        )
        .expect_err("negative amount must be rejected");
        assert_eq!(
            err,
            EngineError::InvalidAmount("amount_minor must be >= 0".to_string())
        );
    }
}
