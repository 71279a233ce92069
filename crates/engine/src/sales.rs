//! Sale aggregate.
//!
//! A `Sale` is the atomic commercial event: one customer, one deliveryman,
//! one payment method, a set of line items. Registering, editing and deleting
//! a sale all move the stock ledger, the loan ledger and the financial
//! records together or not at all.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, payment::PaymentMethod, products::BottleState, sale_items};

/// Commercial kind of a sale, derived from its items: `Comodato` when any
/// line lends bottles out, plain `Full` otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleKind {
    Full,
    Comodato,
}

impl SaleKind {
    /// Canonical stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SaleKind::Full => "FULL",
            SaleKind::Comodato => "COMODATO",
        }
    }

    /// Derive the kind from the states of the line items.
    pub fn from_states<I>(states: I) -> Self
    where
        I: IntoIterator<Item = BottleState>,
    {
        if states
            .into_iter()
            .any(|state| state == BottleState::Comodato)
        {
            SaleKind::Comodato
        } else {
            SaleKind::Full
        }
    }
}

impl TryFrom<&str> for SaleKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FULL" => Ok(SaleKind::Full),
            "COMODATO" => Ok(SaleKind::Comodato),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid sale kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub deliveryman_id: Uuid,
    pub payment_method: PaymentMethod,
    pub kind: SaleKind,
    pub total_minor: i64,
    pub transaction_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
    pub items: Vec<sale_items::SaleItem>,
}

impl Sale {
    pub fn new(
        customer_id: Uuid,
        deliveryman_id: Uuid,
        payment_method: PaymentMethod,
        kind: SaleKind,
        total_minor: i64,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if total_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "total_minor must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            customer_id,
            deliveryman_id,
            payment_method,
            kind,
            total_minor,
            transaction_id: None,
            occurred_at,
            settled_at: None,
            items: Vec::new(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub deliveryman_id: String,
    pub payment_method: String,
    pub kind: String,
    pub total_minor: i64,
    pub transaction_id: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub settled_at: Option<DateTimeUtc>,
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
    #[sea_orm(
        belongs_to = "super::deliverymen::Entity",
        from = "Column::DeliverymanId",
        to = "super::deliverymen::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Deliverymen,
    #[sea_orm(has_many = "super::sale_items::Entity")]
    SaleItems,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::deliverymen::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deliverymen.def()
    }
}

impl Related<super::sale_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Sale> for ActiveModel {
    fn from(sale: &Sale) -> Self {
        Self {
            id: ActiveValue::Set(sale.id.to_string()),
            customer_id: ActiveValue::Set(sale.customer_id.to_string()),
            deliveryman_id: ActiveValue::Set(sale.deliveryman_id.to_string()),
            payment_method: ActiveValue::Set(sale.payment_method.as_str().to_string()),
            kind: ActiveValue::Set(sale.kind.as_str().to_string()),
            total_minor: ActiveValue::Set(sale.total_minor),
            transaction_id: ActiveValue::Set(sale.transaction_id.map(|id| id.to_string())),
            occurred_at: ActiveValue::Set(sale.occurred_at),
            settled_at: ActiveValue::Set(sale.settled_at),
        }
    }
}

impl TryFrom<Model> for Sale {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("sale".to_string()))?,
            customer_id: Uuid::parse_str(&model.customer_id)
                .map_err(|_| EngineError::NotFound("customer".to_string()))?,
            deliveryman_id: Uuid::parse_str(&model.deliveryman_id)
                .map_err(|_| EngineError::NotFound("deliveryman".to_string()))?,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            kind: SaleKind::try_from(model.kind.as_str())?,
            total_minor: model.total_minor,
            transaction_id: model
                .transaction_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
            occurred_at: model.occurred_at,
            settled_at: model.settled_at,
            items: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_the_items() {
        assert_eq!(
            SaleKind::from_states([BottleState::Full, BottleState::Empty]),
            SaleKind::Full
        );
        assert_eq!(
            SaleKind::from_states([BottleState::Full, BottleState::Comodato]),
            SaleKind::Comodato
        );
        assert_eq!(SaleKind::from_states([]), SaleKind::Full);
    }

    #[test]
    fn new_sale_rejects_negative_total() {
        let err = Sale::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            PaymentMethod::Dinheiro,
            SaleKind::Full,
            -1,
            Utc::now(),
        )
        .expect_err("negative total must be rejected");
        assert_eq!(
            err,
            EngineError::InvalidAmount("total_minor must be >= 0".to_string())
        );
    }
}
