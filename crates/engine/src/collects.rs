//! Collection audit trail.
//!
//! Every manual collection of loaned bottles appends one `CollectEvent`.
//! Events are never updated or deleted; automatic ledger decrements caused
//! by sale edits or deletions do not appear here.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectEvent {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub collected_at: DateTime<Utc>,
}

impl CollectEvent {
    pub fn new(
        customer_id: Uuid,
        product_id: Uuid,
        quantity: i64,
        collected_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if quantity <= 0 {
            return Err(EngineError::InvalidQuantity(
                "quantity must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            customer_id,
            product_id,
            quantity,
            collected_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "collect_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub collected_at: DateTimeUtc,
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
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Products,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CollectEvent> for ActiveModel {
    fn from(event: &CollectEvent) -> Self {
        Self {
            id: ActiveValue::Set(event.id.to_string()),
            customer_id: ActiveValue::Set(event.customer_id.to_string()),
            product_id: ActiveValue::Set(event.product_id.to_string()),
            quantity: ActiveValue::Set(event.quantity),
            collected_at: ActiveValue::Set(event.collected_at),
        }
    }
}

impl TryFrom<Model> for CollectEvent {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("collect event".to_string()))?,
            customer_id: Uuid::parse_str(&model.customer_id)
                .map_err(|_| EngineError::NotFound("customer".to_string()))?,
            product_id: Uuid::parse_str(&model.product_id)
                .map_err(|_| EngineError::NotFound("product".to_string()))?,
            quantity: model.quantity,
            collected_at: model.collected_at,
        })
    }
}
