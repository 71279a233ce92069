//! Deliveryman directory.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliveryman {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Deliveryman {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "deliverymen")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub name_norm: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Deliveryman> for ActiveModel {
    fn from(deliveryman: &Deliveryman) -> Self {
        Self {
            id: ActiveValue::Set(deliveryman.id.to_string()),
            name: ActiveValue::Set(deliveryman.name.clone()),
            name_norm: ActiveValue::Set(util::normalize_lookup_name(&deliveryman.name)),
            created_at: ActiveValue::Set(deliveryman.created_at),
        }
    }
}

impl TryFrom<Model> for Deliveryman {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("deliveryman".to_string()))?,
            name: model.name,
            created_at: model.created_at,
        })
    }
}
