//! Sale line items.
//!
//! A [`SaleItem`] is one line of a [`Sale`](crate::Sale): the resolved
//! product variant, the state it was sold under, the quantity and the unit
//! price locked in at sale time. `product_id` always points at the variant
//! matching `state`, never at a sibling.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, products::BottleState};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub state: BottleState,
    pub quantity: i64,
    pub unit_price_minor: i64,
}

impl SaleItem {
    pub fn new(
        sale_id: Uuid,
        product_id: Uuid,
        state: BottleState,
        quantity: i64,
        unit_price_minor: i64,
    ) -> ResultEngine<Self> {
        if quantity <= 0 {
            return Err(EngineError::InvalidQuantity(
                "quantity must be > 0".to_string(),
            ));
        }
        if unit_price_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "unit_price_minor must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            sale_id,
            product_id,
            state,
            quantity,
            unit_price_minor,
        })
    }

    /// Line subtotal in minor units.
    #[must_use]
    pub const fn subtotal_minor(&self) -> i64 {
        self.quantity * self.unit_price_minor
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sale_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub state: String,
    pub quantity: i64,
    pub unit_price_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sales::Entity",
        from = "Column::SaleId",
        to = "super::sales::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Sales,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Products,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SaleItem> for ActiveModel {
    fn from(item: &SaleItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            sale_id: ActiveValue::Set(item.sale_id.to_string()),
            product_id: ActiveValue::Set(item.product_id.to_string()),
            state: ActiveValue::Set(item.state.as_str().to_string()),
            quantity: ActiveValue::Set(item.quantity),
            unit_price_minor: ActiveValue::Set(item.unit_price_minor),
        }
    }
}

impl TryFrom<Model> for SaleItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("invalid sale item id".to_string()))?,
            sale_id: Uuid::parse_str(&model.sale_id)
                .map_err(|_| EngineError::NotFound("sale".to_string()))?,
            product_id: Uuid::parse_str(&model.product_id)
                .map_err(|_| EngineError::NotFound("product".to_string()))?,
            state: BottleState::try_from(model.state.as_str())?,
            quantity: model.quantity,
            unit_price_minor: model.unit_price_minor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtotal_multiplies_quantity_by_unit_price() {
        let item = SaleItem::new(Uuid::new_v4(), Uuid::new_v4(), BottleState::Full, 3, 12_50)
            .expect("valid item");
        assert_eq!(item.subtotal_minor(), 37_50);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = SaleItem::new(Uuid::new_v4(), Uuid::new_v4(), BottleState::Full, 0, 100)
            .expect_err("zero quantity must be rejected");
        assert_eq!(
            err,
            EngineError::InvalidQuantity("quantity must be > 0".to_string())
        );
    }
}
