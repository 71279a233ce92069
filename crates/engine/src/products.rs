//! Product variants and the stock counters they carry.
//!
//! A "product" row is one *variant*: the pairing of a product name with the
//! physical state of its container. `Botijão P13` therefore shows up as up to
//! three rows (FULL, EMPTY, COMODATO), each with its own quantity and price.
//! The stock ledger only ever moves quantities between variants of the same
//! name.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util};

/// Physical state of the bottles counted by a product variant.
///
/// - `Full` — sealed units in the warehouse, ready to sell.
/// - `Empty` — returnable containers taken back from customers.
/// - `Comodato` — units currently out on loan to customers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BottleState {
    Full,
    Empty,
    Comodato,
}

impl BottleState {
    /// Canonical stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BottleState::Full => "FULL",
            BottleState::Empty => "EMPTY",
            BottleState::Comodato => "COMODATO",
        }
    }
}

impl core::fmt::Display for BottleState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BottleState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FULL" => Ok(BottleState::Full),
            "EMPTY" => Ok(BottleState::Empty),
            "COMODATO" => Ok(BottleState::Comodato),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid bottle state: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub state: BottleState,
    pub quantity: i64,
    pub price_minor: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: String,
        state: BottleState,
        quantity: i64,
        price_minor: i64,
    ) -> ResultEngine<Self> {
        if quantity < 0 {
            return Err(EngineError::InvalidQuantity(
                "quantity must be >= 0".to_string(),
            ));
        }
        if price_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "price_minor must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            state,
            quantity,
            price_minor,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub name_norm: String,
    pub state: String,
    pub quantity: i64,
    pub price_minor: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sale_items::Entity")]
    SaleItems,
    #[sea_orm(has_many = "super::loan_lines::Entity")]
    LoanLines,
    #[sea_orm(has_many = "super::collects::Entity")]
    CollectEvents,
}

impl Related<super::sale_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleItems.def()
    }
}

impl Related<super::loan_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanLines.def()
    }
}

impl Related<super::collects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        Self {
            id: ActiveValue::Set(product.id.to_string()),
            name: ActiveValue::Set(product.name.clone()),
            name_norm: ActiveValue::Set(util::normalize_lookup_name(&product.name)),
            state: ActiveValue::Set(product.state.as_str().to_string()),
            quantity: ActiveValue::Set(product.quantity),
            price_minor: ActiveValue::Set(product.price_minor),
            created_at: ActiveValue::Set(product.created_at),
        }
    }
}

impl TryFrom<Model> for Product {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("product".to_string()))?,
            name: model.name,
            state: BottleState::try_from(model.state.as_str())?,
            quantity: model.quantity,
            price_minor: model.price_minor,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_labels_round_trip() {
        for state in [BottleState::Full, BottleState::Empty, BottleState::Comodato] {
            assert_eq!(BottleState::try_from(state.as_str()), Ok(state));
        }
    }

    #[test]
    fn new_product_rejects_negative_quantity() {
        let err = Product::new("Botijão P13".to_string(), BottleState::Full, -1, 100)
            .expect_err("negative quantity must be rejected");
        assert_eq!(
            err,
            EngineError::InvalidQuantity("quantity must be >= 0".to_string())
        );
    }

    #[test]
    fn new_product_rejects_negative_price() {
        let err = Product::new("Botijão P13".to_string(), BottleState::Full, 10, -5)
            .expect_err("negative price must be rejected");
        assert_eq!(
            err,
            EngineError::InvalidAmount("price_minor must be >= 0".to_string())
        );
    }
}
