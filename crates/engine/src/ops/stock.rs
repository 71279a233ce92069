//! Stock ledger.
//!
//! All stock movement flows through signed per-variant deltas. An operation
//! accumulates every delta it needs into one preview (models loaded inside
//! the surrounding DB transaction), validates that no counter would drop
//! below zero, and only then writes the resulting quantities back. Either the
//! whole operation lands or none of it does.

use std::collections::HashMap;

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, products, products::BottleState};

use super::{Engine, with_tx};

/// Expand one sold line into the signed deltas it applies, keyed by the
/// state of the variant each delta hits.
///
/// Selling FULL hands a sealed unit over outright. Selling EMPTY is a refill
/// exchange: the customer's returnable comes in while a sealed unit goes
/// out. Selling COMODATO lends a sealed unit out, so the on-loan counter
/// grows as the warehouse shrinks. Negative quantities yield the exact
/// algebraic inverse, which is how deletions and downgrades reverse a sale.
pub(super) fn paired_deltas(state: BottleState, quantity: i64) -> Vec<(BottleState, i64)> {
    match state {
        BottleState::Full => vec![(BottleState::Full, -quantity)],
        BottleState::Empty => vec![
            (BottleState::Empty, quantity),
            (BottleState::Full, -quantity),
        ],
        BottleState::Comodato => vec![
            (BottleState::Comodato, quantity),
            (BottleState::Full, -quantity),
        ],
    }
}

impl Engine {
    /// Accumulate `(variant_id, delta)` pairs into resulting quantities and
    /// refuse the whole batch if any counter would go negative.
    pub(super) async fn preview_stock_deltas(
        &self,
        db_tx: &DatabaseTransaction,
        deltas: &[(String, i64)],
    ) -> ResultEngine<HashMap<String, (products::Model, i64)>> {
        let mut preview: HashMap<String, (products::Model, i64)> = HashMap::new();

        for (product_id, delta) in deltas {
            if !preview.contains_key(product_id) {
                let model = products::Entity::find_by_id(product_id.clone())
                    .one(db_tx)
                    .await?
                    .ok_or_else(|| {
                        EngineError::NotFound(format!("product \"{product_id}\""))
                    })?;
                let quantity = model.quantity;
                preview.insert(product_id.clone(), (model, quantity));
            }
            if let Some((_, quantity)) = preview.get_mut(product_id) {
                *quantity += delta;
            }
        }

        for (model, quantity) in preview.values() {
            if *quantity < 0 {
                return Err(EngineError::InsufficientStock(format!(
                    "product \"{}\" ({}) has {}, would reach {}",
                    model.name, model.state, model.quantity, quantity
                )));
            }
        }

        Ok(preview)
    }

    pub(super) async fn persist_stock_quantities(
        &self,
        db_tx: &DatabaseTransaction,
        preview: HashMap<String, (products::Model, i64)>,
    ) -> ResultEngine<()> {
        for (product_id, (_, quantity)) in preview {
            let product_model = products::ActiveModel {
                id: ActiveValue::Set(product_id),
                quantity: ActiveValue::Set(quantity),
                ..Default::default()
            };
            product_model.update(db_tx).await?;
        }
        Ok(())
    }

    /// Apply a single guarded adjustment to one variant and return the new
    /// quantity.
    pub async fn adjust_stock(&self, product_id: Uuid, delta: i64) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            let deltas = [(product_id.to_string(), delta)];
            let preview = self.preview_stock_deltas(&db_tx, &deltas).await?;
            let quantity = preview
                .get(&product_id.to_string())
                .map(|(_, quantity)| *quantity)
                .ok_or_else(|| {
                    EngineError::InconsistentState("stock preview lost a variant".to_string())
                })?;
            self.persist_stock_quantities(&db_tx, preview).await?;
            Ok(quantity)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_sale_only_drains_full() {
        assert_eq!(
            paired_deltas(BottleState::Full, 4),
            vec![(BottleState::Full, -4)]
        );
    }

    #[test]
    fn empty_sale_is_a_refill_exchange() {
        assert_eq!(
            paired_deltas(BottleState::Empty, 4),
            vec![(BottleState::Empty, 4), (BottleState::Full, -4)]
        );
    }

    #[test]
    fn comodato_sale_moves_stock_on_loan() {
        assert_eq!(
            paired_deltas(BottleState::Comodato, 3),
            vec![(BottleState::Comodato, 3), (BottleState::Full, -3)]
        );
    }

    #[test]
    fn negative_quantity_is_the_exact_inverse() {
        for state in [BottleState::Full, BottleState::Empty, BottleState::Comodato] {
            let forward = paired_deltas(state, 5);
            let reverse = paired_deltas(state, -5);
            assert_eq!(forward.len(), reverse.len());
            for ((state_f, delta_f), (state_r, delta_r)) in forward.iter().zip(reverse.iter()) {
                assert_eq!(state_f, state_r);
                assert_eq!(*delta_f, -delta_r);
            }
        }
    }
}
