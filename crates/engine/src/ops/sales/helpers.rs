use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    BottleState, EngineError, ResultEngine, SaleItemInput, customers, products, sale_items, util,
};

use super::super::Engine;
use super::super::stock::paired_deltas;

/// A sale line resolved against the catalog: the variant row being sold and
/// the FULL sibling the paired movement runs against.
pub(super) struct ResolvedItem {
    pub(super) variant: products::Model,
    pub(super) state: BottleState,
    pub(super) full_variant_id: String,
    pub(super) quantity: i64,
    pub(super) unit_price_minor: i64,
}

pub(super) fn validate_items(items: &[SaleItemInput]) -> ResultEngine<()> {
    if items.is_empty() {
        return Err(EngineError::InvalidQuantity(
            "sale must have at least one item".to_string(),
        ));
    }
    for item in items {
        if item.quantity <= 0 {
            return Err(EngineError::InvalidQuantity(
                "quantity must be > 0".to_string(),
            ));
        }
        if item.unit_price_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "unit_price_minor must be >= 0".to_string(),
            ));
        }
    }
    Ok(())
}

/// Totals are always recomputed from the lines; client figures are ignored.
pub(super) fn items_total_minor(items: &[ResolvedItem]) -> i64 {
    items
        .iter()
        .map(|item| item.quantity * item.unit_price_minor)
        .sum()
}

/// Stock deltas for `quantity` units of one line. FULL legs of the paired
/// movement land on the line's FULL sibling, the rest on the sold variant.
pub(super) fn stock_deltas(item: &ResolvedItem, quantity: i64) -> Vec<(String, i64)> {
    paired_deltas(item.state, quantity)
        .into_iter()
        .map(|(target_state, delta)| {
            let target_id = if target_state == BottleState::Full {
                item.full_variant_id.clone()
            } else {
                item.variant.id.clone()
            };
            (target_id, delta)
        })
        .collect()
}

/// The generic walk-in customer cannot take bottles on loan.
pub(super) fn ensure_comodato_customer(
    customer: &customers::Model,
    items: &[ResolvedItem],
) -> ResultEngine<()> {
    let wants_loan = items.iter().any(|item| item.state == BottleState::Comodato);
    if wants_loan && customer.generic {
        return Err(EngineError::InvalidComodatoCustomer(format!(
            "\"{}\"",
            customer.name
        )));
    }
    Ok(())
}

impl Engine {
    pub(super) async fn resolve_input_items(
        &self,
        db_tx: &DatabaseTransaction,
        items: &[SaleItemInput],
    ) -> ResultEngine<Vec<ResolvedItem>> {
        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            let variant = self
                .require_product_variant(db_tx, &item.product, item.state)
                .await?;
            let full_variant_id = self.require_full_sibling(db_tx, &variant).await?.id;
            resolved.push(ResolvedItem {
                state: item.state,
                full_variant_id,
                quantity: item.quantity,
                unit_price_minor: item.unit_price_minor,
                variant,
            });
        }
        Ok(resolved)
    }

    /// Rebuild resolved lines from the stored rows of an existing sale.
    pub(super) async fn resolve_stored_items(
        &self,
        db_tx: &DatabaseTransaction,
        item_models: &[sale_items::Model],
    ) -> ResultEngine<Vec<ResolvedItem>> {
        let mut resolved = Vec::with_capacity(item_models.len());
        for model in item_models {
            let product_id = util::parse_uuid(&model.product_id, "product")?;
            let variant = self.require_product(db_tx, product_id).await?;
            let state = BottleState::try_from(model.state.as_str())?;
            let full_variant_id = self.require_full_sibling(db_tx, &variant).await?.id;
            resolved.push(ResolvedItem {
                state,
                full_variant_id,
                quantity: model.quantity,
                unit_price_minor: model.unit_price_minor,
                variant,
            });
        }
        Ok(resolved)
    }

    pub(super) async fn load_sale_items(
        &self,
        db_tx: &DatabaseTransaction,
        sale_id: Uuid,
    ) -> ResultEngine<Vec<sale_items::Model>> {
        sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.eq(sale_id.to_string()))
            .all(db_tx)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn resolved(state: BottleState, quantity: i64, unit_price_minor: i64) -> ResolvedItem {
        let variant = products::Model {
            id: "variant-1".to_string(),
            name: "Garrafão 20L".to_string(),
            name_norm: "garrafao 20l".to_string(),
            state: state.as_str().to_string(),
            quantity: 10,
            price_minor: unit_price_minor,
            created_at: Utc::now(),
        };
        ResolvedItem {
            state,
            full_variant_id: "variant-full".to_string(),
            quantity,
            unit_price_minor,
            variant,
        }
    }

    #[test]
    fn empty_line_splits_across_both_variants() {
        let item = resolved(BottleState::Empty, 4, 1200);
        assert_eq!(
            stock_deltas(&item, 4),
            vec![
                ("variant-1".to_string(), 4),
                ("variant-full".to_string(), -4)
            ]
        );
    }

    #[test]
    fn full_line_targets_only_the_full_sibling() {
        let item = resolved(BottleState::Full, 2, 1200);
        assert_eq!(stock_deltas(&item, 2), vec![("variant-full".to_string(), -2)]);
    }

    #[test]
    fn totals_sum_over_lines() {
        let items = vec![
            resolved(BottleState::Full, 2, 1200),
            resolved(BottleState::Empty, 3, 1000),
        ];
        assert_eq!(items_total_minor(&items), 5400);
    }

    #[test]
    fn rejects_empty_item_lists() {
        assert!(matches!(
            validate_items(&[]),
            Err(EngineError::InvalidQuantity(_))
        ));
    }
}
