use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CollectCmd, CollectEvent, EngineError, ResultEngine, collects,
    products::BottleState,
};

use super::{Engine, with_tx};

impl Engine {
    /// Take empties back from a customer. Drains the loan ledger, moves
    /// stock from the COMODATO variant to its FULL sibling and records
    /// the visit as an event.
    pub async fn collect(&self, cmd: CollectCmd) -> ResultEngine<Uuid> {
        let CollectCmd {
            customer_id,
            product_id,
            quantity,
            collected_at,
        } = cmd;

        if quantity <= 0 {
            return Err(EngineError::InvalidQuantity(
                "quantity must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;
            let variant = self.require_product(&db_tx, product_id).await?;
            if variant.state != BottleState::Comodato.as_str() {
                return Err(EngineError::InvalidAmount(format!(
                    "product \"{}\" is not a comodato variant",
                    variant.name
                )));
            }

            self.record_collection(&db_tx, customer_id, product_id, quantity)
                .await?;

            let full_sibling = self.require_full_sibling(&db_tx, &variant).await?;
            let deltas = vec![
                (variant.id.clone(), -quantity),
                (full_sibling.id.clone(), quantity),
            ];
            let preview = self.preview_stock_deltas(&db_tx, &deltas).await?;
            self.persist_stock_quantities(&db_tx, preview).await?;

            let event = CollectEvent::new(customer_id, product_id, quantity, collected_at)?;
            collects::ActiveModel::from(&event).insert(&db_tx).await?;
            Ok(event.id)
        })
    }

    /// Collection history for one customer, newest first.
    pub async fn list_collects(&self, customer_id: Uuid) -> ResultEngine<Vec<CollectEvent>> {
        with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, customer_id).await?;

            let models = collects::Entity::find()
                .filter(collects::Column::CustomerId.eq(customer_id.to_string()))
                .order_by_desc(collects::Column::CollectedAt)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(CollectEvent::try_from(model)?);
            }
            Ok(out)
        })
    }
}
