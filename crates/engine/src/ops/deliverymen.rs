use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Deliveryman, EngineError, ResultEngine, deliverymen, util};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    pub async fn new_deliveryman(&self, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "deliveryman")?;
        with_tx!(self, |db_tx| {
            let exists = deliverymen::Entity::find()
                .filter(deliverymen::Column::NameNorm.eq(util::normalize_lookup_name(&name)))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingEntry(format!("deliveryman \"{name}\"")));
            }

            let deliveryman = Deliveryman::new(name.clone());
            deliverymen::ActiveModel::from(&deliveryman)
                .insert(&db_tx)
                .await?;
            Ok(deliveryman.id)
        })
    }

    pub async fn list_deliverymen(&self) -> ResultEngine<Vec<Deliveryman>> {
        with_tx!(self, |db_tx| {
            let models = deliverymen::Entity::find()
                .order_by_asc(deliverymen::Column::NameNorm)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Deliveryman::try_from(model)?);
            }
            Ok(out)
        })
    }
}
