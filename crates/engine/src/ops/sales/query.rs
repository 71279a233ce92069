use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Sale, SaleItem, SaleKind, sales};

use super::super::{Engine, with_tx};

/// Filters for listing sales.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default)]
pub struct SaleListFilter {
    pub customer_id: Option<Uuid>,
    pub deliveryman_id: Option<Uuid>,
    /// If present, only sales of this kind are returned.
    pub kind: Option<SaleKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

fn validate_list_filter(filter: &SaleListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidAmount(
            "invalid range: from must be < to".to_string(),
        ));
    }
    Ok(())
}

trait ApplySaleFilters: QueryFilter + Sized {
    fn apply_sale_filters(self, filter: &SaleListFilter) -> Self;
}

impl<T> ApplySaleFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_sale_filters(mut self, filter: &SaleListFilter) -> Self {
        if let Some(customer_id) = filter.customer_id {
            self = self.filter(sales::Column::CustomerId.eq(customer_id.to_string()));
        }
        if let Some(deliveryman_id) = filter.deliveryman_id {
            self = self.filter(sales::Column::DeliverymanId.eq(deliveryman_id.to_string()));
        }
        if let Some(kind) = filter.kind {
            self = self.filter(sales::Column::Kind.eq(kind.as_str()));
        }
        if let Some(from) = filter.from {
            self = self.filter(sales::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(sales::Column::OccurredAt.lt(to));
        }

        self
    }
}

impl Engine {
    /// One sale with its line items.
    pub async fn sale(&self, sale_id: Uuid) -> ResultEngine<Sale> {
        with_tx!(self, |db_tx| {
            let sale_model = self.require_sale(&db_tx, sale_id).await?;
            let item_models = self.load_sale_items(&db_tx, sale_id).await?;

            let mut sale = Sale::try_from(sale_model)?;
            let mut items = Vec::with_capacity(item_models.len());
            for model in item_models {
                items.push(SaleItem::try_from(model)?);
            }
            sale.items = items;
            Ok(sale)
        })
    }

    /// Sales newest first. Line items are left empty; fetch a single sale
    /// to get them.
    pub async fn list_sales(&self, filter: &SaleListFilter) -> ResultEngine<Vec<Sale>> {
        with_tx!(self, |db_tx| {
            validate_list_filter(filter)?;

            let models = sales::Entity::find()
                .apply_sale_filters(filter)
                .order_by_desc(sales::Column::OccurredAt)
                .order_by_desc(sales::Column::Id)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Sale::try_from(model)?);
            }
            Ok(out)
        })
    }
}
