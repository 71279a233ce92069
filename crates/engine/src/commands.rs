//! Command structs for engine operations.
//!
//! These types group parameters for write operations (register/update a sale,
//! collect loaned bottles, deposit cash), keeping call sites readable and
//! avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{payment::PaymentMethod, products::BottleState};

/// One requested line of a sale: product by name, the state sold under, the
/// quantity and the unit price. The engine resolves `(product, state)` to the
/// canonical variant itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaleItemInput {
    pub product: String,
    pub state: BottleState,
    pub quantity: i64,
    pub unit_price_minor: i64,
}

impl SaleItemInput {
    #[must_use]
    pub fn new(
        product: impl Into<String>,
        state: BottleState,
        quantity: i64,
        unit_price_minor: i64,
    ) -> Self {
        Self {
            product: product.into(),
            state,
            quantity,
            unit_price_minor,
        }
    }
}

/// Register a new sale.
#[derive(Clone, Debug)]
pub struct RegisterSaleCmd {
    pub customer_id: Uuid,
    pub deliveryman_id: Uuid,
    pub payment_method: PaymentMethod,
    pub occurred_at: DateTime<Utc>,
    pub items: Vec<SaleItemInput>,
}

impl RegisterSaleCmd {
    #[must_use]
    pub fn new(
        customer_id: Uuid,
        deliveryman_id: Uuid,
        payment_method: PaymentMethod,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_id,
            deliveryman_id,
            payment_method,
            occurred_at,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn item(mut self, item: SaleItemInput) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn items(mut self, items: Vec<SaleItemInput>) -> Self {
        self.items = items;
        self
    }
}

/// Update an existing sale. Absent fields keep their stored values; absent
/// `items` keeps the stored line items untouched.
#[derive(Clone, Debug)]
pub struct UpdateSaleCmd {
    pub sale_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub deliveryman_id: Option<Uuid>,
    pub payment_method: Option<PaymentMethod>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub items: Option<Vec<SaleItemInput>>,
}

impl UpdateSaleCmd {
    #[must_use]
    pub fn new(sale_id: Uuid) -> Self {
        Self {
            sale_id,
            customer_id: None,
            deliveryman_id: None,
            payment_method: None,
            occurred_at: None,
            items: None,
        }
    }

    #[must_use]
    pub fn customer_id(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    #[must_use]
    pub fn deliveryman_id(mut self, deliveryman_id: Uuid) -> Self {
        self.deliveryman_id = Some(deliveryman_id);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = Some(payment_method);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn items(mut self, items: Vec<SaleItemInput>) -> Self {
        self.items = Some(items);
        self
    }
}

/// Collect loaned bottles back from a customer.
#[derive(Clone, Debug)]
pub struct CollectCmd {
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub collected_at: DateTime<Utc>,
}

impl CollectCmd {
    #[must_use]
    pub fn new(
        customer_id: Uuid,
        product_id: Uuid,
        quantity: i64,
        collected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_id,
            product_id,
            quantity,
            collected_at,
        }
    }
}

/// Record a cash deposit handed over by a deliveryman.
#[derive(Clone, Debug)]
pub struct DepositCmd {
    pub deliveryman_id: Uuid,
    pub bank_account_id: Uuid,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
}

impl DepositCmd {
    #[must_use]
    pub fn new(
        deliveryman_id: Uuid,
        bank_account_id: Uuid,
        amount_minor: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            deliveryman_id,
            bank_account_id,
            amount_minor,
            occurred_at,
        }
    }
}
