use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Physical state of a bottled product variant.
///
/// The server treats states as:
/// - `FULL`: sellable stock in the depot.
/// - `EMPTY`: returnable shells waiting for the supplier.
/// - `COMODATO`: bottles out on loan to customers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BottleState {
    Full,
    Empty,
    Comodato,
}

impl BottleState {
    /// Returns the canonical state string used by the engine/database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Empty => "EMPTY",
            Self::Comodato => "COMODATO",
        }
    }
}

/// How a sale is paid.
///
/// `DINHEIRO` cash stays with the deliveryman until deposited; `FIADO`
/// accrues on the customer's credit balance until settled; every other
/// method books against a configured bank account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Dinheiro,
    Pix,
    Cartao,
    Transferencia,
    Fiado,
}

impl PaymentMethod {
    /// Returns the canonical method string used by the engine/database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dinheiro => "DINHEIRO",
            Self::Pix => "PIX",
            Self::Cartao => "CARTAO",
            Self::Transferencia => "TRANSFERENCIA",
            Self::Fiado => "FIADO",
        }
    }
}

pub mod product {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductNew {
        pub name: String,
        pub state: BottleState,
        pub price_minor: i64,
        /// Opening stock. Defaults to 0.
        pub quantity: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PriceUpdate {
        pub price_minor: i64,
    }

    /// Request body for a manual stock correction.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockAdjust {
        /// Signed delta applied to the variant's quantity.
        pub delta: i64,
    }

    /// Quantity of a variant after an adjustment.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockLevel {
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductView {
        pub id: Uuid,
        pub name: String,
        pub state: BottleState,
        pub quantity: i64,
        pub price_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductsResponse {
        pub products: Vec<ProductView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductCreated {
        pub id: Uuid,
    }
}

pub mod customer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: String,
        /// Marks the walk-in counter customer. Defaults to false.
        pub generic: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerRename {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub id: Uuid,
        pub name: String,
        pub generic: bool,
        /// Outstanding FIADO debt, in minor units.
        pub credit_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomersResponse {
        pub customers: Vec<CustomerView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerCreated {
        pub id: Uuid,
    }
}

pub mod deliveryman {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeliverymanNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeliverymanView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeliverymenResponse {
        pub deliverymen: Vec<DeliverymanView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeliverymanCreated {
        pub id: Uuid,
    }

    /// Cash a deliveryman is currently holding: unsettled DINHEIRO sales
    /// minus everything already deposited.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashBalance {
        pub deliveryman_id: Uuid,
        pub balance_minor: i64,
    }
}

pub mod bank_account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankAccountNew {
        pub name: String,
        pub payment_method: PaymentMethod,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankAccountView {
        pub id: Uuid,
        pub name: String,
        pub payment_method: PaymentMethod,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankAccountsResponse {
        pub bank_accounts: Vec<BankAccountView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankAccountCreated {
        pub id: Uuid,
    }
}

pub mod sale {
    use super::*;

    /// Commercial kind of a sale, derived from its items.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum SaleKind {
        Full,
        Comodato,
    }

    /// One line of a sale request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleItemNew {
        /// Product name, resolved against the `(name, state)` catalog.
        pub product: String,
        pub state: BottleState,
        pub quantity: i64,
        pub unit_price_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleNew {
        pub customer_id: Uuid,
        pub deliveryman_id: Uuid,
        pub payment_method: PaymentMethod,
        pub items: Vec<SaleItemNew>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
    }

    /// Request body for editing a sale. Absent fields keep their value;
    /// `items`, when present, replaces the whole item list.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleUpdate {
        pub customer_id: Option<Uuid>,
        pub deliveryman_id: Option<Uuid>,
        pub payment_method: Option<PaymentMethod>,
        pub items: Option<Vec<SaleItemNew>>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleList {
        pub customer_id: Option<Uuid>,
        pub deliveryman_id: Option<Uuid>,
        pub kind: Option<SaleKind>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub from: Option<DateTime<FixedOffset>>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub to: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleItemView {
        pub product_id: Uuid,
        pub state: BottleState,
        pub quantity: i64,
        pub unit_price_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleView {
        pub id: Uuid,
        pub customer_id: Uuid,
        pub deliveryman_id: Uuid,
        pub payment_method: PaymentMethod,
        pub kind: SaleKind,
        /// Server-side total over the line items, in minor units.
        pub total_minor: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub settled_at: Option<DateTime<FixedOffset>>,
        /// Empty in listings; populated when fetching a single sale.
        pub items: Vec<SaleItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalesResponse {
        pub sales: Vec<SaleView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleCreated {
        pub id: Uuid,
    }

    /// Request body for settling a FIADO sale.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleSettle {
        pub bank_account_id: Uuid,
    }

    /// Response body for batch settlement.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettledCount {
        pub settled: u64,
    }
}

pub mod collect {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CollectNew {
        pub customer_id: Uuid,
        /// Id of the COMODATO variant being returned.
        pub product_id: Uuid,
        pub quantity: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub collected_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CollectList {
        pub customer_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CollectView {
        pub id: Uuid,
        pub customer_id: Uuid,
        pub product_id: Uuid,
        pub quantity: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub collected_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CollectsResponse {
        pub collects: Vec<CollectView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CollectCreated {
        pub id: Uuid,
    }
}

pub mod loan {
    use super::*;

    /// Per-product slice of a customer's loan balance.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanLineView {
        pub product_id: Uuid,
        pub quantity: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanAccountView {
        pub customer_id: Uuid,
        pub total_quantity: i64,
        pub lines: Vec<LoanLineView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionDirection {
        Entry,
        Exit,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionCategory {
        Sale,
        Deposit,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub deliveryman_id: Option<Uuid>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub from: Option<DateTime<FixedOffset>>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub to: Option<DateTime<FixedOffset>>,
        /// Repeatable query key. When present, only these categories are
        /// returned.
        pub category: Option<Vec<TransactionCategory>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub direction: TransactionDirection,
        pub category: TransactionCategory,
        pub amount_minor: i64,
        pub deliveryman_id: Uuid,
        /// Sale this record belongs to, when it books a sale.
        pub reference_id: Option<Uuid>,
        pub bank_account_id: Option<Uuid>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    /// Request body for a cash deposit by a deliveryman.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositNew {
        pub deliveryman_id: Uuid,
        pub bank_account_id: Uuid,
        pub amount_minor: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
    }
}
