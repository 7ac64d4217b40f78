//! Order domain model and status lifecycle.
//!
//! # Responsibility
//! - Define the ledger record linking a purchaser to a catalog product.
//! - Own the status transition rule shared by every mutation path.
//!
//! # Invariants
//! - `quantity >= 1`.
//! - `created_at_ms` is set once at creation and never mutated.
//! - Status only moves forward: Pending -> Confirmed -> Shipped. Cancelled
//!   is reachable from any non-terminal state. Shipped and Cancelled are
//!   terminal.
//! - Orders are never deleted; cancellation is a status, not a removal.

use crate::model::product::ProductId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for ledger orders.
pub type OrderId = Uuid;

/// Identity of the purchasing party, minted by an external identity
/// provider and treated as opaque here.
pub type PurchaserId = Uuid;

/// Order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted, awaiting confirmation.
    Pending,
    /// Accepted for fulfilment.
    Confirmed,
    /// Handed to the carrier. Terminal.
    Shipped,
    /// Withdrawn before shipping. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Returns whether the status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Shipped | Self::Cancelled)
    }

    /// Returns whether moving from `self` to `next` is allowed.
    ///
    /// # Contract
    /// - Forward steps only: Pending -> Confirmed -> Shipped.
    /// - Cancelled is reachable from Pending and Confirmed.
    /// - No transition leaves a terminal state, and no transition is a
    ///   self-transition.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Shipped)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
        )
    }

    /// Stable lowercase token used in storage and query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses the stable lowercase token back into a status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "shipped" => Some(Self::Shipped),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Validation failures for order records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    /// The nil UUID is reserved and never a valid identity.
    NilUuid,
    /// Purchaser identity must be present and non-nil.
    NilPurchaser,
    /// Product reference must be present and non-nil.
    NilProduct,
    /// Orders are for at least one unit.
    ZeroQuantity,
}

impl Display for OrderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "order uuid must not be nil"),
            Self::NilPurchaser => write!(f, "order purchaser must not be nil"),
            Self::NilProduct => write!(f, "order product reference must not be nil"),
            Self::ZeroQuantity => write!(f, "order quantity must be at least 1"),
        }
    }
}

impl Error for OrderValidationError {}

/// Canonical ledger record.
///
/// The product reference is weak: it is used for lookup and pricing and
/// never controls the product's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Stable global ID used for auditing and status mutation.
    pub uuid: OrderId,
    /// External purchaser identity attached at creation.
    pub purchaser: PurchaserId,
    /// Referenced catalog product.
    pub product: ProductId,
    /// Units ordered. Always `>= 1` for valid records.
    pub quantity: u32,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Creation time in epoch milliseconds, immutable after insert.
    pub created_at_ms: i64,
}

impl Order {
    /// Creates a new pending order with a generated stable ID and the
    /// current wall-clock creation timestamp.
    pub fn new(purchaser: PurchaserId, product: ProductId, quantity: u32) -> Self {
        Self::with_id(Uuid::new_v4(), purchaser, product, quantity)
    }

    /// Creates a pending order with a caller-provided stable ID.
    ///
    /// This constructor does not validate; call `validate()` before
    /// persisting.
    pub fn with_id(
        uuid: OrderId,
        purchaser: PurchaserId,
        product: ProductId,
        quantity: u32,
    ) -> Self {
        Self {
            uuid,
            purchaser,
            product,
            quantity,
            status: OrderStatus::Pending,
            created_at_ms: now_epoch_ms(),
        }
    }

    /// Checks the record against ledger invariants.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.uuid.is_nil() {
            return Err(OrderValidationError::NilUuid);
        }
        if self.purchaser.is_nil() {
            return Err(OrderValidationError::NilPurchaser);
        }
        if self.product.is_nil() {
            return Err(OrderValidationError::NilProduct);
        }
        if self.quantity == 0 {
            return Err(OrderValidationError::ZeroQuantity);
        }
        Ok(())
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
