//! Orders
//!
//! Order numbers, totals, and the per-line and order-level status machines.

use std::{fmt, str::FromStr};

use thiserror::Error;
use uuid::Uuid;

use crate::{pricing::PriceQuote, transition::TransitionError};

/// Order line status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStatus {
    /// Purchased and live.
    Ordered,

    /// Cancelled, either by the customer, a failed payment or an approved
    /// return.
    Canceled,

    /// An exchange request is open or was resolved without cancelling.
    ExchangeRequested,

    /// A return request is open or was rejected.
    ReturnRequested,
}

impl LineStatus {
    /// Storage code.
    pub const fn code(self) -> i16 {
        match self {
            Self::Ordered => 0,
            Self::Canceled => 1,
            Self::ExchangeRequested => 2,
            Self::ReturnRequested => 3,
        }
    }

    /// Parse a storage code.
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Ordered),
            1 => Some(Self::Canceled),
            2 => Some(Self::ExchangeRequested),
            3 => Some(Self::ReturnRequested),
            _ => None,
        }
    }

    /// Name used in errors and responses.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ordered => "ordered",
            Self::Canceled => "canceled",
            Self::ExchangeRequested => "exchange_requested",
            Self::ReturnRequested => "return_requested",
        }
    }

    /// Cancel the line. Only live lines may be cancelled.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] when the line is not `ordered`.
    pub const fn cancel(self) -> Result<Self, TransitionError> {
        match self {
            Self::Ordered => Ok(Self::Canceled),
            Self::Canceled | Self::ExchangeRequested | Self::ReturnRequested => {
                Err(TransitionError::new("order line", self.as_str(), "cancel"))
            }
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order delivery status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    /// Awaiting the payment gateway.
    PaymentPending,

    /// Paid, not yet picked.
    PaymentCompleted,

    /// Being packed.
    Preparing,

    /// Handed to the carrier.
    Shipping,

    /// Received by the customer.
    Delivered,

    /// Every line is cancelled. Terminal.
    OrderCanceled,
}

/// Unknown delivery status name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown delivery status: {0}")]
pub struct ParseDeliveryStatusError(pub String);

impl DeliveryStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::PaymentPending,
        Self::PaymentCompleted,
        Self::Preparing,
        Self::Shipping,
        Self::Delivered,
        Self::OrderCanceled,
    ];

    /// Storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PaymentPending => "payment_pending",
            Self::PaymentCompleted => "payment_completed",
            Self::Preparing => "preparing",
            Self::Shipping => "shipping",
            Self::Delivered => "delivered",
            Self::OrderCanceled => "order_canceled",
        }
    }

    /// Whether a customer may still cancel the whole order.
    pub const fn is_customer_cancellable(self) -> bool {
        matches!(self, Self::PaymentPending | Self::PaymentCompleted)
    }

    /// Cancel the whole order on the customer's behalf.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] once the order has moved past payment.
    pub const fn cancel_by_customer(self) -> Result<Self, TransitionError> {
        if self.is_customer_cancellable() {
            Ok(Self::OrderCanceled)
        } else {
            Err(TransitionError::new("order", self.as_str(), "cancel"))
        }
    }

    /// Move to `target` on behalf of an admin delivery update.
    ///
    /// Cancelled orders are frozen, and cancellation only happens through line
    /// aggregation or payment voiding.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] when the order is already cancelled or the
    /// target is `order_canceled`.
    pub const fn update_delivery(self, target: Self) -> Result<Self, TransitionError> {
        match (self, target) {
            (Self::OrderCanceled, _) => Err(TransitionError::new(
                "order",
                self.as_str(),
                "update delivery of",
            )),
            (_, Self::OrderCanceled) => {
                Err(TransitionError::new("order", self.as_str(), "cancel via delivery update"))
            }
            _ => Ok(target),
        }
    }

    /// Mark the order paid.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] unless the order awaits payment.
    pub const fn mark_paid(self) -> Result<Self, TransitionError> {
        match self {
            Self::PaymentPending => Ok(Self::PaymentCompleted),
            _ => Err(TransitionError::new("order", self.as_str(), "mark paid")),
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = ParseDeliveryStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseDeliveryStatusError(s.to_string()))
    }
}

/// Roll line states up to the order.
///
/// Returns the new delivery status when every line is cancelled and the order
/// is not cancelled yet; `None` leaves the order untouched.
pub fn aggregate_delivery_status(
    current: DeliveryStatus,
    lines: &[LineStatus],
) -> Option<DeliveryStatus> {
    let all_canceled =
        !lines.is_empty() && lines.iter().all(|line| *line == LineStatus::Canceled);

    (all_canceled && current != DeliveryStatus::OrderCanceled)
        .then_some(DeliveryStatus::OrderCanceled)
}

/// Order Number
///
/// `ORD-` followed by the 48-bit millisecond timestamp of a UUIDv7 and 32 bits
/// of its random tail, both as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderNumber(String);

/// Prefix shared by every order number.
pub const ORDER_NUMBER_PREFIX: &str = "ORD-";

impl OrderNumber {
    /// Derive an order number from a time-ordered id.
    pub fn from_uuid(uuid: Uuid) -> Self {
        let bits = uuid.as_u128();
        let timestamp = bits >> 80;
        let suffix = bits & 0xffff_ffff;

        Self(format!("{ORDER_NUMBER_PREFIX}{timestamp:012x}-{suffix:08x}"))
    }

    /// Generate a fresh order number.
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    /// Wrap a stored order number.
    pub fn from_stored(number: String) -> Self {
        Self(number)
    }

    /// Borrow the number.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the number.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery fee policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryFeePolicy {
    /// Flat fee charged per order.
    pub fee: u64,

    /// Subtotal at or above which the fee is waived.
    pub free_threshold: Option<u64>,
}

impl DeliveryFeePolicy {
    /// Fee owed for an order with the given discounted subtotal.
    pub fn fee_for(&self, subtotal: u64) -> u64 {
        match self.free_threshold {
            Some(threshold) if subtotal >= threshold => 0,
            _ => self.fee,
        }
    }
}

impl Default for DeliveryFeePolicy {
    fn default() -> Self {
        Self {
            fee: 3_000,
            free_threshold: Some(50_000),
        }
    }
}

/// A declared amount disagreed with the server's computation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{field} mismatch: declared {declared}, computed {computed}")]
pub struct PriceMismatch {
    /// Which amount disagreed.
    pub field: &'static str,

    /// Client value.
    pub declared: i128,

    /// Server value.
    pub computed: i128,
}

impl PriceMismatch {
    fn check(field: &'static str, declared: i128, computed: i128) -> Result<(), Self> {
        if declared == computed {
            Ok(())
        } else {
            Err(Self {
                field,
                declared,
                computed,
            })
        }
    }
}

/// Compare a line's declared prices with a server quote.
///
/// # Errors
///
/// Returns the first [`PriceMismatch`], base price before option price.
pub fn verify_line_price(
    quote: &PriceQuote,
    declared_base_price: u64,
    declared_option_price: i64,
) -> Result<(), PriceMismatch> {
    PriceMismatch::check(
        "base_price",
        i128::from(declared_base_price),
        i128::from(quote.base_price),
    )?;

    PriceMismatch::check(
        "option_price",
        i128::from(declared_option_price),
        i128::from(quote.option_price),
    )
}

/// Totals computation failures.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TotalsError {
    /// No lines.
    #[error("an order needs at least one line")]
    EmptyOrder,

    /// More mileage than the payable amount.
    #[error("mileage {mileage} exceeds payable amount {payable}")]
    MileageExceedsPayable {
        /// Mileage requested.
        mileage: u64,
        /// Subtotal plus delivery fee.
        payable: u64,
    },

    /// Arithmetic overflowed.
    #[error("order total arithmetic overflowed")]
    Overflow,
}

/// Totals the client claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclaredTotals {
    /// Sum of list prices.
    pub total_price: u64,

    /// Sum of product discounts.
    pub discount_price: u64,

    /// Delivery fee.
    pub delivery_price: u64,

    /// Amount to pay.
    pub final_price: u64,
}

/// Server-computed order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of list unit prices times quantity.
    pub total_price: u64,

    /// Sum of per-unit product discounts times quantity.
    pub discount_price: u64,

    /// `total_price - discount_price`.
    pub subtotal: u64,

    /// Fee from the delivery policy.
    pub delivery_price: u64,

    /// Mileage applied.
    pub mileage_used: u64,

    /// `subtotal + delivery_price - mileage_used`.
    pub final_price: u64,
}

impl OrderTotals {
    /// Compute totals over the quoted lines.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalsError`] for an empty order, mileage above the payable
    /// amount, or overflow.
    pub fn compute<'a>(
        quotes: impl IntoIterator<Item = &'a PriceQuote>,
        policy: &DeliveryFeePolicy,
        mileage: u64,
    ) -> Result<Self, TotalsError> {
        let mut lines = 0_usize;
        let mut total_price = 0_u64;
        let mut subtotal = 0_u64;

        for quote in quotes {
            lines += 1;

            total_price = total_price
                .checked_add(quote.list_total)
                .ok_or(TotalsError::Overflow)?;

            subtotal = subtotal
                .checked_add(quote.line_total)
                .ok_or(TotalsError::Overflow)?;
        }

        if lines == 0 {
            return Err(TotalsError::EmptyOrder);
        }

        let discount_price = total_price.saturating_sub(subtotal);
        let delivery_price = policy.fee_for(subtotal);

        let payable = subtotal
            .checked_add(delivery_price)
            .ok_or(TotalsError::Overflow)?;

        if mileage > payable {
            return Err(TotalsError::MileageExceedsPayable { mileage, payable });
        }

        Ok(Self {
            total_price,
            discount_price,
            subtotal,
            delivery_price,
            mileage_used: mileage,
            final_price: payable - mileage,
        })
    }

    /// Compare declared totals against these, field by field.
    ///
    /// # Errors
    ///
    /// Returns the first [`PriceMismatch`].
    pub fn verify(&self, declared: &DeclaredTotals) -> Result<(), PriceMismatch> {
        PriceMismatch::check(
            "total_price",
            i128::from(declared.total_price),
            i128::from(self.total_price),
        )?;
        PriceMismatch::check(
            "discount_price",
            i128::from(declared.discount_price),
            i128::from(self.discount_price),
        )?;
        PriceMismatch::check(
            "delivery_price",
            i128::from(declared.delivery_price),
            i128::from(self.delivery_price),
        )?;
        PriceMismatch::check(
            "final_price",
            i128::from(declared.final_price),
            i128::from(self.final_price),
        )
    }
}
