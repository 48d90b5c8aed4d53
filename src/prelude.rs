//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{
        Active, Availability, OptionCombination, OptionType, OptionValue, Product,
        ProductCatalog, SelectableOption, StockStatus,
    },
    changes::{
        ApprovalStatus, ChangeKind, Decision, ParseChangeKindError, request_change,
        resolved_line_status, withdraw_change,
    },
    orders::{
        DeclaredTotals, DeliveryFeePolicy, DeliveryStatus, LineStatus, OrderNumber, OrderTotals,
        ParseDeliveryStatusError, PriceMismatch, TotalsError, aggregate_delivery_status,
        verify_line_price,
    },
    payments::{ParsePaymentError, PaymentMethod, PaymentOutcome, PaymentStatus},
    pricing::{PriceQuote, PricingError, effective_base_price, resolve_price},
    selection::{MAX_SELECTED_VALUES, OptionSelection, SelectionError},
    transition::TransitionError,
};
