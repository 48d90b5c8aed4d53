//! Orders Config

use clap::Args;
use storefront::orders::DeliveryFeePolicy;

/// Checkout settings.
#[derive(Debug, Args)]
pub struct OrdersConfig {
    /// Delivery fee charged below the free delivery threshold
    #[arg(long, env = "DELIVERY_FEE", default_value_t = 3_000_u64)]
    pub delivery_fee: u64,

    /// Subtotal at which delivery becomes free; 0 disables free delivery
    #[arg(long, env = "FREE_DELIVERY_THRESHOLD", default_value_t = 50_000_u64)]
    pub free_delivery_threshold: u64,
}

impl OrdersConfig {
    /// Delivery fee rules for checkout.
    #[must_use]
    pub fn delivery_fee_policy(&self) -> DeliveryFeePolicy {
        DeliveryFeePolicy {
            fee: self.delivery_fee,
            free_threshold: (self.free_delivery_threshold > 0)
                .then_some(self.free_delivery_threshold),
        }
    }
}
