//! Payments

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::transition::TransitionError;

/// Unknown payment enum name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParsePaymentError {
    kind: &'static str,
    value: String,
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// Recorded at checkout, awaiting the gateway.
    Pending,

    /// Captured.
    Completed,

    /// Declined by the gateway.
    Failed,

    /// Abandoned, or voided by an order cancellation.
    Cancelled,
}

/// Gateway verdict on a pending payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentOutcome {
    /// Payment captured.
    Completed,

    /// Payment declined.
    Failed,

    /// Customer abandoned the payment.
    Cancelled,
}

impl PaymentStatus {
    /// Storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Apply a gateway outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] unless the payment is pending.
    pub const fn settle(self, outcome: PaymentOutcome) -> Result<Self, TransitionError> {
        match self {
            Self::Pending => Ok(match outcome {
                PaymentOutcome::Completed => Self::Completed,
                PaymentOutcome::Failed => Self::Failed,
                PaymentOutcome::Cancelled => Self::Cancelled,
            }),
            Self::Completed | Self::Failed | Self::Cancelled => {
                Err(TransitionError::new("payment", self.as_str(), "settle"))
            }
        }
    }

    /// Void the payment because its order was cancelled.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] for failed or already cancelled payments.
    pub const fn cancel(self) -> Result<Self, TransitionError> {
        match self {
            Self::Pending | Self::Completed => Ok(Self::Cancelled),
            Self::Failed | Self::Cancelled => {
                Err(TransitionError::new("payment", self.as_str(), "cancel"))
            }
        }
    }
}

impl PaymentOutcome {
    /// Whether the order behind the payment must be voided.
    pub const fn voids_order(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Credit or debit card.
    Card,

    /// Direct bank transfer.
    BankTransfer,

    /// Per-order virtual account.
    VirtualAccount,

    /// Carrier billing.
    Mobile,
}

impl PaymentMethod {
    /// Every method.
    pub const ALL: [Self; 4] = [
        Self::Card,
        Self::BankTransfer,
        Self::VirtualAccount,
        Self::Mobile,
    ];

    /// Storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::VirtualAccount => "virtual_account",
            Self::Mobile => "mobile",
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParsePaymentError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|candidate: &Self| candidate.as_str() == s)
                    .ok_or_else(|| ParsePaymentError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

display_and_parse!(
    PaymentStatus,
    "payment status",
    [
        PaymentStatus::Pending,
        PaymentStatus::Completed,
        PaymentStatus::Failed,
        PaymentStatus::Cancelled,
    ]
);

display_and_parse!(
    PaymentOutcome,
    "payment outcome",
    [
        PaymentOutcome::Completed,
        PaymentOutcome::Failed,
        PaymentOutcome::Cancelled,
    ]
);

display_and_parse!(
    PaymentMethod,
    "payment method",
    [
        PaymentMethod::Card,
        PaymentMethod::BankTransfer,
        PaymentMethod::VirtualAccount,
        PaymentMethod::Mobile,
    ]
);

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn pending_payments_settle_once() {
        assert_eq!(
            PaymentStatus::Pending.settle(PaymentOutcome::Completed),
            Ok(PaymentStatus::Completed)
        );
        assert_eq!(
            PaymentStatus::Pending.settle(PaymentOutcome::Failed),
            Ok(PaymentStatus::Failed)
        );

        let error = PaymentStatus::Completed.settle(PaymentOutcome::Failed);

        assert_eq!(
            error.map_err(|error| error.to_string()),
            Err("cannot settle payment in state completed".to_string())
        );
    }

    #[test]
    fn cancel_voids_live_payments_only() {
        assert_eq!(PaymentStatus::Pending.cancel(), Ok(PaymentStatus::Cancelled));
        assert_eq!(PaymentStatus::Completed.cancel(), Ok(PaymentStatus::Cancelled));
        assert!(PaymentStatus::Failed.cancel().is_err());
        assert!(PaymentStatus::Cancelled.cancel().is_err());
    }

    #[test]
    fn failed_and_cancelled_outcomes_void_the_order() {
        assert!(!PaymentOutcome::Completed.voids_order());
        assert!(PaymentOutcome::Failed.voids_order());
        assert!(PaymentOutcome::Cancelled.voids_order());
    }

    #[test]
    fn names_parse_back() -> TestResult {
        for method in PaymentMethod::ALL {
            assert_eq!(method.to_string().parse::<PaymentMethod>()?, method);
        }

        assert_eq!("failed".parse::<PaymentOutcome>()?, PaymentOutcome::Failed);
        assert_eq!("pending".parse::<PaymentStatus>()?, PaymentStatus::Pending);
        assert!("cash".parse::<PaymentMethod>().is_err());

        Ok(())
    }
}
