//! Exchange and return requests
//!
//! A change request moves one order line out of `ordered` and waits for a
//! single admin decision. Approved returns cancel the line; everything else
//! leaves the line where the request put it.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{orders::LineStatus, transition::TransitionError};

/// Change request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Swap for another item.
    Exchange,

    /// Send back for a refund.
    Return,
}

/// Unknown change kind name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown change kind: {0}")]
pub struct ParseChangeKindError(pub String);

impl ChangeKind {
    /// Storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exchange => "exchange",
            Self::Return => "return",
        }
    }

    /// Line status while a request of this kind is open.
    pub const fn requested_line_status(self) -> LineStatus {
        match self {
            Self::Exchange => LineStatus::ExchangeRequested,
            Self::Return => LineStatus::ReturnRequested,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = ParseChangeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exchange" => Ok(Self::Exchange),
            "return" => Ok(Self::Return),
            other => Err(ParseChangeKindError(other.to_string())),
        }
    }
}

/// Approval status of a change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalStatus {
    /// Awaiting an admin.
    Pending,

    /// Approved. Terminal.
    Approved,

    /// Rejected. Terminal.
    Rejected,
}

impl ApprovalStatus {
    /// Storage code.
    pub const fn code(self) -> i16 {
        match self {
            Self::Pending => 0,
            Self::Approved => 1,
            Self::Rejected => 2,
        }
    }

    /// Parse a storage code.
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Name used in errors and responses.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Apply an admin decision.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] unless the request is pending.
    pub const fn resolve(self, decision: Decision) -> Result<Self, TransitionError> {
        match self {
            Self::Pending => Ok(decision.approval_status()),
            Self::Approved | Self::Rejected => Err(TransitionError::new(
                "change request",
                self.as_str(),
                "resolve",
            )),
        }
    }

    /// Check the customer may still withdraw the request.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] unless the request is pending.
    pub const fn ensure_withdrawable(self) -> Result<(), TransitionError> {
        match self {
            Self::Pending => Ok(()),
            Self::Approved | Self::Rejected => Err(TransitionError::new(
                "change request",
                self.as_str(),
                "withdraw",
            )),
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin decision on a pending change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Approve.
    Approve,

    /// Reject.
    Reject,
}

impl Decision {
    /// Terminal approval status for this decision.
    pub const fn approval_status(self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Reject => ApprovalStatus::Rejected,
        }
    }
}

/// Open a change request against a line.
///
/// # Errors
///
/// Returns a [`TransitionError`] unless the line is `ordered`.
pub const fn request_change(
    line: LineStatus,
    kind: ChangeKind,
) -> Result<LineStatus, TransitionError> {
    match line {
        LineStatus::Ordered => Ok(kind.requested_line_status()),
        LineStatus::Canceled | LineStatus::ExchangeRequested | LineStatus::ReturnRequested => {
            Err(TransitionError::new("order line", line.as_str(), "request a change for"))
        }
    }
}

/// Revert a line after its pending request is withdrawn.
///
/// A line that was moved elsewhere in the meantime is left alone.
pub fn withdraw_change(line: LineStatus, kind: ChangeKind) -> LineStatus {
    if line == kind.requested_line_status() {
        LineStatus::Ordered
    } else {
        line
    }
}

/// Line status after a decision, or `None` when the line is left as-is.
///
/// Only approved returns move the line. Rejected requests keep the line in its
/// requested state.
pub const fn resolved_line_status(kind: ChangeKind, decision: Decision) -> Option<LineStatus> {
    match (kind, decision) {
        (ChangeKind::Return, Decision::Approve) => Some(LineStatus::Canceled),
        (ChangeKind::Exchange, _) | (ChangeKind::Return, Decision::Reject) => None,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn approval_codes_are_stable() {
        assert_eq!(ApprovalStatus::Pending.code(), 0);
        assert_eq!(ApprovalStatus::Approved.code(), 1);
        assert_eq!(ApprovalStatus::Rejected.code(), 2);
        assert_eq!(ApprovalStatus::from_code(2), Some(ApprovalStatus::Rejected));
        assert_eq!(ApprovalStatus::from_code(9), None);
    }

    #[test]
    fn requests_only_open_on_ordered_lines() {
        assert_eq!(
            request_change(LineStatus::Ordered, ChangeKind::Return),
            Ok(LineStatus::ReturnRequested)
        );
        assert_eq!(
            request_change(LineStatus::Ordered, ChangeKind::Exchange),
            Ok(LineStatus::ExchangeRequested)
        );
        assert!(request_change(LineStatus::Canceled, ChangeKind::Return).is_err());
        assert!(request_change(LineStatus::ReturnRequested, ChangeKind::Exchange).is_err());
    }

    #[test]
    fn resolution_is_single_shot() {
        assert_eq!(
            ApprovalStatus::Pending.resolve(Decision::Approve),
            Ok(ApprovalStatus::Approved)
        );
        assert_eq!(
            ApprovalStatus::Pending.resolve(Decision::Reject),
            Ok(ApprovalStatus::Rejected)
        );
        assert!(ApprovalStatus::Approved.resolve(Decision::Reject).is_err());
        assert!(ApprovalStatus::Rejected.resolve(Decision::Approve).is_err());
    }

    #[test]
    fn only_pending_requests_are_withdrawable() {
        assert_eq!(ApprovalStatus::Pending.ensure_withdrawable(), Ok(()));
        assert!(ApprovalStatus::Approved.ensure_withdrawable().is_err());
    }

    #[test]
    fn withdrawing_reverts_the_requested_line() {
        assert_eq!(
            withdraw_change(LineStatus::ReturnRequested, ChangeKind::Return),
            LineStatus::Ordered
        );
        assert_eq!(
            withdraw_change(LineStatus::Canceled, ChangeKind::Return),
            LineStatus::Canceled
        );
    }

    #[test]
    fn approved_return_cancels_the_line() {
        assert_eq!(
            resolved_line_status(ChangeKind::Return, Decision::Approve),
            Some(LineStatus::Canceled)
        );
        assert_eq!(
            resolved_line_status(ChangeKind::Exchange, Decision::Approve),
            None
        );
    }

    #[test]
    fn rejected_return_leaves_line_in_limbo() {
        assert_eq!(resolved_line_status(ChangeKind::Return, Decision::Reject), None);
        assert_eq!(
            resolved_line_status(ChangeKind::Exchange, Decision::Reject),
            None
        );
    }

    #[test]
    fn kinds_parse() -> TestResult {
        assert_eq!("return".parse::<ChangeKind>()?, ChangeKind::Return);
        assert_eq!(ChangeKind::Exchange.to_string(), "exchange");
        assert!("refund".parse::<ChangeKind>().is_err());

        Ok(())
    }
}
