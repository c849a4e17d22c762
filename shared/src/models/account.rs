//! Merchant account lifecycle
//!
//! ```text
//! pending_otp ──verify_otp──▶ pending_approval ──Decision──▶ approved | rejected
//! ```
//!
//! A [`Decision`] may be applied again to swap approved and rejected; it only
//! ever yields one of those two, so a decided account never returns to a
//! pending state.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Merchant account registration status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Registered, waiting for the emailed OTP
    PendingOtp,
    /// Email verified, waiting for an admin decision
    PendingApproval,
    Approved,
    Rejected,
}

impl AccountStatus {
    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending_otp" => Some(Self::PendingOtp),
            "pending_approval" => Some(Self::PendingApproval),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::PendingOtp => "pending_otp",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether an owner in this state may log in, with the reason when not
    pub fn login_gate(&self) -> Result<(), ErrorCode> {
        match self {
            Self::Approved => Ok(()),
            Self::PendingOtp => Err(ErrorCode::AccountPendingOtp),
            Self::PendingApproval => Err(ErrorCode::AccountPendingApproval),
            Self::Rejected => Err(ErrorCode::AccountRejected),
        }
    }

    /// Transition taken by a successful OTP verification
    pub fn verify_otp(&self) -> Result<Self, ErrorCode> {
        match self {
            Self::PendingOtp => Ok(Self::PendingApproval),
            _ => Err(ErrorCode::OtpNotPending),
        }
    }

    /// Whether an already issued owner session may still act on its
    /// restaurant. Verified accounts awaiting approval may prepare content.
    pub fn session_gate(&self) -> Result<(), ErrorCode> {
        match self {
            Self::PendingApproval | Self::Approved => Ok(()),
            Self::PendingOtp => Err(ErrorCode::AccountPendingOtp),
            Self::Rejected => Err(ErrorCode::AccountRejected),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingOtp | Self::PendingApproval)
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db())
    }
}

/// Admin decision on a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// Parse a client supplied status; only `approved` and `rejected` are decisions
    pub fn parse(s: &str) -> Result<Self, ErrorCode> {
        match s.trim() {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ErrorCode::InvalidStatus),
        }
    }

    pub fn status(&self) -> AccountStatus {
        match self {
            Self::Approved => AccountStatus::Approved,
            Self::Rejected => AccountStatus::Rejected,
        }
    }

    /// Menu visibility applied to the linked restaurant
    pub fn menu_enabled(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Token role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Owner,
}
