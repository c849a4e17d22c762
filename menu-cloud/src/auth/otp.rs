//! One-time codes for email verification and password reset
//!
//! Only an argon2 hash of the code is stored; the plaintext leaves the
//! process once, in the email.

use shared::error::ErrorCode;

use crate::util::{generate_code, hash_password, verify_password};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Otp {
    code_hash: String,
    issued_at: i64,
    expires_at: i64,
}

impl Otp {
    /// Issue a fresh code; returns the stored value and the plaintext to send
    pub fn issue(now: i64, ttl_secs: i64) -> Result<(Self, String), argon2::password_hash::Error> {
        let code = generate_code();
        let otp = Self {
            code_hash: hash_password(&code)?,
            issued_at: now,
            expires_at: now + ttl_secs * 1000,
        };
        Ok((otp, code))
    }

    /// Rebuild from the nullable account columns; `None` if no code is pending
    pub fn from_columns(
        code_hash: Option<String>,
        issued_at: Option<i64>,
        expires_at: Option<i64>,
    ) -> Option<Self> {
        let code_hash = code_hash.filter(|h| !h.is_empty())?;
        let expires_at = expires_at?;
        Some(Self {
            code_hash,
            issued_at: issued_at.unwrap_or(expires_at),
            expires_at,
        })
    }

    pub fn code_hash(&self) -> &str {
        &self.code_hash
    }

    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Succeeds iff the candidate matches and `now` is strictly before expiry
    pub fn verify(&self, candidate: &str, now: i64) -> Result<(), ErrorCode> {
        let candidate = candidate.trim();
        if candidate.is_empty() || !verify_password(candidate, &self.code_hash) {
            return Err(ErrorCode::OtpInvalid);
        }
        if now >= self.expires_at {
            return Err(ErrorCode::OtpExpired);
        }
        Ok(())
    }
}
