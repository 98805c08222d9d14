//! Voucher creation orchestration.

use std::sync::Arc;

use thiserror::Error;

use crate::clock::Clock;
use crate::sanitize::sanitize;
use crate::shortener::Shortener;
use crate::voucher::codec::{self, CodecError};
use crate::voucher::rate_limit::{RateLimitDenied, RateLimiter};
use crate::voucher::store::{StoreError, VoucherStore};
use crate::voucher::types::{NewVoucher, ValidationError, Voucher};

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub voucher: Voucher,
    /// Shortened when the service cooperated, long otherwise.
    pub share_url: String,
    /// Advisory: another voucher with this code was created today.
    pub duplicate_code: bool,
}

/// Errors that stop a submission.
///
/// None of these leave partial state behind except `Codec`, which can
/// only follow a successful store write; the voucher stays created and
/// reachable through the store.
#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    RateLimited(#[from] RateLimitDenied),

    #[error("Failed to save voucher: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to encode share token: {0}")]
    Codec(#[from] CodecError),
}

/// Drives the submission sequence end to end.
pub struct Creator {
    store: VoucherStore,
    limiter: Arc<RateLimiter>,
    shortener: Arc<Shortener>,
    clock: Arc<dyn Clock>,
    origin: String,
}

impl Creator {
    pub fn new(
        store: VoucherStore,
        limiter: Arc<RateLimiter>,
        shortener: Arc<Shortener>,
        clock: Arc<dyn Clock>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            store,
            limiter,
            shortener,
            clock,
            origin: origin.into(),
        }
    }

    /// Validate, rate-limit, sanitize, persist, and mint the share link.
    ///
    /// The order matters: a rate-limit denial must precede every side
    /// effect, and sanitization runs only on free-text fields, never on
    /// the redeemable code. Shortening failure silently falls back to
    /// the long URL.
    pub async fn submit(&self, mut draft: NewVoucher) -> Result<CreatedLink, CreateError> {
        draft.validate()?;
        self.limiter.try_acquire()?;

        draft.title = sanitize(&draft.title);
        draft.provider = draft
            .provider
            .take()
            .map(|p| sanitize(&p))
            .filter(|p| !p.is_empty());
        draft.message = draft
            .message
            .take()
            .map(|m| sanitize(&m))
            .filter(|m| !m.is_empty());

        let duplicate_code = self.store.is_duplicate_code(&draft.code);
        if duplicate_code {
            tracing::warn!(code = %draft.code, "Duplicate voucher code created today");
        }

        let voucher = self.store.create(draft)?;
        let token = codec::encode(&voucher)?;
        let long_url =
            codec::build_share_url(&self.origin, &voucher.id, &token, self.clock.now_ms());
        let share_url = self.shortener.shorten(&long_url).await;

        Ok(CreatedLink {
            voucher,
            share_url,
            duplicate_code,
        })
    }
}
