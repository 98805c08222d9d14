//! The voucher entity and its field constraints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::theme::VoucherTheme;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 50;
pub const CODE_MIN: usize = 3;
pub const CODE_MAX: usize = 30;
pub const PROVIDER_MAX: usize = 30;
pub const MESSAGE_MAX: usize = 150;

/// A created gift-voucher record.
///
/// Immutable after creation. The store owns the canonical copy and hands
/// out clones for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    /// Opaque unique id; lookup key and path segment of the share link.
    pub id: String,
    pub title: String,
    /// The redeemable value.
    pub code: String,
    pub theme: VoucherTheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Epoch milliseconds, set once at creation.
    pub created_at: i64,
    /// Informational expiry, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

/// Input for `VoucherStore::create`; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewVoucher {
    pub title: String,
    pub code: String,
    pub theme: VoucherTheme,
    pub provider: Option<String>,
    pub message: Option<String>,
    pub expiry_date: Option<i64>,
}

/// A field failed its length constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} cannot exceed {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl NewVoucher {
    /// Check the length constraints on every field.
    ///
    /// Counts characters, not bytes, so multi-byte input is not
    /// penalized.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("title", &self.title, TITLE_MIN, TITLE_MAX)?;
        check_range("code", &self.code, CODE_MIN, CODE_MAX)?;
        if let Some(provider) = &self.provider {
            check_max("provider", provider, PROVIDER_MAX)?;
        }
        if let Some(message) = &self.message {
            check_max("message", message, MESSAGE_MAX)?;
        }
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if len > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn check_max(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewVoucher {
        NewVoucher {
            title: "Birthday Gift Card".to_string(),
            code: "BDAY2026".to_string(),
            theme: VoucherTheme::Birthday,
            provider: None,
            message: None,
            expiry_date: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn short_title_rejected() {
        let mut d = draft();
        d.title = "ab".to_string();
        assert_eq!(
            d.validate(),
            Err(ValidationError::TooShort {
                field: "title",
                min: TITLE_MIN
            })
        );
    }

    #[test]
    fn long_title_rejected_at_boundary() {
        let mut d = draft();
        d.title = "x".repeat(TITLE_MAX);
        assert_eq!(d.validate(), Ok(()));
        d.title.push('x');
        assert_eq!(
            d.validate(),
            Err(ValidationError::TooLong {
                field: "title",
                max: TITLE_MAX
            })
        );
    }

    #[test]
    fn code_limits_enforced() {
        let mut d = draft();
        d.code = "ab".to_string();
        assert!(matches!(
            d.validate(),
            Err(ValidationError::TooShort { field: "code", .. })
        ));
        d.code = "c".repeat(CODE_MAX + 1);
        assert!(matches!(
            d.validate(),
            Err(ValidationError::TooLong { field: "code", .. })
        ));
    }

    #[test]
    fn optional_fields_only_have_upper_bounds() {
        let mut d = draft();
        d.provider = Some(String::new());
        d.message = Some(String::new());
        assert_eq!(d.validate(), Ok(()));

        d.provider = Some("p".repeat(PROVIDER_MAX + 1));
        assert!(matches!(
            d.validate(),
            Err(ValidationError::TooLong {
                field: "provider",
                ..
            })
        ));

        d.provider = None;
        d.message = Some("m".repeat(MESSAGE_MAX + 1));
        assert!(matches!(
            d.validate(),
            Err(ValidationError::TooLong { field: "message", .. })
        ));
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        let mut d = draft();
        // Three characters, twelve bytes.
        d.title = "🎂🎂🎂".to_string();
        assert_eq!(d.validate(), Ok(()));
    }

    #[test]
    fn voucher_serializes_camel_case() {
        let voucher = Voucher {
            id: "abc".to_string(),
            title: "Title".to_string(),
            code: "CODE123".to_string(),
            theme: VoucherTheme::Wedding,
            provider: None,
            message: None,
            created_at: 1_700_000_000_000,
            expiry_date: None,
        };
        let json = serde_json::to_string(&voucher).unwrap();
        assert!(json.contains("\"createdAt\":1700000000000"));
        assert!(!json.contains("provider"));
    }
}
