//! Share-token encoding and link assembly.
//!
//! A share link carries everything needed to render the voucher, so the
//! display side can reconstruct it without ever having seen the creation.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::theme::VoucherTheme;
use crate::voucher::types::Voucher;

/// Path segment between the origin and the voucher id in a share link.
const SHARE_PATH: &str = "voucher";

/// Errors from encoding or decoding a share token.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Generate a fresh voucher id.
///
/// Two independent random segments keep the collision probability
/// negligible without requiring cryptographic guarantees.
pub fn new_voucher_id() -> String {
    let a = Uuid::new_v4().simple().to_string();
    let b = Uuid::new_v4().simple().to_string();
    format!("{}{}", &a[..12], &b[..12])
}

/// The shareable subset of a voucher as embedded in a link.
///
/// `theme` stays a plain string so a token minted with a theme this build
/// does not know still decodes; rendering falls back to the default
/// descriptor. Absent optionals are carried as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareToken {
    title: String,
    code: String,
    theme: String,
    #[serde(default)]
    provider: String,
    #[serde(default)]
    message: String,
    created_at: i64,
}

/// Fields recovered from a share token.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedVoucher {
    pub title: String,
    pub code: String,
    pub theme: VoucherTheme,
    pub provider: Option<String>,
    pub message: Option<String>,
    pub created_at: i64,
}

impl DecodedVoucher {
    /// Materialize a displayable voucher under the id carried by the link.
    pub fn into_voucher(self, id: &str) -> Voucher {
        Voucher {
            id: id.to_string(),
            title: self.title,
            code: self.code,
            theme: self.theme,
            provider: self.provider,
            message: self.message,
            created_at: self.created_at,
            expiry_date: None,
        }
    }
}

/// Encode the shareable subset of `voucher` into a URL-embeddable token.
pub fn encode(voucher: &Voucher) -> Result<String, CodecError> {
    let token = ShareToken {
        title: voucher.title.clone(),
        code: voucher.code.clone(),
        theme: voucher.theme.as_str().to_string(),
        provider: voucher.provider.clone().unwrap_or_default(),
        message: voucher.message.clone().unwrap_or_default(),
        created_at: voucher.created_at,
    };
    let json = serde_json::to_string(&token)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a token minted by `encode`.
///
/// Malformed input is a typed error, never a panic; the display layer
/// folds it into the same outcome as an unknown voucher id.
pub fn decode(token: &str) -> Result<DecodedVoucher, CodecError> {
    let bytes = URL_SAFE_NO_PAD.decode(token)?;
    let token: ShareToken = serde_json::from_slice(&bytes)?;
    Ok(DecodedVoucher {
        theme: VoucherTheme::parse(&token.theme).unwrap_or_default(),
        title: token.title,
        code: token.code,
        provider: none_if_empty(token.provider),
        message: none_if_empty(token.message),
        created_at: token.created_at,
    })
}

fn none_if_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Assemble the long share URL for a voucher.
///
/// The token is URL-safe base64, so no percent-encoding is required. The
/// `t` disambiguator only defeats shortener-side caching; the decoder
/// never reads it.
pub fn build_share_url(origin: &str, id: &str, token: &str, disambiguator: i64) -> String {
    format!(
        "{}/{}/{}?data={}&t={}",
        origin.trim_end_matches('/'),
        SHARE_PATH,
        id,
        token,
        disambiguator
    )
}

/// Pieces of a share URL accepted by the display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareUrlParts {
    pub id: String,
    pub data: Option<String>,
}

/// Pull the voucher id and token out of a pasted share link.
///
/// Returns `None` when the path does not end in a voucher segment.
pub fn parse_share_url(url: &str) -> Option<ShareUrlParts> {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };

    let mut segments = path.rsplit('/');
    let id = segments.next()?;
    if id.is_empty() || segments.next() != Some(SHARE_PATH) {
        return None;
    }

    let data = query.and_then(|q| {
        q.split('&')
            .find_map(|pair| pair.strip_prefix("data=").map(str::to_string))
    });

    Some(ShareUrlParts {
        id: id.to_string(),
        data,
    })
}
