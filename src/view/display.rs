//! Voucher resolution and card rendering.

use thiserror::Error;

use crate::clipboard::{ClipboardError, ClipboardSink};
use crate::clock::local_date_string;
use crate::shortener::Shortener;
use crate::voucher::codec;
use crate::voucher::store::VoucherStore;
use crate::voucher::types::Voucher;

/// Terminal outcome when a link cannot be resolved.
///
/// A store miss and a token that fails to decode are deliberately
/// indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Voucher not found. It may have expired or the link is incorrect.")]
pub struct NotFound;

/// Resolve a voucher by id, falling back to the embedded token.
///
/// The token path lets a link minted on another device render even
/// though this device's store never saw the creation.
pub fn resolve(store: &VoucherStore, id: &str, token: Option<&str>) -> Result<Voucher, NotFound> {
    if let Some(voucher) = store.get_by_id(id) {
        return Ok(voucher);
    }

    let token = token.ok_or(NotFound)?;
    match codec::decode(token) {
        Ok(decoded) => Ok(decoded.into_voucher(id)),
        Err(e) => {
            tracing::debug!(error = %e, "Share token failed to decode");
            Err(NotFound)
        }
    }
}

/// Render the themed card as terminal text.
pub fn render_card(voucher: &Voucher) -> String {
    let theme = voucher.theme.descriptor();

    let mut lines = Vec::new();
    lines.push(format!("{} {}", theme.emoji, voucher.title));
    if let Some(provider) = &voucher.provider {
        lines.push(format!("from {}", provider));
    }
    lines.push(format!("Code: {}", voucher.code));
    if let Some(message) = &voucher.message {
        lines.push(message.clone());
    }
    lines.push(format!(
        "{} voucher, created {}",
        theme.name,
        local_date_string(voucher.created_at)
    ));
    if let Some(expiry) = voucher.expiry_date {
        lines.push(format!("Expires {}", local_date_string(expiry)));
    }
    lines.join("\n")
}

/// Copy the redeemable code to the clipboard.
pub fn copy_code(
    voucher: &Voucher,
    clipboard: &mut dyn ClipboardSink,
) -> Result<(), ClipboardError> {
    clipboard.set_text(&voucher.code)
}

/// Share the current link: shorten it, then copy it to the clipboard.
///
/// Copying stands in for a platform share sheet; shortening failure
/// falls back to the long link as everywhere else.
pub async fn share_link(
    url: &str,
    shortener: &Shortener,
    clipboard: &mut dyn ClipboardSink,
) -> Result<String, ClipboardError> {
    let link = shortener.shorten(url).await;
    clipboard.set_text(&link)?;
    Ok(link)
}
