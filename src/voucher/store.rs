//! Voucher ownership and persistence.
//!
//! In-memory canonical list plus a capped recent list, written through
//! the injected key-value store on every change and loaded once at
//! construction.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::clock::{local_date_string, Clock};
use crate::storage::{KvStore, StorageError};
use crate::voucher::codec::new_voucher_id;
use crate::voucher::types::{NewVoucher, Voucher};

/// Storage key for the canonical voucher list.
pub const VOUCHERS_KEY: &str = "vouchers";
/// Storage key for the capped recent list.
pub const RECENT_KEY: &str = "recent_vouchers";
/// Default cap on the recent list.
pub const DEFAULT_RECENT_CAP: usize = 5;

/// Errors from store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to persist {what}: {source}")]
    Persist {
        what: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Thread-safe owner of the canonical voucher list.
///
/// Cheap to clone; all clones share state. The display layer borrows
/// vouchers as clones and never mutates them.
#[derive(Clone)]
pub struct VoucherStore {
    inner: Arc<RwLock<StoreInner>>,
    storage: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    recent_cap: usize,
}

struct StoreInner {
    vouchers: Vec<Voucher>,
    /// Newest first, at most `recent_cap` entries.
    recent: Vec<Voucher>,
    /// Id of the voucher created most recently in this session.
    current: Option<String>,
}

impl VoucherStore {
    /// Load persisted lists and build the store.
    ///
    /// A corrupt or missing record degrades to an empty list; a device
    /// that never created a voucher starts clean.
    pub fn load(storage: Arc<dyn KvStore>, clock: Arc<dyn Clock>, recent_cap: usize) -> Self {
        let vouchers = read_list(storage.as_ref(), VOUCHERS_KEY);
        let recent = read_list(storage.as_ref(), RECENT_KEY);
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                vouchers,
                recent,
                current: None,
            })),
            storage,
            clock,
            recent_cap,
        }
    }

    /// Create a voucher from validated input.
    ///
    /// Assigns the id and creation timestamp, updates the canonical and
    /// recent lists, and persists both before returning. A persisted
    /// voucher is never rolled back by later failures in the flow.
    pub fn create(&self, new: NewVoucher) -> Result<Voucher, StoreError> {
        let voucher = Voucher {
            id: new_voucher_id(),
            title: new.title,
            code: new.code,
            theme: new.theme,
            provider: new.provider,
            message: new.message,
            created_at: self.clock.now_ms(),
            expiry_date: new.expiry_date,
        };

        let mut inner = self.inner.write().expect("voucher store lock poisoned");
        inner.vouchers.push(voucher.clone());
        inner.recent.insert(0, voucher.clone());
        inner.recent.truncate(self.recent_cap);
        inner.current = Some(voucher.id.clone());

        self.persist(VOUCHERS_KEY, "voucher list", &inner.vouchers)?;
        self.persist(RECENT_KEY, "recent list", &inner.recent)?;

        tracing::info!(id = %voucher.id, theme = %voucher.theme.as_str(), "Voucher created");
        Ok(voucher)
    }

    pub fn get_by_id(&self, id: &str) -> Option<Voucher> {
        self.inner
            .read()
            .expect("voucher store lock poisoned")
            .vouchers
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }

    /// Advisory duplicate check: another voucher already carries this code
    /// with a creation date on the current device-local calendar day.
    ///
    /// Never blocks creation; callers surface it as a warning.
    pub fn is_duplicate_code(&self, code: &str) -> bool {
        let today = local_date_string(self.clock.now_ms());
        self.inner
            .read()
            .expect("voucher store lock poisoned")
            .vouchers
            .iter()
            .any(|v| v.code == code && local_date_string(v.created_at) == today)
    }

    /// The most recently created voucher, surviving restarts through the
    /// recent list.
    pub fn current(&self) -> Option<Voucher> {
        let inner = self.inner.read().expect("voucher store lock poisoned");
        if let Some(id) = &inner.current {
            if let Some(voucher) = inner.vouchers.iter().find(|v| &v.id == id) {
                return Some(voucher.clone());
            }
        }
        inner.recent.first().cloned()
    }

    /// Recent creations, newest first.
    pub fn recent(&self) -> Vec<Voucher> {
        self.inner
            .read()
            .expect("voucher store lock poisoned")
            .recent
            .clone()
    }

    fn persist(&self, key: &str, what: &'static str, list: &[Voucher]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(list).map_err(|e| StoreError::Serialize { what, source: e })?;
        self.storage
            .set(key, &json)
            .map_err(|e| StoreError::Persist { what, source: e })
    }
}

fn read_list(storage: &dyn KvStore, key: &str) -> Vec<Voucher> {
    let Some(raw) = storage.get(key) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Corrupt voucher record, starting empty");
            Vec::new()
        }
    }
}
