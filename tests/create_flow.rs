mod common;

use std::sync::Arc;

use common::{spawn_stub_shortener, FakeClock};
use giftlink::shortener::Shortener;
use giftlink::storage::{KvStore, MemoryStore};
use giftlink::theme::VoucherTheme;
use giftlink::view::creator::{CreateError, Creator};
use giftlink::voucher::codec;
use giftlink::voucher::rate_limit::{RateLimitDenied, RateLimiter};
use giftlink::voucher::store::VoucherStore;
use giftlink::voucher::types::{NewVoucher, ValidationError};

const START: i64 = 1_700_000_000_000;
const ORIGIN: &str = "https://giftlink.app";

struct Fixture {
    creator: Creator,
    store: VoucherStore,
    clock: Arc<FakeClock>,
}

fn fixture(shortener: Shortener) -> Fixture {
    let storage: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let clock = Arc::new(FakeClock::new(START));
    let store = VoucherStore::load(storage.clone(), clock.clone(), 5);
    let limiter = Arc::new(RateLimiter::new(storage, clock.clone(), 5_000, 10));
    let creator = Creator::new(
        store.clone(),
        limiter,
        Arc::new(shortener),
        clock.clone(),
        ORIGIN,
    );
    Fixture {
        creator,
        store,
        clock,
    }
}

fn draft() -> NewVoucher {
    NewVoucher {
        title: "Birthday Gift Card".to_string(),
        code: "BDAY-2026".to_string(),
        theme: VoucherTheme::Birthday,
        provider: Some("Book Shop".to_string()),
        message: Some("Have a great day".to_string()),
        expiry_date: None,
    }
}

#[tokio::test]
async fn submit_creates_and_returns_the_short_link() {
    let endpoint = spawn_stub_shortener("https://is.gd/abc").await;
    let f = fixture(Shortener::new(endpoint));

    let created = f.creator.submit(draft()).await.unwrap();

    assert_eq!(created.share_url, "https://is.gd/abc");
    assert!(!created.duplicate_code);

    let stored = f.store.get_by_id(&created.voucher.id).unwrap();
    assert_eq!(stored, created.voucher);
    assert_eq!(stored.created_at, START);
}

#[tokio::test]
async fn stored_fields_are_the_sanitized_inputs() {
    let endpoint = spawn_stub_shortener("https://is.gd/xyz").await;
    let f = fixture(Shortener::new(endpoint));

    let mut input = draft();
    input.title = "FREE gift   card".to_string();
    input.provider = Some("Mega <Deals>".to_string());
    input.message = Some("claim your prize!".to_string());

    let created = f.creator.submit(input).await.unwrap();
    let stored = f.store.get_by_id(&created.voucher.id).unwrap();

    assert_eq!(stored.title, "no-cost present card");
    assert_eq!(stored.provider.as_deref(), Some("Mega Deals"));
    assert_eq!(stored.message.as_deref(), Some("redeem your reward!"));
    // The redeemable code is never rewritten.
    assert_eq!(stored.code, "BDAY-2026");
}

#[tokio::test]
async fn validation_failure_blocks_before_any_side_effect() {
    let endpoint = spawn_stub_shortener("https://is.gd/v").await;
    let f = fixture(Shortener::new(endpoint));

    let mut input = draft();
    input.title = "ab".to_string();
    let err = f.creator.submit(input).await.unwrap_err();
    assert!(matches!(
        err,
        CreateError::Validation(ValidationError::TooShort { field: "title", .. })
    ));

    // The rejected submission consumed no rate-limit slot.
    let created = f.creator.submit(draft()).await;
    assert!(created.is_ok());
}

#[tokio::test]
async fn second_submission_inside_cooldown_is_denied() {
    let endpoint = spawn_stub_shortener("https://is.gd/c").await;
    let f = fixture(Shortener::new(endpoint));

    f.creator.submit(draft()).await.unwrap();
    f.clock.advance(1_000);

    let mut second = draft();
    second.code = "OTHER-CODE".to_string();
    let err = f.creator.submit(second).await.unwrap_err();
    assert!(matches!(
        err,
        CreateError::RateLimited(RateLimitDenied::Cooldown { .. })
    ));
}

#[tokio::test]
async fn duplicate_code_is_advisory_not_blocking() {
    let endpoint = spawn_stub_shortener("https://is.gd/d").await;
    let f = fixture(Shortener::new(endpoint));

    let first = f.creator.submit(draft()).await.unwrap();
    assert!(!first.duplicate_code);

    f.clock.advance(6_000);
    let second = f.creator.submit(draft()).await.unwrap();
    assert!(second.duplicate_code);
    // Both vouchers exist regardless.
    assert!(f.store.get_by_id(&first.voucher.id).is_some());
    assert!(f.store.get_by_id(&second.voucher.id).is_some());
}

#[tokio::test]
async fn long_link_round_trips_through_the_codec() {
    // A disabled shortener hands back the long URL, which must resolve on
    // a device that never saw the creation.
    let config = giftlink::config::ShortenerConfig {
        endpoint: "http://127.0.0.1:9/create.php".to_string(),
        enabled: false,
    };
    let f = fixture(Shortener::from_config(&config));

    let created = f.creator.submit(draft()).await.unwrap();
    let parts = codec::parse_share_url(&created.share_url).unwrap();
    assert_eq!(parts.id, created.voucher.id);

    let decoded = codec::decode(&parts.data.unwrap()).unwrap();
    assert_eq!(decoded.title, created.voucher.title);
    assert_eq!(decoded.code, created.voucher.code);
    assert_eq!(decoded.created_at, created.voucher.created_at);
}
