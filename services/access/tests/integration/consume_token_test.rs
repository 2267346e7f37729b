use chrono::Duration;

use odckey_access::domain::types::{TokenStatus, format_timestamp};
use odckey_access::usecase::consume_token::{
    ConsumeOutcome, ConsumeTokenInput, ConsumeTokenUseCase,
};

use crate::helpers::{FixedClock, MockTokenStore, pending_token, t0};

fn consume_input(code: &str, site_id: &str, minutes_after_t0: i64) -> ConsumeTokenInput {
    ConsumeTokenInput {
        code: code.to_owned(),
        site_id: site_id.to_owned(),
        when: Some(t0() + Duration::minutes(minutes_after_t0)),
    }
}

#[tokio::test]
async fn should_consume_pending_token_inside_window() {
    // Issued at t0 with a 3-minute ttl, redeemed at t0+2m.
    let store = MockTokenStore::new(vec![pending_token("0042", "ODC-17", t0(), 3)]);
    let tokens = store.tokens_handle();
    let audit = store.audit_handle();

    let uc = ConsumeTokenUseCase {
        store,
        clock: FixedClock(t0()),
    };
    let outcome = uc.execute(consume_input("0042", "ODC-17", 2)).await.unwrap();

    assert_eq!(outcome, ConsumeOutcome::Ok);
    let tokens = tokens.lock().unwrap();
    assert_eq!(tokens[0].status, TokenStatus::Used);
    assert_eq!(
        tokens[0].used_at.as_deref(),
        Some(format_timestamp(t0() + Duration::minutes(2)).as_str())
    );

    let audit = audit.lock().unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action, "CONSUME_TOKEN");
    assert_eq!(audit[0].actor, "device");
    assert_eq!(audit[0].detail, "0042|ODC-17|OK");
}

#[tokio::test]
async fn should_return_already_used_on_second_consume() {
    let store = MockTokenStore::new(vec![pending_token("0042", "ODC-17", t0(), 3)]);

    let uc = ConsumeTokenUseCase {
        store,
        clock: FixedClock(t0()),
    };
    let first = uc.execute(consume_input("0042", "ODC-17", 2)).await.unwrap();
    assert_eq!(first, ConsumeOutcome::Ok);

    // 30 seconds later, same code and site.
    let second = uc
        .execute(ConsumeTokenInput {
            code: "0042".to_owned(),
            site_id: "ODC-17".to_owned(),
            when: Some(t0() + Duration::minutes(2) + Duration::seconds(30)),
        })
        .await
        .unwrap();
    assert_eq!(second, ConsumeOutcome::AlreadyUsedOrInvalid);
}

#[tokio::test]
async fn should_return_expired_and_leave_token_pending() {
    let store = MockTokenStore::new(vec![pending_token("0042", "ODC-17", t0(), 3)]);
    let tokens = store.tokens_handle();

    let uc = ConsumeTokenUseCase {
        store,
        clock: FixedClock(t0()),
    };
    let outcome = uc.execute(consume_input("0042", "ODC-17", 4)).await.unwrap();
    assert_eq!(outcome, ConsumeOutcome::Expired);
    assert_eq!(tokens.lock().unwrap()[0].status, TokenStatus::Pending);

    // An expired token never flips to used, no matter how often it is tried.
    let again = uc.execute(consume_input("0042", "ODC-17", 5)).await.unwrap();
    assert_eq!(again, ConsumeOutcome::Expired);
    assert_eq!(tokens.lock().unwrap()[0].status, TokenStatus::Pending);
    assert!(tokens.lock().unwrap()[0].used_at.is_none());
}

#[tokio::test]
async fn should_accept_redemption_at_exact_expiry() {
    let store = MockTokenStore::new(vec![pending_token("0042", "ODC-17", t0(), 3)]);

    let uc = ConsumeTokenUseCase {
        store,
        clock: FixedClock(t0()),
    };
    let outcome = uc.execute(consume_input("0042", "ODC-17", 3)).await.unwrap();
    assert_eq!(outcome, ConsumeOutcome::Ok, "when == expires_at is inside the window");
}

#[tokio::test]
async fn should_match_site_case_insensitively() {
    let store = MockTokenStore::new(vec![pending_token("0042", "odc-17", t0(), 3)]);

    let uc = ConsumeTokenUseCase {
        store,
        clock: FixedClock(t0()),
    };
    let outcome = uc.execute(consume_input("0042", "ODC-17", 1)).await.unwrap();
    assert_eq!(outcome, ConsumeOutcome::Ok);
}

#[tokio::test]
async fn should_return_not_found_for_mismatched_site() {
    let store = MockTokenStore::new(vec![pending_token("0042", "ODC-17", t0(), 3)]);
    let tokens = store.tokens_handle();

    let uc = ConsumeTokenUseCase {
        store,
        clock: FixedClock(t0()),
    };
    let outcome = uc.execute(consume_input("0042", "ODC-99", 1)).await.unwrap();

    assert_eq!(outcome, ConsumeOutcome::NotFound);
    assert_eq!(tokens.lock().unwrap()[0].status, TokenStatus::Pending);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_code() {
    let uc = ConsumeTokenUseCase {
        store: MockTokenStore::empty(),
        clock: FixedClock(t0()),
    };
    let outcome = uc.execute(consume_input("0042", "ODC-17", 1)).await.unwrap();
    assert_eq!(outcome, ConsumeOutcome::NotFound);
}

#[tokio::test]
async fn should_return_bad_expiry_for_unparseable_expiry() {
    let mut token = pending_token("0042", "ODC-17", t0(), 3);
    token.expires_at = "three minutes from now".to_owned();
    let store = MockTokenStore::new(vec![token]);
    let tokens = store.tokens_handle();

    let uc = ConsumeTokenUseCase {
        store,
        clock: FixedClock(t0()),
    };
    let outcome = uc.execute(consume_input("0042", "ODC-17", 1)).await.unwrap();

    assert_eq!(outcome, ConsumeOutcome::BadExpiry);
    assert_eq!(tokens.lock().unwrap()[0].status, TokenStatus::Pending);
}

#[tokio::test]
async fn should_return_already_used_when_conditional_update_loses_race() {
    let mut store = MockTokenStore::new(vec![pending_token("0042", "ODC-17", t0(), 3)]);
    store.refuse_update = true;

    let uc = ConsumeTokenUseCase {
        store,
        clock: FixedClock(t0()),
    };
    let outcome = uc.execute(consume_input("0042", "ODC-17", 1)).await.unwrap();
    assert_eq!(outcome, ConsumeOutcome::AlreadyUsedOrInvalid);
}

#[tokio::test]
async fn should_default_redemption_instant_to_clock_now() {
    let store = MockTokenStore::new(vec![pending_token("0042", "ODC-17", t0(), 3)]);
    let tokens = store.tokens_handle();

    // Clock pinned inside the window; `when` omitted.
    let uc = ConsumeTokenUseCase {
        store,
        clock: FixedClock(t0() + Duration::minutes(1)),
    };
    let outcome = uc
        .execute(ConsumeTokenInput {
            code: "0042".to_owned(),
            site_id: "ODC-17".to_owned(),
            when: None,
        })
        .await
        .unwrap();

    assert_eq!(outcome, ConsumeOutcome::Ok);
    assert_eq!(
        tokens.lock().unwrap()[0].used_at.as_deref(),
        Some(format_timestamp(t0() + Duration::minutes(1)).as_str())
    );
}

#[tokio::test]
async fn should_audit_failed_redemptions() {
    let store = MockTokenStore::empty();
    let audit = store.audit_handle();

    let uc = ConsumeTokenUseCase {
        store,
        clock: FixedClock(t0()),
    };
    let outcome = uc.execute(consume_input("0042", "ODC-17", 1)).await.unwrap();
    assert_eq!(outcome, ConsumeOutcome::NotFound);

    let audit = audit.lock().unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].detail, "0042|ODC-17|NOT_FOUND");
}
