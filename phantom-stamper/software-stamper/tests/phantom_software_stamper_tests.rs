use phantom_key_storage_mock::KeyStorageMock;
use phantom_key_store::{KeySlot, KeyStorage};
use phantom_software_stamper::{signer, ApiKeyStamper, SoftwareStamper};
use phantom_stamper_core::{
    Algorithm, Clock, Error, ExpirationPolicy, PrivKeyBytes, Stamp, StampParams, Stamper,
    StamperWithKeyManagement, AUTHENTICATOR_EXPIRATION_TIME,
};
use std::sync::{Arc, Mutex};
use time::macros::datetime;

/// This will run once at load time (i.e. presumably before main function is called).
#[ctor::ctor]
fn overall_init() {
    // Ignore errors, since there may not be a .env file (e.g. in docker image)
    let _ = dotenvy::dotenv();

    // It's necessary to specify EnvFilter::from_default_env in order to use RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();
}

struct TestClock {
    now_l: Mutex<time::OffsetDateTime>,
}

impl TestClock {
    fn new(now: time::OffsetDateTime) -> Self {
        Self {
            now_l: Mutex::new(now),
        }
    }
    fn advance(&self, duration: time::Duration) {
        *self.now_l.lock().expect("pass") += duration;
    }
}

impl Clock for TestClock {
    fn now_utc(&self) -> time::OffsetDateTime {
        *self.now_l.lock().expect("pass")
    }
}

const T0: time::OffsetDateTime = datetime!(2024-06-01 12:00:00 UTC);

fn new_stamper(
    key_storage_a: Arc<KeyStorageMock>,
    clock_a: Arc<TestClock>,
) -> SoftwareStamper {
    SoftwareStamper::new(
        key_storage_a,
        clock_a,
        Some(AUTHENTICATOR_EXPIRATION_TIME),
        ExpirationPolicy::default(),
    )
}

fn new_key_storage() -> Arc<KeyStorageMock> {
    Arc::new(KeyStorageMock::new("phantom-stamper", "test-org"))
}

#[test]
fn test_key_id_derivation() {
    let key_pair_record = signer::generate_key_pair(T0, None).expect("pass");
    let public_key_bytes = key_pair_record
        .key_record
        .public_key_bytes()
        .expect("pass");
    assert_eq!(key_pair_record.key_id().len(), signer::KEY_ID_LEN);
    assert_eq!(
        key_pair_record.key_id(),
        signer::key_id_for_public_key(&public_key_bytes)
    );
    assert_eq!(key_pair_record.key_record.expires_at_o, None);
    signer::check_key_pair_record(&key_pair_record).expect("pass");

    let other = signer::generate_key_pair(T0, Some(time::Duration::days(1))).expect("pass");
    assert_ne!(key_pair_record.key_id(), other.key_id());
    assert_eq!(
        other.key_record.expires_at_o,
        Some(datetime!(2024-06-02 12:00:00 UTC))
    );
}

#[test]
fn test_check_key_pair_record_detects_mismatch() {
    let mut key_pair_record = signer::generate_key_pair(T0, None).expect("pass");
    key_pair_record.priv_key_bytes = PrivKeyBytes::new([7u8; 32]);
    assert!(matches!(
        signer::check_key_pair_record(&key_pair_record),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn test_signer_stamp_is_deterministic_and_verifiable() {
    let key_pair_record = signer::generate_key_pair(T0, None).expect("pass");
    let payload = br#"{"method":"createAuthenticator"}"#;
    let stamp_params = StampParams::pki(payload);
    let stamp_0 = signer::stamp(&key_pair_record.priv_key_bytes, &stamp_params).expect("pass");
    let stamp_1 = signer::stamp(&key_pair_record.priv_key_bytes, &stamp_params).expect("pass");
    assert_eq!(stamp_0, stamp_1);

    let stamp = Stamp::decoded_from_str(stamp_0.as_str()).expect("pass");
    assert_eq!(stamp.kind(), "PKI");
    assert_eq!(
        stamp.public_key_base58().expect("pass"),
        key_pair_record.key_record.public_key
    );
    stamp.verify(payload).expect("pass");
    assert!(matches!(
        stamp.verify(b"some other payload"),
        Err(Error::SignatureVerificationFailed(_))
    ));
}

#[tokio::test]
async fn test_not_initialized() {
    let stamper = new_stamper(new_key_storage(), Arc::new(TestClock::new(T0)));
    assert!(stamper.get_key_info().is_none());
    assert!(matches!(
        stamper.stamp(&StampParams::pki(b"payload")).await,
        Err(Error::NotInitialized(_))
    ));
    assert!(matches!(
        stamper.generate_new_key_pair().await,
        Err(Error::NotInitialized(_))
    ));
    assert!(matches!(
        stamper.switch_to_new_key_pair("auth-1").await,
        Err(Error::NoPendingKey(_))
    ));
    let expiration_info = stamper.get_expiration_info(T0);
    assert_eq!(expiration_info.expires_at_o, None);
    assert!(!expiration_info.should_renew);
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let stamper = new_stamper(new_key_storage(), Arc::new(TestClock::new(T0)));
    let key_record_0 = stamper.init().await.expect("pass");
    let key_record_1 = stamper.init().await.expect("pass");
    assert_eq!(key_record_0.key_id, key_record_1.key_id);
    assert_eq!(key_record_0, key_record_1);
    assert_eq!(key_record_0.created_at, T0);
    assert_eq!(
        key_record_0.expires_at_o,
        Some(T0 + AUTHENTICATOR_EXPIRATION_TIME)
    );
    assert_eq!(key_record_0.authenticator_id_o, None);
    assert_eq!(stamper.get_key_info(), Some(key_record_0));
}

#[tokio::test]
async fn test_signing_continuity_while_pending() {
    let clock_a = Arc::new(TestClock::new(T0));
    let stamper = new_stamper(new_key_storage(), clock_a.clone());
    let key_record_1 = stamper.init().await.expect("pass");

    let payload = b"the same payload, twice";
    let stamp_before = stamper
        .stamp(&StampParams::pki(payload))
        .await
        .expect("pass");

    clock_a.advance(time::Duration::days(6));
    let key_record_2 = stamper.generate_new_key_pair().await.expect("pass");
    assert_ne!(key_record_1.key_id, key_record_2.key_id);
    assert_eq!(key_record_2.created_at, T0 + time::Duration::days(6));
    assert_eq!(stamper.get_pending_key_info(), Some(key_record_2));
    assert_eq!(stamper.get_key_info(), Some(key_record_1));

    let stamp_during = stamper
        .stamp(&StampParams::pki(payload))
        .await
        .expect("pass");
    assert_eq!(stamp_before, stamp_during);
}

#[tokio::test]
async fn test_switch_to_new_key_pair() {
    let stamper = new_stamper(new_key_storage(), Arc::new(TestClock::new(T0)));
    let key_record_1 = stamper.init().await.expect("pass");
    let payload = b"payload";
    let stamp_1 = stamper
        .stamp(&StampParams::pki(payload))
        .await
        .expect("pass");

    let key_record_2 = stamper.generate_new_key_pair().await.expect("pass");
    let promoted = stamper
        .switch_to_new_key_pair("auth-2")
        .await
        .expect("pass");
    assert_eq!(promoted.key_id, key_record_2.key_id);
    assert_eq!(promoted.authenticator_id_o.as_deref(), Some("auth-2"));
    assert!(stamper.get_pending_key_info().is_none());
    let key_info = stamper.get_key_info().expect("pass");
    assert_eq!(key_info.authenticator_id_o.as_deref(), Some("auth-2"));

    let stamp_2 = stamper
        .stamp(&StampParams::pki(payload))
        .await
        .expect("pass");
    assert_ne!(stamp_1, stamp_2);
    let stamp = Stamp::decoded_from_str(stamp_2.as_str()).expect("pass");
    stamp.verify(payload).expect("pass");
    assert_eq!(stamp.public_key_base58().expect("pass"), key_record_2.public_key);
    assert_ne!(stamp.public_key_base58().expect("pass"), key_record_1.public_key);

    // Nothing is pending anymore.
    assert!(matches!(
        stamper.switch_to_new_key_pair("auth-3").await,
        Err(Error::NoPendingKey(_))
    ));
}

#[tokio::test]
async fn test_oidc_stamp() {
    let stamper = new_stamper(new_key_storage(), Arc::new(TestClock::new(T0)));
    stamper.init().await.expect("pass");
    let encoded = stamper
        .stamp(&StampParams::OIDC {
            data: b"payload",
            id_token: "header.claims.signature",
            salt: "salt-123",
        })
        .await
        .expect("pass");
    let stamp = Stamp::decoded_from_str(encoded.as_str()).expect("pass");
    assert_eq!(stamp.kind(), "OIDC");
    match &stamp {
        Stamp::OIDC { id_token, salt, .. } => {
            assert_eq!(id_token, "header.claims.signature");
            assert_eq!(salt, "salt-123");
        }
        Stamp::PKI { .. } => panic!("expected an OIDC stamp"),
    }
    stamp.verify(b"payload").expect("pass");
}

#[tokio::test]
async fn test_discard_pending_key_pair() {
    let key_storage_a = new_key_storage();
    let stamper = new_stamper(key_storage_a.clone(), Arc::new(TestClock::new(T0)));
    let key_record_1 = stamper.init().await.expect("pass");
    stamper.generate_new_key_pair().await.expect("pass");
    assert!(key_storage_a
        .get_key_pair(KeySlot::Pending)
        .await
        .expect("pass")
        .is_some());

    stamper.discard_pending_key_pair().await.expect("pass");
    assert!(stamper.get_pending_key_info().is_none());
    assert!(key_storage_a
        .get_key_pair(KeySlot::Pending)
        .await
        .expect("pass")
        .is_none());
    assert_eq!(stamper.get_key_info(), Some(key_record_1));
    // Discarding when nothing is pending is fine.
    stamper.discard_pending_key_pair().await.expect("pass");
}

#[tokio::test]
async fn test_last_generate_wins() {
    let stamper = new_stamper(new_key_storage(), Arc::new(TestClock::new(T0)));
    stamper.init().await.expect("pass");
    let key_record_2 = stamper.generate_new_key_pair().await.expect("pass");
    let key_record_3 = stamper.generate_new_key_pair().await.expect("pass");
    assert_ne!(key_record_2.key_id, key_record_3.key_id);
    let promoted = stamper
        .switch_to_new_key_pair("auth-3")
        .await
        .expect("pass");
    assert_eq!(promoted.key_id, key_record_3.key_id);
}

#[tokio::test]
async fn test_persistence_across_restart() {
    let key_storage_a = new_key_storage();
    let clock_a = Arc::new(TestClock::new(T0));

    let key_record = {
        let stamper = new_stamper(key_storage_a.clone(), clock_a.clone());
        stamper.init().await.expect("pass");
        stamper.generate_new_key_pair().await.expect("pass");
        stamper
            .switch_to_new_key_pair("auth-1")
            .await
            .expect("pass")
    };

    clock_a.advance(time::Duration::hours(1));
    let stamper = new_stamper(key_storage_a, clock_a);
    let restored = stamper.init().await.expect("pass");
    assert_eq!(restored, key_record);
    assert_eq!(restored.authenticator_id_o.as_deref(), Some("auth-1"));
}

#[tokio::test]
async fn test_leftover_pending_key_is_discarded_on_init() {
    let key_storage_a = new_key_storage();
    let clock_a = Arc::new(TestClock::new(T0));

    let (key_record_1, _key_record_2) = {
        let stamper = new_stamper(key_storage_a.clone(), clock_a.clone());
        let key_record_1 = stamper.init().await.expect("pass");
        // Simulate a crash between generation and promotion.
        let key_record_2 = stamper.generate_new_key_pair().await.expect("pass");
        (key_record_1, key_record_2)
    };

    let stamper = new_stamper(key_storage_a.clone(), clock_a);
    let restored = stamper.init().await.expect("pass");
    assert_eq!(restored, key_record_1);
    assert!(stamper.get_pending_key_info().is_none());
    assert!(key_storage_a
        .get_key_pair(KeySlot::Pending)
        .await
        .expect("pass")
        .is_none());
}

#[tokio::test]
async fn test_storage_failure_leaves_state_unchanged() {
    let key_storage_a = new_key_storage();
    let stamper = new_stamper(key_storage_a.clone(), Arc::new(TestClock::new(T0)));
    let key_record_1 = stamper.init().await.expect("pass");
    stamper.generate_new_key_pair().await.expect("pass");

    key_storage_a.set_fail_writes(true);
    assert!(matches!(
        stamper.switch_to_new_key_pair("auth-2").await,
        Err(Error::StorageError(_))
    ));
    assert_eq!(stamper.get_key_info(), Some(key_record_1.clone()));
    assert!(stamper.get_pending_key_info().is_some());
    assert!(matches!(
        stamper.generate_new_key_pair().await,
        Err(Error::StorageError(_))
    ));
    assert_eq!(stamper.get_key_info(), Some(key_record_1));
}

#[tokio::test]
async fn test_expiration_info() {
    let clock_a = Arc::new(TestClock::new(T0));
    let stamper = new_stamper(new_key_storage(), clock_a);
    let key_record = stamper.init().await.expect("pass");
    let expires_at = key_record.expires_at_o.expect("pass");

    let expiration_info = stamper.get_expiration_info(T0 + time::Duration::days(1));
    assert_eq!(expiration_info.expires_at_o, Some(expires_at));
    assert_eq!(
        expiration_info.time_until_expiry_o,
        Some(time::Duration::days(6))
    );
    assert!(!expiration_info.should_renew);

    assert!(
        stamper
            .get_expiration_info(T0 + time::Duration::days(6))
            .should_renew
    );
    assert!(!stamper.get_expiration_info(expires_at).should_renew);
    assert!(stamper.get_expiration_info(expires_at).is_expired());
}

#[tokio::test]
async fn test_non_expiring_keys() {
    let stamper = SoftwareStamper::new(
        new_key_storage(),
        Arc::new(TestClock::new(T0)),
        None,
        ExpirationPolicy::default(),
    );
    let key_record = stamper.init().await.expect("pass");
    assert_eq!(key_record.expires_at_o, None);
    let expiration_info = stamper.get_expiration_info(T0 + time::Duration::days(365));
    assert_eq!(expiration_info.time_until_expiry_o, None);
    assert!(!expiration_info.should_renew);
}

#[tokio::test]
async fn test_reset_and_clear() {
    let key_storage_a = new_key_storage();
    let stamper = new_stamper(key_storage_a.clone(), Arc::new(TestClock::new(T0)));
    let key_record_1 = stamper.init().await.expect("pass");
    stamper.generate_new_key_pair().await.expect("pass");

    let key_record_2 = stamper.reset_key_pair().await.expect("pass");
    assert_ne!(key_record_1.key_id, key_record_2.key_id);
    assert!(stamper.get_pending_key_info().is_none());
    assert_eq!(stamper.get_key_info(), Some(key_record_2));
    assert_eq!(key_storage_a.entry_count(), 1);

    stamper.clear().await.expect("pass");
    assert!(stamper.get_key_info().is_none());
    assert_eq!(key_storage_a.entry_count(), 0);
    assert!(matches!(
        stamper.stamp(&StampParams::pki(b"payload")).await,
        Err(Error::NotInitialized(_))
    ));

    // A cleared stamper can be initialized again with a fresh key.
    let key_record_3 = stamper.init().await.expect("pass");
    assert_ne!(key_record_1.key_id, key_record_3.key_id);
}

#[tokio::test]
async fn test_api_key_stamper() {
    let key_pair_record = signer::generate_key_pair(T0, None).expect("pass");
    let api_secret_key = key_pair_record.priv_key_bytes.to_base58();
    let api_key_stamper = ApiKeyStamper::new(api_secret_key.as_str()).expect("pass");
    assert_eq!(api_key_stamper.algorithm(), Algorithm::Ed25519);
    assert_eq!(
        api_key_stamper.public_key(),
        key_pair_record.key_record.public_key
    );

    let payload = b"server-side request";
    let encoded = api_key_stamper
        .stamp(&StampParams::pki(payload))
        .await
        .expect("pass");
    assert_eq!(
        encoded,
        signer::stamp(&key_pair_record.priv_key_bytes, &StampParams::pki(payload)).expect("pass")
    );
    Stamp::decoded_from_str(encoded.as_str())
        .expect("pass")
        .verify(payload)
        .expect("pass");

    assert!(matches!(
        ApiKeyStamper::new("not*base58"),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn test_key_lifetime_out_of_range() {
    assert!(matches!(
        signer::generate_key_pair(T0, Some(time::Duration::MAX)),
        Err(Error::Unsupported(_))
    ));
}
