mod algorithm;
mod clock;
mod error;
mod expiration_info;
mod expiration_policy;
mod key_pair_record;
mod key_record;
mod priv_key_bytes;
mod stamp;
mod stamp_params;
mod stamper;
mod stamper_with_key_management;
pub mod unix_milliseconds;

pub use crate::{
    algorithm::Algorithm,
    clock::{Clock, SystemClock},
    error::Error,
    expiration_info::ExpirationInfo,
    expiration_policy::ExpirationPolicy,
    key_pair_record::KeyPairRecord,
    key_record::KeyRecord,
    priv_key_bytes::PrivKeyBytes,
    stamp::{Stamp, STAMP_HEADER_NAME},
    stamp_params::StampParams,
    stamper::Stamper,
    stamper_with_key_management::StamperWithKeyManagement,
};
pub type Result<T> = std::result::Result<T, Error>;

/// How long a freshly generated authenticator key is valid before it expires.
pub const AUTHENTICATOR_EXPIRATION_TIME: time::Duration = time::Duration::days(7);
/// How long before expiration a rotation should be attempted.
pub const AUTHENTICATOR_RENEWAL_WINDOW: time::Duration = time::Duration::days(2);

/// Returns the current time in UTC truncated to millisecond precision, which is the precision
/// that the organization service (and javascript's `Date.now()`) works in.
pub fn now_utc_milliseconds() -> time::OffsetDateTime {
    truncated_to_milliseconds(time::OffsetDateTime::now_utc())
}

pub fn truncated_to_milliseconds(t: time::OffsetDateTime) -> time::OffsetDateTime {
    let sub_millisecond_nanos = (t.nanosecond() % 1_000_000) as i64;
    t - time::Duration::nanoseconds(sub_millisecond_nanos)
}
