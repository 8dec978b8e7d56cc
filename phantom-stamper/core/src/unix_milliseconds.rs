//! Conversions between `time::OffsetDateTime` and milliseconds since the Unix epoch, which is how
//! timestamps are represented in persisted key records and on the wire.  The submodules are
//! meant for use with `#[serde(with = "...")]`.

use crate::{Error, Result};

/// Rounds toward negative infinity, so times before the epoch land on the preceding millisecond.
pub fn from_offset_date_time(t: time::OffsetDateTime) -> i64 {
    t.unix_timestamp_nanos().div_euclid(1_000_000) as i64
}

pub fn to_offset_date_time(unix_milliseconds: i64) -> Result<time::OffsetDateTime> {
    time::OffsetDateTime::from_unix_timestamp_nanos(unix_milliseconds as i128 * 1_000_000).map_err(
        |e| {
            Error::Malformed(
                format!(
                    "unix milliseconds value {} is out of range: {}",
                    unix_milliseconds, e
                )
                .into(),
            )
        },
    )
}

pub fn serialize<S: serde::Serializer>(
    t: &time::OffsetDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(from_offset_date_time(*t))
}

pub fn deserialize<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<time::OffsetDateTime, D::Error> {
    use serde::Deserialize;
    let unix_milliseconds = i64::deserialize(deserializer)?;
    to_offset_date_time(unix_milliseconds).map_err(serde::de::Error::custom)
}

pub mod option {
    pub fn serialize<S: serde::Serializer>(
        t_o: &Option<time::OffsetDateTime>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match t_o {
            Some(t) => serializer.serialize_some(&super::from_offset_date_time(*t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<time::OffsetDateTime>, D::Error> {
        use serde::Deserialize;
        Option::<i64>::deserialize(deserializer)?
            .map(super::to_offset_date_time)
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}
