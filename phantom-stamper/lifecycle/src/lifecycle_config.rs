use crate::{Error, Result};
use phantom_stamper_core::{
    ExpirationPolicy, AUTHENTICATOR_EXPIRATION_TIME, AUTHENTICATOR_RENEWAL_WINDOW,
};

/// Settings for keeping an authenticator alive for a given user of an organization.
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LifecycleConfig {
    /// Specify the id of the organization that the authenticator belongs to.
    #[cfg_attr(
        feature = "clap",
        arg(env = "PHANTOM_ORGANIZATION_ID", long, value_name = "ID")
    )]
    pub organization_id: String,
    /// Specify the username that the authenticator is registered under.
    #[cfg_attr(
        feature = "clap",
        arg(env = "PHANTOM_USERNAME", long, value_name = "USERNAME")
    )]
    pub username: String,
    /// Specify the prefix of the names of newly registered authenticators.  The name is the prefix
    /// followed by "-" and the registration time in unix milliseconds.
    #[cfg_attr(
        feature = "clap",
        arg(
            env = "PHANTOM_AUTHENTICATOR_NAME_PREFIX",
            long,
            value_name = "PREFIX",
            default_value = "auth"
        )
    )]
    pub authenticator_name_prefix: String,
    /// Specify how long, in milliseconds, a newly generated key stays valid.
    #[cfg_attr(
        feature = "clap",
        arg(
            env = "PHANTOM_AUTHENTICATOR_LIFETIME_MS",
            long,
            value_name = "MILLISECONDS",
            default_value = "604800000"
        )
    )]
    pub authenticator_lifetime_ms: u64,
    /// Specify how long, in milliseconds, before expiry a rotation should be attempted.
    #[cfg_attr(
        feature = "clap",
        arg(
            env = "PHANTOM_RENEWAL_WINDOW_MS",
            long,
            value_name = "MILLISECONDS",
            default_value = "172800000"
        )
    )]
    pub renewal_window_ms: u64,
    /// Specify how often, in milliseconds, the background renewal loop checks the active key.
    #[cfg_attr(
        feature = "clap",
        arg(
            env = "PHANTOM_RENEWAL_CHECK_INTERVAL_MS",
            long,
            value_name = "MILLISECONDS",
            default_value = "3600000"
        )
    )]
    pub renewal_check_interval_ms: u64,
}

impl LifecycleConfig {
    /// Default lifetime, renewal window, and check interval.
    pub fn new(organization_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            username: username.into(),
            authenticator_name_prefix: "auth".to_string(),
            authenticator_lifetime_ms: AUTHENTICATOR_EXPIRATION_TIME.whole_milliseconds() as u64,
            renewal_window_ms: AUTHENTICATOR_RENEWAL_WINDOW.whole_milliseconds() as u64,
            renewal_check_interval_ms: 60 * 60 * 1000,
        }
    }
    pub fn authenticator_lifetime(&self) -> Result<time::Duration> {
        milliseconds_duration(
            "authenticator_lifetime_ms",
            self.authenticator_lifetime_ms,
        )
    }
    pub fn renewal_window(&self) -> Result<time::Duration> {
        milliseconds_duration("renewal_window_ms", self.renewal_window_ms)
    }
    pub fn expiration_policy(&self) -> Result<ExpirationPolicy> {
        Ok(ExpirationPolicy::new(self.renewal_window()?))
    }
    pub fn renewal_check_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.renewal_check_interval_ms)
    }
    pub fn authenticator_name(&self, now: time::OffsetDateTime) -> String {
        format!(
            "{}-{}",
            self.authenticator_name_prefix,
            phantom_stamper_core::unix_milliseconds::from_offset_date_time(now)
        )
    }
}

fn milliseconds_duration(field_name: &str, milliseconds: u64) -> Result<time::Duration> {
    let milliseconds = i64::try_from(milliseconds).map_err(|_| {
        Error::InvalidConfiguration(
            format!("{} value {} is out of range", field_name, milliseconds).into(),
        )
    })?;
    Ok(time::Duration::milliseconds(milliseconds))
}
