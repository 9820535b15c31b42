//! Client configuration.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable holding the Meetup.com API key.
pub const ENV_API_KEY: &str = "MEETUP_API_KEY";
/// Environment variable overriding the group url name.
pub const ENV_GROUP_URLNAME: &str = "MEETUP_GROUP_URLNAME";
/// Environment variable overriding the per-attempt timeout, in seconds.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "MEETUP_HTTP_TIMEOUT_SECS";
/// Environment variable overriding the retry count.
pub const ENV_HTTP_RETRIES: &str = "MEETUP_HTTP_RETRIES";
/// Environment variable overriding the API base URL.
pub const ENV_API_BASE_URL: &str = "MEETUP_API_BASE_URL";

/// Errors raised while building a configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for [`crate::MeetupsClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Meetup.com API key, sent as the `key` query parameter.
    pub api_key: String,

    /// URL name of the group whose events are listed.
    pub group_urlname: String,

    /// Timeout applied to each HTTP attempt.
    pub timeout: Duration,

    /// Number of attempts made after the first one for retriable failures.
    pub retries: u32,

    /// Base URL of the API.
    pub base_url: Url,

    /// User agent string.
    pub user_agent: String,
}

impl ClientConfig {
    /// Default per-attempt timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 1;

    /// Default number of retries.
    pub const DEFAULT_RETRIES: u32 = 2;

    /// Default group.
    pub const DEFAULT_GROUP_URLNAME: &'static str = "pythonkc";

    /// Default API host.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.meetup.com";

    /// Creates a configuration with the given API key and defaults elsewhere.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            group_urlname: Self::DEFAULT_GROUP_URLNAME.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            retries: Self::DEFAULT_RETRIES,
            base_url: default_base_url(),
            user_agent: format!("pythonkc-meetups/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Builds a configuration from `MEETUP_*` environment variables.
    ///
    /// Only `MEETUP_API_KEY` is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_KEY))?;
        let mut config = Self::new(api_key);

        if let Some(group) = lookup(ENV_GROUP_URLNAME) {
            config = config.with_group_urlname(group);
        }

        if let Some(value) = lookup(ENV_HTTP_TIMEOUT_SECS) {
            let secs: f64 = value.trim().parse().map_err(|e: std::num::ParseFloatError| {
                invalid(ENV_HTTP_TIMEOUT_SECS, &value, e.to_string())
            })?;
            let timeout = Duration::try_from_secs_f64(secs)
                .map_err(|e| invalid(ENV_HTTP_TIMEOUT_SECS, &value, e.to_string()))?;
            config = config.with_timeout(timeout);
        }

        if let Some(value) = lookup(ENV_HTTP_RETRIES) {
            let retries = value
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    invalid(ENV_HTTP_RETRIES, &value, e.to_string())
                })?;
            config = config.with_retries(retries);
        }

        if let Some(value) = lookup(ENV_API_BASE_URL) {
            config = config
                .with_base_url(&value)
                .map_err(|e| invalid(ENV_API_BASE_URL, &value, e.to_string()))?;
        }

        Ok(config)
    }

    /// Sets the group url name.
    pub fn with_group_urlname(mut self, group_urlname: impl Into<String>) -> Self {
        self.group_urlname = group_urlname.into();
        self
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the number of retries.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Points the client at another API host.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        self.base_url = base_url;
        Ok(self)
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the URL of an API endpoint below the base URL.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("group_urlname", &self.group_urlname)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn default_base_url() -> Url {
    Url::parse(ClientConfig::DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn invalid(var: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn default_config() {
        let config = ClientConfig::new("secret");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.group_urlname, "pythonkc");
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.retries, 2);
        assert_eq!(config.base_url.as_str(), "https://api.meetup.com/");
        assert!(config.user_agent.starts_with("pythonkc-meetups/"));
    }

    #[test]
    fn config_builder_methods() {
        let config = ClientConfig::new("secret")
            .with_group_urlname("kcrust")
            .with_timeout(Duration::from_millis(250))
            .with_retries(0)
            .with_user_agent("test-agent")
            .with_base_url("http://127.0.0.1:8080")
            .unwrap();

        assert_eq!(config.group_urlname, "kcrust");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.retries, 0);
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn invalid_base_url_returns_error() {
        assert!(ClientConfig::new("secret").with_base_url("not a url").is_err());
        assert!(ClientConfig::new("secret").with_base_url("mailto:x@example.com").is_err());
    }

    #[test]
    fn endpoint_joins_paths() {
        let config = ClientConfig::new("secret");
        assert_eq!(
            config.endpoint("/2/events.json").as_str(),
            "https://api.meetup.com/2/events.json"
        );

        let config = config.with_base_url("http://localhost:9000/proxy/").unwrap();
        assert_eq!(
            config.endpoint("2/rsvps.json").as_str(),
            "http://localhost:9000/proxy/2/rsvps.json"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let debug = format!("{:?}", ClientConfig::new("super-secret-key"));
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn from_env_requires_api_key() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ENV_API_KEY)));

        let err = ClientConfig::from_lookup(lookup(&[(ENV_API_KEY, "")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }

    #[test]
    fn from_env_reads_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "abc"),
            (ENV_GROUP_URLNAME, "kcrust"),
            (ENV_HTTP_TIMEOUT_SECS, "2.5"),
            (ENV_HTTP_RETRIES, "4"),
            (ENV_API_BASE_URL, "http://localhost:3000"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.group_urlname, "kcrust");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.retries, 4);
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
    }

    #[test]
    fn from_env_rejects_bad_numbers() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "abc"),
            (ENV_HTTP_RETRIES, "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: ENV_HTTP_RETRIES,
                ..
            }
        ));

        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "abc"),
            (ENV_HTTP_TIMEOUT_SECS, "-3"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
