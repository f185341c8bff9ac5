use std::time::Duration;

use crate::error::{ConfigError, Error};
use crate::sender::Sender;

/// Where to connect, and how often to send.
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// The host name or IP address of the receiver.
    pub host: String,

    /// The receiver's TCP port (1–65535).
    pub port: u16,

    /// How long to wait after each message before sending the next.
    pub interval: Duration,
}

impl Config {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";

    /// The default receiver port.
    pub const DEFAULT_PORT: u16 = 6000;

    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }

    /// Read the receiver address from `$TICKTOCK_HOST` and `$TICKTOCK_PORT`.
    ///
    /// Unset or empty variables fall back to the [defaults][Config::default];
    /// a port which isn't a number in 1–65535 is an error.
    #[cfg(feature = "environment")]
    #[cfg_attr(docsrs, doc(cfg(feature = "environment")))]
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = var("TICKTOCK_HOST") {
            config.host = host;
        }
        if let Some(port) = var("TICKTOCK_PORT") {
            config.port = parse_port(&port)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// The `host:port` pair to connect to.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::Port("0".into()));
        }
        if self.interval.is_zero() {
            return Err(ConfigError::Interval);
        }

        Ok(())
    }

    /// Open the connection described by this [`Config`].
    pub async fn connect(&self) -> Result<Sender, Error> {
        Sender::connect(self).await
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_owned(),
            port: Self::DEFAULT_PORT,
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}

#[cfg(any(feature = "environment", test))]
fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::Port(value.to_owned())),
    }
}

#[cfg(feature = "environment")]
fn var(name: &'static str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::{parse_port, Config};
    use crate::error::ConfigError;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6000);
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.address(), "127.0.0.1:6000");
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_address_brackets_ipv6() {
        assert_eq!(Config::new("::1", 7000).address(), "[::1]:7000");
        assert_eq!(Config::new("[::1]", 7000).address(), "[::1]:7000");
        assert_eq!(Config::new("localhost", 7000).address(), "localhost:7000");
    }

    #[test]
    fn test_validate() {
        assert_eq!(Config::new(" ", 6000).validate(), Err(ConfigError::EmptyHost));
        assert_eq!(
            Config::new("127.0.0.1", 0).validate(),
            Err(ConfigError::Port("0".into()))
        );
        assert_eq!(
            Config::default()
                .with_interval(Duration::ZERO)
                .validate(),
            Err(ConfigError::Interval)
        );
    }

    #[test]
    fn test_ports() {
        assert_eq!(parse_port("6000"), Ok(6000));
        assert_eq!(parse_port(" 65535 "), Ok(65535));
        assert_eq!(parse_port("0"), Err(ConfigError::Port("0".into())));
        assert_eq!(parse_port("65536"), Err(ConfigError::Port("65536".into())));
        assert_eq!(parse_port("http"), Err(ConfigError::Port("http".into())));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let config = Config::new("::1", 7000).with_interval(Duration::from_millis(250));

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<Config>(&json).unwrap(), config);

        let partial: Config = serde_json::from_str(r#"{"port": 7001}"#).unwrap();
        assert_eq!(partial, Config::new("127.0.0.1", 7001));
    }
}
