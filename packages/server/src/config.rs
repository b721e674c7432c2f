//! Server configuration.
//!
//! Every option can be given as a command-line flag or an environment variable.

use std::{fmt, path::PathBuf, time::Duration};

use clap::Parser;
use thiserror::Error;

/// Default heartbeat interval in seconds.
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("heartbeat interval must be greater than zero")]
    ZeroHeartbeatInterval,

    #[error("seed secret must not be empty when set")]
    EmptySeedSecret,
}

#[derive(Clone, Parser)]
#[command(name = "seedwall-server")]
#[command(about = "Fan-out server: one seed controller drives many screen displays", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "SEEDWALL_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Path of the preset/demo catalog document
    #[arg(long, env = "SEEDWALL_CATALOG_PATH", default_value = "data/presets.json")]
    pub catalog_path: PathBuf,

    /// Seconds between heartbeat pings
    #[arg(
        long,
        env = "SEEDWALL_HEARTBEAT_INTERVAL_SECS",
        default_value_t = DEFAULT_HEARTBEAT_INTERVAL_SECS
    )]
    pub heartbeat_interval_secs: u64,

    /// Shared secret required to take the seed role
    #[arg(long, env = "SEEDWALL_SEED_SECRET")]
    pub seed_secret: Option<String>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat_interval_secs == 0 {
            return Err(ConfigError::ZeroHeartbeatInterval);
        }
        if self.seed_secret.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptySeedSecret);
        }
        Ok(())
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}

/// Custom Debug implementation that redacts the seed secret.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("catalog_path", &self.catalog_path)
            .field("heartbeat_interval_secs", &self.heartbeat_interval_secs)
            .field(
                "seed_secret",
                &self.seed_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerConfig {
        let mut argv = vec!["seedwall-server"];
        argv.extend_from_slice(args);
        ServerConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_explicit_flags() {
        // テスト項目: フラグで各設定を上書きできる
        // given (前提条件):
        let args = [
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--catalog-path",
            "/tmp/catalog.json",
            "--heartbeat-interval-secs",
            "5",
            "--seed-secret",
            "letmein",
        ];

        // when (操作):
        let config = parse(&args);

        // then (期待する結果):
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.catalog_path, PathBuf::from("/tmp/catalog.json"));
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(5));
        assert_eq!(config.seed_secret.as_deref(), Some("letmein"));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_zero_heartbeat_interval_is_rejected() {
        // テスト項目: heartbeat 間隔 0 は検証エラー
        // given (前提条件):
        let config = parse(&["--heartbeat-interval-secs", "0"]);

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert_eq!(result, Err(ConfigError::ZeroHeartbeatInterval));
    }

    #[test]
    fn test_empty_seed_secret_is_rejected() {
        // テスト項目: 空のシークレットは検証エラー
        // given (前提条件):
        let config = parse(&["--seed-secret", ""]);

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert_eq!(result, Err(ConfigError::EmptySeedSecret));
    }

    #[test]
    fn test_debug_redacts_seed_secret() {
        // テスト項目: Debug 出力にシークレットが含まれない
        // given (前提条件):
        let config = parse(&["--seed-secret", "hunter2"]);

        // when (操作):
        let debug = format!("{:?}", config);

        // then (期待する結果):
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
