//! Logging setup for the Seedwall binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the given crate and the binary log at `default_log_level` unless
/// `RUST_LOG` is set, in which case it wins.
///
/// # Arguments
///
/// * `crate_name` - The library crate whose logs should be shown (e.g., "seedwall_server")
/// * `binary_name` - The name of the binary (e.g., "seedwall-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use seedwall_shared::logger::setup_logger;
///
/// setup_logger("seedwall_server", "seedwall-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(crate_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the `EnvFilter` directive used when `RUST_LOG` is not set.
fn default_filter(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},{}={},tower_http={}",
        crate_name.replace('-', "_"),
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level,
        default_log_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_names() {
        // テスト項目: クレート名・バイナリ名のハイフンがアンダースコアに置換される
        // given (前提条件):
        let crate_name = "seedwall-server";
        let binary_name = "seedwall-server";

        // when (操作):
        let filter = default_filter(crate_name, binary_name, "info");

        // then (期待する結果):
        assert_eq!(
            filter,
            "seedwall_server=info,seedwall_server=info,tower_http=info"
        );
    }
}
