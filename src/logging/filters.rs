use tracing_subscriber::EnvFilter;

use crate::logging::config::LoggingConfig;

/// Фильтр на основе конфигурации.
///
/// Если задан `RUST_LOG`, используется он; иначе директива из конфигурации.
pub fn build_filter_from_config(config: &LoggingConfig) -> EnvFilter {
    let directive = config.build_filter_directive();

    match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => match EnvFilter::try_new(&directive) {
            Ok(filter) => filter,
            Err(e) => {
                eprintln!(
                    "Invalid log filter directive from config ('{directive}'): {e}; falling back to 'info'"
                );
                EnvFilter::new("info")
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    /// Тест проверяет, что без RUST_LOG используется директива из
    /// конфигурации.
    #[test]
    #[serial]
    fn test_filter_from_config_without_env() {
        std::env::remove_var("RUST_LOG");
        let cfg = LoggingConfig {
            level: "debug".into(),
            ..Default::default()
        };
        let filter = build_filter_from_config(&cfg);
        assert!(filter.to_string().contains("messenger=debug"));
    }

    /// Тест проверяет, что RUST_LOG имеет приоритет над конфигурацией.
    #[test]
    #[serial]
    fn test_filter_prefers_env() {
        std::env::set_var("RUST_LOG", "trace");
        let filter = build_filter_from_config(&LoggingConfig::default());
        std::env::remove_var("RUST_LOG");
        assert!(!filter.to_string().contains("messenger=info"));
    }

    /// Тест проверяет откат на `info` при некорректной директиве.
    #[test]
    #[serial]
    fn test_filter_falls_back_on_invalid_directive() {
        std::env::remove_var("RUST_LOG");
        let cfg = LoggingConfig {
            level: "messenger=nonsense".into(),
            ..Default::default()
        };
        let filter = build_filter_from_config(&cfg);
        assert_eq!(filter.to_string(), "info");
    }
}
