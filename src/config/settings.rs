use std::path::Path;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use super::RegistryConfig;
use crate::logging::LoggingConfig;

/// Настройки приложения: реестр и логирование.
///
/// Источники в порядке приоритета (последний побеждает):
/// 1. значения по умолчанию;
/// 2. файл (только для [`Settings::load_from`]);
/// 3. переменные окружения `MESSENGER_<SECTION>__<KEY>`, например
///    `MESSENGER_REGISTRY__MAX_SUBSCRIBERS_PER_EVENT=64`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Загружает настройки из значений по умолчанию и окружения.
    pub fn load() -> Result<Self, ConfigError> {
        Self::finish(Self::defaults()?)
    }

    /// Как [`Settings::load`], но дополнительно читает файл (формат по
    /// расширению: toml, json, yaml, ...).
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::finish(Self::defaults()?.add_source(File::from(path.as_ref())))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.registry
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        self.logging
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(())
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let logging = LoggingConfig::default();
        Config::builder()
            // Добавляем значения по умолчанию
            .set_default("registry.prune_empty_events", false)?
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", "compact")?
            .set_default("logging.with_ansi", logging.with_ansi)?
            .set_default("logging.with_target", logging.with_target)?
            .set_default("logging.with_thread_ids", logging.with_thread_ids)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let cfg = builder
            // Добавляем переменные окружения с префиксом MESSENGER_
            .add_source(
                Environment::with_prefix("MESSENGER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, io::Write};

    use serial_test::serial;

    use super::*;
    use crate::logging::LogFormat;

    const LIMIT_VAR: &str = "MESSENGER_REGISTRY__MAX_SUBSCRIBERS_PER_EVENT";
    const FORMAT_VAR: &str = "MESSENGER_LOGGING__FORMAT";

    fn clear_env() {
        env::remove_var(LIMIT_VAR);
        env::remove_var(FORMAT_VAR);
    }

    /// Тест проверяет значения по умолчанию без переменных окружения.
    #[test]
    #[serial]
    fn test_load_defaults() {
        clear_env();
        let settings = Settings::load().unwrap();
        assert_eq!(settings, Settings::default());
    }

    /// Тест проверяет переопределение через переменные окружения.
    #[test]
    #[serial]
    fn test_load_env_overrides() {
        clear_env();
        env::set_var(LIMIT_VAR, "8");
        env::set_var(FORMAT_VAR, "json");
        let settings = Settings::load();
        clear_env();

        let settings = settings.unwrap();
        assert_eq!(settings.registry.max_subscribers_per_event, Some(8));
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    /// Тест проверяет, что нулевой лимит из окружения отвергается.
    #[test]
    #[serial]
    fn test_load_rejects_zero_limit() {
        clear_env();
        env::set_var(LIMIT_VAR, "0");
        let result = Settings::load();
        clear_env();
        match result {
            Err(ConfigError::Message(msg)) => {
                assert!(msg.contains("registry.max_subscribers_per_event"), "got: {msg}")
            }
            other => panic!("Expected ConfigError::Message, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_load_from_toml_file() {
        clear_env();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[registry]\nprune_empty_events = true\n\n[logging]\nlevel = \"debug\"\nformat = \"pretty\""
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert!(settings.registry.prune_empty_events);
        assert_eq!(settings.registry.max_subscribers_per_event, None);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
    }
}
