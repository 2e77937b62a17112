use messenger_error::InvalidConfigError;
use serde::{Deserialize, Serialize};

/// Формат вывода логов.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Настройки логирования.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень или директива фильтра (`"info"`, `"messenger=debug,warn"`).
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// Директива для `EnvFilter`. Голый уровень применяется к крейту
    /// `messenger`, остальные цели получают `warn`.
    pub fn build_filter_directive(&self) -> String {
        let level = self.level.trim();
        if level.contains('=') || level.contains(',') {
            level.to_string()
        } else {
            format!("messenger={level},warn")
        }
    }

    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        if self.level.trim().is_empty() {
            return Err(InvalidConfigError::new("logging.level", "must not be empty"));
        }
        tracing_subscriber::EnvFilter::try_new(self.build_filter_directive())
            .map(|_| ())
            .map_err(|e| InvalidConfigError::new("logging.level", format!("'{}': {e}", self.level)))
    }
}
