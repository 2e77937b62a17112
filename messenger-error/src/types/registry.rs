use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, InvalidConfigError, StatusCode};

/// Ошибка, возвращаемая обработчиком подписчика.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Результат вызова обработчика подписчика.
pub type HandlerResult = Result<(), HandlerError>;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Ошибки операций реестра событий.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Некорректный аргумент: пустое имя события или обработчик, который
    /// больше нельзя вызвать.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Превышен лимит подписчиков на событие.
    #[error("subscriber limit ({limit}) exceeded for event '{event}'")]
    SubscriberLimitExceeded { event: String, limit: usize },

    /// Обработчик подписчика вернул ошибку; рассылка прервана.
    #[error("subscriber of event '{event}' failed: {source}")]
    Handler { event: String, source: HandlerError },

    /// Не удалось сериализовать полезную нагрузку.
    #[error("payload serialization failed: {reason}")]
    Serialization { reason: String },

    /// Реестр создан с недопустимыми настройками.
    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfigError),
}

impl RegistryError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Имя события, к которому относится ошибка (если есть).
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::SubscriberLimitExceeded { event, .. } | Self::Handler { event, .. } => {
                Some(event)
            }
            _ => None,
        }
    }
}

impl ErrorExt for RegistryError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } => StatusCode::InvalidArgs,
            Self::SubscriberLimitExceeded { .. } => StatusCode::SubscriberLimitExceeded,
            Self::Handler { .. } => StatusCode::HandlerFailed,
            Self::Serialization { .. } => StatusCode::SerializationFailed,
            Self::InvalidConfig(err) => err.status_code(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", self.type_name()),
            ("status_code", self.status_code().to_string()),
        ];
        if let Some(event) = self.event() {
            tags.push(("event", event.to_string()));
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_registry_error_display() {
        assert_eq!(
            RegistryError::invalid_argument("event name is empty").to_string(),
            "invalid argument: event name is empty"
        );
        assert_eq!(
            RegistryError::SubscriberLimitExceeded {
                event: "chat".into(),
                limit: 2
            }
            .to_string(),
            "subscriber limit (2) exceeded for event 'chat'"
        );
    }

    /// Тест проверяет, что ошибка обработчика сохраняет исходную ошибку как
    /// `source`.
    #[test]
    fn test_handler_error_keeps_source() {
        let err = RegistryError::Handler {
            event: "news".into(),
            source: "boom".into(),
        };
        assert_eq!(err.status_code(), StatusCode::HandlerFailed);
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".into()));
        assert_eq!(err.event(), Some("news"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RegistryError::invalid_argument("x").status_code(),
            StatusCode::InvalidArgs
        );
        assert_eq!(
            RegistryError::Serialization {
                reason: "x".into()
            }
            .status_code(),
            StatusCode::SerializationFailed
        );
        let err: RegistryError =
            InvalidConfigError::new("registry.max_subscribers_per_event", "zero").into();
        assert_eq!(err.status_code(), StatusCode::InvalidConfig);
        assert_eq!(
            err.to_string(),
            "invalid config `registry.max_subscribers_per_event`: zero"
        );
    }

    /// Тест проверяет, что теги метрик содержат имя события, если оно
    /// известно.
    #[test]
    fn test_metrics_tags_include_event() {
        let err = RegistryError::SubscriberLimitExceeded {
            event: "chat".into(),
            limit: 1,
        };
        let tags = err.metrics_tags();
        assert!(tags.contains(&("event", "chat".to_string())));
        assert!(tags.contains(&("error_type", "RegistryError".to_string())));

        let tags = RegistryError::invalid_argument("x").metrics_tags();
        assert!(!tags.iter().any(|(k, _)| *k == "event"));
    }
}
