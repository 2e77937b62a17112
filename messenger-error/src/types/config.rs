use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Недопустимое значение настройки.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid config `{field}`: {reason}")]
pub struct InvalidConfigError {
    /// Путь к полю, например `registry.max_subscribers_per_event`.
    pub field: &'static str,
    pub reason: String,
}

impl InvalidConfigError {
    pub fn new(
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl ErrorExt for InvalidConfigError {
    fn status_code(&self) -> StatusCode {
        StatusCode::InvalidConfig
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
