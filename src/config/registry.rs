use messenger_error::InvalidConfigError;
use serde::{Deserialize, Serialize};

/// Настройки реестра событий.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Максимум подписок на одно событие (`None` — без ограничения).
    pub max_subscribers_per_event: Option<usize>,
    /// Удалять событие из реестра, когда точечная отписка опустошила его
    /// список.
    pub prune_empty_events: bool,
}

impl RegistryConfig {
    pub fn with_max_subscribers(
        mut self,
        limit: usize,
    ) -> Self {
        self.max_subscribers_per_event = Some(limit);
        self
    }

    pub fn with_pruning(
        mut self,
        enabled: bool,
    ) -> Self {
        self.prune_empty_events = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        if self.max_subscribers_per_event == Some(0) {
            return Err(InvalidConfigError::new(
                "registry.max_subscribers_per_event",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded_without_pruning() {
        let cfg = RegistryConfig::default();
        assert_eq!(cfg.max_subscribers_per_event, None);
        assert!(!cfg.prune_empty_events);
        assert!(cfg.validate().is_ok());
    }

    /// Тест проверяет, что нулевой лимит подписчиков отвергается.
    #[test]
    fn test_zero_limit_rejected() {
        let cfg = RegistryConfig::default().with_max_subscribers(0);
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.field, "registry.max_subscribers_per_event");
        assert!(RegistryConfig::default()
            .with_max_subscribers(1)
            .with_pruning(true)
            .validate()
            .is_ok());
    }
}
