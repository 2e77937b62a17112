use std::sync::atomic::{AtomicU64, Ordering};

/// Счётчики реестра.
#[derive(Debug, Default)]
pub struct RegistryMetrics {
    /// Общее количество вызовов `publish`
    pub publishes: AtomicU64,
    /// Количество публикаций, для которых не нашлось подписчиков
    pub unheard_publishes: AtomicU64,
    /// Количество успешных вызовов обработчиков
    pub deliveries: AtomicU64,
    /// Пропущенные записи с невызываемым обработчиком
    pub skipped: AtomicU64,
    /// Рассылки, прерванные ошибкой обработчика
    pub handler_failures: AtomicU64,
}

/// Снимок счётчиков.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    pub publishes: u64,
    pub unheard_publishes: u64,
    pub deliveries: u64,
    pub skipped: u64,
    pub handler_failures: u64,
}

impl RegistryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_publish(&self) {
        self.publishes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unheard(&self) {
        self.unheard_publishes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dispatch(
        &self,
        invoked: usize,
        skipped: usize,
    ) {
        self.deliveries.fetch_add(invoked as u64, Ordering::Relaxed);
        self.skipped.fetch_add(skipped as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_handler_failure(&self) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RegistryStats {
        RegistryStats {
            publishes: self.publishes.load(Ordering::Relaxed),
            unheard_publishes: self.unheard_publishes.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
        }
    }
}
