//! Реестр подписок и синхронная рассылка событий.
//!
//! ```text
//! subscribe("order.paid", cb, ctx)      publish("order.paid", &data)
//!         │                                     │
//!         ▼                                     ▼
//!   events: "order.paid" ─► [ (cb1, ctx1), (cb2, ctx2), ... ]
//!                                     │ snapshot
//!                                     ▼
//!                        cb1(ctx1, &data) ─► cb2(ctx2, &data) ─► ...
//! ```
//!
//! ## Правила
//! - Пара (обработчик, контекст) хранится в списке события не более одного
//!   раза; повторная подписка ничего не меняет.
//! - Обработчики вызываются в порядке регистрации, на потоке вызывающего
//!   `publish`.
//! - Рассылка идёт по снимку списка, сделанному в начале `publish`: подписки,
//!   добавленные во время рассылки, увидит только следующая публикация;
//!   удалённые во время рассылки всё ещё получат текущую.
//! - Записи со слабым обработчиком, владелец которого уже освобождён,
//!   пропускаются молча.
//! - Ошибка обработчика прерывает рассылку и возвращается вызывающему
//!   `publish`. Паника обработчика не перехватывается.
//! - Во время вызова обработчика реестр не заблокирован, поэтому обработчик
//!   может подписываться, отписываться и публиковать.

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use messenger_error::{ErrorExt, RegistryError, RegistryResult};
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::{Callback, Context, MessagePayload, RegistryMetrics, RegistryStats, Subscription};
use crate::config::RegistryConfig;

static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::default);

/// Общий реестр процесса.
///
/// Создаётся при первом обращении с настройками по умолчанию и живёт до
/// завершения процесса. Для изолированных компонентов и тестов создавайте
/// собственный [`Registry`].
pub fn global() -> &'static Registry {
    &GLOBAL_REGISTRY
}

/// Результат публикации.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Для события нет списка подписок.
    NoSubscribers,
    /// Список существовал; `invoked` обработчиков вызвано, `skipped`
    /// пропущено как невызываемые.
    Delivered { invoked: usize, skipped: usize },
}

impl PublishOutcome {
    /// `false`, если никто не слушал событие.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Сколько обработчиков было вызвано.
    pub fn invoked(&self) -> usize {
        match self {
            Self::NoSubscribers => 0,
            Self::Delivered { invoked, .. } => *invoked,
        }
    }
}

/// Реестр событий: имя события → упорядоченный список подписок.
///
/// `D` — тип данных публикации; по умолчанию [`MessagePayload`].
pub struct Registry<D: 'static = MessagePayload> {
    events: DashMap<Arc<str>, Vec<Subscription<D>>>,
    config: RegistryConfig,
    metrics: RegistryMetrics,
}

impl<D: 'static> Registry<D> {
    /// Создаёт пустой реестр с заданными настройками.
    ///
    /// Настройки не проверяются: с лимитом `Some(0)` любая подписка
    /// завершится [`RegistryError::SubscriberLimitExceeded`]. Для проверки
    /// используйте [`Registry::try_new`].
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            events: DashMap::new(),
            config,
            metrics: RegistryMetrics::new(),
        }
    }

    /// Создаёт реестр, предварительно проверив настройки.
    ///
    /// # Ошибки
    /// [`RegistryError::InvalidConfig`], если [`RegistryConfig::validate`]
    /// отверг настройки.
    pub fn try_new(config: RegistryConfig) -> RegistryResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Подписывает `callback` на событие `event`.
    ///
    /// Без `context` обработчик получит [`Context::global`]. Возвращает
    /// `Ok(true)`, если подписка добавлена, и `Ok(false)`, если такая пара
    /// (обработчик, контекст) уже была зарегистрирована.
    ///
    /// # Ошибки
    /// - [`RegistryError::InvalidArgument`] — пустое имя события или
    ///   обработчик, который уже нельзя вызвать;
    /// - [`RegistryError::SubscriberLimitExceeded`] — достигнут лимит из
    ///   [`RegistryConfig::max_subscribers_per_event`].
    pub fn subscribe(
        &self,
        event: &str,
        callback: &Callback<D>,
        context: Option<Context>,
    ) -> RegistryResult<bool> {
        if event.is_empty() {
            return Err(RegistryError::invalid_argument("event name is empty"));
        }
        if !callback.is_invocable() {
            return Err(RegistryError::invalid_argument(format!(
                "callback for event '{event}' is no longer invocable"
            )));
        }

        let context = context.unwrap_or_else(Context::global);
        let subscribers = match self.events.entry(Arc::from(event)) {
            Entry::Occupied(mut entry) => {
                let subscriptions = entry.get_mut();
                if subscriptions.iter().any(|s| s.matches(callback, &context)) {
                    trace!(event, callback = ?callback.id(), "already subscribed");
                    return Ok(false);
                }
                self.check_limit(event, subscriptions.len())?;
                subscriptions.push(Subscription::new(callback.clone(), context));
                subscriptions.len()
            }
            // Список создаётся только вместе с первой подпиской.
            Entry::Vacant(entry) => {
                self.check_limit(event, 0)?;
                entry.insert(vec![Subscription::new(callback.clone(), context)]);
                1
            }
        };

        debug!(event, callback = ?callback.id(), subscribers, "subscribed");
        Ok(true)
    }

    fn check_limit(
        &self,
        event: &str,
        current: usize,
    ) -> RegistryResult<()> {
        match self.config.max_subscribers_per_event {
            Some(limit) if current >= limit => Err(RegistryError::SubscriberLimitExceeded {
                event: event.to_string(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// Отписка от события.
    ///
    /// - `callback == None` — удаляет весь список подписок события;
    /// - `callback == Some(cb)` — удаляет первую запись с этим обработчиком,
    ///   независимо от её контекста (не более одной за вызов).
    ///
    /// Возвращает количество удалённых подписок. Для неизвестного события
    /// ничего не делает.
    pub fn unsubscribe(
        &self,
        event: &str,
        callback: Option<&Callback<D>>,
    ) -> usize {
        let Some(callback) = callback else {
            let removed = self
                .events
                .remove(event)
                .map(|(_, subscriptions)| subscriptions.len())
                .unwrap_or(0);
            debug!(event, removed, "unsubscribed all");
            return removed;
        };

        // Удалённая запись освобождается после снятия блокировки шарда:
        // её обработчик может быть последней ссылкой на состояние, чей `Drop`
        // снова обращается к реестру.
        let (detached, now_empty) = match self.events.get_mut(event) {
            Some(mut entry) => {
                let subscriptions = entry.value_mut();
                let detached = subscriptions
                    .iter()
                    .position(|s| s.callback == *callback)
                    .map(|pos| subscriptions.remove(pos));
                (detached, subscriptions.is_empty())
            }
            None => return 0,
        };
        let removed = usize::from(detached.is_some());
        drop(detached);

        if now_empty && self.config.prune_empty_events {
            let _ = self
                .events
                .remove_if(event, |_, subscriptions| subscriptions.is_empty());
        }

        debug!(event, callback = ?callback.id(), removed, "unsubscribed");
        removed
    }

    /// Синхронно рассылает `data` всем подписчикам события.
    ///
    /// Возвращает [`PublishOutcome::NoSubscribers`], если списка подписок для
    /// события нет. Ошибка первого упавшего обработчика возвращается как
    /// [`RegistryError::Handler`]; оставшиеся подписчики в этом случае не
    /// вызываются.
    pub fn publish(
        &self,
        event: &str,
        data: &D,
    ) -> RegistryResult<PublishOutcome> {
        self.metrics.record_publish();

        let Some(snapshot) = self.events.get(event).map(|entry| entry.value().clone()) else {
            self.metrics.record_unheard();
            trace!(event, "no subscribers");
            return Ok(PublishOutcome::NoSubscribers);
        };

        let mut invoked = 0;
        let mut skipped = 0;
        for subscription in &snapshot {
            let Some(handler) = subscription.callback.upgrade() else {
                skipped += 1;
                trace!(event, callback = ?subscription.callback.id(), "skipping dead callback");
                continue;
            };

            if let Err(source) = handler(&subscription.context, data) {
                self.metrics.record_dispatch(invoked, skipped);
                self.metrics.record_handler_failure();
                let err = RegistryError::Handler {
                    event: event.to_string(),
                    source,
                };
                warn!(
                    event,
                    callback = ?subscription.callback.id(),
                    status = %err.status_code(),
                    tags = ?err.metrics_tags(),
                    error = %err,
                    "subscriber failed"
                );
                return Err(err);
            }
            invoked += 1;
        }

        self.metrics.record_dispatch(invoked, skipped);
        trace!(event, invoked, skipped, "published");
        Ok(PublishOutcome::Delivered { invoked, skipped })
    }

    /// Количество подписок на событие.
    pub fn subscriber_count(
        &self,
        event: &str,
    ) -> usize {
        self.events.get(event).map(|e| e.len()).unwrap_or(0)
    }

    /// Есть ли у события список подписок (возможно, пустой).
    pub fn contains(
        &self,
        event: &str,
    ) -> bool {
        self.events.contains_key(event)
    }

    /// Имена всех событий, у которых есть список подписок.
    pub fn events(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events.iter().map(|e| e.key().to_string()).collect();
        names.sort_unstable();
        names
    }

    /// Настройки, с которыми создан реестр.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Снимок счётчиков публикаций.
    pub fn metrics(&self) -> RegistryStats {
        self.metrics.snapshot()
    }
}

impl Registry<MessagePayload> {
    /// Публикация байтов.
    pub fn publish_bytes<B: Into<bytes::Bytes>>(
        &self,
        event: &str,
        payload: B,
    ) -> RegistryResult<PublishOutcome> {
        self.publish(event, &MessagePayload::Bytes(payload.into()))
    }

    /// Публикация строки.
    pub fn publish_str<S: Into<String>>(
        &self,
        event: &str,
        message: S,
    ) -> RegistryResult<PublishOutcome> {
        self.publish(event, &MessagePayload::String(message.into()))
    }

    /// Публикация значения, сериализованного в JSON.
    pub fn publish_json<T: Serialize>(
        &self,
        event: &str,
        value: &T,
    ) -> RegistryResult<PublishOutcome> {
        let json = serde_json::to_value(value).map_err(|e| RegistryError::Serialization {
            reason: e.to_string(),
        })?;
        self.publish(event, &MessagePayload::Json(json))
    }
}

impl<D: 'static> Default for Registry<D> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl<D: 'static> std::fmt::Debug for Registry<D> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("events", &self.events.len())
            .field("config", &self.config)
            .finish()
    }
}
