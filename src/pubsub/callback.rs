//! Ссылки на обработчики подписчиков.
//!
//! [`Callback`] — непрозрачный дескриптор обработчика, сравниваемый по
//! идентичности. Дескриптор бывает двух видов:
//! - **сильный** — владеет обработчиком, обработчик всегда можно вызвать;
//! - **слабый** — наблюдает за обработчиком, которым владеет кто-то другой.
//!   Когда владелец освобождает обработчик, слабый дескриптор перестаёт быть
//!   вызываемым.
//!
//! Сильный и слабый дескрипторы одного обработчика идентичны.

use std::{
    fmt,
    sync::{Arc, Weak},
};

use messenger_error::HandlerResult;

use super::Context;

/// Сигнатура обработчика: получает контекст подписки и данные публикации.
pub type HandlerFn<D> = dyn Fn(&Context, &D) -> HandlerResult + Send + Sync;

enum Target<D: 'static> {
    Strong(Arc<HandlerFn<D>>),
    Weak(Weak<HandlerFn<D>>),
}

/// Дескриптор обработчика события.
pub struct Callback<D: 'static> {
    target: Target<D>,
}

/// Идентичность обработчика — адрес его размещения.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(usize);

impl<D: 'static> Callback<D> {
    /// Создаёт сильный дескриптор для нового обработчика.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Context, &D) -> HandlerResult + Send + Sync + 'static,
    {
        Self::from_arc(Arc::new(handler))
    }

    /// Создаёт сильный дескриптор для уже разделяемого обработчика.
    pub fn from_arc(handler: Arc<HandlerFn<D>>) -> Self {
        Self {
            target: Target::Strong(handler),
        }
    }

    /// Создаёт слабый дескриптор, не продлевающий жизнь обработчика.
    pub fn from_weak(handler: Weak<HandlerFn<D>>) -> Self {
        Self {
            target: Target::Weak(handler),
        }
    }

    /// Слабый дескриптор того же обработчика.
    pub fn downgrade(&self) -> Self {
        match &self.target {
            Target::Strong(handler) => Self::from_weak(Arc::downgrade(handler)),
            Target::Weak(handler) => Self::from_weak(handler.clone()),
        }
    }

    pub fn is_weak(&self) -> bool {
        matches!(self.target, Target::Weak(_))
    }

    /// Можно ли вызвать обработчик прямо сейчас.
    pub fn is_invocable(&self) -> bool {
        match &self.target {
            Target::Strong(_) => true,
            Target::Weak(handler) => handler.strong_count() > 0,
        }
    }

    /// Возвращает обработчик, если он ещё жив.
    pub fn upgrade(&self) -> Option<Arc<HandlerFn<D>>> {
        match &self.target {
            Target::Strong(handler) => Some(handler.clone()),
            Target::Weak(handler) => handler.upgrade(),
        }
    }

    pub fn id(&self) -> CallbackId {
        let ptr = match &self.target {
            Target::Strong(handler) => Arc::as_ptr(handler).cast::<()>(),
            Target::Weak(handler) => handler.as_ptr().cast::<()>(),
        };
        CallbackId(ptr as usize)
    }
}

impl<D: 'static> Clone for Callback<D> {
    fn clone(&self) -> Self {
        let target = match &self.target {
            Target::Strong(handler) => Target::Strong(handler.clone()),
            Target::Weak(handler) => Target::Weak(handler.clone()),
        };
        Self { target }
    }
}

impl<D: 'static> PartialEq for Callback<D> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.id() == other.id()
    }
}

impl<D: 'static> Eq for Callback<D> {}

impl<D: 'static> fmt::Debug for Callback<D> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Callback")
            .field("id", &self.id())
            .field("weak", &self.is_weak())
            .field("invocable", &self.is_invocable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn noop() -> Callback<u32> {
        Callback::new(|_, _| Ok(()))
    }

    /// Тест проверяет, что клон дескриптора идентичен оригиналу, а два
    /// одинаковых замыкания — нет.
    #[test]
    fn test_identity() {
        let a = noop();
        let b = noop();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    /// Тест проверяет, что слабый дескриптор идентичен сильному и вызываем,
    /// пока жив владелец.
    #[test]
    fn test_downgrade_keeps_identity() {
        let strong = noop();
        let weak = strong.downgrade();
        assert!(weak.is_weak());
        assert_eq!(strong, weak);
        assert!(weak.is_invocable());
        assert!(weak.upgrade().is_some());
    }

    /// Тест проверяет, что после освобождения обработчика слабый дескриптор
    /// перестаёт быть вызываемым, но сохраняет идентичность.
    #[test]
    fn test_weak_dies_with_owner() {
        let strong = noop();
        let weak = strong.downgrade();
        let id = weak.id();
        drop(strong);
        assert!(!weak.is_invocable());
        assert!(weak.upgrade().is_none());
        assert_eq!(weak.id(), id);
    }

    #[test]
    fn test_upgrade_invokes_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let cb: Callback<u32> = Callback::new(move |_, n| {
            counter.fetch_add(*n as usize, Ordering::SeqCst);
            Ok(())
        });

        let handler = cb.upgrade().unwrap();
        handler(&Context::global(), &5).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_from_arc_and_from_weak() {
        let handler: Arc<HandlerFn<u32>> = Arc::new(|_: &Context, _: &u32| -> HandlerResult { Ok(()) });
        let strong = Callback::from_arc(handler.clone());
        let weak = Callback::from_weak(Arc::downgrade(&handler));
        assert_eq!(strong, weak);
        assert!(!strong.is_weak());
    }
}
