use std::{any::Any, fmt, sync::Arc};

use once_cell::sync::Lazy;

/// Маркер общего контекста приложения.
///
/// Этот контекст получают обработчики, подписанные без явного контекста.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Global;

static GLOBAL_CONTEXT: Lazy<Context> = Lazy::new(|| Context::new(Global));

/// Контекст вызова обработчика: значение, которое обработчик видит как
/// своего получателя.
///
/// Сравнивается по идентичности: два `Context` равны, только если указывают
/// на одно и то же значение. Клон контекста идентичен оригиналу.
#[derive(Clone)]
pub struct Context {
    inner: Arc<dyn Any + Send + Sync>,
}

impl Context {
    /// Оборачивает значение в новый контекст с собственной идентичностью.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Создаёт контекст из уже разделяемого значения.
    ///
    /// Контексты, созданные из одного и того же `Arc`, идентичны.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self { inner: value }
    }

    /// Общий контекст процесса (оборачивает [`Global`]).
    pub fn global() -> Self {
        GLOBAL_CONTEXT.clone()
    }

    pub fn is_global(&self) -> bool {
        self.ptr_eq(&GLOBAL_CONTEXT)
    }

    /// Пытается получить ссылку на значение конкретного типа.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Пытается получить разделяемый указатель на значение конкретного типа.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.inner.clone().downcast::<T>().ok()
    }

    /// Сравнение по идентичности (адрес значения, без учёта vtable).
    pub fn ptr_eq(
        &self,
        other: &Context,
    ) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::global()
    }
}

impl PartialEq for Context {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Context {}

impl fmt::Debug for Context {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Context")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .field("global", &self.is_global())
            .finish()
    }
}
