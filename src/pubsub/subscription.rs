use std::fmt;

use super::{Callback, Context};

/// Запись о подписке: обработчик и контекст, в котором его вызывать.
pub struct Subscription<D: 'static> {
    pub(crate) callback: Callback<D>,
    pub(crate) context: Context,
}

impl<D: 'static> Subscription<D> {
    pub fn new(
        callback: Callback<D>,
        context: Context,
    ) -> Self {
        Self { callback, context }
    }

    pub fn callback(&self) -> &Callback<D> {
        &self.callback
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Совпадает ли запись с парой (обработчик, контекст) по идентичности
    /// обоих полей.
    pub fn matches(
        &self,
        callback: &Callback<D>,
        context: &Context,
    ) -> bool {
        self.callback == *callback && self.context == *context
    }
}

impl<D: 'static> Clone for Subscription<D> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
            context: self.context.clone(),
        }
    }
}

impl<D: 'static> fmt::Debug for Subscription<D> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("callback", &self.callback)
            .field("context", &self.context)
            .finish()
    }
}
