//! Подсистема Publish–Subscribe (pub/sub).
//!
//! Этот модуль реализует внутрипроцессный реестр событий с синхронной
//! рассылкой:
//!
//! - `registry`: хранение подписок, дедупликация, рассылка и отписка.
//! - `callback`: дескрипторы обработчиков, сравниваемые по идентичности.
//! - `context`: контекст, в котором вызывается обработчик.
//! - `subscription`: запись (обработчик, контекст).
//! - `message`: полезная нагрузка публикаций по умолчанию.
//! - `metrics`: счётчики публикаций и доставок.

pub mod callback;
pub mod context;
pub mod message;
pub mod metrics;
pub mod registry;
pub mod subscription;

pub use callback::*;
pub use context::*;
pub use message::*;
pub use metrics::*;
pub use registry::*;
pub use subscription::*;
