//! # messenger
//!
//! Внутрипроцессный реестр publish/subscribe: компоненты приложения
//! обмениваются именованными событиями, не держа ссылок друг на друга.
//!
//! ```rust
//! use messenger::{Callback, Context, MessagePayload, PublishOutcome, Registry};
//!
//! let registry: Registry = Registry::default();
//! let greet = Callback::new(|_ctx: &Context, data: &MessagePayload| {
//!     println!("hello, {}", data.as_str().unwrap_or("stranger"));
//!     Ok(())
//! });
//!
//! registry.subscribe("user.joined", &greet, None)?;
//! let outcome = registry.publish_str("user.joined", "Kevin")?;
//! assert_eq!(outcome, PublishOutcome::Delivered { invoked: 1, skipped: 0 });
//!
//! registry.unsubscribe("user.joined", Some(&greet));
//! # Ok::<(), messenger::RegistryError>(())
//! ```

/// Configuration loading: registry and logging settings.
pub mod config;
/// Flexible logging (formatting, filters).
pub mod logging;
/// Pub/Sub: Registry, Callback, Context, MessagePayload.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// config
pub use config::{RegistryConfig, Settings};
/// Logging setup.
pub use logging::{init_logging, LogFormat, LoggingConfig};
/// Operation errors and result types.
pub use messenger_error::{
    ErrorExt, HandlerError, HandlerResult, InvalidConfigError, RegistryError, RegistryResult,
    StatusCode,
};
/// Pub/Sub API.
pub use pubsub::{
    global, Callback, CallbackId, Context, Global, HandlerFn, MessagePayload, PublishOutcome,
    Registry, RegistryStats, Subscription,
};
