pub mod registry;
pub mod settings;

pub use registry::RegistryConfig;
pub use settings::Settings;
