pub mod settings;

pub use settings::{BackendConfig, LoggingConfig, MemoryConfig, Settings};
