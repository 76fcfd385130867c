mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AssistantsSettings, BrandingSettings, ChatSettings, DocumentStoreSettings, FallbackMode,
    LoggingSettings, ProxySettings, ResponderKind, ServerSettings, Settings, StorageSettings,
};
