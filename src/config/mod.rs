pub mod settings;

pub use settings::{CorsSettings, HubSpotSettings, ServerSettings, Settings, StoreBackend, StoreSettings};
