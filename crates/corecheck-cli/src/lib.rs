pub mod logging;
pub mod settings;

pub use logging::{LogConfig, init_logging};
pub use settings::AppSettings;
