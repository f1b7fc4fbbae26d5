mod settings;

pub use settings::{Dashboard, Gateway, LedControl, Logger, Server, Settings};
