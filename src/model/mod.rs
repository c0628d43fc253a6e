mod config;
mod panel;

pub use self::config::*;
pub use self::panel::*;
