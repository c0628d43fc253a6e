mod logging;
mod request;
mod telegram;

pub use self::logging::*;
pub use self::request::*;
pub use self::telegram::*;

#[macro_export]
macro_rules! exit {
    ($($arg:tt)*) => {{
        error!($($arg)*);
        std::process::exit(1);
    }};
}

pub use exit;
