pub mod daemon;
pub mod keyboard;
pub mod listener;
pub mod logging;

pub use daemon::{run_daemon, DaemonOptions};
pub use keyboard::{rdev_event_to_key, EnigoOutput};
pub use listener::start_keyboard_listener;
