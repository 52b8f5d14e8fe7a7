// Library surface for the binary and for headless integration tests.
pub mod alarm;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod countdown;
pub mod logging;
pub mod runtime;
pub mod scheduler;
pub mod time_format;
pub mod ui;
pub mod urgency;
