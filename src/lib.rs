#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod binder;
pub mod config;
pub mod effects;
pub mod markdown;
pub mod modal;
pub mod portfolio;
pub mod source;
pub mod ui;
pub mod video;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::run;
