#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

pub mod auth;
pub mod bot;
pub mod channels;
pub mod commands;
pub mod config;
pub mod security;
pub mod telemetry;

pub use config::Config;
