#![allow(clippy::collapsible_if)]

pub mod config;
pub mod diagnostics;
pub mod language;

pub use config::{CheckOptions, ConfigError};
pub use language::coarray::check_program_unit;
