//! # habitual-core
//!
//! Core types, traits, configuration, and error handling for the Habitual bot.

pub mod config;
pub mod dates;
pub mod error;
pub mod message;
pub mod model;
pub mod time;
pub mod traits;
