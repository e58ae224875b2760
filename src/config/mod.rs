// src/config/mod.rs
//! Configuration system for encrypted-image-vault
//!
//! TOML file + environment overrides, built-in defaults for everything.

pub use app::{load, Config, Paths, Server, Storage};

mod app;
mod defaults;
