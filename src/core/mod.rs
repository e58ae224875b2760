// src/core/mod.rs
pub mod crypto;
pub mod key;
pub mod store;

pub use crypto::*;
pub use key::*;
pub use store::*;
