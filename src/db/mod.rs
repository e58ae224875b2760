// src/db/mod.rs
pub mod image_db_conn;
pub mod image_db_ops;
pub mod memory;
pub mod registry;

pub use image_db_conn::SqliteRegistry;
pub use memory::MemoryRegistry;
pub use registry::{ImageRecord, NewImageRecord, RecordRegistry};
