#![forbid(unsafe_code)]

pub mod bijective;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod ownership;
pub mod repo;
pub mod table;
pub mod world;

pub use error::StorageError;
pub use world::WorldStore;
