#![forbid(unsafe_code)]

pub mod access_gate;
pub mod admin_system;
pub mod config;
pub mod error;
pub mod input_box_system;
pub mod input_system;
pub mod world;

pub use error::{reason_codes, SystemError};
pub use world::World;
