#![forbid(unsafe_code)]

pub mod world_cli;
