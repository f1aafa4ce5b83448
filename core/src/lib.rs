pub mod action;
pub mod config;
pub mod interactive;
pub mod storage;
pub mod str_interp;
pub mod style;
pub mod testing;

pub use crate::config::Config;
