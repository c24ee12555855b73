pub mod assist;
pub mod config;

pub use assist::*;
pub use config::{Config, ModelConfig};
