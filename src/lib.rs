pub mod config;
pub mod error;
pub mod image;
pub mod llm;
pub mod relay;
pub mod reply;
pub mod server;

pub use error::{Error, Result};
