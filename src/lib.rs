pub mod cache;
pub mod config;
pub mod error;
pub mod generate;
pub mod humanize;
pub mod metadata;
pub mod observability;
pub mod probe;
pub mod remote;
pub mod shell;
pub mod template;

pub use error::{Error, Result};
