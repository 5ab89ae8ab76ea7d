pub mod config;
pub mod error;
pub mod filter;
pub mod input;
pub mod loader;
pub mod mode;
pub mod output;
pub mod session;
pub mod stats;
pub mod table;

pub use error::{BikeshareError, Result};
