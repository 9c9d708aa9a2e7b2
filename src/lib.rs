//! Symbolic regression with tree-based genetic programming.
//!
//! Arithmetic expression trees over `+ - * /`, digit constants and input
//! variables are evolved to minimise the mean squared error against a table
//! of fitness cases.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod functions;
pub mod memory;
pub mod types;
pub mod utils;

pub use error::{GpError, Result};
