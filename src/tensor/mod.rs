//! Tensor type model
//!
//! This module provides the type attached to every value in the graph:
//! - Element types (`dtype`)
//! - Shapes and [`TensorType`] (`shape`)

pub mod dtype;
pub mod shape;

// Re-export commonly used items
pub use dtype::DType;
pub use shape::{is_dynamic, numel, TensorType, UNKNOWN_DIM};
