//! Small, self-contained arithmetic and scratch primitives used by the
//! shuffle path.

pub mod fastrange;
pub mod index_batch;

pub use fastrange::extract_one;
pub use index_batch::{IndexBatch, MAX_BATCH};
