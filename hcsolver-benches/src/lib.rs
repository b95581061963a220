//! Benchmark support crate for hcsolver.
//!
//! Provides seeded synthetic point sets and parameter types used by the
//! Criterion benchmarks for matrix construction and full clustering runs.

pub mod error;
pub mod params;
pub mod source;
