//! Support library for the hcsolver CLI binary.
//!
//! Exposes the command and logging modules so doctests and integration tests
//! can exercise the pipeline without forking a subprocess.

pub mod cli;
pub mod logging;
