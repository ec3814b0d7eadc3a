//! quay-bootstrap - stage-zero build orchestrator for the quay runtime
//!
//! This crate builds the bundled quayjs interpreter engine and the quay
//! host application with nothing but the platform's native compiler
//! toolchain, then re-invokes the freshly built binary so quay can build
//! itself properly. Configuration arrives entirely through environment
//! variables; see [`env`] for the contract.

pub mod env;
pub mod error;
pub mod module;
pub mod pipeline;
pub mod platform;
pub mod process;
pub mod toolchain;
pub mod util;

/// Test doubles for quay-bootstrap unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides the in-memory environment and the
/// recording command runner.
#[cfg(test)]
pub mod test_support;

pub use env::{Env, SystemEnv};
pub use error::Error;
pub use pipeline::Pipeline;
pub use platform::Flavor;
