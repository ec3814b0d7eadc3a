//! Environment store abstraction.
//!
//! All bootstrap configuration arrives through environment variables;
//! this module names them in one place and hides the process environment
//! behind a trait so the pipeline can run against an in-memory fake in
//! tests. An empty value is treated the same as an absent one.

use crate::error::Error;

/// Platform flavor selector (`unix` or `win32`).
pub const VAR_FLAVOR: &str = "QUAY_FLAVOR";
/// Absolute path to the project checkout.
pub const VAR_PROJECT_ROOT: &str = "QUAY_PROJECT_ROOT";
/// Library path handed to the self-hosted runtime before it is invoked.
pub const VAR_LIBDIR: &str = "QUAY_LIBDIR";

/// C compiler binary.
pub const VAR_CC: &str = "CC";
/// Extra C compiler flags, whitespace-separated.
pub const VAR_CFLAGS: &str = "CFLAGS";
/// C++ compiler binary.
pub const VAR_CXX: &str = "CXX";
/// Extra C++ compiler flags, whitespace-separated.
pub const VAR_CXXFLAGS: &str = "CXXFLAGS";
/// Linker binary.
pub const VAR_LD: &str = "LD";
/// Extra linker flags, whitespace-separated.
pub const VAR_LDFLAGS: &str = "LDFLAGS";
/// Archiver binary.
pub const VAR_AR: &str = "AR";

/// Read/write access to the environment the pipeline runs under.
pub trait Env {
    /// Look up a variable. `None` when absent or empty.
    fn get(&self, key: &str) -> Option<String>;

    /// Set or overwrite a variable. Subsequently spawned child processes
    /// see the new value.
    fn set(&mut self, key: &str, value: &str);

    /// Look up a variable that must be present.
    fn require(&self, key: &str) -> Result<String, Error> {
        self.get(key)
            .ok_or_else(|| Error::MissingVar(key.to_string()))
    }
}

/// The process-wide environment.
#[derive(Debug, Default)]
pub struct SystemEnv;

impl Env for SystemEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn set(&mut self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}
