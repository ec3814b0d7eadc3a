//! Platform flavor resolution.

use std::fmt;
use std::str::FromStr;

use crate::env::{Env, VAR_FLAVOR};
use crate::error::Error;

/// Command-line convention the toolchain follows.
///
/// Resolved exactly once at startup. Every component that varies by
/// platform takes the flavor as input; nothing re-reads the raw
/// environment variable after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// POSIX-style tools (`-c`, `-D`, `-I`, ...).
    Unix,
    /// Windows-style tools (`/c`, `/D`, `/I`, ...).
    Win32,
}

impl Flavor {
    /// Resolve the flavor from the environment.
    ///
    /// An absent variable and an unrecognized value are both fatal
    /// configuration errors; in either case no command is synthesized.
    pub fn from_env(env: &dyn Env) -> Result<Self, Error> {
        env.require(VAR_FLAVOR)?.parse()
    }

    /// Get the flavor name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Unix => "unix",
            Flavor::Win32 => "win32",
        }
    }
}

impl FromStr for Flavor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unix" => Ok(Flavor::Unix),
            "win32" => Ok(Flavor::Win32),
            other => Err(Error::UnknownFlavor {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
