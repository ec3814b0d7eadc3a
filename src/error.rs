//! Error types for the bootstrap pipeline.
//!
//! The taxonomy keeps three failure classes apart: configuration errors
//! (raised before anything spawns), spawn failures (the tool binary could
//! not be executed at all), and tool failures (the tool ran and exited
//! non-zero). The pipeline wraps module failures so the report names the
//! module and lifecycle phase that went wrong.

use std::fmt;
use std::io;

use thiserror::Error;

/// Lifecycle phase a dependency module failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configure,
    Make,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Configure => write!(f, "configure"),
            Phase::Make => write!(f, "make"),
        }
    }
}

/// Error during bootstrap.
#[derive(Debug, Error)]
pub enum Error {
    /// A required environment variable is absent (or empty).
    #[error("environment variable `{0}` is not set")]
    MissingVar(String),

    /// The platform flavor variable carries a value outside the known set.
    #[error("unrecognized platform flavor `{value}` (expected `unix` or `win32`)")]
    UnknownFlavor { value: String },

    /// The tool binary could not be located or executed.
    #[error("failed to spawn `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran and exited non-zero.
    #[error("`{program}` exited with status {code}")]
    ToolFailed { program: String, code: i32 },

    /// A dependency module's configure or make step failed.
    #[error("module `{module}` failed during {phase}")]
    Stage {
        module: String,
        phase: Phase,
        #[source]
        source: Box<Error>,
    },

    /// Filesystem work around the build tree failed.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Exit status the overall process should report for this error.
    ///
    /// A failing tool's status is propagated verbatim; everything else
    /// exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ToolFailed { code, .. } => *code,
            Error::Stage { source, .. } => source.exit_code(),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_exit_code_is_propagated() {
        let err = Error::ToolFailed {
            program: "cc".to_string(),
            code: 42,
        };
        assert_eq!(err.exit_code(), 42);
    }

    #[test]
    fn test_stage_unwraps_to_inner_exit_code() {
        let err = Error::Stage {
            module: "quayjs".to_string(),
            phase: Phase::Make,
            source: Box::new(Error::ToolFailed {
                program: "cc".to_string(),
                code: 3,
            }),
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "module `quayjs` failed during make");
    }

    #[test]
    fn test_configuration_errors_exit_one() {
        let err = Error::MissingVar("QUAY_FLAVOR".to_string());
        assert_eq!(err.exit_code(), 1);
    }
}
