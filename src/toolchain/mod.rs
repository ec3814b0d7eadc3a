//! Toolchain abstraction for the bootstrap compilers.
//!
//! This module turns the three logical build operations (compile a
//! translation unit, archive a static library, link an executable) into
//! platform-correct command lines. The two command-line conventions are
//! covered by two variant implementations of one [`Toolchain`] trait; the
//! platform flavor picks one at startup and call sites never branch on
//! platform again.
//!
//! Commands are argument arrays. Every repeated flag (define, include,
//! library, library dir) renders as its own argv element with the flag
//! token concatenated to its value; nothing is ever pre-joined into a
//! whitespace-separated string.

use std::path::{Path, PathBuf};

mod unix;
mod win32;

pub use unix::UnixToolchain;
pub use win32::Win32Toolchain;

use crate::env::{
    Env, VAR_AR, VAR_CC, VAR_CFLAGS, VAR_CXX, VAR_CXXFLAGS, VAR_LD, VAR_LDFLAGS,
};
use crate::error::Error;
use crate::platform::Flavor;

/// Source language of a translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cxx,
}

impl Language {
    /// File extensions recognized for this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::C => &["c"],
            Language::Cxx => &["cpp", "cc", "cxx"],
        }
    }
}

/// A command to execute: program plus ordered argument list.
///
/// Immutable once synthesized; consumed exactly once by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to run (e.g., "cc", "cl.exe")
    pub program: PathBuf,
    /// Command arguments, one flag+value pair per element
    pub args: Vec<String>,
    /// Environment variables to set on the child
    pub env: Vec<(String, String)>,
    /// Working directory for the child, if different from ours
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Render the command line for the trace output.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Tool binaries and extra flags resolved from the environment.
///
/// Resolution happens once, during the pipeline's resolve phase; a
/// missing tool variable aborts the run before anything spawns.
#[derive(Debug, Clone)]
pub struct Tools {
    /// C compiler
    pub cc: PathBuf,
    /// C++ compiler
    pub cxx: PathBuf,
    /// Linker
    pub ld: PathBuf,
    /// Archiver
    pub ar: PathBuf,
    /// Extra C compiler flags
    pub cflags: Vec<String>,
    /// Extra C++ compiler flags
    pub cxxflags: Vec<String>,
    /// Extra linker flags
    pub ldflags: Vec<String>,
}

impl Tools {
    /// Resolve every tool binary and flags variable from the environment.
    pub fn from_env(env: &dyn Env) -> Result<Self, Error> {
        Ok(Tools {
            cc: env.require(VAR_CC)?.into(),
            cxx: env.require(VAR_CXX)?.into(),
            ld: env.require(VAR_LD)?.into(),
            ar: env.require(VAR_AR)?.into(),
            cflags: split_flags(env.get(VAR_CFLAGS)),
            cxxflags: split_flags(env.get(VAR_CXXFLAGS)),
            ldflags: split_flags(env.get(VAR_LDFLAGS)),
        })
    }

    /// Compiler binary for a language.
    pub fn compiler(&self, lang: Language) -> &Path {
        match lang {
            Language::C => &self.cc,
            Language::Cxx => &self.cxx,
        }
    }

    /// Extra compiler flags for a language.
    pub fn extra_flags(&self, lang: Language) -> &[String] {
        match lang {
            Language::C => &self.cflags,
            Language::Cxx => &self.cxxflags,
        }
    }
}

/// Split a flags variable into individual arguments.
fn split_flags(value: Option<String>) -> Vec<String> {
    value
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Input for a compile step.
#[derive(Debug, Clone)]
pub struct CompileInput {
    /// Source file to compile
    pub source: PathBuf,
    /// Output object file
    pub output: PathBuf,
    /// Include directories, first-match-wins order preserved
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines (name, optional value), order preserved
    pub defines: Vec<(String, Option<String>)>,
}

/// Input for an archive step (creating a static library).
#[derive(Debug, Clone)]
pub struct ArchiveInput {
    /// Object files to archive, in order
    pub objects: Vec<PathBuf>,
    /// Output archive file
    pub output: PathBuf,
}

/// Input for a link step.
#[derive(Debug, Clone)]
pub struct LinkInput {
    /// Object files to link, in order
    pub objects: Vec<PathBuf>,
    /// Output executable
    pub output: PathBuf,
    /// Library search paths, first-match-wins order preserved
    pub lib_dirs: Vec<PathBuf>,
    /// Libraries to link, without platform decoration
    pub libs: Vec<String>,
}

/// Trait for flavor-specific command synthesis.
///
/// Each implementation owns its flag tokens and token ordering. The two
/// variants emit structurally identical argument lists; only the tokens
/// differ between them.
pub trait Toolchain {
    /// The flavor this variant implements.
    fn flavor(&self) -> Flavor;

    /// Command for compiling one translation unit.
    fn compile_command(&self, input: &CompileInput, lang: Language) -> CommandSpec;

    /// Command for archiving objects into a static library.
    fn archive_command(&self, input: &ArchiveInput) -> CommandSpec;

    /// Command for linking objects into an executable.
    fn link_command(&self, input: &LinkInput) -> CommandSpec;

    /// Get the object file extension.
    fn object_extension(&self) -> &str;

    /// Get the static library extension.
    fn static_lib_extension(&self) -> &str;

    /// Get the executable extension.
    fn exe_extension(&self) -> &str;

    /// Get the static library prefix (e.g., "lib" on unix).
    fn static_lib_prefix(&self) -> &str;

    /// File name of a static library for this flavor.
    fn static_lib_name(&self, name: &str) -> String {
        format!(
            "{}{}.{}",
            self.static_lib_prefix(),
            name,
            self.static_lib_extension()
        )
    }

    /// File name of an executable for this flavor.
    fn exe_name(&self, name: &str) -> String {
        if self.exe_extension().is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, self.exe_extension())
        }
    }
}

/// Select the toolchain variant for a flavor, once, at startup.
pub fn select(flavor: Flavor, tools: Tools) -> Box<dyn Toolchain> {
    match flavor {
        Flavor::Unix => Box::new(UnixToolchain::new(tools)),
        Flavor::Win32 => Box::new(Win32Toolchain::new(tools)),
    }
}
