//! Test doubles for the bootstrap pipeline.
//!
//! Only compiled for tests. Provides an in-memory environment, a command
//! runner that records what it is asked to do, and toolchain fixtures.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use crate::env::{self, Env};
use crate::error::Error;
use crate::process::CommandRunner;
use crate::toolchain::{CommandSpec, Tools, UnixToolchain};

/// In-memory environment store.
#[derive(Debug, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        MapEnv::default()
    }

    /// Add a variable.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Remove a variable.
    pub fn without(mut self, key: &str) -> Self {
        self.vars.remove(key);
        self
    }
}

impl Env for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

/// A fully populated environment for a unix-flavored bootstrap.
pub fn unix_env(root: &str) -> MapEnv {
    MapEnv::new()
        .with(env::VAR_FLAVOR, "unix")
        .with(env::VAR_PROJECT_ROOT, root)
        .with(env::VAR_CC, "cc")
        .with(env::VAR_CXX, "c++")
        .with(env::VAR_LD, "c++")
        .with(env::VAR_AR, "ar")
}

/// A unix toolchain with plain tool names and no extra flags.
pub fn unix_toolchain() -> UnixToolchain {
    UnixToolchain::new(Tools {
        cc: PathBuf::from("cc"),
        cxx: PathBuf::from("c++"),
        ld: PathBuf::from("c++"),
        ar: PathBuf::from("ar"),
        cflags: Vec::new(),
        cxxflags: Vec::new(),
        ldflags: Vec::new(),
    })
}

/// Runner that records every command and returns scripted exit codes.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: RefCell<Vec<CommandSpec>>,
    exit_codes: RefCell<Vec<i32>>,
    fail_spawn: bool,
}

impl RecordingRunner {
    /// Every command exits 0.
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// Queue exit codes for upcoming commands; later commands exit 0.
    pub fn with_exit_codes(codes: impl IntoIterator<Item = i32>) -> Self {
        RecordingRunner {
            exit_codes: RefCell::new(codes.into_iter().collect()),
            ..RecordingRunner::default()
        }
    }

    /// Every command fails to spawn, as if the tool binary were missing.
    pub fn failing_to_spawn() -> Self {
        RecordingRunner {
            fail_spawn: true,
            ..RecordingRunner::default()
        }
    }

    /// Commands seen so far, in order.
    pub fn commands(&self) -> Vec<CommandSpec> {
        self.commands.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<i32, Error> {
        self.commands.borrow_mut().push(cmd.clone());

        if self.fail_spawn {
            return Err(Error::Spawn {
                program: cmd.program.display().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such tool"),
            });
        }

        let mut codes = self.exit_codes.borrow_mut();
        Ok(if codes.is_empty() { 0 } else { codes.remove(0) })
    }
}
