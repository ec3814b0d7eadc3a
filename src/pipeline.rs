//! The staged bootstrap pipeline.
//!
//! Three strictly ordered phases, no branching, no retries:
//!
//! 1. **Resolve**: read the environment, compute project paths, select
//!    the toolchain variant, declare the module list in dependency order.
//! 2. **Configure+build**: for each module, `configure()` then `make()`;
//!    the whole run aborts on the first failure, naming the module and
//!    phase that failed.
//! 3. **Self-host invoke**: point the runtime's library path at the
//!    fresh build output and hand over to the binary we just produced.

use std::path::PathBuf;

use tracing::info;

use crate::env::{Env, VAR_LIBDIR, VAR_PROJECT_ROOT};
use crate::error::{Error, Phase};
use crate::module::{ConfigHeader, DependencyModule, Output};
use crate::platform::Flavor;
use crate::process::CommandRunner;
use crate::toolchain::{self, CommandSpec, Language, Toolchain, Tools};
use crate::util::fs::ensure_dir;

/// Host application module; its executable is the self-host target.
const HOST_MODULE: &str = "quay";
/// Embedded interpreter engine module.
const ENGINE_MODULE: &str = "quayjs";

/// Paths derived from the project root during the resolve phase.
///
/// Everything downstream uses these absolute paths, so references stay
/// valid regardless of the working directory.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    /// Project checkout root
    pub root: PathBuf,
    /// Home of this orchestrator
    pub bootstrap_dir: PathBuf,
    /// Bundled external sources
    pub third_party_dir: PathBuf,
    /// Build output: objects, the engine archive, the host executable
    pub build_dir: PathBuf,
}

impl ProjectPaths {
    /// Derive all paths from the project-root variable.
    pub fn resolve(env: &dyn Env) -> Result<Self, Error> {
        let root = PathBuf::from(env.require(VAR_PROJECT_ROOT)?);
        Ok(ProjectPaths {
            bootstrap_dir: root.join("bootstrap"),
            third_party_dir: root.join("third_party"),
            build_dir: root.join("build.bootstrap"),
            root,
        })
    }
}

/// The bootstrap pipeline.
pub struct Pipeline<'a> {
    env: &'a mut dyn Env,
    runner: &'a dyn CommandRunner,
    toolchain: Box<dyn Toolchain>,
    paths: ProjectPaths,
    modules: Vec<DependencyModule>,
}

impl<'a> std::fmt::Debug for Pipeline<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("paths", &self.paths)
            .field("modules", &self.modules)
            .finish_non_exhaustive()
    }
}

impl<'a> Pipeline<'a> {
    /// Resolve phase.
    ///
    /// Reads every configuration variable up front; any missing variable
    /// or unrecognized flavor aborts here, before a single command is
    /// synthesized.
    pub fn resolve(
        env: &'a mut dyn Env,
        runner: &'a dyn CommandRunner,
    ) -> Result<Self, Error> {
        let flavor = Flavor::from_env(env)?;
        let tools = Tools::from_env(env)?;
        let paths = ProjectPaths::resolve(env)?;
        let toolchain = toolchain::select(flavor, tools);

        info!(
            flavor = %flavor,
            root = %paths.root.display(),
            "resolved bootstrap configuration"
        );

        let modules = declare_modules(flavor, &paths);
        Ok(Pipeline {
            env,
            runner,
            toolchain,
            paths,
            modules,
        })
    }

    /// Run the configure+build phase and then the self-host invocation.
    ///
    /// Returns the exit status of the self-hosted run.
    pub fn run(mut self) -> Result<i32, Error> {
        self.build()?;
        self.self_host()
    }

    /// Configure and make every module in declared order; first failure
    /// aborts the whole run.
    fn build(&mut self) -> Result<(), Error> {
        ensure_dir(&self.paths.build_dir)?;

        for module in &self.modules {
            info!(module = %module.name, "configuring");
            module
                .configure(&self.paths.build_dir)
                .map_err(|e| stage(module, Phase::Configure, e))?;

            info!(module = %module.name, "building");
            module
                .make(self.toolchain.as_ref(), self.runner, &self.paths.build_dir)
                .map_err(|e| stage(module, Phase::Make, e))?;
        }

        Ok(())
    }

    /// Hand over to the freshly built host binary.
    ///
    /// The library-path variable is written to the environment store and
    /// attached to the spawned child, which runs in the project root.
    fn self_host(&mut self) -> Result<i32, Error> {
        let host = self
            .paths
            .build_dir
            .join(self.toolchain.exe_name(HOST_MODULE));
        let libdir = self.paths.build_dir.display().to_string();

        self.env.set(VAR_LIBDIR, &libdir);

        let cmd = CommandSpec::new(&host)
            .env(VAR_LIBDIR, libdir)
            .cwd(&self.paths.root);

        info!(binary = %host.display(), "handing over to the self-hosted build");
        self.runner.run(&cmd)
    }
}

/// Wrap a module failure with the module name and lifecycle phase.
fn stage(module: &DependencyModule, phase: Phase, source: Error) -> Error {
    Error::Stage {
        module: module.name.clone(),
        phase,
        source: Box::new(source),
    }
}

/// The fixed module list, engine first: the host embeds it.
fn declare_modules(flavor: Flavor, paths: &ProjectPaths) -> Vec<DependencyModule> {
    let engine_root = paths.third_party_dir.join(ENGINE_MODULE);

    let engine = DependencyModule {
        name: ENGINE_MODULE.to_string(),
        language: Language::C,
        root: engine_root.clone(),
        source_dirs: vec![
            engine_root.join("core"),
            engine_root.join("core").join("parser"),
            engine_root.join("core").join("vm"),
            engine_root.join("ext"),
            engine_root.join("port"),
        ],
        include_dirs: vec![
            engine_root.join("include"),
            engine_root.join("ext").join("include"),
        ],
        defines: vec![("QUAYJS_BOOTSTRAP".to_string(), None)],
        output: Output::StaticLib {
            name: ENGINE_MODULE.to_string(),
        },
        config_header: Some(ConfigHeader {
            file_name: "quayjs-config.h".to_string(),
            contents: engine_config_header(flavor),
        }),
    };

    let host = DependencyModule {
        name: HOST_MODULE.to_string(),
        language: Language::Cxx,
        root: paths.root.join("src"),
        source_dirs: vec![paths.root.join("src")],
        include_dirs: vec![
            engine_root.join("include"),
            engine_root.join("ext").join("include"),
        ],
        defines: Vec::new(),
        output: Output::Executable {
            name: HOST_MODULE.to_string(),
            libs: vec![ENGINE_MODULE.to_string()],
            lib_dirs: vec![paths.build_dir.clone()],
        },
        config_header: None,
    };

    vec![engine, host]
}

/// Platform configuration header for the engine.
fn engine_config_header(flavor: Flavor) -> String {
    let platform = match flavor {
        Flavor::Unix => "#define QUAYJS_PLATFORM_UNIX 1",
        Flavor::Win32 => "#define QUAYJS_PLATFORM_WIN32 1",
    };
    format!(
        "/* Generated by quay-bootstrap; do not edit. */\n\
         #ifndef QUAYJS_CONFIG_H\n\
         #define QUAYJS_CONFIG_H\n\
         \n\
         {}\n\
         \n\
         #endif\n",
        platform
    )
}
