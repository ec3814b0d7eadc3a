//! Dependency modules and their configure/make lifecycle.
//!
//! A module is a named unit of external source (the interpreter engine,
//! the host application) that knows which directories to compile and what
//! artifact to produce. `configure()` runs one-time setup; `make()` drives
//! the toolchain through a fixed sequence of compiles followed by one
//! archive or link, stopping at the first failure.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::Error;
use crate::process::CommandRunner;
use crate::toolchain::{ArchiveInput, CommandSpec, CompileInput, Language, LinkInput, Toolchain};
use crate::util::fs::{ensure_dir, write_string};

/// What `make()` produces for a module.
#[derive(Debug, Clone)]
pub enum Output {
    /// Static library, decorated per flavor (`libquayjs.a` / `quayjs.lib`).
    StaticLib { name: String },
    /// Executable linking `libs` out of `lib_dirs`.
    Executable {
        name: String,
        libs: Vec<String>,
        lib_dirs: Vec<PathBuf>,
    },
}

/// A configuration header generated during `configure()`.
#[derive(Debug, Clone)]
pub struct ConfigHeader {
    /// File name under the module's object directory.
    pub file_name: String,
    /// Header contents.
    pub contents: String,
}

/// A buildable unit of external source.
///
/// Modules are declared in dependency order by the pipeline and each
/// lifecycle operation runs exactly once per pipeline run.
#[derive(Debug, Clone)]
pub struct DependencyModule {
    /// Module name; also names the object subdirectory.
    pub name: String,
    /// Language of every translation unit in this module.
    pub language: Language,
    /// Root of the module's source tree; object paths mirror the layout
    /// beneath it.
    pub root: PathBuf,
    /// Directories scanned for translation units, in declared order.
    /// Each is listed non-recursively.
    pub source_dirs: Vec<PathBuf>,
    /// Include directories passed to every compile, in order.
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines passed to every compile, in order.
    pub defines: Vec<(String, Option<String>)>,
    /// Artifact `make()` produces.
    pub output: Output,
    /// One-time setup written during `configure()`, if any.
    pub config_header: Option<ConfigHeader>,
}

impl DependencyModule {
    /// Directory this module's objects (and generated header) land in.
    fn object_dir(&self, build_dir: &Path) -> PathBuf {
        build_dir.join(&self.name)
    }

    /// One-time setup before compilation is possible.
    ///
    /// A no-op for modules that declare no generated header.
    pub fn configure(&self, build_dir: &Path) -> Result<(), Error> {
        let Some(header) = &self.config_header else {
            debug!(module = %self.name, "nothing to configure");
            return Ok(());
        };

        let path = self.object_dir(build_dir).join(&header.file_name);
        write_string(&path, &header.contents)?;
        debug!(module = %self.name, header = %path.display(), "wrote config header");
        Ok(())
    }

    /// Compile every translation unit, then archive or link.
    ///
    /// Aborts on the first non-zero exit; no further commands are issued
    /// for this module. Returns the path of the produced artifact.
    pub fn make(
        &self,
        toolchain: &dyn Toolchain,
        runner: &dyn CommandRunner,
        build_dir: &Path,
    ) -> Result<PathBuf, Error> {
        let object_dir = self.object_dir(build_dir);
        ensure_dir(&object_dir)?;

        // The generated header lives next to the objects; make it visible.
        let mut include_dirs = self.include_dirs.clone();
        if self.config_header.is_some() {
            include_dirs.push(object_dir.clone());
        }

        let mut objects = Vec::new();
        for source in self.sources()? {
            let object = self.object_path(&object_dir, &source, toolchain.object_extension());
            if let Some(parent) = object.parent() {
                ensure_dir(parent)?;
            }

            let input = CompileInput {
                source,
                output: object.clone(),
                include_dirs: include_dirs.clone(),
                defines: self.defines.clone(),
            };
            run_checked(runner, toolchain.compile_command(&input, self.language))?;
            objects.push(object);
        }

        match &self.output {
            Output::StaticLib { name } => {
                let archive = build_dir.join(toolchain.static_lib_name(name));
                let input = ArchiveInput {
                    objects,
                    output: archive.clone(),
                };
                run_checked(runner, toolchain.archive_command(&input))?;
                Ok(archive)
            }
            Output::Executable {
                name,
                libs,
                lib_dirs,
            } => {
                let exe = build_dir.join(toolchain.exe_name(name));
                let input = LinkInput {
                    objects,
                    output: exe.clone(),
                    lib_dirs: lib_dirs.clone(),
                    libs: libs.clone(),
                };
                run_checked(runner, toolchain.link_command(&input))?;
                Ok(exe)
            }
        }
    }

    /// Object path for a source file, mirroring its layout under the
    /// module root.
    fn object_path(&self, object_dir: &Path, source: &Path, extension: &str) -> PathBuf {
        let relative = source.strip_prefix(&self.root).unwrap_or(source);
        object_dir.join(relative.with_extension(extension))
    }

    /// Translation units in build order: declared directory order, then
    /// lexicographic file order within a directory.
    fn sources(&self) -> Result<Vec<PathBuf>, Error> {
        let mut sources = Vec::new();
        for dir in &self.source_dirs {
            for entry in WalkDir::new(dir).max_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|source| Error::Io {
                    context: format!("failed to read source directory: {}", dir.display()),
                    source: source
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk error")),
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.into_path();
                let matches = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| self.language.extensions().contains(&ext));
                if matches {
                    sources.push(path);
                }
            }
        }
        debug!(module = %self.name, count = sources.len(), "enumerated translation units");
        Ok(sources)
    }
}

/// Run a command and require a zero exit.
fn run_checked(runner: &dyn CommandRunner, cmd: CommandSpec) -> Result<(), Error> {
    let program = cmd.program.display().to_string();
    let code = runner.run(&cmd)?;
    if code != 0 {
        return Err(Error::ToolFailed { program, code });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::{unix_toolchain, RecordingRunner};

    /// One module, two C sources, static-library output.
    fn engine_fixture(root: &Path) -> DependencyModule {
        let src = root.join("core");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("lexer.c"), "int lexer;\n").unwrap();
        fs::write(src.join("vm.c"), "int vm;\n").unwrap();

        DependencyModule {
            name: "quayjs".to_string(),
            language: Language::C,
            root: root.to_path_buf(),
            source_dirs: vec![src],
            include_dirs: vec![root.join("include")],
            defines: Vec::new(),
            output: Output::StaticLib {
                name: "quayjs".to_string(),
            },
            config_header: None,
        }
    }

    #[test]
    fn test_two_sources_yield_two_compiles_and_one_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let module = engine_fixture(tmp.path());
        let build_dir = tmp.path().join("build.bootstrap");

        let toolchain = unix_toolchain();
        let runner = RecordingRunner::new();
        let artifact = module.make(&toolchain, &runner, &build_dir).unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 3);

        // Two compiles in lexicographic order, then the archive.
        assert!(commands[0].display_command().contains("lexer.c"));
        assert!(commands[1].display_command().contains("vm.c"));
        assert_eq!(commands[2].program, PathBuf::from("ar"));

        // The archive's input list equals the compile outputs, in order.
        let objects: Vec<String> = commands[2].args[2..].to_vec();
        let compiled: Vec<String> = commands[..2]
            .iter()
            .map(|c| {
                c.args
                    .iter()
                    .find_map(|a| a.strip_prefix("-o"))
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(objects, compiled);
        assert_eq!(artifact, build_dir.join("libquayjs.a"));
    }

    #[test]
    fn test_make_fails_fast_on_first_nonzero_exit() {
        let tmp = tempfile::tempdir().unwrap();
        let module = engine_fixture(tmp.path());
        let build_dir = tmp.path().join("build.bootstrap");

        let toolchain = unix_toolchain();
        let runner = RecordingRunner::with_exit_codes([1]);
        let err = module.make(&toolchain, &runner, &build_dir).unwrap_err();

        // One failed compile, zero further toolchain calls.
        assert_eq!(runner.commands().len(), 1);
        assert!(matches!(err, Error::ToolFailed { code: 1, .. }));
    }

    #[test]
    fn test_spawn_failure_aborts_make() {
        let tmp = tempfile::tempdir().unwrap();
        let module = engine_fixture(tmp.path());
        let build_dir = tmp.path().join("build.bootstrap");

        let toolchain = unix_toolchain();
        let runner = RecordingRunner::failing_to_spawn();
        let err = module.make(&toolchain, &runner, &build_dir).unwrap_err();

        assert_eq!(runner.commands().len(), 1);
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn test_configure_writes_the_declared_header() {
        let tmp = tempfile::tempdir().unwrap();
        let mut module = engine_fixture(tmp.path());
        module.config_header = Some(ConfigHeader {
            file_name: "quayjs-config.h".to_string(),
            contents: "#define QUAYJS_PLATFORM_UNIX 1\n".to_string(),
        });
        let build_dir = tmp.path().join("build.bootstrap");

        module.configure(&build_dir).unwrap();

        let header = build_dir.join("quayjs").join("quayjs-config.h");
        assert!(fs::read_to_string(header)
            .unwrap()
            .contains("QUAYJS_PLATFORM_UNIX"));
    }

    #[test]
    fn test_configure_without_header_is_a_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let module = engine_fixture(tmp.path());
        let build_dir = tmp.path().join("build.bootstrap");

        module.configure(&build_dir).unwrap();
        assert!(!build_dir.exists());
    }

    #[test]
    fn test_generated_header_dir_joins_the_include_path() {
        let tmp = tempfile::tempdir().unwrap();
        let mut module = engine_fixture(tmp.path());
        module.config_header = Some(ConfigHeader {
            file_name: "quayjs-config.h".to_string(),
            contents: String::new(),
        });
        let build_dir = tmp.path().join("build.bootstrap");

        let toolchain = unix_toolchain();
        let runner = RecordingRunner::new();
        module.make(&toolchain, &runner, &build_dir).unwrap();

        let include_flag = format!("-I{}", build_dir.join("quayjs").display());
        assert!(runner.commands()[0].args.contains(&include_flag));
    }

    #[test]
    fn test_executable_module_links_declared_libraries() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("main.cpp"), "int main() { return 0; }\n").unwrap();
        let build_dir = tmp.path().join("build.bootstrap");

        let module = DependencyModule {
            name: "quay".to_string(),
            language: Language::Cxx,
            root: tmp.path().to_path_buf(),
            source_dirs: vec![src],
            include_dirs: Vec::new(),
            defines: Vec::new(),
            output: Output::Executable {
                name: "quay".to_string(),
                libs: vec!["quayjs".to_string()],
                lib_dirs: vec![build_dir.clone()],
            },
            config_header: None,
        };

        let toolchain = unix_toolchain();
        let runner = RecordingRunner::new();
        let artifact = module.make(&toolchain, &runner, &build_dir).unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 2);
        assert!(commands[1].args.contains(&"-lquayjs".to_string()));
        assert_eq!(artifact, build_dir.join("quay"));
    }
}
