//! Unix-convention toolchain (gcc/clang style drivers).

use super::{ArchiveInput, CommandSpec, CompileInput, LinkInput, Tools, Toolchain};
use crate::platform::Flavor;
use crate::toolchain::Language;

/// POSIX-style command synthesis.
#[derive(Debug, Clone)]
pub struct UnixToolchain {
    tools: Tools,
}

impl UnixToolchain {
    /// Create a new unix-convention toolchain.
    pub fn new(tools: Tools) -> Self {
        UnixToolchain { tools }
    }
}

impl Toolchain for UnixToolchain {
    fn flavor(&self) -> Flavor {
        Flavor::Unix
    }

    fn compile_command(&self, input: &CompileInput, lang: Language) -> CommandSpec {
        let mut cmd = CommandSpec::new(self.tools.compiler(lang));

        cmd = cmd.args(self.tools.extra_flags(lang).iter().cloned());

        // Compile only
        cmd = cmd.arg("-c");

        // Input and output
        cmd = cmd.arg(input.source.display().to_string());
        cmd = cmd.arg(format!("-o{}", input.output.display()));

        // Defines, one argument per name[=value]
        for (name, value) in &input.defines {
            match value {
                Some(v) => cmd = cmd.arg(format!("-D{}={}", name, v)),
                None => cmd = cmd.arg(format!("-D{}", name)),
            }
        }

        // Include directories
        for dir in &input.include_dirs {
            cmd = cmd.arg(format!("-I{}", dir.display()));
        }

        cmd
    }

    fn archive_command(&self, input: &ArchiveInput) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.tools.ar);

        // Create archive with symbol index, replace members
        cmd = cmd.arg("rcs");
        cmd = cmd.arg(input.output.display().to_string());

        for obj in &input.objects {
            cmd = cmd.arg(obj.display().to_string());
        }

        cmd
    }

    fn link_command(&self, input: &LinkInput) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.tools.ld);

        cmd = cmd.args(self.tools.ldflags.iter().cloned());

        // Object files
        for obj in &input.objects {
            cmd = cmd.arg(obj.display().to_string());
        }

        // Output
        cmd = cmd.arg(format!("-o{}", input.output.display()));

        // Library search paths
        for dir in &input.lib_dirs {
            cmd = cmd.arg(format!("-L{}", dir.display()));
        }

        // Libraries
        for lib in &input.libs {
            cmd = cmd.arg(format!("-l{}", lib));
        }

        cmd
    }

    fn object_extension(&self) -> &str {
        "o"
    }

    fn static_lib_extension(&self) -> &str {
        "a"
    }

    fn exe_extension(&self) -> &str {
        ""
    }

    fn static_lib_prefix(&self) -> &str {
        "lib"
    }
}
