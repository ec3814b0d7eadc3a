//! Windows-convention toolchain (cl/lib/link style tools).

use super::{ArchiveInput, CommandSpec, CompileInput, LinkInput, Tools, Toolchain};
use crate::platform::Flavor;
use crate::toolchain::Language;

/// MSVC-style command synthesis.
///
/// Argument lists are structurally identical to the unix variant's; only
/// the flag tokens differ.
#[derive(Debug, Clone)]
pub struct Win32Toolchain {
    tools: Tools,
}

impl Win32Toolchain {
    /// Create a new windows-convention toolchain.
    pub fn new(tools: Tools) -> Self {
        Win32Toolchain { tools }
    }
}

impl Toolchain for Win32Toolchain {
    fn flavor(&self) -> Flavor {
        Flavor::Win32
    }

    fn compile_command(&self, input: &CompileInput, lang: Language) -> CommandSpec {
        let mut cmd = CommandSpec::new(self.tools.compiler(lang));

        cmd = cmd.args(self.tools.extra_flags(lang).iter().cloned());

        // Compile only
        cmd = cmd.arg("/c");

        // Input and output
        cmd = cmd.arg(input.source.display().to_string());
        cmd = cmd.arg(format!("/Fo{}", input.output.display()));

        // Defines, one argument per name[=value]
        for (name, value) in &input.defines {
            match value {
                Some(v) => cmd = cmd.arg(format!("/D{}={}", name, v)),
                None => cmd = cmd.arg(format!("/D{}", name)),
            }
        }

        // Include directories
        for dir in &input.include_dirs {
            cmd = cmd.arg(format!("/I{}", dir.display()));
        }

        cmd
    }

    fn archive_command(&self, input: &ArchiveInput) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.tools.ar);

        // lib.exe's create mode needs no flag beyond silencing the banner
        cmd = cmd.arg("/nologo");
        cmd = cmd.arg(format!("/OUT:{}", input.output.display()));

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
        cmd = cmd.arg(format!("/OUT:{}", input.output.display()));

        // Library search paths
        for dir in &input.lib_dirs {
            cmd = cmd.arg(format!("/LIBPATH:{}", dir.display()));
        }

        // Libraries
        for lib in &input.libs {
            cmd = cmd.arg(format!("{}.lib", lib));
        }

        cmd
    }

    fn object_extension(&self) -> &str {
        "obj"
    }

    fn static_lib_extension(&self) -> &str {
        "lib"
    }

    fn exe_extension(&self) -> &str {
        "exe"
    }

    fn static_lib_prefix(&self) -> &str {
        ""
    }
}
