//! CLI definitions using clap.

use clap::Parser;

/// Stage-zero build orchestrator for the quay scripting runtime.
///
/// Reads its configuration from QUAY_* and toolchain environment
/// variables, builds the bundled quayjs engine and the quay host with the
/// native compiler toolchain, then hands over to the freshly built binary.
#[derive(Parser)]
#[command(name = "quay-bootstrap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print every command without executing anything
    #[arg(long)]
    pub dry_run: bool,
}
