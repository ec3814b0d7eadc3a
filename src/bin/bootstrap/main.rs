//! quay-bootstrap CLI.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use quay_bootstrap::process::{CommandRunner, DryRunRunner, ExecRunner};
use quay_bootstrap::{Error, Pipeline, SystemEnv};

mod cli;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("quay_bootstrap=debug")
    } else {
        EnvFilter::new("quay_bootstrap=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match run(&cli) {
        // The self-hosted run's exit status is ours.
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let code = e.exit_code();
            eprintln!("error: {:#}", anyhow::Error::new(e));
            std::process::exit(code);
        }
    }
}

fn run(cli: &Cli) -> Result<i32, Error> {
    let runner: Box<dyn CommandRunner> = if cli.dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(ExecRunner)
    };

    let mut env = SystemEnv;
    let pipeline = Pipeline::resolve(&mut env, runner.as_ref())?;
    pipeline.run()
}
