//! `hcsolver` binary.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, field};

use hcsolver_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::init_logging,
};

fn try_main(cli: Cli) -> anyhow::Result<()> {
    let summary = run_cli(cli).context("clustering failed")?;
    let mut out = BufWriter::new(io::stdout().lock());
    render_summary(&summary, &mut out).context("could not write the partition")?;
    out.flush().context("could not flush stdout")
}

/// Logs a failure with whatever stable codes the error carries.
fn log_failure(err: &anyhow::Error) {
    let cause = err.downcast_ref::<CliError>();
    let core = cause.and_then(|cause| match cause {
        CliError::Core(core) => Some(core),
        _ => None,
    });
    let line = cause.and_then(|cause| match cause {
        CliError::Input(input) => input.line(),
        _ => None,
    });
    error!(
        error = %format!("{err:#}"),
        code = core.map(|core| field::display(core.code().as_str())),
        state_code = core
            .and_then(|core| core.state_code())
            .map(|code| field::display(code.as_str())),
        line,
        "hcsolver failed"
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging() {
        // No subscriber exists yet, so this is the only channel left.
        let _ = writeln!(io::stderr(), "hcsolver: cannot set up logging: {err}");
        return ExitCode::FAILURE;
    }

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_failure(&err);
            ExitCode::FAILURE
        }
    }
}
