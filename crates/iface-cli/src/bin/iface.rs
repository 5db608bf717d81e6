use anyhow::Result;
use clap::Parser;
use std::io::{IsTerminal, Write};

use iface_cli::args::{CliArgs, ColorChoice, Command};
use iface_cli::{driver, reporter, tracing_config};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTICS_REPORTED: i32 = 1;

fn main() -> Result<()> {
    // Zero cost unless IFACE_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let code = match args.command {
        Command::Check(check) => {
            let run = driver::run_check(&check)?;
            let stdout = std::io::stdout();
            let color = match check.color {
                ColorChoice::Always => true,
                ColorChoice::Never => false,
                ColorChoice::Auto => stdout.is_terminal(),
            };
            colored::control::set_override(color);
            let mut out = stdout.lock();
            reporter::write_report(&run, &check, color, &mut out)?;
            out.flush()?;
            if run.output.has_errors() {
                EXIT_DIAGNOSTICS_REPORTED
            } else {
                EXIT_SUCCESS
            }
        }
    };
    std::process::exit(code);
}
