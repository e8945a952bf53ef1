#![allow(clippy::print_stderr)]

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

use tsbc_cli::args::{CliArgs, OutputFormat};
use tsbc_cli::driver;
use tsbc_cli::reporter::Reporter;

const EXIT_SUCCESS: u8 = 0;
const EXIT_BREAKING_CHANGES: u8 = 1;
const EXIT_INPUT_ERROR: u8 = 2;

fn main() -> ExitCode {
    // Initialize tracing if TSBC_LOG or RUST_LOG is set (zero cost otherwise).
    tsbc::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let report = match driver::run(&args) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(EXIT_INPUT_ERROR);
        }
    };

    let reporter = Reporter::new(!args.no_color && std::io::stdout().is_terminal());
    match args.format {
        OutputFormat::Text => print!("{}", reporter.render_text(&report)),
        OutputFormat::Json => match reporter.render_json(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err:#}");
                return ExitCode::from(EXIT_INPUT_ERROR);
            }
        },
    }

    if args.fail_on_breaking && report.has_breaking() {
        ExitCode::from(EXIT_BREAKING_CHANGES)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
