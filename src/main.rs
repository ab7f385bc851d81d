use clap::{ArgAction, Parser};
use ropfix::{
    driver::{self, Input, Output},
    error::Result,
    report,
};
use std::{path::PathBuf, process};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ropfix",
    version,
    about = "Route gadget-prone register operations through the accumulator"
)]
struct Cli {
    /// Input assembly file ("-" or omitted reads standard input)
    input: Option<PathBuf>,
    /// Output file (default: standard output)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Print a note on stderr for every rewritten instruction
    #[arg(long)]
    explain: bool,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let input = Input::from_arg(cli.input);
    let output = match cli.output {
        Some(path) => Output::File(path),
        None => Output::Stdout,
    };

    let source = driver::read_input(&input)?;
    let mut writer = driver::open_output(&output)?;
    let rewritten = driver::rewrite(&source)?;

    if cli.explain {
        report::explain(&input.name(), &source, &rewritten.sites)?;
    }

    driver::write_output(&mut writer, &rewritten.output)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("ropfix: {e}");
        process::exit(1);
    }
}
