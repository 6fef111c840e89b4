use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Compile a JobParameters text config into a C array of its binary encoding.
#[derive(Debug, Parser)]
#[command(name = "compile-job-parameters", version, about)]
struct Cli {
    /// Text-format job parameters to compile
    input: PathBuf,

    /// C source file to write
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match jobfig::compile_file(&cli.input, &cli.output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
