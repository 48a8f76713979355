use std::{
    io::{self, BufWriter},
    process::ExitCode,
};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use macresforks::{
    config::{self, Command, Config},
    Filter,
    FilterError,
    ForkVerifier,
    ReadError,
};

fn main() -> ExitCode {
    let command = match Command::from_env() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("macresforks: {e}");
            eprintln!("try 'macresforks --help' for more information");
            return ExitCode::from(2);
        },
    };
    match command {
        Command::Help => {
            print!("{}", config::USAGE);
            ExitCode::SUCCESS
        },
        Command::Version => {
            println!("{}", config::version());
            ExitCode::SUCCESS
        },
        Command::Run(config) => match run(config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report(&e);
                ExitCode::FAILURE
            },
        },
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env(config::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(config: Config) -> Result<()> {
    init_logging(&config);

    let input = io::stdin().lock();
    let output = BufWriter::new(io::stdout().lock());
    let verifier = ForkVerifier::new().strict(config.strict);

    Filter::new(input, output, verifier).run()?;

    Ok(())
}

fn report(e: &anyhow::Error) {
    match e.downcast_ref::<FilterError>() {
        Some(FilterError::Read(ReadError::OutOfMemory(_))) => eprintln!("out of memory"),
        _ => eprintln!("macresforks: {e:#}"),
    }
}
