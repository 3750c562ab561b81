//! glesgears: headless driver for the spinning gears smoke test

mod args;
mod commands;
mod error;

use std::process::ExitCode;

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glesgears=info,gears_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = match args::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n\n{}", args::USAGE);
            return ExitCode::from(2);
        }
    };

    tracing::debug!("Running {:?}", args.command);

    match commands::execute(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
