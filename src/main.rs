//! rezka-resolver - title in, playable stream link out
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP service (GET /resolve?q=..., GET /translators?q=...)
//! HDREZKA_LOGIN=me HDREZKA_PASSWORD=secret rezka-resolver
//!
//! # One-shot lookups
//! rezka-resolver resolve "Interstellar"
//! rezka-resolver translators "Breaking Bad"
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rezka_resolver::cli::{Cli, Command, ExitCode, Output, ServeCmd};
use rezka_resolver::{commands, Config, DEFAULT_LOG_FILTER};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so one-shot JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(&cli);
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::Startup).into(),
    };

    let code = match cli.command {
        Some(Command::Resolve(cmd)) => commands::resolve_cmd(cmd, &config, &output).await,
        Some(Command::Translators(cmd)) => commands::translators_cmd(cmd, &config, &output).await,
        Some(Command::Serve(cmd)) => run_server(cmd, config, &output).await,
        None => run_server(ServeCmd::default(), config, &output).await,
    };
    code.into()
}

async fn run_server(cmd: ServeCmd, config: Config, output: &Output) -> ExitCode {
    match commands::serve_cmd(cmd, config).await {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("{:#}", e), ExitCode::Startup),
    }
}
