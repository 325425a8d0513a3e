//! CLI - Command Line Interface for rezka-resolver
//!
//! Runs the HTTP service by default. The `resolve` and `translators`
//! subcommands run one lookup and print the same JSON body the service
//! would return.
//!
//! # Examples
//!
//! ```bash
//! # Start the service on the configured address
//! rezka-resolver
//! rezka-resolver serve --bind 127.0.0.1:8001
//!
//! # One-shot lookups
//! rezka-resolver resolve "Interstellar" --year 2014
//! rezka-resolver resolve "Breaking Bad" -t series --season 2 --episode 5
//! rezka-resolver translators "Breaking Bad"
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use crate::models::{ContentKind, ResolveRequest, SearchFilters};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Lookup failed (error body printed)
    Failed = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Config or client setup failed
    Startup = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// rezka-resolver - resolve a title into a playable stream link
///
/// Run without arguments to start the HTTP service.
#[derive(Parser, Debug)]
#[command(
    name = "rezka-resolver",
    version,
    about = "Resolve a free-text title into a playable HDRezka stream link",
    after_help = "EXAMPLES:\n\
                  rezka-resolver                              Start the HTTP service\n\
                  rezka-resolver resolve \"Interstellar\"       Resolve one title\n\
                  rezka-resolver translators \"Breaking Bad\"   List translators"
)]
pub struct Cli {
    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Print compact single-line JSON
    #[arg(long, global = true)]
    pub compact: bool,

    /// Subcommand to run (omit to serve)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service
    Serve(ServeCmd),

    /// Resolve a title to stream links
    #[command(visible_alias = "r")]
    Resolve(ResolveCmd),

    /// List translators for the first search hit
    #[command(visible_alias = "tr")]
    Translators(TranslatorsCmd),
}

// =============================================================================
// Subcommands
// =============================================================================

/// Run the HTTP service
#[derive(Args, Debug, Default)]
pub struct ServeCmd {
    /// Listen address (overrides config)
    #[arg(long, short = 'b')]
    pub bind: Option<String>,
}

/// Content type filter
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindFilter {
    Movie,
    #[value(alias = "tv")]
    Series,
}

impl From<KindFilter> for ContentKind {
    fn from(kind: KindFilter) -> Self {
        match kind {
            KindFilter::Movie => ContentKind::Movie,
            KindFilter::Series => ContentKind::Series,
        }
    }
}

/// Resolve a title
#[derive(Args, Debug)]
pub struct ResolveCmd {
    /// Title to search for
    #[arg(required = true)]
    pub query: String,

    /// Prefer the hit mentioning this year
    #[arg(long, short = 'y')]
    pub year: Option<String>,

    /// Restrict to movies or series
    #[arg(long = "type", short = 't', value_enum)]
    pub kind: Option<KindFilter>,

    #[arg(long, short = 's', default_value = "1")]
    pub season: u32,

    #[arg(long, short = 'e', default_value = "1")]
    pub episode: u32,

    /// Position in the (filtered) results
    #[arg(long, short = 'i', default_value = "0")]
    pub index: usize,

    /// Translator id (defaults to the page's default track)
    #[arg(long = "translator")]
    pub translator_id: Option<u32>,
}

impl From<ResolveCmd> for ResolveRequest {
    fn from(cmd: ResolveCmd) -> Self {
        ResolveRequest {
            query: cmd.query,
            filters: SearchFilters {
                kind: cmd.kind.map(ContentKind::from),
                year: cmd.year,
                index: cmd.index,
            },
            season: cmd.season,
            episode: cmd.episode,
            translator_id: cmd.translator_id,
        }
    }
}

/// List translators
#[derive(Args, Debug)]
pub struct TranslatorsCmd {
    /// Title to search for
    #[arg(required = true)]
    pub query: String,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// JSON printer for one-shot commands
pub struct Output {
    pub compact: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            compact: cli.compact,
        }
    }

    pub fn render<T: Serialize>(&self, data: &T) -> anyhow::Result<String> {
        let text = if self.compact {
            serde_json::to_string(data)?
        } else {
            serde_json::to_string_pretty(data)?
        };
        Ok(text)
    }

    /// Print a response body to stdout
    pub fn print<T: Serialize>(&self, data: &T) -> anyhow::Result<()> {
        println!("{}", self.render(data)?);
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl std::fmt::Display, code: ExitCode) -> ExitCode {
        eprintln!("Error: {}", msg);
        code
    }
}

// =============================================================================
// Tests
// =============================================================================
