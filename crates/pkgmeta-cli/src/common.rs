//! Options and setup shared by every command

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Only print errors and the result")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,
}

impl GlobalOpts {
    /// Effective verbosity level
    /// - 0: warnings only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Default `tracing` filter for this verbosity, used when `RUST_LOG` is unset
    pub fn default_filter(&self) -> &'static str {
        match self.verbosity_level() {
            0 => "error",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Install the stderr diagnostics subscriber for the library crates
pub fn init_tracing(opts: &GlobalOpts) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| opts.default_filter().into());
    // A second initialization (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}
