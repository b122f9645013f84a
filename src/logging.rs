use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// How much diagnostic output goes to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// `quiet` wins when both flags are set.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (_, true) => Self::Quiet,
            (true, false) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }

    fn filter(self) -> EnvFilter {
        match self {
            Self::Quiet => EnvFilter::new("off"),
            Self::Verbose => EnvFilter::new("copilot_roles=debug,warn"),
            Self::Normal => {
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
            }
        }
    }
}

/// Installs the stderr subscriber. Later calls are ignored.
pub fn init(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(verbosity.filter())
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
