use std::process;

use clap::Parser;
use copilot_roles::commands::roles::{self, RolesArgs};
use copilot_roles::logging::{self, Verbosity};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("ROLES_GIT_SHA"),
    "\nbuilt: ",
    env!("ROLES_BUILD_TS")
);

const HELP_EXAMPLES: &str = "Examples:\n  copilot-roles\n  copilot-roles --tokens ~/.config/copilot/.tokens.yaml\n  copilot-roles --dry-run\n  RUST_LOG=debug copilot-roles";

#[derive(Debug, Parser)]
#[command(
    name = "copilot-roles",
    about = "Send a role-tagged conversation to the Copilot chat API",
    version = VERSION,
    after_help = HELP_EXAMPLES
)]
struct Cli {
    #[command(flatten)]
    roles: RolesArgs,
    /// Debug logs on stderr.
    #[arg(short, long)]
    verbose: bool,
    /// No logs on stderr. Errors are still shown.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    if let Err(err) = roles::run(cli.roles).await {
        eprintln!("{err}");
        process::exit(1);
    }
}
