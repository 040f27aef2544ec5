// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, set up logging, build the shell around
//   the real HTTP client and hand it stdin/stdout.

use clap::Parser;
use perp_cli::{api::perplexity_connector, config::Args, logging, ui::{Shell, ShellOptions}};
use std::io::{self, IsTerminal};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, io::stderr().is_terminal())?;

    let options = ShellOptions {
        model: args.model.clone(),
        interactive: io::stdin().is_terminal() && io::stdout().is_terminal(),
    };
    let connector = perplexity_connector(args.api_config());
    let mut shell = Shell::new(io::stdin().lock(), io::stdout().lock(), connector, options);

    if let Some(token) = args.startup_token() {
        shell.preauthenticate(token)?;
    }

    // Blocks until `exit`/`quit` or end of input.
    shell.run()?;
    Ok(())
}
