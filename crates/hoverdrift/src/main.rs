mod cli;
mod run;
mod strips;

use anyhow::Result;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing(cli.log.as_deref());
    run::run(cli)
}
