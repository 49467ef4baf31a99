use clap::Parser;
use kuec::driver::{self, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    driver::init_tracing(cli.verbose);

    driver::run(&cli)?;
    Ok(())
}
