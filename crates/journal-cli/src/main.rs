//! The `journal` binary.

use clap::Parser;
use journal_cli::{BaseCommand, CliArgs, JournalCli, JournalConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Config subcommands read the file themselves and must work on a
    // missing or broken one.
    let cli = match args.command {
        Some(BaseCommand::Config(_)) => JournalCli::new("journal", JournalConfig::default()),
        _ => JournalCli::from_args("journal", &args)?,
    };
    cli.run(args).await?;
    Ok(())
}
