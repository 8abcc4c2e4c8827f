use clap::Parser;
use searchables::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    searchables::tracing::init_with(cli.log_format);

    let stdout = std::io::stdout();
    cli::run(&cli, &mut stdout.lock()).inspect_err(|e| {
        tracing::error!("{:#}", e);
    })
}
