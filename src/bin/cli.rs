use anyhow::Result;
use clap::Parser;
use quote_pricing::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli_args = cli::Cli::parse();
    let payload = cli::run_command(cli_args.command).await?;
    cli::emit_value(&payload, cli_args.compact)?;
    Ok(())
}
