mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use congress_lib::{Config, RetryPolicy, ToolRegistry};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "congress")]
#[command(about = "Query the Congress.gov API through the assistant tool gateway")]
struct Cli {
    /// Output format: table, json, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Retry transient failures and 5xx responses this many times
    #[arg(long, default_value = "0", global = true)]
    retries: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tools exposed to the assistant
    Tools(commands::tools::ToolsArgs),
    /// Invoke a tool by name and print its JSON result
    Call(commands::call::CallArgs),
    /// Search one page of amendments by description or purpose
    SearchAmendments(commands::search_amendments::SearchAmendmentsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("congress=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Tools(args) => commands::tools::run(args, &format)?,
        Commands::Call(args) => {
            let registry = build_registry(cli.retries)?;
            commands::call::run(args, &registry).await?
        }
        Commands::SearchAmendments(args) => {
            let registry = build_registry(cli.retries)?;
            commands::search_amendments::run(args, &registry, &format).await?
        }
    }

    Ok(())
}

fn build_registry(retries: usize) -> Result<ToolRegistry> {
    let config = Config::from_env()?;
    let policy = RetryPolicy::from_env().with_max_retries(retries);
    Ok(ToolRegistry::from_config(&config)?.with_retry_policy(policy))
}
