use anyhow::Result;
use clap::Args;
use congress_lib::tools::catalogue;

use crate::output::{print_json, print_tools_markdown, print_tools_table, OutputFormat};

#[derive(Args)]
pub struct ToolsArgs {
    /// Only show tools whose name contains this text (e.g. amendment)
    #[arg(long)]
    pub filter: Option<String>,
}

pub fn run(args: &ToolsArgs, format: &OutputFormat) -> Result<()> {
    let mut tools = catalogue();
    if let Some(filter) = &args.filter {
        let needle = filter.to_lowercase();
        tools.retain(|t| t.name.contains(&needle));
    }

    eprintln!("{} tools", tools.len());

    match format {
        OutputFormat::Table => print_tools_table(&tools),
        OutputFormat::Json => print_json(&tools),
        OutputFormat::Markdown => print_tools_markdown(&tools),
    }

    Ok(())
}
