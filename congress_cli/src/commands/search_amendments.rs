use anyhow::{bail, Result};
use clap::Args;
use congress_lib::tools::SEARCH_AMENDMENTS;
use congress_lib::{ToolOutput, ToolRegistry};
use serde_json::{json, Map, Value};

use crate::output::{print_amendments_markdown, print_amendments_table, print_json, OutputFormat};

#[derive(Args)]
pub struct SearchAmendmentsArgs {
    /// Text to look for in amendment descriptions and purposes
    pub query: String,

    /// Restrict to one congress (e.g. 118)
    #[arg(long)]
    pub congress: Option<i64>,

    /// Maximum number of matches (at most 50)
    #[arg(long)]
    pub limit: Option<i64>,
}

pub async fn run(
    args: &SearchAmendmentsArgs,
    registry: &ToolRegistry,
    format: &OutputFormat,
) -> Result<()> {
    let mut arguments = Map::new();
    arguments.insert("query".to_string(), json!(args.query));
    if let Some(congress) = args.congress {
        arguments.insert("congress".to_string(), json!(congress));
    }
    if let Some(limit) = args.limit {
        arguments.insert("limit".to_string(), json!(limit));
    }

    let page = match registry
        .invoke(SEARCH_AMENDMENTS, Value::Object(arguments))
        .await?
    {
        ToolOutput::Amendments(page) => page,
        _ => bail!("{} returned an unexpected result", SEARCH_AMENDMENTS),
    };

    eprintln!(
        "{} matches in one page of amendments ({} malformed records skipped)",
        page.amendments.len(),
        page.dropped
    );

    match format {
        OutputFormat::Table => print_amendments_table(&page.amendments),
        OutputFormat::Json => print_json(&page),
        OutputFormat::Markdown => print_amendments_markdown(&page.amendments),
    }

    Ok(())
}
