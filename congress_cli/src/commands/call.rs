use anyhow::{bail, Context, Result};
use clap::Args;
use congress_lib::ToolRegistry;
use serde_json::Value;

use crate::output::print_json;

#[derive(Args)]
pub struct CallArgs {
    /// Tool name (e.g. get_bill, list_amendment, search_amendments)
    pub tool: String,

    /// Tool arguments as a JSON object, e.g. '{"path_segments": [118, "hr", 2670]}'
    #[arg(long, default_value = "{}")]
    pub args: String,
}

/// Always prints JSON: the tool result, or `{"error": ...}` on failure.
pub async fn run(args: &CallArgs, registry: &ToolRegistry) -> Result<()> {
    let arguments: Value =
        serde_json::from_str(&args.args).context("--args must be a JSON object")?;

    let result = registry.call(&args.tool, arguments).await;
    print_json(&result);

    let status = registry.rate_limit_status();
    eprintln!(
        "Rate budget: {}/{} used this hour",
        status.requests_this_hour, status.limit_per_hour
    );

    if let Some(kind) = result["error"]["kind"].as_str() {
        bail!("{} failed ({})", args.tool, kind);
    }
    Ok(())
}
