use congress_lib::types::Amendment;
use congress_lib::ToolDescriptor;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Markdown,
}

const DESCRIPTION_WIDTH: usize = 80;
const SUMMARY_WIDTH: usize = 60;

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "Tool")]
    name: String,
    #[tabled(rename = "Required")]
    required: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct AmendmentRow {
    #[tabled(rename = "Congress")]
    congress: u32,
    #[tabled(rename = "Type")]
    amendment_type: String,
    #[tabled(rename = "Number")]
    number: u32,
    #[tabled(rename = "Latest Action")]
    latest_action: String,
    #[tabled(rename = "Sponsor")]
    sponsor: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

// -- Row builders --

fn build_tool_rows(tools: &[ToolDescriptor]) -> Vec<ToolRow> {
    tools
        .iter()
        .map(|t| ToolRow {
            name: t.name.clone(),
            required: t.input_schema["required"]
                .as_array()
                .map(|req| {
                    req.iter()
                        .filter_map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default(),
            description: truncate(&t.description, DESCRIPTION_WIDTH),
        })
        .collect()
}

fn build_amendment_rows(amendments: &[Amendment]) -> Vec<AmendmentRow> {
    amendments
        .iter()
        .map(|a| AmendmentRow {
            congress: a.congress,
            amendment_type: a.amendment_type.to_string(),
            number: a.number,
            latest_action: a
                .latest_action_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            sponsor: a
                .sponsors
                .iter()
                .flatten()
                .next()
                .and_then(|s| s.full_name.clone().or_else(|| s.bioguide_id.clone()))
                .unwrap_or_else(|| "-".to_string()),
            summary: truncate(
                a.purpose
                    .as_deref()
                    .or(a.description.as_deref())
                    .unwrap_or("-"),
                SUMMARY_WIDTH,
            ),
        })
        .collect()
}

// -- Table output --

pub fn print_tools_table(tools: &[ToolDescriptor]) {
    println!("{}", Table::new(build_tool_rows(tools)));
}

pub fn print_amendments_table(amendments: &[Amendment]) {
    println!("{}", Table::new(build_amendment_rows(amendments)));
}

// -- Markdown output --

pub fn print_tools_markdown(tools: &[ToolDescriptor]) {
    let mut table = Table::new(build_tool_rows(tools));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_amendments_markdown(amendments: &[Amendment]) {
    let mut table = Table::new(build_amendment_rows(amendments));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use congress_lib::types::AmendmentsResponse;

    fn load_amendments_fixture() -> Vec<Amendment> {
        let json_str = include_str!("../../congress_api/tests/fixtures/amendments.json");
        let resp: AmendmentsResponse = serde_json::from_str(json_str).unwrap();
        resp.amendments
    }

    // -- truncate tests --

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("Medicare", 10), "Medicare");
    }

    #[test]
    fn test_truncate_long() {
        let out = truncate("To extend Medicare telehealth flexibilities", 20);
        assert_eq!(out, "To extend Medicar...");
        assert_eq!(out.chars().count(), 20);
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    // -- Row builder tests --

    #[test]
    fn test_build_amendment_rows_mapping() {
        let amendments = load_amendments_fixture();
        let rows = build_amendment_rows(&amendments);
        assert_eq!(rows.len(), 2);

        let row = &rows[0];
        assert_eq!(row.congress, 118);
        assert_eq!(row.amendment_type, "HAMDT");
        assert_eq!(row.number, 852);
        assert!(row.summary.contains("Medicare"));
    }

    #[test]
    fn test_build_amendment_rows_empty() {
        assert!(build_amendment_rows(&[]).is_empty());
    }

    #[test]
    fn test_build_tool_rows_required_column() {
        let tools = congress_lib::tools::catalogue();
        let rows = build_tool_rows(&tools);
        let sub = rows
            .iter()
            .find(|r| r.name == "get_bill_subresource")
            .unwrap();
        assert_eq!(sub.required, "path_segments, subresource");
        let list = rows.iter().find(|r| r.name == "list_bill").unwrap();
        assert_eq!(list.required, "");
        assert!(rows.iter().all(|r| r.description.chars().count() <= DESCRIPTION_WIDTH));
    }

    #[test]
    fn test_table_renders_headers() {
        let rendered = Table::new(build_amendment_rows(&load_amendments_fixture())).to_string();
        assert!(rendered.contains("Latest Action"));
        assert!(rendered.contains("SAMDT"));
    }
}
